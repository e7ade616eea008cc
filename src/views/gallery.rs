use std::sync::Arc;

use askama::Template;
use axum::Extension;
use axum::extract::Path;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};

use crate::app::{Command, Outcome, Page};
use crate::error::AppError;
use crate::gallery::{ArtworkCard, ListError};
use crate::session::Session;

use super::{NavLink, dispatch, nav_links};

#[derive(Template)]
#[template(path = "gallery.html")]
struct GalleryTemplate {
    nav: Vec<NavLink>,
    error: Option<String>,
    cards: Vec<ArtworkCard>,
}

/// Opening the gallery always reloads the full list.
pub async fn index(Extension(session): Extension<Arc<Session>>) -> Result<Response, AppError> {
    let outcome = dispatch(&session, Command::Navigate(Page::Gallery)).await?;
    render(outcome)
}

pub async fn retry(Extension(session): Extension<Arc<Session>>) -> Result<Response, AppError> {
    let outcome = dispatch(&session, Command::Retry).await?;
    if outcome == Outcome::Listed(Err(ListError::NotRetryable)) {
        return Ok(Redirect::to("/gallery").into_response());
    }
    render(outcome)
}

/// Beacon from the browser when an artwork image failed to load.
pub async fn image_failed(
    Extension(session): Extension<Arc<Session>>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    match dispatch(&session, Command::ImageFailed(id)).await? {
        Outcome::ImageMarked(true) => Ok(StatusCode::NO_CONTENT),
        _ => Err(AppError::NotFound("Artwork not in the current gallery".to_string())),
    }
}

/// Render the result of this request's own load.
fn render(outcome: Outcome) -> Result<Response, AppError> {
    let (status, error, cards) = match outcome {
        Outcome::Listed(Ok(cards)) => (StatusCode::OK, None, cards),
        Outcome::Listed(Err(err)) => (StatusCode::BAD_GATEWAY, Some(err.to_string()), Vec::new()),
        other => {
            return Err(AppError::Internal(format!(
                "Unexpected outcome for gallery: {other:?}"
            )));
        }
    };

    let template = GalleryTemplate {
        nav: nav_links(Page::Gallery),
        error,
        cards,
    };
    Ok((status, Html(template.render()?)).into_response())
}
