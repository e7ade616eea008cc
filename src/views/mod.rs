pub mod contact;
pub mod gallery;
pub mod home;
pub mod submit;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;

use crate::app::{Command, Outcome, Page};
use crate::error::AppError;
use crate::session::Session;
use crate::state::SharedState;

pub fn view_routes() -> Router<SharedState> {
    Router::new()
        .route("/", get(home::index))
        // Gallery
        .route("/gallery", get(gallery::index))
        .route("/gallery/retry", post(gallery::retry))
        .route("/gallery/images/{id}/failed", post(gallery::image_failed))
        // Submission
        .route("/submit", get(submit::form_page).post(submit::submit))
        .route("/submit/another", post(submit::submit_another))
        // Contact
        .route("/contact", get(contact::index))
}

/// Header/footer link for one page.
pub struct NavLink {
    pub label: &'static str,
    pub path: &'static str,
    pub active: bool,
}

pub fn nav_links(current: Page) -> Vec<NavLink> {
    Page::ALL
        .into_iter()
        .map(|page| NavLink {
            label: page.label(),
            path: page.path(),
            active: page == current,
        })
        .collect()
}

/// Run a command against the visitor's app on its own task, so a dropped
/// connection cannot abandon a store call half way.
pub async fn dispatch(session: &Arc<Session>, command: Command) -> Result<Outcome, AppError> {
    let session = Arc::clone(session);
    tokio::spawn(async move { session.app.dispatch(command).await })
        .await
        .map_err(|e| AppError::Internal(format!("Command task failed: {e}")))
}
