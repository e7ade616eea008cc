use std::sync::Arc;

use askama::Template;
use axum::extract::Form;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Extension;

use crate::app::{Command, Outcome, Page};
use crate::error::AppError;
use crate::session::Session;
use crate::submission::{ArtworkForm, SubmissionError, SubmissionState};

use super::{NavLink, dispatch, nav_links};

#[derive(Template)]
#[template(path = "submit.html")]
struct SubmitTemplate {
    nav: Vec<NavLink>,
    succeeded: bool,
    submitting: bool,
    form: ArtworkForm,
    error: Option<String>,
    field_errors: Vec<String>,
}

pub async fn form_page(
    Extension(session): Extension<Arc<Session>>,
) -> Result<Response, AppError> {
    dispatch(&session, Command::Navigate(Page::Submit)).await?;
    render(&session, StatusCode::OK)
}

pub async fn submit(
    Extension(session): Extension<Arc<Session>>,
    Form(form): Form<ArtworkForm>,
) -> Result<Response, AppError> {
    let status = match dispatch(&session, Command::Submit(form)).await? {
        Outcome::Submitted(Ok(())) => StatusCode::OK,
        Outcome::Submitted(Err(SubmissionError::Invalid(_))) => StatusCode::UNPROCESSABLE_ENTITY,
        Outcome::Submitted(Err(SubmissionError::Store(_))) => StatusCode::BAD_GATEWAY,
        Outcome::Submitted(Err(SubmissionError::InFlight | SubmissionError::NotReady)) => {
            StatusCode::CONFLICT
        }
        other => {
            return Err(AppError::Internal(format!(
                "Unexpected outcome for submit: {other:?}"
            )));
        }
    };
    render(&session, status)
}

pub async fn submit_another(
    Extension(session): Extension<Arc<Session>>,
) -> Result<Redirect, AppError> {
    dispatch(&session, Command::SubmitAnother).await?;
    Ok(Redirect::to(Page::Submit.path()))
}

fn render(session: &Session, status: StatusCode) -> Result<Response, AppError> {
    let snapshot = session.app.submission().snapshot();

    let error = match &snapshot.state {
        SubmissionState::Failed(message) => Some(message.clone()),
        _ => None,
    };

    let template = SubmitTemplate {
        nav: nav_links(Page::Submit),
        succeeded: snapshot.state == SubmissionState::Succeeded,
        submitting: snapshot.state == SubmissionState::Submitting,
        form: snapshot.form,
        error,
        field_errors: snapshot.field_errors.iter().map(ToString::to_string).collect(),
    };
    Ok((status, Html(template.render()?)).into_response())
}
