use std::sync::Arc;

use askama::Template;
use axum::Extension;
use axum::response::{Html, IntoResponse};

use crate::app::{Command, Page};
use crate::error::AppError;
use crate::session::Session;

use super::{NavLink, dispatch, nav_links};

#[derive(Template)]
#[template(path = "contact.html")]
struct ContactTemplate {
    nav: Vec<NavLink>,
}

pub async fn index(
    Extension(session): Extension<Arc<Session>>,
) -> Result<impl IntoResponse, AppError> {
    dispatch(&session, Command::Navigate(Page::Contact)).await?;

    let template = ContactTemplate {
        nav: nav_links(Page::Contact),
    };
    Ok(Html(template.render()?))
}
