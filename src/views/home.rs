use std::sync::Arc;

use askama::Template;
use axum::Extension;
use axum::response::{Html, IntoResponse};

use crate::app::{Command, Page};
use crate::error::AppError;
use crate::session::Session;

use super::{NavLink, dispatch, nav_links};

#[derive(Template)]
#[template(path = "home.html")]
struct HomeTemplate {
    nav: Vec<NavLink>,
}

pub async fn index(
    Extension(session): Extension<Arc<Session>>,
) -> Result<impl IntoResponse, AppError> {
    dispatch(&session, Command::Navigate(Page::Home)).await?;

    let template = HomeTemplate {
        nav: nav_links(Page::Home),
    };
    Ok(Html(template.render()?))
}
