pub mod app;
pub mod config;
pub mod error;
pub mod gallery;
pub mod middleware;
pub mod models;
pub mod session;
pub mod state;
pub mod store;
pub mod submission;
pub mod views;

use std::sync::Arc;

use axum::http::{HeaderName, HeaderValue};
use axum::Router;
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::error::{AppError, ConfigError};
use crate::middleware::session::attach_session;
use crate::session::SessionRegistry;
use crate::state::{AppState, SharedState};
use crate::store::{RestStore, SharedStore};

/// Build the router around an already-constructed store handle. Must be
/// called inside a Tokio runtime; it starts the session sweeper.
pub fn build_app(store: SharedStore, config: Config) -> Router {
    let sessions = Arc::new(SessionRegistry::new(store, config.session_ttl));
    tokio::spawn(session::run_sweeper(
        Arc::downgrade(&sessions),
        config.session_sweep,
    ));

    let state: SharedState = Arc::new(AppState { config, sessions });

    Router::new()
        .merge(views::view_routes().layer(axum::middleware::from_fn_with_state(
            state.clone(),
            attach_session,
        )))
        .nest_service("/static", ServeDir::new("static"))
        .route("/health", axum::routing::get(health))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("x-content-type-options"),
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("x-frame-options"),
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("referrer-policy"),
            HeaderValue::from_static("strict-origin-when-cross-origin"),
        ))
        .with_state(state)
}

/// Build the router with the REST store client described by `config`.
/// Fails when the store handle cannot be constructed.
pub fn build_app_from_config(config: Config) -> Result<Router, ConfigError> {
    let store: SharedStore = Arc::new(RestStore::new(&config.store)?);
    Ok(build_app(store, config))
}

async fn health() -> &'static str {
    "ok"
}

async fn not_found() -> AppError {
    AppError::NotFound("Page not found".to_string())
}
