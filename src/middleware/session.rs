use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum_extra::extract::CookieJar;
use axum_extra::extract::cookie::{Cookie, SameSite};
use uuid::Uuid;

use crate::state::SharedState;

pub const SESSION_COOKIE: &str = "werise_session";

/// Attach the visitor's session to the request, starting one (and setting
/// the cookie) when the browser has none we recognise.
pub async fn attach_session(
    State(state): State<SharedState>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Response {
    let id = jar
        .get(SESSION_COOKIE)
        .and_then(|cookie| Uuid::parse_str(cookie.value()).ok());

    let (session, created) = state.sessions.resolve(id);
    req.extensions_mut().insert(session.clone());

    let response = next.run(req).await;
    if !created {
        return response;
    }

    let cookie = Cookie::build((SESSION_COOKIE, session.id.to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax);
    (jar.add(cookie), response).into_response()
}
