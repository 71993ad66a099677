//! Session cookie handling and request guards
//!
//! Pages redirect unauthenticated visitors to `/login`; the API answers 401 with
//! the failure envelope. Both consult the session store on every request.

use crate::handlers::types::ApiError;
use crate::AppState;
use axum::{
    extract::{FromRef, FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::headers::{Cookie, HeaderMapExt};
use daohang_applications::Session;
use daohang_core::SecurityConfig;
use tracing::debug;

/// Name of the cookie carrying the session token
pub const SESSION_COOKIE: &str = "session";

/// Session token presented in the request's cookies, if any
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    headers
        .typed_get::<Cookie>()
        .and_then(|cookie| cookie.get(SESSION_COOKIE).map(str::to_string))
        .filter(|token| !token.is_empty())
}

/// `Set-Cookie` value handing `token` to the browser
pub fn session_cookie(token: &str, security: &SecurityConfig) -> String {
    let mut cookie = format!(
        "{}={}; HttpOnly; Path=/; Max-Age={}; SameSite=Lax",
        SESSION_COOKIE, token, security.session_timeout_secs
    );
    if security.secure_cookies {
        cookie.push_str("; Secure");
    }
    cookie
}

/// `Set-Cookie` value removing the session cookie
pub fn clear_session_cookie() -> String {
    format!("{}=; HttpOnly; Path=/; Max-Age=0; SameSite=Lax", SESSION_COOKIE)
}

/// 302 Found to `location`
pub fn found(location: &'static str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location)]).into_response()
}

/// Redirect to the login page for failed page authentication
#[derive(Debug)]
pub struct LoginRedirect;

impl IntoResponse for LoginRedirect {
    fn into_response(self) -> Response {
        found("/login")
    }
}

/// The admin's session, required by admin pages
#[derive(Debug, Clone)]
pub struct AdminSession(pub Session);

impl<S> FromRequestParts<S> for AdminSession
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = LoginRedirect;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);

        let token = session_token(&parts.headers).ok_or(LoginRedirect)?;
        match app_state.application.sessions().lookup_session(&token).await {
            Some(session) => Ok(AdminSession(session)),
            None => {
                debug!("No valid session for admin page, redirecting to login");
                Err(LoginRedirect)
            }
        }
    }
}

/// Guard for the protected part of the API.
///
/// Runs before method and endpoint resolution, so an unauthenticated caller gets
/// 401 even for unknown endpoints or wrong methods. The session is handed to
/// handlers through request extensions.
pub async fn require_api_session(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = session_token(request.headers()).ok_or_else(ApiError::unauthorized)?;

    let session = state
        .application
        .sessions()
        .lookup_session(&token)
        .await
        .ok_or_else(ApiError::unauthorized)?;

    request.extensions_mut().insert(session);
    Ok(next.run(request).await)
}
