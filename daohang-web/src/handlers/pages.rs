//! HTML page handlers

use super::types::LoginForm;
use crate::auth::{clear_session_cookie, session_cookie, session_token, AdminSession};
use crate::templates::{error_page, render, AdminTemplate, HomeTemplate, LoginTemplate};
use crate::AppState;
use axum::{
    extract::{Form, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use tracing::{error, warn};

/// Public navigation homepage
pub async fn home(State(state): State<AppState>) -> Response {
    let document = state.application.navigation().await;
    render(&HomeTemplate::new(
        &document,
        state.settings.site.build_version(),
    ))
}

/// Login form
pub async fn login_page() -> Response {
    render(&LoginTemplate::new(None))
}

/// Check credentials, set the session cookie and go to the admin panel
pub async fn login(State(state): State<AppState>, Form(form): Form<LoginForm>) -> Response {
    match state.application.login(&form.username, &form.password).await {
        Ok(Some(token)) => (
            StatusCode::FOUND,
            [
                (header::LOCATION, "/admin".to_string()),
                (
                    header::SET_COOKIE,
                    session_cookie(&token, &state.settings.security),
                ),
            ],
        )
            .into_response(),
        Ok(None) => render(&LoginTemplate::new(Some(
            "Invalid username or password".to_string(),
        ))),
        Err(e) => {
            error!(error = %e, "Login failed");
            render(&LoginTemplate::new(Some(
                "An error occurred while signing in".to_string(),
            )))
        }
    }
}

/// Revoke the presented session (if any) and clear the cookie
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if let Some(token) = session_token(&headers) {
        if let Err(e) = state.application.logout(&token).await {
            warn!(error = %e, "Failed to revoke session on logout");
        }
    }

    (
        StatusCode::FOUND,
        [
            (header::LOCATION, "/".to_string()),
            (header::SET_COOKIE, clear_session_cookie()),
        ],
    )
        .into_response()
}

/// Admin panel
pub async fn admin_panel(
    AdminSession(session): AdminSession,
    State(state): State<AppState>,
) -> Response {
    let document = state.application.navigation().await;

    match AdminTemplate::new(
        &document,
        &session.owner,
        state.settings.site.build_version(),
    ) {
        Ok(page) => render(&page),
        Err(e) => error_page(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    }
}

/// Anything outside the known pages and `/api`
pub async fn page_not_found() -> Response {
    error_page(StatusCode::NOT_FOUND, "The page you requested does not exist.")
}
