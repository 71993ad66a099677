//! Route definitions for the JSON API

use crate::{auth, handlers, AppState};
use axum::{
    middleware,
    routing::{get, post},
    Router,
};

/// Create API routes, mounted under `/api`.
///
/// The session guard wraps the protected routes together with their method and
/// endpoint fallbacks, so authentication is decided first.
pub fn api_routes(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route(
            "/save",
            post(handlers::save_navigation).fallback(handlers::method_not_allowed),
        )
        .route(
            "/data",
            get(handlers::get_navigation).fallback(handlers::method_not_allowed),
        )
        .fallback(handlers::api_not_found)
        .layer(middleware::from_fn_with_state(
            state,
            auth::require_api_session,
        ));

    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        .merge(protected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::WebConfig;
    use axum::http::StatusCode;
    use daohang_core::DaohangConfig;
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_health_check_route() {
        let state = AppState::new(WebConfig::default(), DaohangConfig::default())
            .await
            .unwrap();
        let app = api_routes(state.clone()).with_state(state);

        let response = app
            .oneshot(
                axum::http::Request::builder()
                    .uri("/health")
                    .body(axum::body::Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unknown_endpoint_requires_session() {
        let state = AppState::new(WebConfig::default(), DaohangConfig::default())
            .await
            .unwrap();
        let app = api_routes(state.clone()).with_state(state);

        let response = app
            .oneshot(
                axum::http::Request::builder()
                    .uri("/nope")
                    .body(axum::body::Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
