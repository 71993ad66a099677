//! JSON API handlers
//!
//! Everything except the health check sits behind
//! [`require_api_session`](crate::auth::require_api_session).

use super::types::{ApiError, ApiResponse, HealthStatus, SaveRequest};
use crate::AppState;
use axum::{
    body::Bytes,
    extract::{Extension, State},
};
use chrono::Utc;
use daohang_applications::{SaveReceipt, Session};
use daohang_core::NavigationDocument;
use tracing::{info, warn};

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> ApiResponse<HealthStatus> {
    ApiResponse::success(
        HealthStatus {
            status: "ok",
            version: state.settings.site.build_version().to_string(),
            timestamp: Utc::now(),
        },
        "",
    )
}

/// Replace the navigation document.
///
/// The body is parsed by hand so that a malformed payload is reported in the
/// failure envelope.
pub async fn save_navigation(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    body: Bytes,
) -> Result<ApiResponse<SaveReceipt>, ApiError> {
    let request: SaveRequest = serde_json::from_slice(&body).map_err(|e| {
        warn!(error = %e, "Rejected malformed save payload");
        ApiError::internal(format!("Failed to save data: {}", e))
    })?;

    let documents = state.application.documents();
    let receipt = match request.expected_updated_at {
        Some(expected) => documents.save_if_unchanged(request.data, expected).await?,
        None => documents.save(request.data).await?,
    };

    info!(
        owner = %session.owner,
        updated_at = %receipt.updated_at,
        "Navigation document saved"
    );
    Ok(ApiResponse::success(receipt, "Saved"))
}

/// Current navigation document
pub async fn get_navigation(State(state): State<AppState>) -> ApiResponse<NavigationDocument> {
    ApiResponse::success(state.application.navigation().await, "")
}

/// Known endpoint, wrong method
pub async fn method_not_allowed() -> ApiError {
    ApiError::method_not_allowed()
}

/// Unknown endpoint under `/api`
pub async fn api_not_found() -> ApiError {
    ApiError::not_found()
}
