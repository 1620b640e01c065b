//! Grove Handlers
//!
//! HTTP request handlers for the records API.
//!
//! @version 0.1.0
//! @author Grove Development Team

use crate::state::AppState;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use grove_common::GroveError;
use grove_records::{RecordPage, RecordParams};
use serde::{Deserialize, Serialize};

// =============================================================================
// Health Check
// =============================================================================

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Health check endpoint.
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// =============================================================================
// Records Endpoint
// =============================================================================

/// List one page of records, or every page when `all` is set. The query
/// string is taken as raw pairs so repeated keys never fail extraction.
pub async fn list_records(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<RecordPage>, ApiError> {
    let params = RecordParams::from_pairs(pairs);
    let page = state.records.query_params(&params).await?;
    Ok(Json(page))
}

// =============================================================================
// Error Response
// =============================================================================

/// Error response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl ErrorResponse {
    pub fn new(error: impl ToString, code: impl ToString) -> Self {
        Self {
            error: error.to_string(),
            code: code.to_string(),
        }
    }
}

/// Fault raised while serving a request. Details are logged, never sent.
#[derive(Debug)]
pub struct ApiError(pub GroveError);

impl From<GroveError> for ApiError {
    fn from(err: GroveError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::error!(
            error = %self.0,
            retryable = self.0.is_retryable(),
            "request failed"
        );
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new("Internal server error", "INTERNAL_ERROR")),
        )
            .into_response()
    }
}

/// Method not allowed handler.
pub async fn method_not_allowed() -> impl IntoResponse {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(ErrorResponse::new("Method not allowed", "METHOD_NOT_ALLOWED")),
    )
}

/// Not found handler.
pub async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse::new("Not found", "NOT_FOUND")),
    )
}
