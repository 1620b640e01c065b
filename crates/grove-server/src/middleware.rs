//! Grove Middleware
//!
//! HTTP middleware for request ID propagation and API-key checking.
//!
//! @version 0.1.0
//! @author Grove Development Team

use crate::handlers::ErrorResponse;
use crate::state::AppState;
use axum::{
    body::Body,
    extract::State,
    http::{HeaderValue, Request, Response, StatusCode},
    middleware::Next,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

const REQUEST_ID_HEADER: &str = "x-request-id";
const API_KEY_HEADER: &str = "x-api-key";

// =============================================================================
// Request ID Middleware
// =============================================================================

/// Tag each request and its response with a request ID. A caller-supplied
/// ID is kept; otherwise a fresh UUID is generated.
pub async fn request_id(mut request: Request<Body>, next: Next) -> Response<Body> {
    let id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .cloned()
        .unwrap_or_else(|| {
            HeaderValue::from_str(&Uuid::new_v4().to_string())
                .unwrap_or_else(|_| HeaderValue::from_static("unknown"))
        });

    request.headers_mut().insert(REQUEST_ID_HEADER, id.clone());
    let mut response = next.run(request).await;
    response.headers_mut().insert(REQUEST_ID_HEADER, id);
    response
}

// =============================================================================
// API Key Middleware
// =============================================================================

/// Require a configured API key. Open when no keys are configured.
pub async fn require_api_key(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Result<Response<Body>, impl IntoResponse> {
    let keys = &state.config.api_keys;
    if keys.is_empty() {
        return Ok(next.run(request).await);
    }

    let rejection = match request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|h| h.to_str().ok())
    {
        Some(key) if keys.iter().any(|k| k == key) => None,
        Some(_) => Some("Invalid API key"),
        None => Some("Missing x-api-key header"),
    };

    match rejection {
        None => Ok(next.run(request).await),
        Some(message) => {
            tracing::debug!(message, "rejected request without a valid API key");
            Err((
                StatusCode::UNAUTHORIZED,
                Json(ErrorResponse::new(message, "UNAUTHORIZED")),
            ))
        }
    }
}
