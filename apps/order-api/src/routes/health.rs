//! Liveness probe.
//!
//! No dependencies to check: the service holds no database or broker
//! connection, so "the process answers" is the whole health story.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;

/// Handles `GET /api/health`.
pub async fn health() -> Response {
    (StatusCode::OK, Json(json!({ "status": "ok" }))).into_response()
}
