//! Error codes and response envelopes for the Order API.
//!
//! Every response the endpoint produces carries a leading `ok` boolean.
//! Error codes map to HTTP status codes in exactly one place so handlers
//! never hand-pick status numbers.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Serialize;

use order_core::FieldErrors;

/// Client-visible error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderApiErrorCode {
    InvalidJson,
    ValidationError,
    RateLimited,
    EmailDeliveryFailed,
    OrderFormDisabled,
}

impl OrderApiErrorCode {
    /// Central code → HTTP status mapping.
    pub fn status(&self) -> StatusCode {
        match self {
            OrderApiErrorCode::InvalidJson => StatusCode::BAD_REQUEST,
            OrderApiErrorCode::ValidationError => StatusCode::BAD_REQUEST,
            OrderApiErrorCode::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            OrderApiErrorCode::EmailDeliveryFailed => StatusCode::BAD_GATEWAY,
            OrderApiErrorCode::OrderFormDisabled => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

/// Successful submission envelope.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderApiSuccess {
    pub ok: bool,
    pub request_id: String,
    pub message: String,
}

impl OrderApiSuccess {
    pub fn new(request_id: impl Into<String>, message: impl Into<String>) -> Self {
        OrderApiSuccess {
            ok: true,
            request_id: request_id.into(),
            message: message.into(),
        }
    }
}

impl IntoResponse for OrderApiSuccess {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Failed submission envelope.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderApiError {
    pub ok: bool,
    pub code: OrderApiErrorCode,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_errors: Option<FieldErrors>,
}

impl OrderApiError {
    pub fn new(code: OrderApiErrorCode, message: impl Into<String>) -> Self {
        OrderApiError {
            ok: false,
            code,
            message: message.into(),
            field_errors: None,
        }
    }

    pub fn with_field_errors(mut self, field_errors: FieldErrors) -> Self {
        self.field_errors = Some(field_errors);
        self
    }
}

impl IntoResponse for OrderApiError {
    fn into_response(self) -> Response {
        (self.code.status(), Json(self)).into_response()
    }
}
