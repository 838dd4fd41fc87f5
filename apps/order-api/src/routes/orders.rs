//! Order submission endpoint.
//!
//! The one place with control flow: every incoming submission walks a linear
//! ladder with no retries.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      POST /api/orders                                   │
//! │                                                                         │
//! │  feature disabled ──────────────► 503 ORDER_FORM_DISABLED              │
//! │  malformed JSON ────────────────► 400 INVALID_JSON                     │
//! │  honeypot filled ───────────────► 200 ok, requestId "IGNORED"          │
//! │      (no validation, no rate limit, no mail - bots see success)        │
//! │  rate limit hit ────────────────► 429 RATE_LIMITED + Retry-After       │
//! │  validation failed ─────────────► 400 VALIDATION_ERROR + fieldErrors   │
//! │  internal mail failed ──────────► 502 EMAIL_DELIVERY_FAILED            │
//! │  customer mail failed ──────────► 200 ok (warn only)                   │
//! │  all good ──────────────────────► 200 ok, requestId                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{ConnectInfo, State};
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use serde_json::Value;
use tracing::{error, info, warn};

use order_core::{prepare_order_for_delivery, HONEYPOT_REQUEST_ID};

use crate::error::{OrderApiError, OrderApiErrorCode, OrderApiSuccess};
use crate::AppState;

/// Handles `POST /api/orders`.
pub async fn submit_order(
    State(state): State<Arc<AppState>>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
    body: String,
) -> Response {
    if !state.config.order_form_enabled {
        return OrderApiError::new(
            OrderApiErrorCode::OrderFormDisabled,
            "Order requests are currently unavailable. Please contact us directly.",
        )
        .into_response();
    }

    let Ok(payload) = serde_json::from_str::<Value>(&body) else {
        return OrderApiError::new(
            OrderApiErrorCode::InvalidJson,
            "Unable to process this request payload.",
        )
        .into_response();
    };

    // Honeypot: real users never fill the hidden `website` field. A filled
    // one gets a success-shaped response and otherwise costs nothing - no
    // validation, no limiter entry, no mail.
    let honeypot = payload
        .get("website")
        .and_then(Value::as_str)
        .map(str::trim)
        .unwrap_or_default();
    if !honeypot.is_empty() {
        return OrderApiSuccess::new(HONEYPOT_REQUEST_ID, "Thanks. Your request has been received.")
            .into_response();
    }

    let now = (state.clock)();

    let client_ip = resolve_client_ip(&headers, connect_info.map(|info| info.0));
    let decision = state.limiter.check(&client_ip, now.timestamp_millis() as u64);
    if !decision.allowed {
        info!(
            client_ip = %client_ip,
            retry_after = decision.retry_after_seconds,
            "order submission rate limited"
        );

        let mut response = OrderApiError::new(
            OrderApiErrorCode::RateLimited,
            "Too many requests. Please try again in a few minutes.",
        )
        .into_response();
        if let Ok(value) = decision.retry_after_seconds.to_string().parse() {
            response.headers_mut().insert("Retry-After", value);
        }
        return response;
    }

    let prepared =
        match prepare_order_for_delivery(&payload, now, state.config.minimum_lead_days) {
            Ok(prepared) => prepared,
            Err(rejection) => {
                return OrderApiError::new(OrderApiErrorCode::ValidationError, rejection.message)
                    .with_field_errors(rejection.field_errors)
                    .into_response();
            }
        };

    match state.mailer.send_order_emails(&prepared.email_payload).await {
        Ok(outcome) => {
            if let Some(reason) = outcome.customer_send_error {
                warn!(
                    request_id = %prepared.request_id,
                    reason = %reason,
                    "customer confirmation failed; business was notified"
                );
            }

            info!(request_id = %prepared.request_id, "order request delivered");

            OrderApiSuccess::new(
                prepared.request_id,
                "Thanks for your order request. We will contact you soon.",
            )
            .into_response()
        }
        Err(failure) => {
            error!(request_id = %prepared.request_id, %failure, "internal order email failed");

            OrderApiError::new(
                OrderApiErrorCode::EmailDeliveryFailed,
                "We could not send your request right now. Please try again shortly.",
            )
            .into_response()
        }
    }
}

/// Resolves the rate-limit key for a request.
///
/// Order of trust: the socket address when the server has one, then the
/// first `X-Forwarded-For` entry, then `X-Real-Ip`, then `"unknown"`.
fn resolve_client_ip(headers: &HeaderMap, explicit: Option<SocketAddr>) -> String {
    if let Some(addr) = explicit {
        return addr.ip().to_string();
    }

    if let Some(forwarded) = headers.get("x-forwarded-for").and_then(|v| v.to_str().ok()) {
        if let Some(first) = forwarded.split(',').next() {
            let first = first.trim();
            if !first.is_empty() {
                return first.to_string();
            }
        }
    }

    if let Some(real_ip) = headers.get("x-real-ip").and_then(|v| v.to_str().ok()) {
        let real_ip = real_ip.trim();
        if !real_ip.is_empty() {
            return real_ip.to_string();
        }
    }

    "unknown".to_string()
}
