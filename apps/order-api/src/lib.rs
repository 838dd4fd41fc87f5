//! # Order API
//!
//! HTTP server for the Dillz Bites order-intake form.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Order API Server                                │
//! │                                                                         │
//! │  Order Form ──► POST /api/orders ──► orchestration ──► Mail Transport  │
//! │                                           │                             │
//! │                                           ▼                             │
//! │                                   order-core (pure)                     │
//! │                            validation · rendering · ids                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration
//! Environment variables:
//! - `HTTP_PORT` - listen port (default: 8787)
//! - `ENABLE_ORDER_FORM` - feature flag (default: enabled)
//! - `RATE_LIMIT_MAX` / `RATE_LIMIT_WINDOW_MS` - limiter (default: 5 / 15min)
//! - `ORDER_MIN_LEAD_DAYS` - minimum lead time (default: 3)
//! - `MAIL_TRANSPORT` - `api` or `smtp` (default: api)
//! - `MAIL_API_KEY` / `MAIL_API_ENDPOINT` - provider API transport
//! - `SMTP_URL` - SMTP transport, TLS strictly required
//! - `ORDER_FROM_EMAIL` / `ORDER_NOTIFICATION_EMAIL` / `BUSINESS_REPLY_TO_EMAIL`

pub mod config;
pub mod error;
pub mod limiter;
pub mod mail;
pub mod routes;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use chrono::{DateTime, Utc};

// Re-exports
pub use config::{ApiConfig, ConfigError};
pub use error::{OrderApiError, OrderApiErrorCode, OrderApiSuccess};
pub use limiter::{InMemoryRateLimitStore, RateLimitStore};
pub use mail::{ApiMailer, MailError, MailSendOutcome, MailTransport, SmtpMailer};

/// Shared application state.
pub struct AppState {
    pub config: ApiConfig,
    pub limiter: Arc<dyn RateLimitStore>,
    pub mailer: Arc<dyn MailTransport>,
    /// Source of "now". A fn pointer so tests can freeze the clock.
    pub clock: fn() -> DateTime<Utc>,
}

impl AppState {
    /// State with the default in-memory limiter and the real clock.
    pub fn new(config: ApiConfig, mailer: Arc<dyn MailTransport>) -> Self {
        let limiter = Arc::new(InMemoryRateLimitStore::new(config.rate_limit));

        AppState {
            config,
            limiter,
            mailer,
            clock: Utc::now,
        }
    }
}

/// Builds the route table. Shared by `main` and the integration tests.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/orders", post(routes::orders::submit_order))
        .route("/api/health", get(routes::health::health))
        .with_state(state)
}
