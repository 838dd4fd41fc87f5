//! # Mail Transport
//!
//! Delivery of the two order emails through one pluggable contract.
//!
//! ## Contract
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      send_order_emails(payload)                         │
//! │                                                                         │
//! │  internal notification fails ──► Err(MailError)       (endpoint: 502)   │
//! │  customer acknowledgment fails ─► Ok(outcome with     (endpoint: 200,   │
//! │                                   customer_send_error) warn only)       │
//! │  both succeed ─────────────────► Ok(outcome with ids) (endpoint: 200)   │
//! │                                                                         │
//! │  The business hearing about the order is what matters; the customer's   │
//! │  copy is best-effort.                                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Two implementations, selected once from configuration:
//! - [`ApiMailer`] - provider HTTP API (JSON over HTTPS, bearer key)
//! - [`SmtpMailer`] - direct SMTP via lettre, TLS strictly required

mod api;
mod smtp;

pub use api::ApiMailer;
pub use smtp::SmtpMailer;

use async_trait::async_trait;
use thiserror::Error;

use order_core::OrderEmailPayload;

/// Delivery outcome for one order's pair of messages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MailSendOutcome {
    /// Provider/message id of the internal notification, when available.
    pub internal_email_id: Option<String>,

    /// Provider/message id of the customer acknowledgment, when sent.
    pub customer_email_id: Option<String>,

    /// Why the customer acknowledgment failed, when it did. Never fatal.
    pub customer_send_error: Option<String>,
}

/// Mail delivery errors. Raised only when the internal notification cannot
/// be sent; customer-side failures live in [`MailSendOutcome`].
#[derive(Debug, Error)]
pub enum MailError {
    #[error("missing required mail config: {0}")]
    MissingConfig(String),

    #[error("invalid email address: {0}")]
    InvalidAddress(String),

    #[error("failed to build message: {0}")]
    Build(String),

    #[error("failed to send internal order notification: {0}")]
    InternalSend(String),
}

/// The delivery seam the endpoint depends on.
#[async_trait]
pub trait MailTransport: Send + Sync {
    /// Sends the internal notification and the customer acknowledgment.
    ///
    /// Implementations must send the internal notification first and fail
    /// fast on it; a customer-side failure is captured in the outcome.
    async fn send_order_emails(&self, payload: &OrderEmailPayload)
        -> Result<MailSendOutcome, MailError>;
}
