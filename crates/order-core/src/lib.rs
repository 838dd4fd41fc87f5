//! # order-core: Pure Business Logic for the Order Intake Pipeline
//!
//! This crate is the **heart** of the order-intake service. It contains all
//! business logic as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Order Intake Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  Order Form (browser)                           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ POST /api/orders (JSON)                │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                  apps/order-api (axum)                          │   │
//! │  │    feature flag ─► honeypot ─► rate limit ─► validate ─► mail  │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ order-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │validation │  │  service  │  │rate_limit │  │   │
//! │  │   │  Order    │  │   rules   │  │ request id│  │  window   │  │   │
//! │  │   │  Payload  │  │ lead time │  │  rendering│  │   math    │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • NO SHARED STATE • PURE FUNCTIONS       │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (ValidatedOrderRequest, OrderEmailPayload, etc.)
//! - [`error`] - Domain error types
//! - [`validation`] - Schema + business-rule validation of submitted orders
//! - [`service`] - Request-id derivation and email payload rendering
//! - [`rate_limit`] - Fixed-window counter arithmetic
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic given its inputs
//!    (the request-id random suffix is the one sanctioned exception)
//! 2. **No I/O**: Network, file system, and shared state are FORBIDDEN here
//! 3. **Explicit Errors**: All errors are typed, never strings or panics
//! 4. **Untrusted Input**: Submitted orders arrive as arbitrary JSON and are
//!    never assumed to match any shape

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod rate_limit;
pub mod service;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use order_core::OrderEmailPayload` instead of
// `use order_core::types::OrderEmailPayload`

pub use error::{FieldErrors, OrderValidationError};
pub use rate_limit::{RateLimitConfig, RateLimitDecision, RateLimitEntry};
pub use service::{build_order_email_payload, generate_request_id, prepare_order_for_delivery};
pub use types::{
    FulfillmentType, OrderEmailPayload, OrderFormInput, PreparedOrder, ValidatedOrderRequest,
};
pub use validation::validate_order_form_input;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Minimum whole days between submission and the requested event date.
///
/// ## Business Reason
/// Custom cakes need baking, decorating, and scheduling time. Hosts may
/// override this per deployment; the validator takes it as a parameter.
pub const MIN_LEAD_DAYS: i64 = 3;

/// Request-id prefix for the Dillz Bites order form.
///
/// Request ids look like `DB-20260207-3F9A`. They are human-reference tokens
/// for email threads, not globally unique keys; the 4-hex suffix makes
/// collisions possible and that is accepted for a low-volume form.
pub const REQUEST_ID_PREFIX: &str = "DB";

/// Sentinel request id returned for honeypot submissions.
///
/// Bot traffic gets a success-shaped response without any processing; this
/// id marks those responses without leaking that fact to the bot.
pub const HONEYPOT_REQUEST_ID: &str = "IGNORED";
