//! # Domain Types
//!
//! Core domain types for the order-intake pipeline.
//!
//! ## Type Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Order Data Lifecycle                               │
//! │                                                                         │
//! │  raw JSON body           (untrusted, arbitrary shape)                   │
//! │        │                                                                │
//! │        ▼  validation::validate_order_form_input                         │
//! │  ValidatedOrderRequest   (normalized, lead time computed)               │
//! │        │                                                                │
//! │        ▼  service::build_order_email_payload                            │
//! │  OrderEmailPayload       (two subjects, two rendered bodies)            │
//! │        │                                                                │
//! │        ▼  service::prepare_order_for_delivery                           │
//! │  PreparedOrder           (request id + order + payload bundle)          │
//! │                                                                         │
//! │  Everything is request-scoped: nothing here is stored anywhere.         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};

// =============================================================================
// Order Form Input
// =============================================================================

/// Raw submitted order form fields.
///
/// Deliberately just JSON: the form is untrusted, so no shape is assumed
/// before validation. A field may be missing, the wrong type, or the whole
/// body may not be an object; the validator decides what each one means.
pub type OrderFormInput = serde_json::Value;

// =============================================================================
// Fulfillment Type
// =============================================================================

/// How the customer wants to receive the cake.
///
/// Submitted as the lowercase strings `"pickup"` / `"delivery"`; anything
/// else is a validation error, never a default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FulfillmentType {
    Pickup,
    Delivery,
}

impl FulfillmentType {
    /// Label used when rendering email bodies.
    pub fn as_str(&self) -> &'static str {
        match self {
            FulfillmentType::Pickup => "pickup",
            FulfillmentType::Delivery => "delivery",
        }
    }
}

// =============================================================================
// Validated Order Request
// =============================================================================

/// An order submission that has passed schema and business-rule validation.
///
/// ## Invariants
/// - Every string field is trimmed and within its length bounds
/// - `event_date` is a real calendar date in `YYYY-MM-DD` form
/// - `lead_time_days` is the whole-day UTC difference between the event date
///   and the submission time, and is at least the configured minimum
/// - Optional fields (`phone`, `flavor`, `allergies`) are empty strings when
///   not provided, never absent
///
/// Immutable once produced; owned by the request that created it and
/// discarded after the response is sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidatedOrderRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    /// `YYYY-MM-DD`, kept in submitted form for rendering.
    pub event_date: String,
    pub occasion: String,
    pub cake_type: String,
    pub cake_size: String,
    pub servings: u32,
    pub flavor: String,
    pub design_notes: String,
    pub budget: String,
    pub fulfillment_type: FulfillmentType,
    pub allergies: String,
    pub reference_urls: Vec<String>,
    pub consent: bool,
    /// Whole days between submission (UTC) and the event date.
    pub lead_time_days: i64,
}

// =============================================================================
// Order Email Payload
// =============================================================================

/// The two rendered notification messages for one order request.
///
/// Derived 1:1 from a [`ValidatedOrderRequest`]; free-text fields have
/// already been stripped of `<` and `>` when this exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderEmailPayload {
    pub request_id: String,
    /// Where the customer acknowledgment goes.
    pub customer_email: String,
    pub internal_subject: String,
    pub customer_subject: String,
    pub internal_text: String,
    pub customer_text: String,
    /// Reply-to for the internal notification (the customer's address, so
    /// staff can answer with one click).
    pub reply_to_email: String,
}

// =============================================================================
// Prepared Order
// =============================================================================

/// Everything the endpoint needs to deliver one order request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedOrder {
    pub request_id: String,
    pub order: ValidatedOrderRequest,
    pub email_payload: OrderEmailPayload,
}
