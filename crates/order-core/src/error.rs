//! # Error Types
//!
//! Domain-specific error types for order-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  order-core errors (this file)                                         │
//! │  └── OrderValidationError  - Schema/business-rule failures with a      │
//! │                              per-field message map                      │
//! │                                                                         │
//! │  order-api errors (app crate)                                          │
//! │  ├── ConfigError           - Bad environment configuration             │
//! │  ├── MailError             - Internal notification delivery failures   │
//! │  └── OrderApiErrorCode     - What the client sees (serialized)         │
//! │                                                                         │
//! │  Flow: OrderValidationError → OrderApiErrorCode → HTTP response        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Every message is user-facing copy, safe to return verbatim
//! 3. One message per field: the first rule a field breaks wins

use std::collections::BTreeMap;

use thiserror::Error;

// =============================================================================
// Field Errors
// =============================================================================

/// Field name (camelCase, as submitted) → user-facing message.
///
/// A `BTreeMap` keeps serialization order stable, which keeps API responses
/// and test assertions deterministic.
pub type FieldErrors = BTreeMap<String, String>;

// =============================================================================
// Order Validation Error
// =============================================================================

/// A rejected order submission.
///
/// Carries one top-level message for the form banner plus a per-field map for
/// inline hints. Both are written for the customer, never for the operator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct OrderValidationError {
    /// User-facing summary shown above the form.
    pub message: String,

    /// First broken rule per field, keyed by the submitted field name.
    pub field_errors: FieldErrors,
}

impl OrderValidationError {
    /// Generic "fix your fields" rejection used for structural failures.
    pub fn review(field_errors: FieldErrors) -> Self {
        OrderValidationError {
            message: "Please review your order details and try again.".to_string(),
            field_errors,
        }
    }

    /// Lead-time rejection. Always a single error on `eventDate`, and the
    /// message must name the configured minimum so the customer can pick a
    /// workable date without guessing.
    pub fn lead_time(minimum_lead_days: i64) -> Self {
        let mut field_errors = FieldErrors::new();
        field_errors.insert(
            "eventDate".to_string(),
            format!(
                "Please choose a date at least {minimum_lead_days} days from today."
            ),
        );

        OrderValidationError {
            message: "We need additional lead time for custom cakes.".to_string(),
            field_errors,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_review_error_message() {
        let mut fields = FieldErrors::new();
        fields.insert("name".to_string(), "Please enter your name.".to_string());

        let err = OrderValidationError::review(fields);
        assert_eq!(err.to_string(), "Please review your order details and try again.");
        assert_eq!(err.field_errors["name"], "Please enter your name.");
    }

    #[test]
    fn test_lead_time_error_names_minimum() {
        let err = OrderValidationError::lead_time(3);
        assert_eq!(err.to_string(), "We need additional lead time for custom cakes.");
        assert_eq!(
            err.field_errors["eventDate"],
            "Please choose a date at least 3 days from today."
        );
    }
}
