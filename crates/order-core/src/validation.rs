//! # Validation Module
//!
//! Schema and business-rule validation for submitted order forms.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Frontend (order form)                                        │
//! │  ├── Basic format checks (empty, length)                               │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE (structural)                                     │
//! │  ├── Field presence, types, lengths                                    │
//! │  ├── Email / URL / date shape                                          │
//! │  └── One message per broken field                                      │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: THIS MODULE (business rules)                                 │
//! │  ├── Real calendar date (no Feb 30)                                    │
//! │  └── Minimum lead time before the event                                │
//! │                                                                         │
//! │  Business rules run only after the structural pass succeeds.           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Input arrives as arbitrary `serde_json::Value` because the form is
//! untrusted: a field may be missing, the wrong type, or the whole body may
//! not be an object. Anything that is not a JSON object validates like an
//! empty form.

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value;
use url::Url;

use crate::error::{FieldErrors, OrderValidationError};
use crate::types::{FulfillmentType, OrderFormInput, ValidatedOrderRequest};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, OrderValidationError>;

/// Upper bound on reference links per submission.
pub const MAX_REFERENCE_URLS: usize = 6;

/// Upper bound on estimated servings.
pub const MAX_SERVINGS: f64 = 500.0;

// =============================================================================
// Field Extraction Helpers
// =============================================================================

/// Extracts a trimmed string field. `None` when absent or not a string.
fn text_field(payload: &Value, field: &str) -> Option<String> {
    payload
        .get(field)
        .and_then(Value::as_str)
        .map(|value| value.trim().to_string())
}

/// Validates a required free-text field against length bounds.
///
/// The "too short" message doubles as the missing-field message: an absent
/// field, a non-string field, and a blank field all read the same way to the
/// person filling in the form.
fn required_text(
    payload: &Value,
    field: &str,
    min: usize,
    max: usize,
    short_message: &str,
    long_message: &str,
) -> Result<String, String> {
    let value = text_field(payload, field).unwrap_or_default();

    if value.chars().count() < min {
        return Err(short_message.to_string());
    }

    if value.chars().count() > max {
        return Err(long_message.to_string());
    }

    Ok(value)
}

/// Validates an optional free-text field against a maximum length.
///
/// Absent, non-string, and blank all normalize to the empty string.
fn optional_text(payload: &Value, field: &str, max: usize, long_message: &str) -> Result<String, String> {
    let value = text_field(payload, field).unwrap_or_default();

    if value.chars().count() > max {
        return Err(long_message.to_string());
    }

    Ok(value)
}

// =============================================================================
// Format Checks
// =============================================================================

/// Cheap structural email check: one `@`, non-empty local part, dotted
/// domain, no whitespace. Deliverability is proven by the acknowledgment
/// email itself, so anything stricter here just rejects real addresses.
fn is_valid_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }

    let mut parts = value.splitn(2, '@');
    let local = parts.next().unwrap_or_default();
    let domain = parts.next().unwrap_or_default();

    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return false;
    }

    domain.split('.').count() >= 2 && domain.split('.').all(|label| !label.is_empty())
}

/// `YYYY-MM-DD` shape check. Calendar validity is checked separately.
fn is_date_shaped(value: &str) -> bool {
    let bytes = value.as_bytes();

    bytes.len() == 10
        && bytes.iter().enumerate().all(|(index, byte)| match index {
            4 | 7 => *byte == b'-',
            _ => byte.is_ascii_digit(),
        })
}

/// Parses a `YYYY-MM-DD` string into a real calendar date.
///
/// ## Edge Case
/// A string like `2026-02-30` matches the shape but names no real day.
/// chrono refuses to construct such dates, which is the whole
/// calendar-validity check. The shape pre-check stays because `%m`/`%d`
/// would also accept single-digit components like `2026-2-3`.
pub fn parse_event_date(value: &str) -> Option<NaiveDate> {
    if !is_date_shaped(value) {
        return None;
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

/// Coerces the servings field from a JSON number or a numeric string.
///
/// The form posts numbers, but some clients stringify everything; accepting
/// `"24"` next to `24` keeps those submissions alive.
fn servings_value(payload: &Value) -> Option<f64> {
    match payload.get("servings") {
        Some(Value::Number(number)) => number.as_f64(),
        Some(Value::String(raw)) => raw.trim().parse::<f64>().ok(),
        _ => None,
    }
}

// =============================================================================
// Order Form Validation
// =============================================================================

/// Validates a submitted order form.
///
/// ## Contract
/// - `payload` is arbitrary JSON; non-objects validate like an empty form
/// - `now` is the submission instant (UTC) used for lead-time math
/// - `minimum_lead_days` is the configured floor (see [`crate::MIN_LEAD_DAYS`])
///
/// On failure every structurally broken field appears in
/// [`OrderValidationError::field_errors`] with its first broken rule. The
/// lead-time rule runs only after the structural pass and reports solely on
/// `eventDate`.
///
/// The hidden `website` honeypot field is deliberately NOT examined here;
/// the endpoint short-circuits honeypot submissions before validation.
pub fn validate_order_form_input(
    payload: &OrderFormInput,
    now: DateTime<Utc>,
    minimum_lead_days: i64,
) -> ValidationResult<ValidatedOrderRequest> {
    let mut fields = FieldErrors::new();
    let mut fail = |field: &str, message: String| {
        fields.entry(field.to_string()).or_insert(message);
    };

    let name = required_text(
        payload,
        "name",
        2,
        80,
        "Please enter your name.",
        "Name must be 80 characters or fewer.",
    )
    .unwrap_or_else(|message| {
        fail("name", message);
        String::new()
    });

    let email = match required_text(
        payload,
        "email",
        1,
        120,
        "Please enter a valid email address.",
        "Email must be 120 characters or fewer.",
    ) {
        Ok(value) if is_valid_email(&value) => value,
        Ok(_) => {
            fail("email", "Please enter a valid email address.".to_string());
            String::new()
        }
        Err(message) => {
            fail("email", message);
            String::new()
        }
    };

    let phone = optional_text(payload, "phone", 30, "Phone must be 30 characters or fewer.")
        .unwrap_or_else(|message| {
            fail("phone", message);
            String::new()
        });
    if !phone.is_empty() && phone.chars().count() < 7 {
        fail("phone", "Please enter a valid phone number.".to_string());
    }

    let event_date = text_field(payload, "eventDate").unwrap_or_default();
    if !is_date_shaped(&event_date) {
        fail("eventDate", "Please choose a valid event date.".to_string());
    }

    let occasion = required_text(
        payload,
        "occasion",
        2,
        80,
        "Please enter an occasion.",
        "Occasion must be 80 characters or fewer.",
    )
    .unwrap_or_else(|message| {
        fail("occasion", message);
        String::new()
    });

    let cake_type = required_text(
        payload,
        "cakeType",
        2,
        80,
        "Please choose a cake type.",
        "Cake type must be 80 characters or fewer.",
    )
    .unwrap_or_else(|message| {
        fail("cakeType", message);
        String::new()
    });

    let cake_size = required_text(
        payload,
        "cakeSize",
        2,
        80,
        "Please choose a cake size.",
        "Cake size must be 80 characters or fewer.",
    )
    .unwrap_or_else(|message| {
        fail("cakeSize", message);
        String::new()
    });

    let servings = match servings_value(payload) {
        None => {
            fail("servings", "Please provide the estimated servings.".to_string());
            0
        }
        Some(value) if value.fract() != 0.0 => {
            fail("servings", "Servings must be a whole number.".to_string());
            0
        }
        Some(value) if value < 1.0 => {
            fail("servings", "Servings must be at least 1.".to_string());
            0
        }
        Some(value) if value > MAX_SERVINGS => {
            fail("servings", "Servings must be 500 or fewer.".to_string());
            0
        }
        Some(value) => value as u32,
    };

    let flavor = optional_text(payload, "flavor", 120, "Flavor must be 120 characters or fewer.")
        .unwrap_or_else(|message| {
            fail("flavor", message);
            String::new()
        });

    let design_notes = required_text(
        payload,
        "designNotes",
        10,
        2000,
        "Please provide a few design details.",
        "Design notes must be 2000 characters or fewer.",
    )
    .unwrap_or_else(|message| {
        fail("designNotes", message);
        String::new()
    });

    let budget = required_text(
        payload,
        "budget",
        2,
        80,
        "Please choose a budget range.",
        "Budget must be 80 characters or fewer.",
    )
    .unwrap_or_else(|message| {
        fail("budget", message);
        String::new()
    });

    let fulfillment_type = match text_field(payload, "fulfillmentType").as_deref() {
        Some("pickup") => FulfillmentType::Pickup,
        Some("delivery") => FulfillmentType::Delivery,
        _ => {
            fail(
                "fulfillmentType",
                "Please choose pickup or delivery.".to_string(),
            );
            FulfillmentType::Pickup
        }
    };

    let allergies = optional_text(
        payload,
        "allergies",
        240,
        "Allergies must be 240 characters or fewer.",
    )
    .unwrap_or_else(|message| {
        fail("allergies", message);
        String::new()
    });

    let reference_urls = match payload.get("referenceUrls") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(entries)) => {
            if entries.len() > MAX_REFERENCE_URLS {
                fail(
                    "referenceUrls",
                    "Please provide at most 6 reference links.".to_string(),
                );
                Vec::new()
            } else {
                let mut urls = Vec::with_capacity(entries.len());
                for entry in entries {
                    let link = entry.as_str().map(str::trim).unwrap_or_default();
                    if link.chars().count() > 500 || Url::parse(link).is_err() {
                        fail(
                            "referenceUrls",
                            "Each reference link must be a valid URL.".to_string(),
                        );
                        break;
                    }
                    urls.push(link.to_string());
                }
                urls
            }
        }
        Some(_) => {
            fail(
                "referenceUrls",
                "Reference links must be a list of URLs.".to_string(),
            );
            Vec::new()
        }
    };

    if payload.get("consent").and_then(Value::as_bool) != Some(true) {
        fail(
            "consent",
            "You must agree before submitting your order request.".to_string(),
        );
    }

    if !fields.is_empty() {
        return Err(OrderValidationError::review(fields));
    }

    // Structural pass done; business rules from here on.

    let Some(parsed_event_date) = parse_event_date(&event_date) else {
        let mut fields = FieldErrors::new();
        fields.insert(
            "eventDate".to_string(),
            "Please choose a valid event date.".to_string(),
        );
        return Err(OrderValidationError::review(fields));
    };

    // Whole-day difference of UTC midnights; the submission's time of day
    // must not influence how many days of lead time the customer gets.
    let today_utc = now.date_naive();
    let lead_time_days = (parsed_event_date - today_utc).num_days();

    if lead_time_days < minimum_lead_days {
        return Err(OrderValidationError::lead_time(minimum_lead_days));
    }

    Ok(ValidatedOrderRequest {
        name,
        email,
        phone,
        event_date,
        occasion,
        cake_type,
        cake_size,
        servings,
        flavor,
        design_notes,
        budget,
        fulfillment_type,
        allergies,
        reference_urls,
        consent: true,
        lead_time_days,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
