//! # Order Service
//!
//! Turns a validated order into everything the endpoint needs to deliver it:
//! a human-reference request id and the two rendered notification emails.
//!
//! ## Pipeline Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     prepare_order_for_delivery                          │
//! │                                                                         │
//! │  raw JSON ──► validate_order_form_input ──► ValidatedOrderRequest       │
//! │                                                  │                      │
//! │                      generate_request_id ◄───────┤                      │
//! │                              │                   │                      │
//! │                              ▼                   ▼                      │
//! │                     build_order_email_payload                           │
//! │                              │                                          │
//! │                              ▼                                          │
//! │              PreparedOrder { request_id, order, email_payload }         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything here is deterministic given its inputs, except the random
//! request-id suffix.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::types::{OrderEmailPayload, OrderFormInput, PreparedOrder, ValidatedOrderRequest};
use crate::validation::{validate_order_form_input, ValidationResult};
use crate::REQUEST_ID_PREFIX;

/// Literal rendered for optional fields the customer left blank.
const NOT_PROVIDED: &str = "Not provided";

// =============================================================================
// Sanitization
// =============================================================================

/// Strips `<` and `>` from user free text before interpolation.
///
/// The emails are plain text, but downstream clients sometimes sniff
/// angle-bracket content as markup or header material; removing the brackets
/// closes that off without mangling normal prose.
fn sanitize_email_text(value: &str) -> String {
    value
        .chars()
        .filter(|c| *c != '<' && *c != '>')
        .collect::<String>()
        .trim()
        .to_string()
}

/// Sanitizes an optional field, rendering blanks as [`NOT_PROVIDED`].
fn optional_field(value: &str) -> String {
    let safe = sanitize_email_text(value);
    if safe.is_empty() {
        NOT_PROVIDED.to_string()
    } else {
        safe
    }
}

// =============================================================================
// Request Id
// =============================================================================

/// Derives a human-reference request id: `DB-<YYYYMMDD>-<4 uppercase hex>`.
///
/// The date part comes from `now` (UTC); the suffix is the first four hex
/// digits of a v4 UUID. Four hex digits can collide and that is accepted:
/// the id exists so a customer and the bakery can refer to the same email
/// thread, not to key any storage.
pub fn generate_request_id(now: DateTime<Utc>) -> String {
    let date_part = now.format("%Y%m%d");
    let random = Uuid::new_v4().simple().to_string();
    let suffix = random[..4].to_uppercase();

    format!("{REQUEST_ID_PREFIX}-{date_part}-{suffix}")
}

// =============================================================================
// Email Rendering
// =============================================================================

/// Renders the internal notification and the customer acknowledgment.
///
/// Both bodies are plain text built from labeled lines. Every user-supplied
/// free-text field passes through [`sanitize_email_text`] first; dates,
/// servings and the fulfillment label are produced by validation and are
/// interpolated as-is.
pub fn build_order_email_payload(
    order: &ValidatedOrderRequest,
    request_id: &str,
) -> OrderEmailPayload {
    let internal_subject = format!("New cake order request {request_id}");
    let customer_subject = format!("We received your Dillz Bites order request ({request_id})");

    let reference_urls = if order.reference_urls.is_empty() {
        NOT_PROVIDED.to_string()
    } else {
        order.reference_urls.join(", ")
    };

    let internal_text = [
        format!("Request ID: {request_id}"),
        format!("Name: {}", sanitize_email_text(&order.name)),
        format!("Email: {}", sanitize_email_text(&order.email)),
        format!("Phone: {}", optional_field(&order.phone)),
        format!("Event Date: {}", order.event_date),
        format!("Lead Time: {} day(s)", order.lead_time_days),
        format!("Occasion: {}", sanitize_email_text(&order.occasion)),
        format!("Cake Type: {}", sanitize_email_text(&order.cake_type)),
        format!("Cake Size: {}", sanitize_email_text(&order.cake_size)),
        format!("Servings: {}", order.servings),
        format!("Flavor: {}", optional_field(&order.flavor)),
        format!("Budget: {}", sanitize_email_text(&order.budget)),
        format!("Fulfillment: {}", order.fulfillment_type.as_str()),
        format!("Allergies: {}", optional_field(&order.allergies)),
        format!("Reference URLs: {reference_urls}"),
        String::new(),
        "Design Notes:".to_string(),
        sanitize_email_text(&order.design_notes),
    ]
    .join("\n");

    let customer_text = [
        format!("Hi {},", sanitize_email_text(&order.name)),
        String::new(),
        "Thanks for contacting Dillz Bites. We received your custom cake request and will review it shortly.".to_string(),
        String::new(),
        format!("Request ID: {request_id}"),
        format!("Event Date: {}", order.event_date),
        format!("Cake Type: {}", sanitize_email_text(&order.cake_type)),
        format!("Cake Size: {}", sanitize_email_text(&order.cake_size)),
        format!("Estimated Servings: {}", order.servings),
        String::new(),
        "We typically respond within 1 business day to confirm details and next steps.".to_string(),
        "If you need urgent updates, reply to this email or call us at (868) 767-4628.".to_string(),
        String::new(),
        "Warmly,".to_string(),
        "Dillz Bites".to_string(),
    ]
    .join("\n");

    OrderEmailPayload {
        request_id: request_id.to_string(),
        customer_email: order.email.clone(),
        internal_subject,
        customer_subject,
        internal_text,
        customer_text,
        reply_to_email: order.email.clone(),
    }
}

// =============================================================================
// Preparation
// =============================================================================

/// Validates a submission and, on success, bundles the request id and the
/// rendered emails for delivery.
///
/// Failure is exactly the validator's failure shape; callers translate it to
/// a client response without inspecting it further.
pub fn prepare_order_for_delivery(
    payload: &OrderFormInput,
    now: DateTime<Utc>,
    minimum_lead_days: i64,
) -> ValidationResult<PreparedOrder> {
    let order = validate_order_form_input(payload, now, minimum_lead_days)?;

    let request_id = generate_request_id(now);
    let email_payload = build_order_email_payload(&order, &request_id);

    Ok(PreparedOrder {
        request_id,
        order,
        email_payload,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FulfillmentType;
    use chrono::TimeZone;
    use serde_json::json;

    fn sample_order() -> ValidatedOrderRequest {
        ValidatedOrderRequest {
            name: "Ayesha Ali".to_string(),
            email: "ayesha@example.com".to_string(),
            phone: String::new(),
            event_date: "2026-02-12".to_string(),
            occasion: "Birthday".to_string(),
            cake_type: "Chocolate fudge".to_string(),
            cake_size: "8 inch round".to_string(),
            servings: 24,
            flavor: String::new(),
            design_notes: "Gold drip with <script> flair and fresh flowers.".to_string(),
            budget: "$150 - $200".to_string(),
            fulfillment_type: FulfillmentType::Delivery,
            allergies: String::new(),
            reference_urls: vec![],
            consent: true,
            lead_time_days: 5,
        }
    }

    fn is_request_id_shaped(id: &str, date_part: &str) -> bool {
        let suffix = match id.strip_prefix(&format!("DB-{date_part}-")) {
            Some(suffix) => suffix,
            None => return false,
        };

        suffix.len() == 4
            && suffix
                .chars()
                .all(|c| c.is_ascii_hexdigit() && !c.is_ascii_lowercase())
    }

    #[test]
    fn test_request_id_format() {
        let now = Utc.with_ymd_and_hms(2026, 2, 7, 10, 0, 0).unwrap();
        let id = generate_request_id(now);

        assert!(is_request_id_shaped(&id, "20260207"), "unexpected id {id}");
    }

    #[test]
    fn test_sanitization_strips_angle_brackets() {
        let payload = build_order_email_payload(&sample_order(), "DB-20260207-AAAA");

        assert!(!payload.internal_text.contains('<'));
        assert!(!payload.internal_text.contains('>'));
        assert!(payload.internal_text.contains("script")); // text survives, brackets do not
    }

    #[test]
    fn test_blank_optionals_render_not_provided() {
        let payload = build_order_email_payload(&sample_order(), "DB-20260207-AAAA");

        assert!(payload.internal_text.contains("Phone: Not provided"));
        assert!(payload.internal_text.contains("Flavor: Not provided"));
        assert!(payload.internal_text.contains("Allergies: Not provided"));
        assert!(payload.internal_text.contains("Reference URLs: Not provided"));
    }

    #[test]
    fn test_payload_addresses_and_subjects() {
        let payload = build_order_email_payload(&sample_order(), "DB-20260207-AAAA");

        assert_eq!(payload.customer_email, "ayesha@example.com");
        assert_eq!(payload.reply_to_email, "ayesha@example.com");
        assert_eq!(payload.internal_subject, "New cake order request DB-20260207-AAAA");
        assert!(payload.customer_subject.contains("(DB-20260207-AAAA)"));
        assert!(payload.customer_text.starts_with("Hi Ayesha Ali,"));
    }

    #[test]
    fn test_prepare_binds_request_id_to_submission_date() {
        let now = Utc.with_ymd_and_hms(2026, 2, 7, 10, 0, 0).unwrap();
        let payload = json!({
            "name": "Ayesha Ali",
            "email": "ayesha@example.com",
            "eventDate": "2026-02-12",
            "occasion": "Birthday",
            "cakeType": "Chocolate fudge",
            "cakeSize": "8 inch round",
            "servings": 24,
            "designNotes": "Gold drip with fresh flowers on top.",
            "budget": "$150 - $200",
            "fulfillmentType": "delivery",
            "consent": true
        });

        let prepared = prepare_order_for_delivery(&payload, now, 3).unwrap();

        assert!(is_request_id_shaped(&prepared.request_id, "20260207"));
        assert_eq!(prepared.email_payload.request_id, prepared.request_id);
        assert_eq!(prepared.order.lead_time_days, 5);
    }

    #[test]
    fn test_prepare_propagates_validation_failure() {
        let now = Utc.with_ymd_and_hms(2026, 2, 7, 10, 0, 0).unwrap();
        let err = prepare_order_for_delivery(&json!({}), now, 3).unwrap_err();

        assert!(err.field_errors.contains_key("name"));
    }
}
