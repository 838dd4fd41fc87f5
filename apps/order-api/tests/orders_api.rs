//! Endpoint integration tests for `POST /api/orders`.
//!
//! The router is driven in-process with `tower::ServiceExt::oneshot`; mail
//! delivery is a mock transport and the clock is frozen at
//! 2026-02-07T10:00:00Z so request ids and lead-time math are deterministic.

use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use chrono::{DateTime, TimeZone, Utc};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use order_api::config::{ApiConfig, MailTransportKind};
use order_api::{router, AppState, InMemoryRateLimitStore, MailError, MailSendOutcome, MailTransport};
use order_core::{OrderEmailPayload, RateLimitConfig};

// =============================================================================
// Test Harness
// =============================================================================

/// Capturing mail transport with switchable failure modes.
#[derive(Default)]
struct MockMailer {
    fail_internal: bool,
    customer_error: Option<String>,
    sent: Mutex<Vec<OrderEmailPayload>>,
}

#[async_trait::async_trait]
impl MailTransport for MockMailer {
    async fn send_order_emails(
        &self,
        payload: &OrderEmailPayload,
    ) -> Result<MailSendOutcome, MailError> {
        if self.fail_internal {
            return Err(MailError::InternalSend("mock outage".to_string()));
        }

        self.sent.lock().unwrap().push(payload.clone());

        Ok(MailSendOutcome {
            internal_email_id: Some("internal-1".to_string()),
            customer_email_id: self.customer_error.is_none().then(|| "customer-1".to_string()),
            customer_send_error: self.customer_error.clone(),
        })
    }
}

fn frozen_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 2, 7, 10, 0, 0).unwrap()
}

fn test_config() -> ApiConfig {
    ApiConfig {
        http_port: 0,
        order_form_enabled: true,
        rate_limit: RateLimitConfig::default(),
        minimum_lead_days: 3,
        mail_transport: MailTransportKind::Api,
        mail_api_key: Some("test-key".to_string()),
        mail_api_endpoint: "https://mail.invalid/send".to_string(),
        smtp_url: None,
        from_email: "Dillz Bites <orders@dillzbites.com>".to_string(),
        notification_email: "orders@dillzbites.com".to_string(),
        reply_to_email: "orders@dillzbites.com".to_string(),
    }
}

fn app_state(config: ApiConfig, mailer: Arc<MockMailer>) -> Arc<AppState> {
    Arc::new(AppState {
        limiter: Arc::new(InMemoryRateLimitStore::new(config.rate_limit)),
        config,
        mailer,
        clock: frozen_now,
    })
}

fn valid_payload() -> Value {
    json!({
        "name": "Ayesha Ali",
        "email": "ayesha@example.com",
        "phone": "868-555-0101",
        "eventDate": "2026-02-12",
        "occasion": "Birthday",
        "cakeType": "Chocolate fudge",
        "cakeSize": "8 inch round",
        "servings": 24,
        "flavor": "Vanilla bean",
        "designNotes": "Gold drip with fresh flowers on top.",
        "budget": "$150 - $200",
        "fulfillmentType": "pickup",
        "allergies": "",
        "referenceUrls": [],
        "consent": true
    })
}

async fn post_order(state: Arc<AppState>, body: String) -> Response<Body> {
    let request = Request::builder()
        .method("POST")
        .uri("/api/orders")
        .header("content-type", "application/json")
        .header("x-forwarded-for", "203.0.113.9")
        .body(Body::from(body))
        .unwrap();

    router(state).oneshot(request).await.unwrap()
}

async fn json_body(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// =============================================================================
// Scenarios
// =============================================================================

#[tokio::test]
async fn valid_submission_returns_request_id_and_sends_emails() {
    let mailer = Arc::new(MockMailer::default());
    let state = app_state(test_config(), mailer.clone());

    let response = post_order(state, valid_payload().to_string()).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["ok"], json!(true));
    let request_id = body["requestId"].as_str().unwrap();
    assert!(
        request_id.starts_with("DB-20260207-"),
        "unexpected request id {request_id}"
    );

    let sent = mailer.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].request_id, request_id);
    assert_eq!(sent[0].customer_email, "ayesha@example.com");
}

#[tokio::test]
async fn disabled_form_returns_503_without_sending() {
    let mailer = Arc::new(MockMailer::default());
    let mut config = test_config();
    config.order_form_enabled = false;
    let state = app_state(config, mailer.clone());

    let response = post_order(state, valid_payload().to_string()).await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let body = json_body(response).await;
    assert_eq!(body["ok"], json!(false));
    assert_eq!(body["code"], json!("ORDER_FORM_DISABLED"));
    assert!(mailer.sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn malformed_json_returns_400() {
    let state = app_state(test_config(), Arc::new(MockMailer::default()));

    let response = post_order(state, "{not json".to_string()).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = json_body(response).await;
    assert_eq!(body["code"], json!("INVALID_JSON"));
}

#[tokio::test]
async fn validation_failure_names_broken_fields() {
    let state = app_state(test_config(), Arc::new(MockMailer::default()));

    let mut payload = valid_payload();
    payload.as_object_mut().unwrap().remove("name");

    let response = post_order(state, payload.to_string()).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = json_body(response).await;
    assert_eq!(body["code"], json!("VALIDATION_ERROR"));
    assert_eq!(body["fieldErrors"]["name"], json!("Please enter your name."));
}

#[tokio::test]
async fn short_lead_time_fails_on_event_date() {
    let state = app_state(test_config(), Arc::new(MockMailer::default()));

    let mut payload = valid_payload();
    payload["eventDate"] = json!("2026-02-08");

    let response = post_order(state, payload.to_string()).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = json_body(response).await;
    assert_eq!(
        body["fieldErrors"]["eventDate"],
        json!("Please choose a date at least 3 days from today.")
    );
}

#[tokio::test]
async fn honeypot_submission_short_circuits() {
    let mailer = Arc::new(MockMailer::default());
    let mut config = test_config();
    // One request per window: if the honeypot touched the limiter, the real
    // submission below would be denied.
    config.rate_limit = RateLimitConfig {
        max_requests: 1,
        window_ms: 60_000,
    };
    let state = app_state(config, mailer.clone());

    let mut trap = valid_payload();
    trap["website"] = json!("https://spam.example");

    for _ in 0..2 {
        let response = post_order(state.clone(), trap.to_string()).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["ok"], json!(true));
        assert_eq!(body["requestId"], json!("IGNORED"));
    }

    // No mail was sent and no limiter entry was consumed.
    assert!(mailer.sent.lock().unwrap().is_empty());

    let response = post_order(state, valid_payload().to_string()).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(mailer.sent.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn rate_limit_denies_with_retry_after() {
    let mut config = test_config();
    config.rate_limit = RateLimitConfig {
        max_requests: 1,
        window_ms: 60_000,
    };
    let state = app_state(config, Arc::new(MockMailer::default()));

    let first = post_order(state.clone(), valid_payload().to_string()).await;
    assert_eq!(first.status(), StatusCode::OK);

    let second = post_order(state, valid_payload().to_string()).await;
    assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);

    let retry_after: u64 = second
        .headers()
        .get("Retry-After")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
        .unwrap();
    assert!(retry_after > 0);

    let body = json_body(second).await;
    assert_eq!(body["code"], json!("RATE_LIMITED"));
}

#[tokio::test]
async fn internal_send_failure_returns_502() {
    let mailer = Arc::new(MockMailer {
        fail_internal: true,
        ..MockMailer::default()
    });
    let state = app_state(test_config(), mailer);

    let response = post_order(state, valid_payload().to_string()).await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

    let body = json_body(response).await;
    assert_eq!(body["code"], json!("EMAIL_DELIVERY_FAILED"));
}

#[tokio::test]
async fn customer_send_failure_still_reports_success() {
    let mailer = Arc::new(MockMailer {
        customer_error: Some("mailbox full".to_string()),
        ..MockMailer::default()
    });
    let state = app_state(test_config(), mailer.clone());

    let response = post_order(state, valid_payload().to_string()).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["ok"], json!(true));
    assert_eq!(mailer.sent.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn health_probe_answers() {
    let state = app_state(test_config(), Arc::new(MockMailer::default()));

    let request = Request::builder()
        .method("GET")
        .uri("/api/health")
        .body(Body::empty())
        .unwrap();
    let response = router(state).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}
