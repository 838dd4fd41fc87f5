//! Provider HTTP API mail transport.
//!
//! Posts each message as JSON to the provider's send endpoint with a bearer
//! key. One request per message, no retries; a non-success status on the
//! internal notification is fatal, on the customer acknowledgment it is
//! captured.

use serde::{Deserialize, Serialize};
use tracing::debug;

use order_core::OrderEmailPayload;

use super::{MailError, MailSendOutcome, MailTransport};
use crate::config::ApiConfig;

/// Mail transport backed by a provider HTTP API.
#[derive(Debug)]
pub struct ApiMailer {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    from_email: String,
    notification_email: String,
    reply_to_email: String,
}

/// Wire shape of one send request.
#[derive(Debug, Serialize)]
struct SendRequest<'a> {
    from: &'a str,
    to: &'a str,
    reply_to: &'a str,
    subject: &'a str,
    text: &'a str,
}

/// Wire shape of the provider's success body.
#[derive(Debug, Deserialize)]
struct SendResponse {
    id: Option<String>,
}

impl ApiMailer {
    /// Builds the transport from configuration. The API key must be present.
    pub fn from_config(config: &ApiConfig) -> Result<Self, MailError> {
        let api_key = config
            .mail_api_key
            .clone()
            .ok_or_else(|| MailError::MissingConfig("MAIL_API_KEY".to_string()))?;

        Ok(ApiMailer {
            client: reqwest::Client::new(),
            endpoint: config.mail_api_endpoint.clone(),
            api_key,
            from_email: config.from_email.clone(),
            notification_email: config.notification_email.clone(),
            reply_to_email: config.reply_to_email.clone(),
        })
    }

    /// Sends one message, returning the provider's message id.
    async fn send_one(&self, request: &SendRequest<'_>) -> Result<Option<String>, String> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| e.to_string())?;

        let status = response.status();
        if !status.is_success() {
            return Err(format!("provider returned {status}"));
        }

        let body: SendResponse = response.json().await.map_err(|e| e.to_string())?;
        Ok(body.id)
    }
}

#[async_trait::async_trait]
impl MailTransport for ApiMailer {
    async fn send_order_emails(
        &self,
        payload: &OrderEmailPayload,
    ) -> Result<MailSendOutcome, MailError> {
        // Internal notification first: this one must land.
        let internal = SendRequest {
            from: &self.from_email,
            to: &self.notification_email,
            reply_to: &payload.reply_to_email,
            subject: &payload.internal_subject,
            text: &payload.internal_text,
        };

        let internal_email_id = self
            .send_one(&internal)
            .await
            .map_err(MailError::InternalSend)?;

        debug!(request_id = %payload.request_id, "internal notification sent");

        // Customer acknowledgment is best-effort.
        let acknowledgment = SendRequest {
            from: &self.from_email,
            to: &payload.customer_email,
            reply_to: &self.reply_to_email,
            subject: &payload.customer_subject,
            text: &payload.customer_text,
        };

        match self.send_one(&acknowledgment).await {
            Ok(customer_email_id) => Ok(MailSendOutcome {
                internal_email_id,
                customer_email_id,
                customer_send_error: None,
            }),
            Err(reason) => Ok(MailSendOutcome {
                internal_email_id,
                customer_email_id: None,
                customer_send_error: Some(reason),
            }),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
