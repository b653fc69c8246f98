use crate::adapters::mail::{MailError, MailTransport};
use crate::config::MailConfig;
use crate::domain::outbound::{Mailbox, MessageContent, OutboundMessage};
use anyhow::Context;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::{Map, Value, json};
use std::time::Duration;

/// Delivers through the `SendGrid` v3 mail send API.
#[derive(Debug, Clone)]
pub struct SendGridTransport {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl SendGridTransport {
    /// # Errors
    /// Returns an error if no API key is configured or the HTTP client cannot be built.
    pub fn new(config: &MailConfig) -> anyhow::Result<Self> {
        let api_key = config
            .sendgrid_api_key
            .clone()
            .filter(|k| !k.is_empty())
            .context("RELAY_SENDGRID_API_KEY is required for the sendgrid transport")?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { client, endpoint: config.sendgrid_endpoint.clone(), api_key })
    }
}

fn address(mailbox: &Mailbox) -> Value {
    match &mailbox.name {
        Some(name) => json!({ "email": mailbox.address, "name": name }),
        None => json!({ "email": mailbox.address }),
    }
}

/// Request body for `POST /v3/mail/send`.
pub(crate) fn payload(message: &OutboundMessage) -> Value {
    let mut personalization = Map::new();
    personalization.insert("to".to_string(), json!([address(&message.to)]));

    let mut body = Map::new();
    body.insert("from".to_string(), address(&message.from));

    match &message.content {
        MessageContent::Template { template_id, substitutions } => {
            // Repeated keys collapse; the last value wins.
            let subs: Map<String, Value> =
                substitutions.iter().map(|s| (s.key.clone(), Value::String(s.value.clone()))).collect();
            personalization.insert("substitutions".to_string(), Value::Object(subs));
            body.insert("template_id".to_string(), json!(template_id));
        }
        MessageContent::PlainText { subject, body: text } => {
            body.insert("subject".to_string(), json!(subject));
            body.insert("content".to_string(), json!([{ "type": "text/plain", "value": text }]));
        }
    }

    body.insert("personalizations".to_string(), json!([personalization]));
    Value::Object(body)
}

#[async_trait]
impl MailTransport for SendGridTransport {
    #[tracing::instrument(level = "debug", skip(self, message), fields(to = %message.to.address), err)]
    async fn send(&self, message: &OutboundMessage) -> Result<(), MailError> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&payload(message))
            .send()
            .await
            .context("SendGrid request failed")?;

        let status = response.status();
        if status.is_success() {
            tracing::debug!(status = status.as_u16(), "SendGrid accepted message");
            return Ok(());
        }

        let detail = response.text().await.unwrap_or_default();
        match status {
            StatusCode::TOO_MANY_REQUESTS => Err(MailError::RateLimited),
            s if s.is_client_error() => Err(MailError::Rejected(format!("{s}: {detail}"))),
            s => Err(MailError::Other(anyhow::anyhow!("SendGrid returned {s}: {detail}"))),
        }
    }
}
