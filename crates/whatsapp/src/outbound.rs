//! Outbound delivery over the Graph API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use lagobot_core::config::WhatsAppConfig;

#[derive(Debug, Error)]
pub enum SendError {
    #[error("message delivery request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("message delivery returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("whatsapp credentials are not configured")]
    MissingCredentials,
}

/// Delivery seam between the webhook handler and the provider. The
/// simulator and tests plug in `NoopTransport`.
#[async_trait]
pub trait ReplyTransport: Send + Sync {
    async fn send_text(&self, to: &str, body: &str) -> Result<(), SendError>;
}

/// Sends text messages through the Cloud API `messages` endpoint.
pub struct CloudApiClient {
    http: Client,
    base_url: String,
    access_token: SecretString,
    phone_number_id: String,
}

impl CloudApiClient {
    pub fn new(config: &WhatsAppConfig) -> Result<Self, SendError> {
        if config.access_token.expose_secret().trim().is_empty()
            || config.phone_number_id.trim().is_empty()
        {
            return Err(SendError::MissingCredentials);
        }

        let http = Client::builder().timeout(Duration::from_secs(10)).build()?;

        Ok(Self {
            http,
            base_url: config.graph_api_base.trim_end_matches('/').to_string(),
            access_token: config.access_token.clone(),
            phone_number_id: config.phone_number_id.clone(),
        })
    }
}

#[async_trait]
impl ReplyTransport for CloudApiClient {
    async fn send_text(&self, to: &str, body: &str) -> Result<(), SendError> {
        let url = format!("{}/{}/messages", self.base_url, self.phone_number_id);
        let payload = OutboundText::new(to, body);

        let response = self
            .http
            .post(&url)
            .bearer_auth(self.access_token.expose_secret())
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(SendError::Status { status: status.as_u16(), body });
        }

        debug!(to, "reply delivered");
        Ok(())
    }
}

/// Swallows every message. Used by tests and the CLI simulator, where the
/// reply is printed instead of delivered.
#[derive(Default)]
pub struct NoopTransport;

#[async_trait]
impl ReplyTransport for NoopTransport {
    async fn send_text(&self, _to: &str, _body: &str) -> Result<(), SendError> {
        Ok(())
    }
}

#[derive(Debug, Serialize)]
struct OutboundText<'a> {
    messaging_product: &'static str,
    to: &'a str,
    #[serde(rename = "type")]
    message_type: &'static str,
    text: TextBody<'a>,
}

#[derive(Debug, Serialize)]
struct TextBody<'a> {
    body: &'a str,
}

impl<'a> OutboundText<'a> {
    fn new(to: &'a str, body: &'a str) -> Self {
        Self { messaging_product: "whatsapp", to, message_type: "text", text: TextBody { body } }
    }
}
