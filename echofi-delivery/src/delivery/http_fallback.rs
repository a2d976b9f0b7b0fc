//! HTTP implementation of the fallback transport
//!
//! POSTs JSON payloads to the configured fallback endpoint (the EchoFi
//! server's `/api/messages` route by default) with a shared `reqwest`
//! client. Non-2xx responses and network failures both come back as
//! [`DeliveryError::Fallback`]; nothing here retries.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

use crate::delivery::errors::DeliveryError;
use crate::delivery::traits::{FallbackAck, FallbackPayload, FallbackTransport};

/// Fallback transport backed by an HTTP endpoint
pub struct HttpFallback {
    client: Client,
    endpoint: String,
}

impl HttpFallback {
    /// Build a client posting to `endpoint` with a per-request `timeout`
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, DeliveryError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| DeliveryError::Fallback(format!("failed to build HTTP client: {}", err)))?;
        Ok(Self { client, endpoint: endpoint.into() })
    }

    /// The endpoint this transport posts to
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl FallbackTransport for HttpFallback {
    async fn post_message(&self, payload: &FallbackPayload) -> Result<FallbackAck, DeliveryError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(payload)
            .send()
            .await
            .map_err(|err| DeliveryError::Fallback(format!("request failed: {}", err)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DeliveryError::Fallback(format!("endpoint returned {}", status)));
        }

        // A 2xx without a parseable body is still a success; the executor
        // will fill in a placeholder id.
        let ack = response.json::<FallbackAck>().await.unwrap_or_default();
        debug!(message_id = ?ack.message_id, "fallback endpoint accepted message");
        Ok(ack)
    }
}
