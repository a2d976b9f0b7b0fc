//! Fallback transport seam
//!
//! The server-persisted path used when the primary encrypted transport is
//! unusable. Persistence and later reconciliation of fallback messages are
//! the server's concern, not this crate's.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::delivery::errors::DeliveryError;

/// Wire payload POSTed to the fallback endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FallbackPayload {
    pub conversation_id: String,
    pub content: String,
    /// Epoch milliseconds at payload construction
    pub timestamp: u64,
    /// Always "fallback"; lets the server distinguish delivery paths
    pub method: String,
}

impl FallbackPayload {
    /// Build a payload stamped with the current time
    pub fn new(conversation_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            conversation_id: conversation_id.into(),
            content: content.into(),
            timestamp: epoch_millis(),
            method: "fallback".to_string(),
        }
    }
}

/// Server acknowledgement for a fallback POST. The body may be empty or
/// non-JSON; a missing `messageId` is normal.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FallbackAck {
    #[serde(default)]
    pub message_id: Option<String>,
}

/// Durable server-side delivery path
#[async_trait]
pub trait FallbackTransport: Send + Sync {
    /// POST one message payload. Ok carries the server acknowledgement;
    /// non-2xx responses and network failures come back as
    /// [`DeliveryError::Fallback`].
    async fn post_message(&self, payload: &FallbackPayload) -> Result<FallbackAck, DeliveryError>;
}

pub(crate) fn epoch_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}
