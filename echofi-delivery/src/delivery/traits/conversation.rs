//! Conversation handle seam
//!
//! Minimum surface the delivery core needs from one encrypted group
//! conversation. The core never creates or destroys a handle, only invokes
//! its operations; connection setup, encryption, and key management stay on
//! the other side of this trait.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::delivery::errors::DeliveryError;

/// Best-effort conversation metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationInfo {
    /// Stable conversation identifier
    pub id: String,

    /// Human-readable conversation name
    pub name: String,

    /// Optional description
    pub description: Option<String>,
}

/// One message fetched from conversation history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationMessage {
    pub id: String,
    pub content: String,
    pub sent_at_ms: u64,
}

/// Opaque handle to one encrypted group conversation.
///
/// Transport failures surface as [`DeliveryError::Transport`] with the
/// transport's own error text; sequence/cursor corruption is recognized by
/// substring (see
/// [`classify_transport_error`](crate::delivery::errors::classify_transport_error)).
#[async_trait]
pub trait ConversationHandle: Send + Sync {
    /// Stable conversation identifier
    fn id(&self) -> String;

    /// Read id/name/description from the transport. A handle that cannot
    /// report its own identity is structurally broken, not just stale.
    async fn info(&self) -> Result<ConversationInfo, DeliveryError>;

    /// Reconcile local and remote conversation state
    async fn sync(&self) -> Result<(), DeliveryError>;

    /// Fetch up to `limit` most-recent messages
    async fn messages(&self, limit: usize) -> Result<Vec<ConversationMessage>, DeliveryError>;

    /// Send `content`, returning the transport message id
    async fn send(&self, content: &str) -> Result<String, DeliveryError>;
}
