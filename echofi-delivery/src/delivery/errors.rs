//! Error types for delivery, recovery, and transport operations

use thiserror::Error;

use crate::config::ConfigError;

/// Errors that can occur while delivering a message or recovering a
/// conversation. The `DeliveryManager` façade never lets one of these
/// escape to the caller; they only cross internal boundaries.
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// Primary transport operation failed
    #[error("Transport error: {0}")]
    Transport(String),

    /// Operation exceeded its deadline
    #[error("{label} timed out after {timeout_ms}ms")]
    Timeout { label: String, timeout_ms: u64 },

    /// Conversation state recovery failed
    #[error("Recovery failed: {0}")]
    Recovery(String),

    /// Fallback endpoint rejected the message or was unreachable
    #[error("Fallback error: {0}")]
    Fallback(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<ConfigError> for DeliveryError {
    fn from(e: ConfigError) -> Self {
        DeliveryError::Config(e.to_string())
    }
}

/// Coarse classification of a transport-level failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    /// Message ordering/cursor state is inconsistent with the remote;
    /// requires explicit resynchronization
    Corruption,
    /// The operation ran out of its deadline budget
    Timeout,
    /// Any other transport failure
    Generic,
}

/// Classify a transport failure.
///
/// The transport does not expose typed errors, so corruption is recognized
/// by a known substring in the error text. The matching rule lives here and
/// nowhere else; if the transport ever changes its error wording, this is
/// the only place to update.
pub fn classify_transport_error(err: &DeliveryError) -> TransportErrorKind {
    if matches!(err, DeliveryError::Timeout { .. }) {
        return TransportErrorKind::Timeout;
    }
    let text = err.to_string().to_lowercase();
    if text.contains("sequenceid") || text.contains("sequence id") || text.contains("cursor") {
        TransportErrorKind::Corruption
    } else {
        TransportErrorKind::Generic
    }
}
