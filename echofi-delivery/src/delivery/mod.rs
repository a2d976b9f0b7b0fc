//! Hybrid message delivery and conversation recovery
//!
//! This module gets a message out of the local process and into a group
//! conversation:
//!
//! - `router` picks between the primary encrypted transport, the HTTP
//!   fallback, and the dual-path hybrid strategy
//! - `health` diagnoses whether a conversation handle is usable
//! - `recovery` restores a corrupted conversation to a deliverable state
//! - `executor` runs the three send strategies with bounded retries
//! - `manager` is the façade: it never panics and always answers with a
//!   normalized [`DeliveryResult`](types::DeliveryResult)
//!
//! State machine per call:
//! `START → ROUTE → {PRIMARY|FALLBACK|HYBRID} → [RECOVER]* → TRANSMIT → DONE`.
//! Recovery is entered only from the primary path (on corruption) or
//! unconditionally once at the start of hybrid.
//!
//! The module holds no shared mutable state across calls; concurrent
//! `send_message` calls on the same conversation are allowed and may race
//! on reconstruction, which is accepted.

pub mod errors;
pub mod executor;
pub mod health;
pub mod http_fallback;
pub mod manager;
pub mod recovery;
pub mod router;
pub mod timeout;
pub mod traits;
pub mod types;

#[cfg(test)]
pub(crate) mod tests;

// Re-exports
pub use errors::{classify_transport_error, DeliveryError, TransportErrorKind};
pub use health::HealthChecker;
pub use manager::DeliveryManager;
pub use recovery::{RecoveryConfig, SyncRecoveryEngine};
pub use traits::{ConversationHandle, FallbackTransport};
pub use types::{
    DeliveryMethod, DeliveryOptions, DeliveryResult, HealthReport, MethodPreference,
    RecommendedAction, SyncStatus,
};
