//! EchoFi delivery core
//!
//! This crate is the coordination layer between the EchoFi application and
//! its encrypted group-messaging transport. It gets a message out of the
//! local process and into a group conversation by:
//! - routing between the end-to-end-encrypted primary transport and a
//!   server-persisted HTTP fallback
//! - diagnosing transport-level corruption (sequence/cursor state)
//! - applying bounded, escalating recovery before giving up on the
//!   primary path
//!
//! The encrypted transport itself is consumed as an opaque
//! [`ConversationHandle`]; the fallback endpoint as a [`FallbackTransport`].
//! Both are injected at construction time.
//!
//! ## Core components
//!
//! - `DeliveryManager`: public entry point, never panics or errors out
//! - `HealthChecker`: single-pass conversation diagnostics
//! - `SyncRecoveryEngine`: progressive sync and state reconstruction
//! - `DeliveryExecutor`: primary / fallback / hybrid send strategies

pub mod config;
pub mod delivery;
pub mod logging;

pub use config::{ConfigError, DeliveryConfig};
pub use delivery::manager::DeliveryManager;
pub use delivery::traits::{ConversationHandle, FallbackTransport};
pub use delivery::types::{
    DeliveryMethod, DeliveryOptions, DeliveryResult, HealthReport, MethodPreference,
};
pub use logging::{init_logging, LogLevel};
