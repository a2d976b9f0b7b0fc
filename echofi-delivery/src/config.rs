//! Configuration for the delivery core
//!
//! Defaults mirror the EchoFi application: three primary-transport attempts,
//! a ten second per-operation timeout, automatic routing, and the
//! `/api/messages` fallback endpoint.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::delivery::recovery::RecoveryConfig;
use crate::delivery::types::MethodPreference;

/// Errors produced by configuration validation
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Fallback endpoint URL is missing or malformed
    #[error("Invalid fallback URL: {0}")]
    InvalidFallbackUrl(String),

    /// Retry count must be at least one
    #[error("Invalid retry count: {0}")]
    InvalidRetries(String),

    /// Timeout must be non-zero
    #[error("Invalid timeout: {0}")]
    InvalidTimeout(String),

    /// Recovery tuning is unusable
    #[error("Invalid recovery config: {0}")]
    InvalidRecovery(String),
}

/// Configuration for the delivery manager
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryConfig {
    /// Full URL of the fallback HTTP endpoint
    pub fallback_url: String,

    /// Default number of primary-transport attempts per call
    pub default_retries: u32,

    /// Default per-operation timeout (each send/sync gets its own budget)
    #[serde(with = "humantime_serde")]
    pub default_timeout: Duration,

    /// Default routing preference when the caller does not specify one
    pub default_preference: MethodPreference,

    /// Recovery engine tuning
    pub recovery: RecoveryConfig,
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            fallback_url: "http://localhost:3000/api/messages".to_string(),
            default_retries: 3,
            default_timeout: Duration::from_secs(10),
            default_preference: MethodPreference::Auto,
            recovery: RecoveryConfig::default(),
        }
    }
}

impl DeliveryConfig {
    /// Validate the configuration, returning the first problem found
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fallback_url.is_empty() {
            return Err(ConfigError::InvalidFallbackUrl("URL is empty".to_string()));
        }
        if !self.fallback_url.starts_with("http://") && !self.fallback_url.starts_with("https://") {
            return Err(ConfigError::InvalidFallbackUrl(self.fallback_url.clone()));
        }
        if self.default_retries == 0 {
            return Err(ConfigError::InvalidRetries("must be at least 1".to_string()));
        }
        if self.default_timeout.is_zero() {
            return Err(ConfigError::InvalidTimeout("must be non-zero".to_string()));
        }
        if self.recovery.strategy_delays.is_empty() {
            return Err(ConfigError::InvalidRecovery(
                "at least one sync strategy is required".to_string(),
            ));
        }
        Ok(())
    }
}
