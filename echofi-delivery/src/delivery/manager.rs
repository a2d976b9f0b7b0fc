//! Delivery manager façade
//!
//! The public entry point for getting a message into a group conversation.
//! Per call: merge caller options with configured defaults, route, dispatch
//! to the chosen executor, and normalize the outcome. The façade never
//! panics and never returns an error; the worst case is a failed
//! [`DeliveryResult`] with a descriptive message.

use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

use crate::config::DeliveryConfig;
use crate::delivery::errors::DeliveryError;
use crate::delivery::executor::DeliveryExecutor;
use crate::delivery::health::HealthChecker;
use crate::delivery::http_fallback::HttpFallback;
use crate::delivery::router;
use crate::delivery::traits::{ConversationHandle, FallbackTransport};
use crate::delivery::types::{
    DeliveryMethod, DeliveryOptions, DeliveryResult, HealthReport, MethodPreference,
};

/// Options after merging caller values with configured defaults
#[derive(Debug, Clone, Copy)]
struct ResolvedOptions {
    retries: u32,
    timeout: Duration,
    preference: MethodPreference,
    require_confirmation: bool,
}

/// Public entry point for hybrid message delivery
pub struct DeliveryManager {
    config: DeliveryConfig,
    health: HealthChecker,
    executor: Arc<DeliveryExecutor>,
}

impl DeliveryManager {
    /// Wire a manager from an injected conversation handle and fallback
    /// transport. The manager never creates or destroys the handle.
    pub fn new(
        conversation: Arc<dyn ConversationHandle>,
        fallback: Arc<dyn FallbackTransport>,
        config: DeliveryConfig,
    ) -> Self {
        let health = HealthChecker::new(Arc::clone(&conversation));
        let executor =
            Arc::new(DeliveryExecutor::new(conversation, fallback, config.recovery.clone()));
        Self { config, health, executor }
    }

    /// Convenience constructor wiring the HTTP fallback from config
    pub fn with_http_fallback(
        conversation: Arc<dyn ConversationHandle>,
        config: DeliveryConfig,
    ) -> Result<Self, DeliveryError> {
        config.validate()?;
        let fallback =
            Arc::new(HttpFallback::new(config.fallback_url.clone(), config.default_timeout)?);
        Ok(Self::new(conversation, fallback, config))
    }

    /// Deliver `content` to the conversation. Always resolves to a
    /// [`DeliveryResult`]; `delivery_time_ms` is measured here regardless
    /// of what the executor reported.
    pub async fn send_message(&self, content: &str, options: DeliveryOptions) -> DeliveryResult {
        let started = Instant::now();
        let opts = self.merge_options(options);
        if opts.require_confirmation {
            debug!("delivery confirmation requested (advisory, not enforced)");
        }

        let method =
            router::determine_method(opts.preference, &self.health, opts.timeout).await;

        // The executors are written not to fail outward, but a panic deep
        // inside a transport must still come back as a failed result, so
        // the dispatch runs on its own task.
        let executor = Arc::clone(&self.executor);
        let content = content.to_string();
        let dispatch = tokio::spawn(async move {
            match method {
                DeliveryMethod::Primary => {
                    executor.send_via_primary(&content, opts.retries, opts.timeout).await
                }
                DeliveryMethod::Fallback => executor.send_via_fallback(&content).await,
                DeliveryMethod::Hybrid => {
                    executor.send_via_hybrid(&content, opts.retries, opts.timeout).await
                }
            }
        });

        let mut result = match dispatch.await {
            Ok(result) => result,
            Err(err) => {
                error!(error = %err, "delivery dispatch aborted");
                DeliveryResult::failed(method, format!("Delivery failed unexpectedly: {}", err))
            }
        };

        result.delivery_time_ms = started.elapsed().as_millis() as u64;
        if result.success {
            info!(
                method = ?result.method,
                message_id = ?result.message_id,
                elapsed_ms = result.delivery_time_ms,
                "message delivered"
            );
        } else {
            warn!(
                method = ?result.method,
                error = ?result.error,
                elapsed_ms = result.delivery_time_ms,
                "delivery failed"
            );
        }
        result
    }

    /// Run a standalone health check against the conversation. Each probe
    /// is bounded by the configured default timeout.
    pub async fn check_health(&self) -> HealthReport {
        self.health.check(self.config.default_timeout).await
    }

    fn merge_options(&self, options: DeliveryOptions) -> ResolvedOptions {
        ResolvedOptions {
            retries: options.retries.unwrap_or(self.config.default_retries).max(1),
            timeout: options.timeout.unwrap_or(self.config.default_timeout),
            preference: options.preferred_method.unwrap_or(self.config.default_preference),
            require_confirmation: options.require_confirmation.unwrap_or(false),
        }
    }
}
