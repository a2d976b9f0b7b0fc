//! Transport executors
//!
//! Three delivery strategies over the injected transports:
//! - primary-only, with bounded retries and escalating recovery
//! - fallback-only, a single POST with no internal retry
//! - hybrid, recover-then-primary-then-fallback
//!
//! None of these methods returns an error or panics; every failure is
//! folded into a [`DeliveryResult`].

use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::delivery::errors::{classify_transport_error, TransportErrorKind};
use crate::delivery::recovery::{RecoveryConfig, SyncRecoveryEngine};
use crate::delivery::timeout::with_deadline;
use crate::delivery::traits::{ConversationHandle, FallbackPayload, FallbackTransport};
use crate::delivery::types::{DeliveryMethod, DeliveryResult};

/// Backoff between primary attempts grows linearly with the attempt number
const BACKOFF_UNIT: Duration = Duration::from_millis(1000);

/// Hybrid caps primary retries to bound its worst-case latency
const HYBRID_MAX_RETRIES: u32 = 2;

/// Owns the send strategies over one conversation and one fallback endpoint
pub struct DeliveryExecutor {
    conversation: Arc<dyn ConversationHandle>,
    fallback: Arc<dyn FallbackTransport>,
    recovery: SyncRecoveryEngine,
}

impl DeliveryExecutor {
    pub fn new(
        conversation: Arc<dyn ConversationHandle>,
        fallback: Arc<dyn FallbackTransport>,
        recovery_config: RecoveryConfig,
    ) -> Self {
        let recovery = SyncRecoveryEngine::new(Arc::clone(&conversation), recovery_config);
        Self { conversation, fallback, recovery }
    }

    /// Primary-transport delivery with up to `retries` attempts.
    ///
    /// Attempts after the first are preceded by a best-effort lightweight
    /// pre-send sync. A corruption-classified failure triggers full state
    /// reconstruction before the next attempt; every non-final failure
    /// backs off proportionally to the attempt number.
    pub async fn send_via_primary(
        &self,
        content: &str,
        retries: u32,
        timeout: Duration,
    ) -> DeliveryResult {
        let retries = retries.max(1);
        let mut last_error = String::new();

        for attempt in 1..=retries {
            if attempt > 1 {
                if let Err(err) = self.recovery.pre_send_sync(timeout).await {
                    debug!(attempt, error = %err, "pre-send recovery failed, sending anyway");
                }
            }

            match with_deadline(self.conversation.send(content), timeout, "send").await {
                Ok(message_id) => {
                    info!(attempt, %message_id, "message delivered via primary transport");
                    return DeliveryResult::delivered(DeliveryMethod::Primary, message_id);
                }
                Err(err) => {
                    warn!(attempt, retries, error = %err, "primary send attempt failed");
                    let corrupted =
                        classify_transport_error(&err) == TransportErrorKind::Corruption;
                    last_error = err.to_string();

                    if attempt < retries {
                        if corrupted {
                            if let Err(rec) = self.recovery.reconstruct_state(timeout).await {
                                warn!(error = %rec, "reconstruction after corruption failed");
                            }
                        }
                        sleep(BACKOFF_UNIT * attempt).await;
                    }
                }
            }
        }

        DeliveryResult::failed(DeliveryMethod::Primary, last_error)
    }

    /// Fallback delivery: one POST, no retry loop. Any retry policy belongs
    /// to the caller (the hybrid path's outer fallthrough).
    pub async fn send_via_fallback(&self, content: &str) -> DeliveryResult {
        let payload = FallbackPayload::new(self.conversation.id(), content);

        match self.fallback.post_message(&payload).await {
            Ok(ack) => {
                let message_id = ack
                    .message_id
                    .unwrap_or_else(|| format!("fallback-{}", payload.timestamp));
                info!(%message_id, "message persisted via fallback endpoint");
                DeliveryResult::delivered(DeliveryMethod::Fallback, message_id)
            }
            Err(err) => {
                warn!(error = %err, "fallback delivery failed");
                DeliveryResult::failed(DeliveryMethod::Fallback, err.to_string())
            }
        }
    }

    /// Hybrid delivery: best-effort reconstruction, primary with capped
    /// retries, then fallback. The result is always labeled `Hybrid`.
    pub async fn send_via_hybrid(
        &self,
        content: &str,
        retries: u32,
        timeout: Duration,
    ) -> DeliveryResult {
        if let Err(err) = self.recovery.reconstruct_state(timeout).await {
            warn!(error = %err, "recovery before hybrid delivery failed, continuing");
        }

        let primary = self
            .send_via_primary(content, retries.min(HYBRID_MAX_RETRIES), timeout)
            .await;
        if primary.success {
            return primary.relabel(DeliveryMethod::Hybrid);
        }

        debug!("primary path exhausted, falling through to fallback");
        self.send_via_fallback(content).await.relabel(DeliveryMethod::Hybrid)
    }
}
