//! Conversation state recovery
//!
//! Two distinct recovery levels, deliberately not collapsed into one:
//!
//! - [`SyncRecoveryEngine::reconstruct_state`] is the heavy path, reserved
//!   for confirmed corruption: progressive sync with escalating delays,
//!   sequence-integrity validation, and an operability probe.
//! - [`SyncRecoveryEngine::pre_send_sync`] is the light path used on
//!   ordinary retries, bounding their latency to one sync plus a short
//!   settle delay.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info};

use crate::delivery::errors::{classify_transport_error, DeliveryError, TransportErrorKind};
use crate::delivery::timeout::with_deadline;
use crate::delivery::traits::ConversationHandle;

/// Tuning for the recovery engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecoveryConfig {
    /// Pre-attempt delay for each progressive sync strategy, in order.
    /// The strategies differ only by their delay.
    pub strategy_delays: Vec<Duration>,

    /// Settle delay after a lightweight pre-send sync
    pub settle_delay: Duration,

    /// How many recent messages to fetch when validating sequence integrity
    pub validation_depth: usize,
}

impl Default for RecoveryConfig {
    fn default() -> Self {
        Self {
            strategy_delays: vec![
                Duration::from_secs(1),
                Duration::from_secs(2),
                Duration::from_secs(3),
            ],
            settle_delay: Duration::from_millis(500),
            validation_depth: 5,
        }
    }
}

/// Attempts to return a degraded conversation to a deliverable state
pub struct SyncRecoveryEngine {
    conversation: Arc<dyn ConversationHandle>,
    config: RecoveryConfig,
}

impl SyncRecoveryEngine {
    pub fn new(conversation: Arc<dyn ConversationHandle>, config: RecoveryConfig) -> Self {
        Self { conversation, config }
    }

    /// Full reconstruction: progressive sync, then sequence validation,
    /// then an operability probe. All three must succeed.
    ///
    /// Each handle call inside runs under its own `op_timeout` budget; a
    /// hung transport surfaces as an ordinary recovery failure instead of
    /// stalling the delivery.
    ///
    /// Failure here is terminal for the current delivery attempt's recovery
    /// step only; the caller may still fall back to the alternate
    /// transport.
    pub async fn reconstruct_state(&self, op_timeout: Duration) -> Result<(), DeliveryError> {
        self.progressive_sync(op_timeout).await?;
        self.validate_sequence_integrity(op_timeout).await?;
        self.verify_operability()?;
        info!(conversation = %self.conversation.id(), "conversation state reconstructed");
        Ok(())
    }

    /// Lightweight pre-send recovery: one sync, then a short settle delay.
    /// Used on retry attempts to bound their latency.
    pub async fn pre_send_sync(&self, op_timeout: Duration) -> Result<(), DeliveryError> {
        with_deadline(self.conversation.sync(), op_timeout, "sync")
            .await
            .map_err(|err| DeliveryError::Recovery(format!("Pre-send sync failed: {}", err)))?;
        sleep(self.config.settle_delay).await;
        Ok(())
    }

    /// Try each sync strategy in order. A corruption-classified failure is
    /// expected and moves on to the next strategy; any other error aborts
    /// immediately.
    async fn progressive_sync(&self, op_timeout: Duration) -> Result<(), DeliveryError> {
        for (index, delay) in self.config.strategy_delays.iter().enumerate() {
            let strategy = index + 1;
            sleep(*delay).await;
            match with_deadline(self.conversation.sync(), op_timeout, "sync").await {
                Ok(()) => {
                    debug!(strategy, "sync strategy succeeded");
                    return Ok(());
                }
                Err(err)
                    if classify_transport_error(&err) == TransportErrorKind::Corruption =>
                {
                    debug!(strategy, error = %err, "corruption during sync, trying next strategy");
                }
                Err(err) => {
                    return Err(DeliveryError::Recovery(format!(
                        "Sync strategy {} failed: {}",
                        strategy, err
                    )));
                }
            }
        }
        Err(DeliveryError::Recovery("All sync strategies failed".to_string()))
    }

    /// Fetch a few recent messages. Success means only "did not throw";
    /// the content is not interpreted.
    async fn validate_sequence_integrity(&self, op_timeout: Duration) -> Result<(), DeliveryError> {
        with_deadline(
            self.conversation.messages(self.config.validation_depth),
            op_timeout,
            "messages",
        )
        .await
        .map(|_| ())
        .map_err(|err| {
            DeliveryError::Recovery(format!("Sequence integrity validation failed: {}", err))
        })
    }

    /// Structural readiness check: the handle must expose a usable id.
    /// No message is sent.
    fn verify_operability(&self) -> Result<(), DeliveryError> {
        if self.conversation.id().is_empty() {
            return Err(DeliveryError::Recovery(
                "Conversation is not operable: missing id".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delivery::tests::mocks::MockConversation;

    const OP_TIMEOUT: Duration = Duration::from_secs(5);

    fn fast_config() -> RecoveryConfig {
        RecoveryConfig {
            strategy_delays: vec![
                Duration::from_millis(10),
                Duration::from_millis(20),
                Duration::from_millis(30),
            ],
            settle_delay: Duration::from_millis(5),
            validation_depth: 5,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_reconstruct_succeeds_on_first_strategy() {
        let conversation = Arc::new(MockConversation::healthy("conv-1"));
        let engine = SyncRecoveryEngine::new(conversation.clone(), RecoveryConfig::default());

        engine.reconstruct_state(OP_TIMEOUT).await.unwrap();
        assert_eq!(conversation.sync_calls(), 1);
        assert_eq!(conversation.messages_calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_corruption_moves_to_next_strategy() {
        let conversation = Arc::new(
            MockConversation::healthy("conv-1")
                .with_sync_errors(vec!["SequenceId mismatch", "cursor invalid"]),
        );
        let engine = SyncRecoveryEngine::new(conversation.clone(), RecoveryConfig::default());

        engine.reconstruct_state(OP_TIMEOUT).await.unwrap();
        // Two corrupted strategies, third succeeds.
        assert_eq!(conversation.sync_calls(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_all_strategies_corrupted_is_terminal() {
        let conversation = Arc::new(MockConversation::healthy("conv-1").with_sync_always_failing(
            "SequenceId mismatch",
        ));
        let engine = SyncRecoveryEngine::new(conversation.clone(), RecoveryConfig::default());

        let err = engine.reconstruct_state(OP_TIMEOUT).await.unwrap_err();
        assert!(err.to_string().contains("All sync strategies failed"));
        assert_eq!(conversation.sync_calls(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_generic_sync_error_aborts_immediately() {
        let conversation = Arc::new(
            MockConversation::healthy("conv-1").with_sync_always_failing("network unreachable"),
        );
        let engine = SyncRecoveryEngine::new(conversation.clone(), RecoveryConfig::default());

        let err = engine.reconstruct_state(OP_TIMEOUT).await.unwrap_err();
        assert!(err.to_string().contains("Sync strategy 1 failed"));
        assert_eq!(conversation.sync_calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_validation_failure_is_wrapped() {
        let conversation = Arc::new(MockConversation::healthy("conv-1").with_failing_messages());
        let engine = SyncRecoveryEngine::new(conversation, RecoveryConfig::default());

        let err = engine.reconstruct_state(OP_TIMEOUT).await.unwrap_err();
        assert!(err.to_string().contains("Sequence integrity validation failed"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_id_fails_operability() {
        let conversation = Arc::new(MockConversation::healthy(""));
        let engine = SyncRecoveryEngine::new(conversation, fast_config());

        let err = engine.reconstruct_state(OP_TIMEOUT).await.unwrap_err();
        assert!(err.to_string().contains("not operable"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_pre_send_sync_wraps_failure() {
        let conversation = Arc::new(
            MockConversation::healthy("conv-1").with_sync_errors(vec!["network unreachable"]),
        );
        let engine = SyncRecoveryEngine::new(conversation, fast_config());

        let err = engine.pre_send_sync(OP_TIMEOUT).await.unwrap_err();
        assert!(err.to_string().contains("Pre-send sync failed"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_hanging_sync_aborts_reconstruction_at_deadline() {
        let conversation = Arc::new(MockConversation::healthy("conv-1").with_hanging_sync());
        let engine = SyncRecoveryEngine::new(conversation.clone(), RecoveryConfig::default());

        let err = engine.reconstruct_state(Duration::from_millis(100)).await.unwrap_err();
        assert!(err.to_string().contains("Sync strategy 1 failed"));
        assert!(err.to_string().contains("timed out after 100ms"));
        assert_eq!(conversation.sync_calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_hanging_sync_fails_pre_send_at_deadline() {
        let conversation = Arc::new(MockConversation::healthy("conv-1").with_hanging_sync());
        let engine = SyncRecoveryEngine::new(conversation, fast_config());

        let err = engine.pre_send_sync(Duration::from_millis(100)).await.unwrap_err();
        assert!(err.to_string().contains("Pre-send sync failed"));
        assert!(err.to_string().contains("timed out after 100ms"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_pre_send_sync_is_single_pass() {
        let conversation = Arc::new(MockConversation::healthy("conv-1"));
        let engine = SyncRecoveryEngine::new(conversation.clone(), fast_config());

        engine.pre_send_sync(OP_TIMEOUT).await.unwrap();
        assert_eq!(conversation.sync_calls(), 1);
        assert_eq!(conversation.messages_calls(), 0);
    }
}
