//! Conversation health checker
//!
//! Cheaply determines whether the primary transport is currently safe to
//! use. Three independent probes run in order (info, sync, history); a
//! probe failure is recorded in the report without aborting the others.
//! Single pass, no retries; designed to complete within one per-operation
//! timeout budget when invoked from a delivery attempt.

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error};

use crate::delivery::errors::{classify_transport_error, TransportErrorKind};
use crate::delivery::timeout::with_deadline;
use crate::delivery::traits::ConversationHandle;
use crate::delivery::types::{HealthReport, RecommendedAction, SyncStatus};

/// Single-pass diagnostic over one conversation handle
pub struct HealthChecker {
    conversation: Arc<dyn ConversationHandle>,
}

impl HealthChecker {
    pub fn new(conversation: Arc<dyn ConversationHandle>) -> Self {
        Self { conversation }
    }

    /// Run the three probes and produce a fresh report.
    ///
    /// Each probe call gets its own `op_timeout` budget, so a handle whose
    /// operations never settle cannot stall the check. The probe body runs
    /// on its own task so that a panic anywhere inside it cannot take down
    /// the caller; such a failure yields a report recommending `Reset`,
    /// the only path to that recommendation.
    pub async fn check(&self, op_timeout: Duration) -> HealthReport {
        let conversation = Arc::clone(&self.conversation);
        let probes =
            tokio::spawn(async move { run_probes(conversation.as_ref(), op_timeout).await });

        match probes.await {
            Ok(report) => report,
            Err(err) if err.is_panic() => {
                let panic = err.into_panic();
                let message = panic
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| panic.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "health check panicked".to_string());
                error!(%message, "health check aborted");
                HealthReport::check_failed(format!("Health check failed: {}", message))
            }
            Err(err) => {
                error!(error = %err, "health check task cancelled");
                HealthReport::check_failed(format!("Health check failed: {}", err))
            }
        }
    }
}

async fn run_probes(conversation: &dyn ConversationHandle, op_timeout: Duration) -> HealthReport {
    let mut report = HealthReport::healthy();

    // Info probe: a handle that cannot report its own identity is assumed
    // structurally broken, not just stale.
    match with_deadline(conversation.info(), op_timeout, "info").await {
        Ok(info) => {
            debug!(conversation = %info.id, "info probe ok");
        }
        Err(err) => {
            debug!(error = %err, "info probe failed");
            report.is_healthy = false;
            report.add_issue("Conversation info not accessible");
            report.escalate(RecommendedAction::Reconstruct);
        }
    }

    // Sync probe
    match with_deadline(conversation.sync(), op_timeout, "sync").await {
        Ok(()) => {
            report.sync_status = SyncStatus::Synced;
        }
        Err(err) => {
            report.is_healthy = false;
            report.sync_status = SyncStatus::Failed;
            if classify_transport_error(&err) == TransportErrorKind::Corruption {
                report.sequence_id_valid = false;
                report.add_issue("SequenceId corruption detected");
                report.escalate(RecommendedAction::Reconstruct);
            } else {
                report.add_issue(format!("Sync failed: {}", err));
                report.escalate(RecommendedAction::Sync);
            }
        }
    }

    // History probe: one most-recent message is enough to prove history is
    // reachable.
    if let Err(err) = with_deadline(conversation.messages(1), op_timeout, "history").await {
        debug!(error = %err, "history probe failed");
        report.is_healthy = false;
        report.add_issue("Message history not accessible");
        report.escalate(RecommendedAction::Sync);
    }

    report
}
