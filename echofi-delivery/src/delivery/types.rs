//! Core data types for the delivery layer
//!
//! All types here are transient value objects, constructed fresh per call.
//! The delivery core holds no persistent state.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Outcome of the sync probe in a health check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncStatus {
    Synced,
    Syncing,
    Failed,
}

/// What the health checker recommends doing about a conversation.
///
/// Ordered from weakest to strongest; a report only ever escalates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendedAction {
    None,
    Sync,
    Reconstruct,
    Reset,
}

/// Diagnostic report for one conversation handle, recomputed on every check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReport {
    /// Overall go/no-go signal for the primary transport
    pub is_healthy: bool,

    /// False only when ordering/cursor corruption was detected
    pub sequence_id_valid: bool,

    /// Outcome of the sync probe
    pub sync_status: SyncStatus,

    /// Human-readable findings, appended in probe order
    pub issues: Vec<String>,

    /// Strongest action recommended so far
    pub recommended_action: RecommendedAction,
}

impl HealthReport {
    /// A report with no findings yet. The sync probe has not run, so the
    /// status starts out as `Syncing`.
    pub fn healthy() -> Self {
        Self {
            is_healthy: true,
            sequence_id_valid: true,
            sync_status: SyncStatus::Syncing,
            issues: Vec::new(),
            recommended_action: RecommendedAction::None,
        }
    }

    /// Report for a health check that failed wholesale, outside any single
    /// probe. The only way `Reset` is ever recommended.
    pub(crate) fn check_failed(message: impl Into<String>) -> Self {
        Self {
            is_healthy: false,
            sequence_id_valid: true,
            sync_status: SyncStatus::Failed,
            issues: vec![message.into()],
            recommended_action: RecommendedAction::Reset,
        }
    }

    /// Append a finding
    pub fn add_issue(&mut self, issue: impl Into<String>) {
        self.issues.push(issue.into());
    }

    /// Raise the recommended action, never lowering it
    pub fn escalate(&mut self, action: RecommendedAction) {
        if action > self.recommended_action {
            self.recommended_action = action;
        }
    }
}

/// Caller routing preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MethodPreference {
    Primary,
    Fallback,
    Auto,
}

impl Default for MethodPreference {
    fn default() -> Self {
        MethodPreference::Auto
    }
}

/// Transport path actually used for a delivery
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryMethod {
    Primary,
    Fallback,
    Hybrid,
}

/// Per-call delivery options. Every field is optional; unset fields take
/// their defaults from [`DeliveryConfig`](crate::config::DeliveryConfig)
/// when the façade merges them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeliveryOptions {
    /// Primary-transport attempts (minimum 1, default 3)
    pub retries: Option<u32>,

    /// Per-operation timeout (default 10s)
    #[serde(default, with = "humantime_serde")]
    pub timeout: Option<Duration>,

    /// Routing preference (default auto)
    pub preferred_method: Option<MethodPreference>,

    /// Advisory flag; carried through but not acted on
    pub require_confirmation: Option<bool>,
}

/// Normalized outcome of one `send_message` call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryResult {
    pub success: bool,

    /// Transport or fallback message id; present only on success
    pub message_id: Option<String>,

    /// Path actually used, which may differ from the caller's preference
    pub method: DeliveryMethod,

    pub error: Option<String>,

    /// Wall-clock time from call entry to result, set by the façade
    pub delivery_time_ms: u64,
}

impl DeliveryResult {
    /// Successful delivery via `method`
    pub fn delivered(method: DeliveryMethod, message_id: impl Into<String>) -> Self {
        Self {
            success: true,
            message_id: Some(message_id.into()),
            method,
            error: None,
            delivery_time_ms: 0,
        }
    }

    /// Failed delivery via `method`
    pub fn failed(method: DeliveryMethod, error: impl Into<String>) -> Self {
        Self {
            success: false,
            message_id: None,
            method,
            error: Some(error.into()),
            delivery_time_ms: 0,
        }
    }

    /// Relabel the result with the method that orchestrated it
    pub(crate) fn relabel(mut self, method: DeliveryMethod) -> Self {
        self.method = method;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recommended_action_ordering() {
        assert!(RecommendedAction::None < RecommendedAction::Sync);
        assert!(RecommendedAction::Sync < RecommendedAction::Reconstruct);
        assert!(RecommendedAction::Reconstruct < RecommendedAction::Reset);
    }

    #[test]
    fn test_escalate_never_downgrades() {
        let mut report = HealthReport::healthy();
        report.escalate(RecommendedAction::Reconstruct);
        report.escalate(RecommendedAction::Sync);
        assert_eq!(report.recommended_action, RecommendedAction::Reconstruct);

        report.escalate(RecommendedAction::Reset);
        assert_eq!(report.recommended_action, RecommendedAction::Reset);
    }

    #[test]
    fn test_check_failed_report() {
        let report = HealthReport::check_failed("probe task died");
        assert!(!report.is_healthy);
        assert_eq!(report.recommended_action, RecommendedAction::Reset);
        assert_eq!(report.issues, vec!["probe task died".to_string()]);
    }

    #[test]
    fn test_delivery_result_constructors() {
        let ok = DeliveryResult::delivered(DeliveryMethod::Primary, "m-1");
        assert!(ok.success);
        assert_eq!(ok.message_id.as_deref(), Some("m-1"));
        assert!(ok.error.is_none());

        let failed = DeliveryResult::failed(DeliveryMethod::Fallback, "boom");
        assert!(!failed.success);
        assert!(failed.message_id.is_none());
        assert_eq!(failed.error.as_deref(), Some("boom"));
    }

    #[test]
    fn test_relabel_changes_only_method() {
        let result =
            DeliveryResult::delivered(DeliveryMethod::Primary, "m-2").relabel(DeliveryMethod::Hybrid);
        assert_eq!(result.method, DeliveryMethod::Hybrid);
        assert!(result.success);
        assert_eq!(result.message_id.as_deref(), Some("m-2"));
    }

    #[test]
    fn test_delivery_options_default_is_all_unset() {
        let options = DeliveryOptions::default();
        assert!(options.retries.is_none());
        assert!(options.timeout.is_none());
        assert!(options.preferred_method.is_none());
        assert!(options.require_confirmation.is_none());
    }

    #[test]
    fn test_method_serialization() {
        assert_eq!(serde_json::to_string(&DeliveryMethod::Hybrid).unwrap(), "\"hybrid\"");
        assert_eq!(serde_json::to_string(&MethodPreference::Auto).unwrap(), "\"auto\"");
        assert_eq!(serde_json::to_string(&SyncStatus::Failed).unwrap(), "\"failed\"");
    }
}
