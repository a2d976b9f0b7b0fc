//! Routing decision between primary, fallback, and hybrid delivery
//!
//! Explicit preferences pass through untouched; only `Auto` pays for a
//! health check.

use std::time::Duration;
use tracing::debug;

use crate::delivery::health::HealthChecker;
use crate::delivery::types::{DeliveryMethod, MethodPreference, RecommendedAction};

/// Decide which transport path to use for one delivery.
///
/// For `Auto`, a single health check drives the decision: a healthy handle
/// with valid sequence state goes straight to the primary path; a handle
/// that recommends sync or reconstruction gets the dual-path hybrid
/// treatment; anything worse (including a `Reset` recommendation) is routed
/// around the primary transport entirely.
pub async fn determine_method(
    preference: MethodPreference,
    checker: &HealthChecker,
    op_timeout: Duration,
) -> DeliveryMethod {
    match preference {
        MethodPreference::Primary => DeliveryMethod::Primary,
        MethodPreference::Fallback => DeliveryMethod::Fallback,
        MethodPreference::Auto => {
            let report = checker.check(op_timeout).await;
            let method = if report.is_healthy && report.sequence_id_valid {
                DeliveryMethod::Primary
            } else {
                match report.recommended_action {
                    RecommendedAction::Sync | RecommendedAction::Reconstruct => {
                        DeliveryMethod::Hybrid
                    }
                    _ => DeliveryMethod::Fallback,
                }
            };
            debug!(
                ?method,
                healthy = report.is_healthy,
                action = ?report.recommended_action,
                "auto routing decision"
            );
            method
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delivery::tests::mocks::MockConversation;
    use std::sync::Arc;

    const OP_TIMEOUT: Duration = Duration::from_secs(5);

    #[tokio::test]
    async fn test_explicit_preferences_skip_health_check() {
        let conversation = Arc::new(MockConversation::healthy("conv-1"));
        let checker = HealthChecker::new(conversation.clone());

        let method = determine_method(MethodPreference::Fallback, &checker, OP_TIMEOUT).await;
        assert_eq!(method, DeliveryMethod::Fallback);

        let method = determine_method(MethodPreference::Primary, &checker, OP_TIMEOUT).await;
        assert_eq!(method, DeliveryMethod::Primary);

        assert_eq!(conversation.sync_calls(), 0);
        assert_eq!(conversation.info_calls(), 0);
    }

    #[tokio::test]
    async fn test_auto_routes_healthy_handle_to_primary() {
        let conversation = Arc::new(MockConversation::healthy("conv-1"));
        let checker = HealthChecker::new(conversation.clone());

        let method = determine_method(MethodPreference::Auto, &checker, OP_TIMEOUT).await;
        assert_eq!(method, DeliveryMethod::Primary);
        assert_eq!(conversation.sync_calls(), 1);
    }

    #[tokio::test]
    async fn test_sequence_corruption_always_routes_hybrid() {
        let conversation = Arc::new(
            MockConversation::healthy("conv-1").with_sync_errors(vec!["SequenceId mismatch"]),
        );
        let checker = HealthChecker::new(conversation);

        let method = determine_method(MethodPreference::Auto, &checker, OP_TIMEOUT).await;
        assert_eq!(method, DeliveryMethod::Hybrid);
    }

    #[tokio::test]
    async fn test_generic_sync_failure_routes_hybrid() {
        let conversation = Arc::new(
            MockConversation::healthy("conv-1").with_sync_errors(vec!["network unreachable"]),
        );
        let checker = HealthChecker::new(conversation);

        let method = determine_method(MethodPreference::Auto, &checker, OP_TIMEOUT).await;
        assert_eq!(method, DeliveryMethod::Hybrid);
    }

    #[tokio::test(start_paused = true)]
    async fn test_hanging_sync_still_produces_a_decision() {
        let conversation = Arc::new(MockConversation::healthy("conv-1").with_hanging_sync());
        let checker = HealthChecker::new(conversation);

        let method =
            determine_method(MethodPreference::Auto, &checker, Duration::from_millis(100)).await;
        assert_eq!(method, DeliveryMethod::Hybrid);
    }

    #[tokio::test]
    async fn test_reset_recommendation_routes_fallback() {
        let conversation = Arc::new(MockConversation::healthy("conv-1").with_panicking_info());
        let checker = HealthChecker::new(conversation);

        let method = determine_method(MethodPreference::Auto, &checker, OP_TIMEOUT).await;
        assert_eq!(method, DeliveryMethod::Fallback);
    }
}
