//! Deadline enforcement for primary-transport operations
//!
//! Every call that touches the conversation handle from an executor goes
//! through [`with_deadline`]. On expiry the slow future is dropped, never
//! awaited further; the transport operation itself is not force-cancelled.

use std::future::Future;
use std::time::Duration;

use crate::delivery::errors::DeliveryError;

/// Race `fut` against `deadline`. If the operation settles first its
/// outcome is returned as-is; otherwise the call fails with a
/// [`DeliveryError::Timeout`] carrying `label` and the deadline value.
pub async fn with_deadline<F, T>(
    fut: F,
    deadline: Duration,
    label: &str,
) -> Result<T, DeliveryError>
where
    F: Future<Output = Result<T, DeliveryError>>,
{
    match tokio::time::timeout(deadline, fut).await {
        Ok(outcome) => outcome,
        Err(_) => Err(DeliveryError::Timeout {
            label: label.to_string(),
            timeout_ms: deadline.as_millis() as u64,
        }),
    }
}
