//! engine::retry
//!
//! Bounded retry with fixed backoff for eventually-consistent remote checks.
//!
//! # Design
//!
//! Some platform APIs acknowledge a creation before the resource is
//! queryable. [`wait_until`] absorbs that lag: it re-runs a probe up to a
//! fixed number of attempts with a fixed delay between attempts, and
//! reports whether the probe ever succeeded. Probe errors propagate
//! immediately; exhausting the bound is not an error at this layer, the
//! caller decides what it means.

use std::future::Future;
use std::time::Duration;

/// A bounded retry policy: fixed attempt count, fixed inter-attempt delay.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Maximum number of probe attempts.
    pub max_attempts: u32,
    /// Delay between attempts.
    pub interval: Duration,
}

impl RetryPolicy {
    /// Create a policy.
    pub const fn new(max_attempts: u32, interval: Duration) -> Self {
        Self {
            max_attempts,
            interval,
        }
    }
}

/// Policy for the post-create project visibility poll.
pub const PROJECT_VISIBILITY: RetryPolicy = RetryPolicy::new(10, Duration::from_secs(2));

/// Re-run `probe` until it returns `true` or the policy is exhausted.
///
/// Returns `Ok(true)` if the probe succeeded within the bound, `Ok(false)`
/// if the bound was exhausted. A probe error propagates immediately.
pub async fn wait_until<F, Fut, E>(policy: &RetryPolicy, mut probe: F) -> Result<bool, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<bool, E>>,
{
    for attempt in 0..policy.max_attempts {
        if probe().await? {
            return Ok(true);
        }
        if attempt + 1 < policy.max_attempts {
            tokio::time::sleep(policy.interval).await;
        }
    }
    Ok(false)
}
