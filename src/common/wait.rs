use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Bounded polling parameters for operations that must wait on the
/// filesystem to catch up (e.g. a directory appearing after `mkdir`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollPolicy {
    /// Maximum number of predicate checks.
    pub attempts: u32,
    /// Pause between checks.
    pub interval: Duration,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            attempts: 50,
            interval: Duration::from_millis(100),
        }
    }
}

impl PollPolicy {
    /// Total time the policy may spend waiting.
    pub fn max_wait(&self) -> Duration {
        self.interval * self.attempts
    }
}

/// Poll `pred` until it returns true or the policy is exhausted.
///
/// Returns whether the predicate ever held. The wait is cancellable by
/// dropping the future, and advances under tokio's paused test clock.
pub async fn wait_until<F>(policy: &PollPolicy, mut pred: F) -> bool
where
    F: FnMut() -> bool,
{
    for _ in 0..policy.attempts {
        if pred() {
            return true;
        }
        tokio::time::sleep(policy.interval).await;
    }
    pred()
}
