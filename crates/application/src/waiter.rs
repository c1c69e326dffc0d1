//! Eventual-consistency waiting.
//!
//! Mutations may take a moment to become visible. The waiter either sleeps
//! a fixed minimum before the read-back or retries the read-back until it
//! satisfies its expectation.

use std::future::Future;
use std::time::Duration;

use petstore_domain::WaitPolicy;
use tokio::time::{Instant, sleep};
use tracing::debug;

use crate::error::StepResult;

/// Waits for a mutation to become observable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Waiter {
    policy: WaitPolicy,
}

impl Waiter {
    /// Creates a waiter with `policy`.
    #[must_use]
    pub const fn new(policy: WaitPolicy) -> Self {
        Self { policy }
    }

    /// The active policy.
    #[must_use]
    pub const fn policy(&self) -> WaitPolicy {
        self.policy
    }

    /// Runs `attempt` once the effect of a prior mutation should be visible.
    ///
    /// Under `MinimumDelay` the attempt runs exactly once after the delay.
    /// Under `PollTimeout` it runs immediately and is retried every interval
    /// while it fails with an assertion violation and the next try would
    /// still start before the deadline. Transport and precondition failures
    /// are returned at once.
    ///
    /// # Errors
    ///
    /// The last error `attempt` produced.
    pub async fn settle<T, F, Fut>(&self, what: &str, mut attempt: F) -> StepResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = StepResult<T>>,
    {
        match self.policy {
            WaitPolicy::MinimumDelay(delay) => {
                debug!(what, delay_ms = millis(delay), "waiting before read-back");
                sleep(delay).await;
                attempt().await
            }
            WaitPolicy::PollTimeout { timeout, interval } => {
                let deadline = Instant::now() + timeout;
                let mut attempts = 0u32;
                loop {
                    attempts = attempts.saturating_add(1);
                    match attempt().await {
                        Ok(value) => {
                            if attempts > 1 {
                                debug!(what, attempts, "read-back settled");
                            }
                            return Ok(value);
                        }
                        Err(err) if err.is_assertion() && Instant::now() + interval <= deadline => {
                            debug!(what, attempts, error = %err, "read-back not settled yet");
                            sleep(interval).await;
                        }
                        Err(err) => {
                            debug!(what, attempts, "giving up on read-back");
                            return Err(err);
                        }
                    }
                }
            }
        }
    }
}

impl Default for Waiter {
    fn default() -> Self {
        Self::new(WaitPolicy::default())
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
