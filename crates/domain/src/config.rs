//! Harness configuration.
//!
//! Built once at setup and threaded to every component; there is no
//! process-wide state.

use std::time::Duration;

use crate::endpoints::ApiEndpoints;
use crate::seed::SeedConfig;

/// Default service location.
pub const DEFAULT_BASE_URL: &str = "https://petstore.swagger.io";
/// Default API version prefix.
pub const DEFAULT_BASE_PATH: &str = "/v2";
/// Default per-request timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
/// Default fixed delay for [`WaitPolicy::MinimumDelay`].
pub const DEFAULT_MINIMUM_DELAY: Duration = Duration::from_secs(1);
/// Default deadline for [`WaitPolicy::PollTimeout`].
pub const DEFAULT_POLL_TIMEOUT: Duration = Duration::from_secs(10);
/// Default retry interval for [`WaitPolicy::PollTimeout`].
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// How reads that follow a write tolerate propagation delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitPolicy {
    /// Sleep at least this long, then read and assert once.
    MinimumDelay(Duration),
    /// Read and assert repeatedly until it passes or the deadline expires.
    PollTimeout {
        /// Overall deadline measured from the first attempt.
        timeout: Duration,
        /// Pause between attempts.
        interval: Duration,
    },
}

impl WaitPolicy {
    /// Fixed delay of `delay`.
    #[must_use]
    pub const fn minimum_delay(delay: Duration) -> Self {
        Self::MinimumDelay(delay)
    }

    /// Polling with the given deadline and interval.
    #[must_use]
    pub const fn poll(timeout: Duration, interval: Duration) -> Self {
        Self::PollTimeout { timeout, interval }
    }

    /// Short name used in logs and config.
    #[must_use]
    pub const fn mode(&self) -> &'static str {
        match self {
            Self::MinimumDelay(_) => "delay",
            Self::PollTimeout { .. } => "poll",
        }
    }
}

impl Default for WaitPolicy {
    fn default() -> Self {
        Self::poll(DEFAULT_POLL_TIMEOUT, DEFAULT_POLL_INTERVAL)
    }
}

/// Complete harness configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarnessConfig {
    /// Scheme and host, e.g. `https://petstore.swagger.io`.
    pub base_url: String,
    /// API prefix, e.g. `/v2`.
    pub base_path: String,
    /// Timeout applied to each HTTP call by the client adapter.
    pub request_timeout: Duration,
    /// Eventual-consistency tolerance.
    pub wait_policy: WaitPolicy,
    /// Seed values.
    pub seed: SeedConfig,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            base_path: DEFAULT_BASE_PATH.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            wait_policy: WaitPolicy::default(),
            seed: SeedConfig::default(),
        }
    }
}

impl HarnessConfig {
    /// Resource URLs rooted at `base_url` + `base_path`.
    #[must_use]
    pub fn endpoints(&self) -> ApiEndpoints {
        ApiEndpoints::new(&self.base_url, &self.base_path)
    }

    /// Replaces the wait policy.
    #[must_use]
    pub fn with_wait_policy(mut self, policy: WaitPolicy) -> Self {
        self.wait_policy = policy;
        self
    }
}
