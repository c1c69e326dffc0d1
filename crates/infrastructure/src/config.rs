//! Environment-backed harness configuration.
//!
//! Every variable is optional; unset values fall back to the defaults in
//! `petstore_domain::config`. A set but empty or malformed value is an error
//! naming the variable, never a silent fallback.

use std::time::Duration;

use petstore_domain::config::{
    DEFAULT_BASE_PATH, DEFAULT_BASE_URL, DEFAULT_MINIMUM_DELAY, DEFAULT_POLL_INTERVAL,
    DEFAULT_POLL_TIMEOUT, DEFAULT_REQUEST_TIMEOUT,
};
use petstore_domain::{HarnessConfig, SeedConfig, WaitPolicy};
use thiserror::Error;

/// Environment variables read by [`EnvConfigLoader`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvKey {
    /// Scheme and host of the service.
    BaseUrl,
    /// API version prefix.
    BasePath,
    /// Per-request timeout in milliseconds.
    RequestTimeoutMs,
    /// `poll` or `delay`.
    WaitMode,
    /// Poll deadline or fixed delay in milliseconds, depending on the mode.
    WaitMs,
    /// Pause between poll attempts in milliseconds.
    PollIntervalMs,
}

impl EnvKey {
    /// Returns the canonical environment variable name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BaseUrl => "PETSTORE_BASE_URL",
            Self::BasePath => "PETSTORE_BASE_PATH",
            Self::RequestTimeoutMs => "PETSTORE_REQUEST_TIMEOUT_MS",
            Self::WaitMode => "PETSTORE_WAIT_MODE",
            Self::WaitMs => "PETSTORE_WAIT_MS",
            Self::PollIntervalMs => "PETSTORE_POLL_INTERVAL_MS",
        }
    }
}

/// Configuration loading errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Value is not valid UTF-8.
    #[error("{name} must be valid UTF-8")]
    NotUnicode {
        /// Variable name.
        name: &'static str,
    },

    /// Value is set but blank.
    #[error("{name} must not be empty")]
    Empty {
        /// Variable name.
        name: &'static str,
    },

    /// Value is not a positive integer.
    #[error("{name} must be a positive integer number of milliseconds (got '{value}')")]
    NotPositive {
        /// Variable name.
        name: &'static str,
        /// Raw value.
        value: String,
    },

    /// Unknown wait mode.
    #[error("{name} must be 'poll' or 'delay' (got '{value}')")]
    UnknownWaitMode {
        /// Variable name.
        name: &'static str,
        /// Raw value.
        value: String,
    },

    /// Base URL does not parse or is not HTTP(S).
    #[error("{name} is not a usable http(s) URL: {reason}")]
    InvalidUrl {
        /// Variable name.
        name: &'static str,
        /// Parser message.
        reason: String,
    },

    /// Poll interval longer than the poll deadline.
    #[error("poll interval {interval_ms} ms exceeds poll timeout {timeout_ms} ms")]
    IntervalExceedsTimeout {
        /// Configured interval.
        interval_ms: u64,
        /// Configured deadline.
        timeout_ms: u64,
    },
}

type Lookup = fn(&'static str) -> Result<Option<String>, ConfigError>;

/// Builds a [`HarnessConfig`] from environment variables.
#[derive(Debug, Clone, Copy)]
pub struct EnvConfigLoader<F = Lookup> {
    lookup: F,
}

impl EnvConfigLoader {
    /// Reads the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            lookup: read_env_strict,
        }
    }
}

impl<F> EnvConfigLoader<F>
where
    F: Fn(&'static str) -> Result<Option<String>, ConfigError>,
{
    /// Reads variables through `lookup` instead of the process environment.
    pub const fn with_lookup(lookup: F) -> Self {
        Self { lookup }
    }

    /// Loads the configuration; the seed is always the default seed.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` naming the first variable that is set but
    /// unusable.
    pub fn load(&self) -> Result<HarnessConfig, ConfigError> {
        let base_url = self
            .nonempty(EnvKey::BaseUrl)?
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        validate_base_url(&base_url)?;

        let base_path = self
            .nonempty(EnvKey::BasePath)?
            .unwrap_or_else(|| DEFAULT_BASE_PATH.to_string());
        let request_timeout = self
            .millis(EnvKey::RequestTimeoutMs)?
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT);
        let wait_policy = self.wait_policy()?;

        Ok(HarnessConfig {
            base_url,
            base_path,
            request_timeout,
            wait_policy,
            seed: SeedConfig::default(),
        })
    }

    fn wait_policy(&self) -> Result<WaitPolicy, ConfigError> {
        let wait = self.millis(EnvKey::WaitMs)?;
        match self.nonempty(EnvKey::WaitMode)? {
            None => self.poll_policy(wait),
            Some(mode) if mode.trim().eq_ignore_ascii_case("poll") => self.poll_policy(wait),
            Some(mode) if mode.trim().eq_ignore_ascii_case("delay") => Ok(
                WaitPolicy::minimum_delay(wait.unwrap_or(DEFAULT_MINIMUM_DELAY)),
            ),
            Some(value) => Err(ConfigError::UnknownWaitMode {
                name: EnvKey::WaitMode.as_str(),
                value,
            }),
        }
    }

    fn poll_policy(&self, timeout: Option<Duration>) -> Result<WaitPolicy, ConfigError> {
        let timeout = timeout.unwrap_or(DEFAULT_POLL_TIMEOUT);
        let interval = self
            .millis(EnvKey::PollIntervalMs)?
            .unwrap_or(DEFAULT_POLL_INTERVAL);
        if interval > timeout {
            return Err(ConfigError::IntervalExceedsTimeout {
                interval_ms: as_millis(interval),
                timeout_ms: as_millis(timeout),
            });
        }
        Ok(WaitPolicy::poll(timeout, interval))
    }

    /// Reads a variable and rejects blank values.
    fn nonempty(&self, key: EnvKey) -> Result<Option<String>, ConfigError> {
        let name = key.as_str();
        match (self.lookup)(name)? {
            Some(value) if value.trim().is_empty() => Err(ConfigError::Empty { name }),
            other => Ok(other),
        }
    }

    /// Reads a positive millisecond count.
    fn millis(&self, key: EnvKey) -> Result<Option<Duration>, ConfigError> {
        self.nonempty(key)?
            .map(|raw| parse_positive_millis(key.as_str(), &raw))
            .transpose()
    }
}

/// Reads an environment variable and enforces UTF-8 validity.
///
/// # Errors
///
/// Returns an error when the variable contains invalid UTF-8.
pub fn read_env_strict(name: &'static str) -> Result<Option<String>, ConfigError> {
    std::env::var_os(name).map_or(Ok(None), |raw| {
        raw.into_string()
            .map(Some)
            .map_err(|_| ConfigError::NotUnicode { name })
    })
}

fn parse_positive_millis(name: &'static str, raw: &str) -> Result<Duration, ConfigError> {
    let not_positive = || ConfigError::NotPositive {
        name,
        value: raw.to_string(),
    };
    let millis: u64 = raw.trim().parse().map_err(|_| not_positive())?;
    if millis == 0 {
        return Err(not_positive());
    }
    Ok(Duration::from_millis(millis))
}

fn validate_base_url(raw: &str) -> Result<(), ConfigError> {
    let name = EnvKey::BaseUrl.as_str();
    let url = reqwest::Url::parse(raw).map_err(|e| ConfigError::InvalidUrl {
        name,
        reason: e.to_string(),
    })?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ConfigError::InvalidUrl {
            name,
            reason: format!("unsupported scheme '{other}'"),
        }),
    }
}

fn as_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn loader(
        vars: &[(&'static str, &str)],
    ) -> EnvConfigLoader<impl Fn(&'static str) -> Result<Option<String>, ConfigError>> {
        let vars: HashMap<&'static str, String> =
            vars.iter().map(|(k, v)| (*k, (*v).to_string())).collect();
        EnvConfigLoader::with_lookup(move |name| Ok(vars.get(name).cloned()))
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = loader(&[]).load().unwrap();
        assert_eq!(config, HarnessConfig::default());
        assert_eq!(config.wait_policy.mode(), "poll");
    }

    #[test]
    fn test_overrides() {
        let config = loader(&[
            ("PETSTORE_BASE_URL", "http://localhost:8080"),
            ("PETSTORE_BASE_PATH", "/api/v3"),
            ("PETSTORE_REQUEST_TIMEOUT_MS", "2500"),
            ("PETSTORE_WAIT_MS", "4000"),
            ("PETSTORE_POLL_INTERVAL_MS", "250"),
        ])
        .load()
        .unwrap();

        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(
            config.endpoints().login(),
            "http://localhost:8080/api/v3/user/login"
        );
        assert_eq!(config.request_timeout, Duration::from_millis(2500));
        assert_eq!(
            config.wait_policy,
            WaitPolicy::poll(Duration::from_secs(4), Duration::from_millis(250))
        );
    }

    #[test]
    fn test_delay_mode() {
        let config = loader(&[("PETSTORE_WAIT_MODE", "Delay")]).load().unwrap();
        assert_eq!(
            config.wait_policy,
            WaitPolicy::minimum_delay(Duration::from_secs(1))
        );

        let config = loader(&[("PETSTORE_WAIT_MODE", "delay"), ("PETSTORE_WAIT_MS", "1500")])
            .load()
            .unwrap();
        assert_eq!(
            config.wait_policy,
            WaitPolicy::minimum_delay(Duration::from_millis(1500))
        );
    }

    #[test]
    fn test_errors_name_the_variable() {
        let error = loader(&[("PETSTORE_REQUEST_TIMEOUT_MS", "0")]).load().unwrap_err();
        assert_eq!(
            error.to_string(),
            "PETSTORE_REQUEST_TIMEOUT_MS must be a positive integer number of milliseconds (got '0')"
        );

        let error = loader(&[("PETSTORE_WAIT_MS", "soon")]).load().unwrap_err();
        assert!(matches!(
            error,
            ConfigError::NotPositive {
                name: "PETSTORE_WAIT_MS",
                ..
            }
        ));

        let error = loader(&[("PETSTORE_BASE_PATH", "  ")]).load().unwrap_err();
        assert_eq!(
            error,
            ConfigError::Empty {
                name: "PETSTORE_BASE_PATH"
            }
        );

        let error = loader(&[("PETSTORE_WAIT_MODE", "forever")]).load().unwrap_err();
        assert!(matches!(error, ConfigError::UnknownWaitMode { .. }));
    }

    #[test]
    fn test_base_url_must_be_http() {
        let error = loader(&[("PETSTORE_BASE_URL", "ftp://petstore.swagger.io")])
            .load()
            .unwrap_err();
        assert!(matches!(error, ConfigError::InvalidUrl { .. }));

        let error = loader(&[("PETSTORE_BASE_URL", "petstore")]).load().unwrap_err();
        assert!(matches!(error, ConfigError::InvalidUrl { .. }));
    }

    #[test]
    fn test_interval_longer_than_timeout_is_rejected() {
        let error = loader(&[
            ("PETSTORE_WAIT_MS", "500"),
            ("PETSTORE_POLL_INTERVAL_MS", "1000"),
        ])
        .load()
        .unwrap_err();
        assert_eq!(
            error,
            ConfigError::IntervalExceedsTimeout {
                interval_ms: 1000,
                timeout_ms: 500,
            }
        );
    }
}
