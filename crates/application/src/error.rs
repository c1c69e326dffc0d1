//! Application error types
//!
//! Every failure is fatal to the running scenario. The three kinds a step
//! can produce are kept apart so callers can tell a contract break from an
//! unreachable service or a mis-ordered run.

use petstore_domain::{AssertionResult, DomainError, ScenarioStep};
use thiserror::Error;

use crate::ports::HttpClientError;

/// A response differed from what the contract expects.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{request}: {message}")]
pub struct AssertionViolation {
    /// Name of the request whose response failed.
    pub request: String,
    /// Description of the failed check.
    pub assertion: String,
    /// What was expected.
    pub expected: String,
    /// What was observed, when available.
    pub actual: Option<String>,
    /// Full failure message.
    pub message: String,
}

impl AssertionViolation {
    /// Builds a violation from a failed assertion result.
    #[must_use]
    pub fn from_result(request: impl Into<String>, result: &AssertionResult) -> Self {
        let assertion = result.assertion.description();
        let message = result
            .error
            .clone()
            .unwrap_or_else(|| format!("{assertion} failed"));
        Self {
            request: request.into(),
            assertion,
            expected: result.assertion.expected_display(),
            actual: result.actual.clone(),
            message,
        }
    }

    /// Builds a violation for a check made outside an assertion suite.
    #[must_use]
    pub fn new(
        request: impl Into<String>,
        assertion: impl Into<String>,
        expected: impl Into<String>,
        actual: Option<String>,
    ) -> Self {
        let assertion = assertion.into();
        let expected = expected.into();
        let message = match &actual {
            Some(actual) => format!("{assertion}: expected {expected}, got {actual}"),
            None => format!("{assertion}: expected {expected}, got nothing"),
        };
        Self {
            request: request.into(),
            assertion,
            expected,
            actual,
            message,
        }
    }
}

/// Failure of a single step.
#[derive(Debug, Error)]
pub enum StepError {
    /// The response did not match the contract.
    #[error("assertion violated: {0}")]
    Assertion(#[from] AssertionViolation),

    /// The HTTP call itself failed.
    #[error("transport failure on {request}: {source}")]
    Transport {
        /// Name of the request that failed.
        request: String,
        /// Underlying client error.
        #[source]
        source: HttpClientError,
    },

    /// The step ran without the state an earlier step must provide.
    #[error("precondition violated: {0}")]
    Precondition(String),

    /// A request could not be built.
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),
}

impl StepError {
    /// Shorthand for a precondition violation.
    #[must_use]
    pub fn precondition(reason: impl Into<String>) -> Self {
        Self::Precondition(reason.into())
    }

    /// Returns true for contract mismatches, the only retryable kind.
    #[must_use]
    pub const fn is_assertion(&self) -> bool {
        matches!(self, Self::Assertion(_))
    }
}

/// Result type alias for step operations.
pub type StepResult<T> = Result<T, StepError>;

/// Scenario-level errors.
#[derive(Debug, Error)]
pub enum ScenarioError {
    /// Seed or configuration could not produce fixtures.
    #[error("scenario setup failed: {0}")]
    Setup(#[from] DomainError),

    /// A step failed; the scenario is halted.
    #[error("step {step} failed: {source}")]
    Step {
        /// The failing step.
        step: ScenarioStep,
        /// What went wrong.
        #[source]
        source: StepError,
    },
}

impl ScenarioError {
    /// The failing step, if the failure happened inside one.
    #[must_use]
    pub const fn step(&self) -> Option<ScenarioStep> {
        match self {
            Self::Setup(_) => None,
            Self::Step { step, .. } => Some(*step),
        }
    }

    /// The step-level cause, if any.
    #[must_use]
    pub const fn step_error(&self) -> Option<&StepError> {
        match self {
            Self::Setup(_) => None,
            Self::Step { source, .. } => Some(source),
        }
    }
}

/// Result type alias for scenario operations.
pub type ScenarioResult<T> = Result<T, ScenarioError>;

#[cfg(test)]
mod tests {
    use super::*;
    use petstore_domain::Assertion;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_violation_from_failed_result() {
        let result = AssertionResult::fail_with_value(
            Assertion::json_eq("phone", "+7(123)45-67-89"),
            "\"+7(987)65-43-21\"",
            "JSON path 'phone' value mismatch",
        );
        let violation = AssertionViolation::from_result("get user", &result);

        assert_eq!(violation.request, "get user");
        assert_eq!(violation.expected, "\"+7(123)45-67-89\"");
        assert_eq!(violation.actual.as_deref(), Some("\"+7(987)65-43-21\""));
        assert_eq!(
            violation.to_string(),
            "get user: JSON path 'phone' value mismatch"
        );
    }

    #[test]
    fn test_scenario_error_names_step() {
        let error = ScenarioError::Step {
            step: ScenarioStep::CreateOrder,
            source: StepError::precondition("petId is unknown"),
        };
        assert_eq!(error.step(), Some(ScenarioStep::CreateOrder));
        assert_eq!(
            error.to_string(),
            "step create_order failed: precondition violated: petId is unknown"
        );
        assert!(!error.step_error().is_some_and(StepError::is_assertion));
    }
}
