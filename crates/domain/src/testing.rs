//! Declarative response expectations.
//!
//! Each lifecycle call is checked against an [`Assertion`] list. The
//! domain only describes the checks; `TestRunner` in the application
//! crate evaluates them.

use serde_json::Value;

/// One check a response must satisfy.
#[derive(Debug, Clone, PartialEq)]
pub enum Assertion {
    /// Status equals.
    StatusCode {
        /// Required status.
        expected: u16,
    },
    /// `Content-Type` names a JSON media type, compared case-insensitively.
    JsonContentType,
    /// Body parses as JSON.
    IsJson,
    /// Field is present and equal to `expected`.
    JsonPath {
        /// Dotted path such as `category.id` or `tags[0].name`.
        path: String,
        /// Required value.
        expected: Value,
    },
    /// Field compares with `value` under `operator`.
    JsonPathMatches {
        /// Dotted path.
        path: String,
        /// How to compare.
        operator: ComparisonOperator,
        /// Right-hand side.
        value: Value,
    },
}

impl Assertion {
    /// Exact status.
    #[must_use]
    pub const fn status(code: u16) -> Self {
        Self::StatusCode { expected: code }
    }

    /// Field at `path` equals `expected`.
    #[must_use]
    pub fn json_eq(path: impl Into<String>, expected: impl Into<Value>) -> Self {
        Self::JsonPath {
            path: path.into(),
            expected: expected.into(),
        }
    }

    /// Field at `path` compares with `value`.
    #[must_use]
    pub fn json_matches(
        path: impl Into<String>,
        operator: ComparisonOperator,
        value: impl Into<Value>,
    ) -> Self {
        Self::JsonPathMatches {
            path: path.into(),
            operator,
            value: value.into(),
        }
    }

    /// One-line rendering used in failure messages.
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::StatusCode { expected } => format!("status = {expected}"),
            Self::JsonContentType => "content type is JSON".to_string(),
            Self::IsJson => "body is JSON".to_string(),
            Self::JsonPath { path, expected } => format!("{path} == {expected}"),
            Self::JsonPathMatches {
                path,
                operator,
                value,
            } => format!("{path} {} {value}", operator.symbol()),
        }
    }

    /// The expected side alone.
    #[must_use]
    pub fn expected_display(&self) -> String {
        match self {
            Self::StatusCode { expected } => expected.to_string(),
            Self::JsonContentType => "application/json".to_string(),
            Self::IsJson => "valid JSON".to_string(),
            Self::JsonPath { expected, .. } => expected.to_string(),
            Self::JsonPathMatches {
                operator, value, ..
            } => format!("{} {value}", operator.symbol()),
        }
    }
}

/// Comparisons the lifecycle needs beyond equality of whole values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOperator {
    /// Different JSON value; rejects zero ids.
    NotEquals,
    /// Substring of a string, or element of an array.
    Contains,
    /// String prefix; `shipDate` is compared this way.
    StartsWith,
}

impl ComparisonOperator {
    /// Operator as written in failure messages.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::NotEquals => "!=",
            Self::Contains => "contains",
            Self::StartsWith => "starts with",
        }
    }
}

/// Outcome of one [`Assertion`].
#[derive(Debug, Clone, PartialEq)]
pub struct AssertionResult {
    /// What was checked.
    pub assertion: Assertion,
    /// Whether it held.
    pub passed: bool,
    /// Observed value, when there was one.
    pub actual: Option<String>,
    /// Failure reason.
    pub error: Option<String>,
}

impl AssertionResult {
    /// Passed without a recorded value.
    #[must_use]
    pub const fn pass(assertion: Assertion) -> Self {
        Self {
            assertion,
            passed: true,
            actual: None,
            error: None,
        }
    }

    /// Passed with the observed value.
    #[must_use]
    pub fn pass_with_value(assertion: Assertion, actual: impl Into<String>) -> Self {
        Self {
            actual: Some(actual.into()),
            ..Self::pass(assertion)
        }
    }

    /// Failed without a recorded value.
    #[must_use]
    pub fn fail(assertion: Assertion, error: impl Into<String>) -> Self {
        Self {
            assertion,
            passed: false,
            actual: None,
            error: Some(error.into()),
        }
    }

    /// Failed with the observed value.
    #[must_use]
    pub fn fail_with_value(
        assertion: Assertion,
        actual: impl Into<String>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            actual: Some(actual.into()),
            ..Self::fail(assertion, error)
        }
    }
}

/// Named list of assertions applied to one response.
///
/// `ok()` and `not_found()` cover the envelope shape of every lifecycle
/// call; field checks are added per request.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TestSuite {
    /// Shown in failure messages.
    pub name: String,
    /// Checked in order.
    pub assertions: Vec<Assertion>,
    /// Stop at the first failure.
    pub stop_on_failure: bool,
}

impl TestSuite {
    /// Empty suite.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            assertions: Vec::new(),
            stop_on_failure: false,
        }
    }

    /// 200 with a JSON body.
    #[must_use]
    pub fn ok() -> Self {
        Self::json_status("ok response", 200)
    }

    /// 404 with a JSON body.
    #[must_use]
    pub fn not_found() -> Self {
        Self::json_status("not found response", 404)
    }

    fn json_status(name: &str, status: u16) -> Self {
        Self::new(name)
            .with_assertion(Assertion::status(status))
            .with_assertion(Assertion::JsonContentType)
            .with_assertion(Assertion::IsJson)
            .stopping_on_failure()
    }

    /// Appends a check.
    #[must_use]
    pub fn with_assertion(mut self, assertion: Assertion) -> Self {
        self.assertions.push(assertion);
        self
    }

    /// Stop at the first failure.
    #[must_use]
    pub const fn stopping_on_failure(mut self) -> Self {
        self.stop_on_failure = true;
        self
    }
}

/// Everything a suite run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct TestResults {
    /// Suite name.
    pub suite_name: String,
    /// Per-assertion outcomes, in evaluation order.
    pub results: Vec<AssertionResult>,
    /// Assertions evaluated.
    pub total: usize,
    /// Of which passed.
    pub passed: usize,
    /// Of which failed.
    pub failed: usize,
    /// Evaluation time.
    pub duration_ms: u64,
}

impl TestResults {
    /// Tallies `results`.
    #[must_use]
    pub fn new(
        suite_name: impl Into<String>,
        results: Vec<AssertionResult>,
        duration_ms: u64,
    ) -> Self {
        let total = results.len();
        let passed = results.iter().filter(|r| r.passed).count();
        Self {
            suite_name: suite_name.into(),
            results,
            total,
            passed,
            failed: total - passed,
            duration_ms,
        }
    }

    /// No failures.
    #[must_use]
    pub const fn all_passed(&self) -> bool {
        self.failed == 0
    }

    /// First failed assertion; the one a step reports.
    #[must_use]
    pub fn first_failure(&self) -> Option<&AssertionResult> {
        self.results.iter().find(|r| !r.passed)
    }
}
