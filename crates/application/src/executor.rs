//! Step executor.
//!
//! Sends one request, checks the response against an expectation suite and
//! hands back a parsed body for field extraction.

use std::sync::Arc;

use petstore_domain::envelope::{ACK_TYPE, ERROR_TYPE};
use petstore_domain::request::RequestSpec;
use petstore_domain::response::{JsonView, ResponseSpec};
use petstore_domain::{
    AckEnvelope, Assertion, ComparisonOperator, ErrorEnvelope, Session, TestSuite,
};
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{AssertionViolation, StepError, StepResult};
use crate::ports::HttpClient;
use crate::runner::TestRunner;

/// Performs single HTTP calls and validates them.
#[derive(Debug)]
pub struct StepExecutor<C: ?Sized> {
    client: Arc<C>,
    runner: TestRunner,
}

impl<C: ?Sized> Clone for StepExecutor<C> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
            runner: self.runner,
        }
    }
}

impl<C: HttpClient + ?Sized> StepExecutor<C> {
    /// Creates an executor over `client`.
    #[must_use]
    pub fn new(client: Arc<C>) -> Self {
        Self {
            client,
            runner: TestRunner::new(),
        }
    }

    /// Executes `request` and checks the response against `expectation`.
    ///
    /// # Errors
    ///
    /// `StepError::Transport` if the call fails, `StepError::Assertion` on
    /// the first expectation the response misses.
    pub async fn execute(
        &self,
        request: &RequestSpec,
        expectation: &TestSuite,
    ) -> StepResult<ParsedResponse> {
        debug!(
            request = %request.name,
            method = %request.method,
            url = %request.url,
            "sending request"
        );

        let response = self
            .client
            .execute(request)
            .await
            .map_err(|source| StepError::Transport {
                request: request.name.clone(),
                source,
            })?;

        debug!(
            request = %request.name,
            status = response.status,
            elapsed_ms = u64::try_from(response.duration.as_millis()).unwrap_or(u64::MAX),
            "response received"
        );

        let results = self.runner.run(expectation, &response);
        if let Some(failure) = results.first_failure() {
            let violation = AssertionViolation::from_result(&request.name, failure);
            warn!(
                request = %request.name,
                assertion = %violation.assertion,
                actual = violation.actual.as_deref().unwrap_or("-"),
                "expectation not met"
            );
            return Err(violation.into());
        }

        ParsedResponse::new(request.name.clone(), response, self.runner)
    }

    /// Executes an authenticated call on behalf of `session`.
    ///
    /// # Errors
    ///
    /// Same as [`StepExecutor::execute`].
    pub async fn execute_as(
        &self,
        session: &Session,
        request: &RequestSpec,
        expectation: &TestSuite,
    ) -> StepResult<ParsedResponse> {
        debug!(
            request = %request.name,
            user = %session.username,
            token = ?session.token,
            "authenticated call"
        );
        self.execute(request, expectation).await
    }
}

/// A validated response with its body parsed as JSON.
///
/// The `expect_*` helpers return `&Self` so checks chain with `?`.
#[derive(Debug, Clone)]
pub struct ParsedResponse {
    request: String,
    response: ResponseSpec,
    json: JsonView,
    runner: TestRunner,
}

impl ParsedResponse {
    fn new(request: String, response: ResponseSpec, runner: TestRunner) -> StepResult<Self> {
        match JsonView::parse(&response.body) {
            Ok(json) => Ok(Self {
                request,
                response,
                json,
                runner,
            }),
            Err(e) => Err(AssertionViolation::new(
                request,
                "Body is valid JSON",
                "valid JSON",
                Some(format!("{e}: {}", response.body_preview(100))),
            )
            .into()),
        }
    }

    /// Name of the request that produced this response.
    #[must_use]
    pub fn request(&self) -> &str {
        &self.request
    }

    /// The raw response.
    #[must_use]
    pub const fn response(&self) -> &ResponseSpec {
        &self.response
    }

    /// The parsed body.
    #[must_use]
    pub const fn json(&self) -> &JsonView {
        &self.json
    }

    /// Checks a single assertion against this response.
    ///
    /// # Errors
    ///
    /// `StepError::Assertion` if it fails.
    pub fn expect(&self, assertion: &Assertion) -> StepResult<&Self> {
        let result = self.runner.run_parsed(assertion, &self.response, &self.json);
        if result.passed {
            Ok(self)
        } else {
            Err(AssertionViolation::from_result(&self.request, &result).into())
        }
    }

    /// String field at `path` must equal `expected`.
    ///
    /// # Errors
    ///
    /// `StepError::Assertion` on mismatch or absence.
    pub fn expect_str(&self, path: &str, expected: &str) -> StepResult<&Self> {
        self.expect(&Assertion::json_eq(path, expected))
    }

    /// Integer field at `path` must equal `expected`.
    ///
    /// # Errors
    ///
    /// `StepError::Assertion` on mismatch or absence.
    pub fn expect_i64(&self, path: &str, expected: i64) -> StepResult<&Self> {
        self.expect(&Assertion::json_eq(path, expected))
    }

    /// Boolean field at `path` must equal `expected`.
    ///
    /// # Errors
    ///
    /// `StepError::Assertion` on mismatch or absence.
    pub fn expect_bool(&self, path: &str, expected: bool) -> StepResult<&Self> {
        self.expect(&Assertion::json_eq(path, expected))
    }

    /// String field at `path` must contain `needle`.
    ///
    /// # Errors
    ///
    /// `StepError::Assertion` otherwise.
    pub fn expect_contains(&self, path: &str, needle: &str) -> StepResult<&Self> {
        self.expect(&Assertion::json_matches(
            path,
            ComparisonOperator::Contains,
            needle,
        ))
    }

    /// String field at `path` must start with `prefix`.
    ///
    /// # Errors
    ///
    /// `StepError::Assertion` otherwise.
    pub fn expect_prefix(&self, path: &str, prefix: &str) -> StepResult<&Self> {
        self.expect(&Assertion::json_matches(
            path,
            ComparisonOperator::StartsWith,
            prefix,
        ))
    }

    /// Body must be a success acknowledgement, optionally with `message`.
    ///
    /// # Errors
    ///
    /// `StepError::Assertion` if `type` or `message` differ.
    pub fn expect_ack(&self, message: Option<&str>) -> StepResult<AckEnvelope> {
        self.expect_str("type", ACK_TYPE)?;
        if let Some(message) = message {
            self.expect_str("message", message)?;
        }
        Ok(AckEnvelope {
            kind: ACK_TYPE.to_string(),
            message: self.str_at("message")?.to_string(),
        })
    }

    /// Body must be an error envelope, optionally with `code` and `message`.
    ///
    /// # Errors
    ///
    /// `StepError::Assertion` if any checked field differs.
    pub fn expect_error(
        &self,
        code: Option<i64>,
        message: Option<&str>,
    ) -> StepResult<ErrorEnvelope> {
        self.expect_str("type", ERROR_TYPE)?;
        if let Some(code) = code {
            self.expect_i64("code", code)?;
        }
        if let Some(message) = message {
            self.expect_str("message", message)?;
        }
        Ok(ErrorEnvelope {
            code: self.i64_at("code")?,
            kind: ERROR_TYPE.to_string(),
            message: self.str_at("message")?.to_string(),
        })
    }

    /// Field at `path`; missing fields are a violation.
    ///
    /// # Errors
    ///
    /// `StepError::Assertion` if absent, `StepError::Domain` for a bad path.
    pub fn field(&self, path: &str) -> StepResult<&Value> {
        self.json.get(path)?.ok_or_else(|| {
            AssertionViolation::new(&self.request, format!("JSON {path} exists"), "present", None)
                .into()
        })
    }

    /// Integer field at `path`.
    ///
    /// # Errors
    ///
    /// `StepError::Assertion` if absent or not an integer.
    pub fn i64_at(&self, path: &str) -> StepResult<i64> {
        let value = self.field(path)?;
        value.as_i64().ok_or_else(|| {
            AssertionViolation::new(
                &self.request,
                format!("JSON {path} is an integer"),
                "integer",
                Some(value.to_string()),
            )
            .into()
        })
    }

    /// String field at `path`.
    ///
    /// # Errors
    ///
    /// `StepError::Assertion` if absent or not a string.
    pub fn str_at(&self, path: &str) -> StepResult<&str> {
        let value = self.field(path)?;
        value.as_str().ok_or_else(|| {
            AssertionViolation::new(
                &self.request,
                format!("JSON {path} is a string"),
                "string",
                Some(value.to_string()),
            )
            .into()
        })
    }

    /// Integer id at `path` that must be non-zero.
    ///
    /// # Errors
    ///
    /// `StepError::Assertion` if absent, not an integer, or zero.
    pub fn id_at(&self, path: &str) -> StepResult<i64> {
        let id = self.i64_at(path)?;
        self.expect(&Assertion::json_matches(
            path,
            ComparisonOperator::NotEquals,
            0,
        ))?;
        Ok(id)
    }
}
