//! Assertion evaluation.
//!
//! Turns the declarative checks of a `TestSuite` into pass/fail results
//! for one response. The body is parsed at most once per suite.

use std::time::Instant;

use petstore_domain::response::{JsonView, ResponseSpec};
use petstore_domain::testing::{
    Assertion, AssertionResult, ComparisonOperator, TestResults, TestSuite,
};
use serde_json::Value;

/// Evaluates assertions against a `ResponseSpec`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TestRunner;

impl TestRunner {
    /// Creates a runner.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Evaluates `suite` in order, stopping early if the suite asks to.
    #[must_use]
    pub fn run(&self, suite: &TestSuite, response: &ResponseSpec) -> TestResults {
        let start = Instant::now();
        let json = JsonView::parse(&response.body);
        let mut results = Vec::with_capacity(suite.assertions.len());

        for assertion in &suite.assertions {
            let result = Self::evaluate(assertion, response, json.as_ref());
            let failed = !result.passed;
            results.push(result);

            if failed && suite.stop_on_failure {
                break;
            }
        }

        let duration_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
        TestResults::new(&suite.name, results, duration_ms)
    }

    /// Evaluates one assertion against a body that is already parsed.
    #[must_use]
    pub fn run_parsed(
        &self,
        assertion: &Assertion,
        response: &ResponseSpec,
        json: &JsonView,
    ) -> AssertionResult {
        Self::evaluate(assertion, response, Ok(json))
    }

    fn evaluate(
        assertion: &Assertion,
        response: &ResponseSpec,
        json: Result<&JsonView, &serde_json::Error>,
    ) -> AssertionResult {
        match assertion {
            Assertion::StatusCode { expected } => {
                Self::check_status_code(assertion, response, *expected)
            }
            Assertion::JsonContentType => Self::check_content_type(assertion, response),
            Assertion::IsJson => match json {
                Ok(_) => AssertionResult::pass(assertion.clone()),
                Err(e) => AssertionResult::fail_with_value(
                    assertion.clone(),
                    response.body_preview(100),
                    format!("Body is not valid JSON: {e}"),
                ),
            },
            Assertion::JsonPath { path, expected } => match json {
                Ok(json) => Self::check_json_path(assertion, json, path, expected),
                Err(e) => Self::unparsable(assertion, e),
            },
            Assertion::JsonPathMatches {
                path,
                operator,
                value,
            } => match json {
                Ok(json) => Self::check_json_path_matches(assertion, json, path, *operator, value),
                Err(e) => Self::unparsable(assertion, e),
            },
        }
    }

    fn unparsable(assertion: &Assertion, error: &serde_json::Error) -> AssertionResult {
        AssertionResult::fail(
            assertion.clone(),
            format!("Failed to parse body as JSON: {error}"),
        )
    }

    fn check_status_code(
        assertion: &Assertion,
        response: &ResponseSpec,
        expected: u16,
    ) -> AssertionResult {
        let actual = response.status;
        if actual == expected {
            AssertionResult::pass_with_value(assertion.clone(), actual.to_string())
        } else {
            AssertionResult::fail_with_value(
                assertion.clone(),
                actual.to_string(),
                format!(
                    "Expected status {expected}, got {actual}: {}",
                    response.body_preview(100)
                ),
            )
        }
    }

    fn check_content_type(assertion: &Assertion, response: &ResponseSpec) -> AssertionResult {
        match &response.content_type {
            Some(actual) if response.is_json() => {
                AssertionResult::pass_with_value(assertion.clone(), actual.clone())
            }
            Some(actual) => AssertionResult::fail_with_value(
                assertion.clone(),
                actual.clone(),
                format!("Content-Type '{actual}' is not a JSON media type"),
            ),
            None => AssertionResult::fail(assertion.clone(), "No Content-Type header present"),
        }
    }

    fn check_json_path(
        assertion: &Assertion,
        json: &JsonView,
        path: &str,
        expected: &Value,
    ) -> AssertionResult {
        match json.get(path) {
            Ok(Some(value)) if value == expected => {
                AssertionResult::pass_with_value(assertion.clone(), value.to_string())
            }
            Ok(Some(value)) => AssertionResult::fail_with_value(
                assertion.clone(),
                value.to_string(),
                format!("JSON path '{path}' value mismatch: expected {expected}, got {value}"),
            ),
            Ok(None) => {
                AssertionResult::fail(assertion.clone(), format!("JSON path '{path}' not found"))
            }
            Err(e) => AssertionResult::fail(assertion.clone(), e.to_string()),
        }
    }

    fn check_json_path_matches(
        assertion: &Assertion,
        json: &JsonView,
        path: &str,
        operator: ComparisonOperator,
        expected: &Value,
    ) -> AssertionResult {
        match json.get(path) {
            Ok(Some(value)) => {
                if compare_json_values(value, operator, expected) {
                    AssertionResult::pass_with_value(assertion.clone(), value.to_string())
                } else {
                    AssertionResult::fail_with_value(
                        assertion.clone(),
                        value.to_string(),
                        format!(
                            "JSON path '{path}' comparison failed: {value} {} {expected}",
                            operator.symbol()
                        ),
                    )
                }
            }
            Ok(None) => {
                AssertionResult::fail(assertion.clone(), format!("JSON path '{path}' not found"))
            }
            Err(e) => AssertionResult::fail(assertion.clone(), e.to_string()),
        }
    }
}

/// Compare two JSON values using the given operator.
fn compare_json_values(actual: &Value, operator: ComparisonOperator, expected: &Value) -> bool {
    match operator {
        ComparisonOperator::NotEquals => actual != expected,
        ComparisonOperator::Contains => match (actual, expected) {
            (Value::String(s), Value::String(needle)) => s.contains(needle.as_str()),
            (Value::Array(arr), _) => arr.contains(expected),
            _ => false,
        },
        ComparisonOperator::StartsWith => match (actual, expected) {
            (Value::String(s), Value::String(prefix)) => s.starts_with(prefix.as_str()),
            _ => false,
        },
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use std::time::Duration;

    fn response_with(status: u16, body: &str, content_type: Option<&str>) -> ResponseSpec {
        let headers = content_type
            .map(|ct| HashMap::from([("Content-Type".to_string(), ct.to_string())]))
            .unwrap_or_default();
        ResponseSpec::new(
            status,
            headers,
            body.as_bytes().to_vec(),
            Duration::from_millis(50),
        )
    }

    fn json_response(status: u16, body: &str) -> ResponseSpec {
        response_with(status, body, Some("application/json"))
    }

    /// Outcome of a one-assertion suite.
    fn check(assertion: Assertion, response: &ResponseSpec) -> AssertionResult {
        let suite = TestSuite::new("check").with_assertion(assertion);
        let mut results = TestRunner::new().run(&suite, response).results;
        assert_eq!(results.len(), 1);
        results.remove(0)
    }

    const ACK: &str = r#"{"code": 200, "type": "unknown", "message": "ok"}"#;

    #[test]
    fn test_status_code() {
        let response = json_response(200, ACK);
        assert!(check(Assertion::status(200), &response).passed);

        let result = check(Assertion::status(404), &response);
        assert!(!result.passed);
        assert_eq!(result.actual.as_deref(), Some("200"));
    }

    #[test]
    fn test_json_content_type_ignores_case_and_parameters() {
        for content_type in [
            "application/json",
            "application/json; charset=utf-8",
            "Application/JSON; charset=UTF-8",
        ] {
            let response = response_with(200, ACK, Some(content_type));
            assert!(
                check(Assertion::JsonContentType, &response).passed,
                "{content_type}"
            );
        }

        let response = response_with(200, ACK, Some("text/html"));
        assert!(!check(Assertion::JsonContentType, &response).passed);

        let response = response_with(200, ACK, None);
        assert!(!check(Assertion::JsonContentType, &response).passed);
    }

    #[test]
    fn test_ok_suite_accepts_uppercase_media_type() {
        let response = response_with(200, ACK, Some("Application/JSON; charset=UTF-8"));
        let results = TestRunner::new().run(&TestSuite::ok(), &response);
        assert!(results.all_passed(), "{:?}", results.first_failure());
        assert_eq!(results.total, 3);
    }

    #[test]
    fn test_is_json() {
        let response = json_response(200, ACK);
        assert!(check(Assertion::IsJson, &response).passed);

        let response = json_response(502, "<html>Bad Gateway</html>");
        assert!(!check(Assertion::IsJson, &response).passed);
    }

    #[test]
    fn test_json_path() {
        let response = json_response(
            200,
            r#"{"category": {"id": 0, "name": "test_pet_category_name"}}"#,
        );

        assert!(check(Assertion::json_eq("category.id", 0), &response).passed);
        let name = Assertion::json_eq("$.category.name", "test_pet_category_name");
        assert!(check(name, &response).passed);

        let result = check(Assertion::json_eq("category.missing", 0), &response);
        assert!(!result.passed);
        assert_eq!(
            result.error.as_deref(),
            Some("JSON path 'category.missing' not found")
        );
    }

    #[test]
    fn test_json_path_with_array() {
        let response = json_response(
            200,
            r#"{"tags": [{"id": 0, "name": "test_pet_tag_name"}]}"#,
        );
        assert!(check(Assertion::json_eq("tags[0].name", "test_pet_tag_name"), &response).passed);
    }

    #[test]
    fn test_json_path_value_mismatch_reports_actual() {
        let response = json_response(200, r#"{"phone": "+7(987)65-43-21"}"#);

        let result = check(Assertion::json_eq("phone", "+7(123)45-67-89"), &response);
        assert!(!result.passed);
        assert_eq!(result.actual.as_deref(), Some("\"+7(987)65-43-21\""));
    }

    #[test]
    fn test_json_path_matches() {
        let response = json_response(
            200,
            r#"{"id": 10, "shipDate": "2022-06-11T08:01:50.696+0000", "message": "logged in user session:123"}"#,
        );

        let non_zero = Assertion::json_matches("id", ComparisonOperator::NotEquals, 0);
        assert!(check(non_zero, &response).passed);

        let prefix = Assertion::json_matches(
            "shipDate",
            ComparisonOperator::StartsWith,
            "2022-06-11T08:01:50.696",
        );
        assert!(check(prefix, &response).passed);

        let contains = Assertion::json_matches(
            "message",
            ComparisonOperator::Contains,
            "logged in user session",
        );
        assert!(check(contains, &response).passed);

        let zero = json_response(200, r#"{"id": 0}"#);
        let result = check(
            Assertion::json_matches("id", ComparisonOperator::NotEquals, 0),
            &zero,
        );
        assert!(!result.passed);
    }

    #[test]
    fn test_run_parsed_skips_reparse() {
        let response = json_response(200, ACK);
        let json = JsonView::parse(&response.body).unwrap();

        let assertion = Assertion::json_eq("message", "ok");
        let result = TestRunner::new().run_parsed(&assertion, &response, &json);
        assert!(result.passed);
    }

    #[test]
    fn test_run_suite() {
        let response = json_response(200, ACK);
        let suite = TestSuite::ok()
            .with_assertion(Assertion::json_eq("type", "unknown"))
            .with_assertion(Assertion::json_eq("message", "ok"));

        let results = TestRunner::new().run(&suite, &response);
        assert!(results.all_passed());
        assert_eq!(results.total, 5);
        assert_eq!(results.passed, 5);
    }

    #[test]
    fn test_suite_stops_at_first_failure() {
        let response = json_response(200, r#"{"type": "unknown"}"#);

        let results = TestRunner::new().run(&TestSuite::not_found(), &response);
        assert_eq!(results.results.len(), 1);
        assert_eq!(
            results.first_failure().map(|r| &r.assertion),
            Some(&Assertion::status(404))
        );
    }

    #[test]
    fn test_suite_without_stop_flag_evaluates_everything() {
        let response = response_with(404, "Pet not found", None);
        let suite = TestSuite::new("get pet")
            .with_assertion(Assertion::status(200))
            .with_assertion(Assertion::IsJson);

        let results = TestRunner::new().run(&suite, &response);
        assert_eq!((results.total, results.failed), (2, 2));
    }
}
