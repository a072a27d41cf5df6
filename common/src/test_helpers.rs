/// Shared Test Helpers for Cross-Crate Use
///
/// This module provides centralized test utilities that can be used by
/// the `processing` crate's unit and integration tests to avoid duplicating
/// request builders, fixtures and assertion helpers.

// =============================================================================
// TRANSACTION FIXTURES
// =============================================================================

pub mod fixtures {
    use serde_json::{Value, json};

    /// A card-present purchase at a known merchant in the afternoon.
    pub fn low_risk_transaction() -> Value {
        json!({
            "amount": 50.0,
            "merchant": "Corner Grocery",
            "category": "grocery",
            "distance_from_home": 5.0,
            "distance_from_last_transaction": 2.0,
            "repeat_retailer": true,
            "used_chip": true,
            "used_pin_number": true,
            "online_order": false,
            "hour": 14,
            "age": 35,
            "international": false,
            "velocity_24h": 1
        })
    }

    /// Every risk signal saturated: online, foreign, night time, no chip or PIN.
    pub fn high_risk_transaction() -> Value {
        json!({
            "amount": 2000.0,
            "merchant": "Unknown Electronics Ltd",
            "category": "electronics",
            "distance_from_home": 1500.0,
            "distance_from_last_transaction": 800.0,
            "repeat_retailer": false,
            "used_chip": false,
            "used_pin_number": false,
            "online_order": true,
            "hour": 2,
            "age": 40,
            "international": true,
            "velocity_24h": 25
        })
    }

    /// Returns `base` with `field` replaced by `value`.
    pub fn with_field(mut base: Value, field: &str, value: Value) -> Value {
        if let Some(object) = base.as_object_mut() {
            object.insert(field.to_string(), value);
        }
        base
    }

    /// Returns `base` with `field` removed.
    pub fn without_field(mut base: Value, field: &str) -> Value {
        if let Some(object) = base.as_object_mut() {
            object.remove(field);
        }
        base
    }
}

// =============================================================================
// UNIFIED TEST ERROR HANDLING
// =============================================================================

/// Unified error type for all test failures
///
/// This provides a consistent error interface across all test suites,
/// making debugging easier and error handling more predictable.
#[derive(Debug, thiserror::Error)]
pub enum TestError {
    #[error("Assertion failed: {message}")]
    AssertionFailure { message: String },

    #[error("Serialization error: {source}")]
    SerializationError {
        #[from]
        source: serde_json::Error,
    },

    #[error("HTTP error: {source}")]
    HttpError {
        #[from]
        source: http::Error,
    },

    #[error("Generic test error: {message}")]
    Generic { message: String },
}

impl TestError {
    /// Create an assertion failure error
    pub fn assertion_failure(message: impl Into<String>) -> Self {
        Self::AssertionFailure { message: message.into() }
    }

    /// Create a generic error
    pub fn generic(message: impl Into<String>) -> Self {
        Self::Generic { message: message.into() }
    }
}

/// Alias for the standard test result type
pub type TestResult<T = ()> = Result<T, TestError>;

/// Helper macro for test assertions that return TestError instead of panicking
#[macro_export]
macro_rules! test_assert {
    ($condition:expr) => {
        if !($condition) {
            return Err($crate::test_helpers::TestError::assertion_failure(
                format!("assertion failed: {}", stringify!($condition))
            ));
        }
    };
    ($condition:expr, $message:expr $(, $arg:expr)*) => {
        if !($condition) {
            return Err($crate::test_helpers::TestError::assertion_failure(
                format!($message $(, $arg)*)
            ));
        }
    };
}

/// Helper macro for test assertions with equality
#[macro_export]
macro_rules! test_assert_eq {
    ($left:expr, $right:expr) => {
        match (&$left, &$right) {
            (left_val, right_val) => {
                if !(*left_val == *right_val) {
                    return Err($crate::test_helpers::TestError::assertion_failure(
                        format!("assertion failed: `(left == right)`\n  left: `{:?}`,\n right: `{:?}`",
                                left_val, right_val)
                    ));
                }
            }
        }
    };
    ($left:expr, $right:expr, $message:expr $(, $arg:expr)*) => {
        match (&$left, &$right) {
            (left_val, right_val) => {
                if !(*left_val == *right_val) {
                    return Err($crate::test_helpers::TestError::assertion_failure(
                        format!($message $(, $arg)*)
                    ));
                }
            }
        }
    };
}

/// Utility functions for common test operations
pub mod test_utils {
    use super::*;

    /// Safe HTTP request builder that returns TestError
    pub fn build_request(method: &str, uri: &str, body: Option<String>) -> TestResult<http::Request<String>> {
        let mut builder = http::Request::builder()
            .uri(uri)
            .method(method);

        if body.is_some() {
            builder = builder.header("Content-Type", "application/json");
        }

        let request = builder
            .body(body.unwrap_or_default())
            .map_err(TestError::from)?;

        Ok(request)
    }

    /// Builds a JSON POST request from a `serde_json::Value`
    pub fn build_json_request(uri: &str, body: &serde_json::Value) -> TestResult<http::Request<String>> {
        build_request("POST", uri, Some(serialize_json(body)?))
    }

    /// Safe JSON serialization that returns TestError
    pub fn serialize_json<T: serde::Serialize>(value: &T) -> TestResult<String> {
        serde_json::to_string(value).map_err(TestError::from)
    }

    /// Safe response status check
    pub fn check_status_code(actual: http::StatusCode, expected: http::StatusCode) -> TestResult<()> {
        if actual != expected {
            return Err(TestError::assertion_failure(
                format!("Status code mismatch: expected {}, got {}", expected, actual)
            ));
        }
        Ok(())
    }

    /// Float comparison with an absolute tolerance
    pub fn check_close(actual: f64, expected: f64, tolerance: f64) -> TestResult<()> {
        if (actual - expected).abs() > tolerance {
            return Err(TestError::assertion_failure(
                format!("Value {} is not within {} of {}", actual, tolerance, expected)
            ));
        }
        Ok(())
    }
}
