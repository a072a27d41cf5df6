pub mod config;

/// Common utilities shared across the card fraud scoring workspace
///
/// This crate provides shared functionality used by the scoring service
/// and its test suites:
///
/// - Configuration loading and environment overrides
/// - Shared test utilities, fixtures and error types

// Test helpers module - available for both development and test builds
#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;

#[cfg(any(test, feature = "test-helpers"))]
pub use test_helpers::{TestError, TestResult, fixtures, test_utils};
