use std::sync::Arc;
use axum::http::StatusCode;
use common::{
    TestError, TestResult, fixtures, test_assert, test_assert_eq,
    test_utils::{build_json_request, build_request, check_status_code},
};
use processing::storage::UnavailableStorage;
use serde_json::{Value, json};
use tower::ServiceExt;

use super::mocks::{create_test_app, into_axum_request, response_body_json};

async fn send(request: http::Request<String>) -> TestResult<(StatusCode, Value)> {
    let app = create_test_app(Arc::new(UnavailableStorage));
    let response = app
        .oneshot(into_axum_request(request))
        .await
        .map_err(|e| TestError::generic(format!("Request failed: {}", e)))?;
    let status = response.status();
    Ok((status, response_body_json(response).await))
}

fn violation_fields(body: &Value) -> Vec<String> {
    body["detail"]
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item["field"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

async fn assert_rejected(body: Value, field: &str) -> TestResult<Value> {
    let (status, response) = send(build_json_request("/predict", &body)?).await?;
    check_status_code(status, StatusCode::UNPROCESSABLE_ENTITY)?;
    test_assert_eq!(response["error"], json!("ValidationError"));
    test_assert_eq!(violation_fields(&response), vec![field.to_string()]);
    Ok(response)
}

#[tokio::test]
async fn test_rejects_negative_amount() -> TestResult {
    let body = fixtures::with_field(fixtures::low_risk_transaction(), "amount", json!(-0.01));
    let response = assert_rejected(body, "amount").await?;
    test_assert_eq!(response["detail"][0]["received"], json!(-0.01));
    Ok(())
}

#[tokio::test]
async fn test_rejects_hour_24() -> TestResult {
    let body = fixtures::with_field(fixtures::low_risk_transaction(), "hour", json!(24));
    let response = assert_rejected(body, "hour").await?;
    test_assert_eq!(response["detail"][0]["received"], json!(24));
    test_assert!(response["detail"][0]["constraint"].is_string());
    Ok(())
}

#[tokio::test]
async fn test_rejects_age_10() -> TestResult {
    let body = fixtures::with_field(fixtures::low_risk_transaction(), "age", json!(10));
    assert_rejected(body, "age").await?;
    Ok(())
}

#[tokio::test]
async fn test_rejects_missing_required_field() -> TestResult {
    let body = fixtures::without_field(fixtures::low_risk_transaction(), "velocity_24h");
    let response = assert_rejected(body, "velocity_24h").await?;
    test_assert!(response["detail"][0]["received"].is_null());
    Ok(())
}

#[tokio::test]
async fn test_rejects_wrong_boolean_type() -> TestResult {
    let body = fixtures::with_field(fixtures::low_risk_transaction(), "used_chip", json!("true"));
    assert_rejected(body, "used_chip").await?;
    Ok(())
}

#[tokio::test]
async fn test_reports_every_violation() -> TestResult {
    let body = fixtures::with_field(fixtures::low_risk_transaction(), "hour", json!(-1));
    let body = fixtures::with_field(body, "age", json!(121));
    let body = fixtures::without_field(body, "category");

    let (status, response) = send(build_json_request("/predict", &body)?).await?;

    check_status_code(status, StatusCode::UNPROCESSABLE_ENTITY)?;
    let mut fields = violation_fields(&response);
    fields.sort();
    test_assert_eq!(fields, vec!["age".to_string(), "category".to_string(), "hour".to_string()]);
    Ok(())
}

#[tokio::test]
async fn test_rejects_malformed_json() -> TestResult {
    let request = build_request("POST", "/predict", Some("{invalid json}".to_string()))?;

    let (status, response) = send(request).await?;

    check_status_code(status, StatusCode::UNPROCESSABLE_ENTITY)?;
    test_assert_eq!(violation_fields(&response), vec!["body".to_string()]);
    Ok(())
}

#[tokio::test]
async fn test_rejects_non_object_body() -> TestResult {
    let (status, response) = send(build_json_request("/predict", &json!("amount"))?).await?;

    check_status_code(status, StatusCode::UNPROCESSABLE_ENTITY)?;
    test_assert_eq!(violation_fields(&response), vec!["body".to_string()]);
    Ok(())
}

#[tokio::test]
async fn test_accepts_integral_floats_for_integer_fields() -> TestResult {
    let body = fixtures::with_field(fixtures::low_risk_transaction(), "hour", json!(14.0));
    let body = fixtures::with_field(body, "age", json!(35.0));
    let body = fixtures::with_field(body, "velocity_24h", json!(1.0));

    let (status, response) = send(build_json_request("/predict", &body)?).await?;

    check_status_code(status, StatusCode::OK)?;
    test_assert_eq!(response["label"], json!("Legit"));
    test_assert_eq!(response["explanation"], json!("Low-risk pattern"));
    test_assert!(response["stored_id"].is_null());
    Ok(())
}
