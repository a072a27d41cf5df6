use jsonschema::Validator;
use jsonschema::error::ValidationErrorKind;
use serde::Serialize;
use serde_json::{Value, json};
use tracing::debug;

use crate::model::{GenericError, Transaction};

/// Field name reported for problems with the document as a whole.
pub const BODY_FIELD: &str = "body";

const INTEGER_FIELDS: [&str; 3] = ["hour", "age", "velocity_24h"];

/// One rule broken by an inbound transaction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldViolation {
    pub field: String,
    pub constraint: String,
    pub received: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, thiserror::Error)]
#[error("Transaction failed validation with {} violation(s)", .violations.len())]
pub struct ValidationError {
    pub violations: Vec<FieldViolation>,
}

impl ValidationError {
    pub fn malformed_body(reason: impl Into<String>) -> Self {
        Self {
            violations: vec![FieldViolation {
                field: BODY_FIELD.to_string(),
                constraint: reason.into(),
                received: Value::Null,
            }],
        }
    }

    pub fn fields(&self) -> Vec<&str> {
        self.violations.iter().map(|v| v.field.as_str()).collect()
    }
}

pub fn transaction_schema() -> Value {
    json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "title": "Transaction",
        "type": "object",
        "required": [
            "amount", "merchant", "category", "distance_from_home",
            "distance_from_last_transaction", "repeat_retailer", "used_chip",
            "used_pin_number", "online_order", "hour", "age", "international",
            "velocity_24h"
        ],
        "properties": {
            "amount": { "type": "number", "minimum": 0 },
            "merchant": { "type": "string" },
            "category": { "type": "string" },
            "distance_from_home": { "type": "number", "minimum": 0 },
            "distance_from_last_transaction": { "type": "number", "minimum": 0 },
            "repeat_retailer": { "type": "boolean" },
            "used_chip": { "type": "boolean" },
            "used_pin_number": { "type": "boolean" },
            "online_order": { "type": "boolean" },
            "hour": { "type": "integer", "minimum": 0, "maximum": 23 },
            "age": { "type": "integer", "minimum": 16, "maximum": 120 },
            "international": { "type": "boolean" },
            "velocity_24h": { "type": "integer", "minimum": 0, "maximum": u32::MAX }
        }
    })
}

/// Checks raw request JSON against the transaction schema and turns it into
/// a typed `Transaction`.
///
/// The schema is compiled once; the validator holds no other state and can be
/// shared between requests.
pub struct TransactionValidator {
    validator: Validator,
}

impl TransactionValidator {
    pub fn new() -> Result<Self, GenericError> {
        let validator = jsonschema::validator_for(&transaction_schema())
            .map_err(|e| format!("Invalid transaction schema: {}", e))?;
        Ok(Self { validator })
    }

    pub fn validate(&self, body: &Value) -> Result<Transaction, ValidationError> {
        let violations: Vec<FieldViolation> = self
            .validator
            .iter_errors(body)
            .map(|error| {
                let (field, received) = match &error.kind {
                    ValidationErrorKind::Required { property } => (
                        property.as_str().unwrap_or(BODY_FIELD).to_string(),
                        Value::Null,
                    ),
                    _ => (
                        field_from_pointer(error.instance_path.as_str()),
                        error.instance.clone().into_owned(),
                    ),
                };
                FieldViolation {
                    field,
                    constraint: error.to_string(),
                    received,
                }
            })
            .collect();

        if !violations.is_empty() {
            debug!(?violations, "Transaction rejected by schema");
            return Err(ValidationError { violations });
        }

        serde_json::from_value(normalize_integers(body)).map_err(|e| {
            debug!(error = %e, "Transaction rejected during deserialization");
            ValidationError::malformed_body(e.to_string())
        })
    }
}

/// Whole numbers written as floats (`14.0`) pass the schema's "integer"
/// check; rewrite them so the typed fields deserialize.
fn normalize_integers(body: &Value) -> Value {
    let mut body = body.clone();
    if let Some(object) = body.as_object_mut() {
        for field in INTEGER_FIELDS {
            let Some(value) = object.get_mut(field) else {
                continue;
            };
            if !value.is_f64() {
                continue;
            }
            if let Some(number) = value.as_f64().filter(|n| n.fract() == 0.0 && *n >= 0.0) {
                *value = Value::from(number as u64);
            }
        }
    }
    body
}

fn field_from_pointer(pointer: &str) -> String {
    match pointer.trim_start_matches('/') {
        "" => BODY_FIELD.to_string(),
        field => field.to_string(),
    }
}
