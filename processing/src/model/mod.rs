use serde::{Deserialize, Serialize};
use std::error::Error;
use strum_macros::{Display as EnumDisplay, IntoStaticStr};

pub mod mongo_model;

pub type GenericError = Box<dyn Error + Send + Sync>;

/// Collection that receives one document per scored transaction.
pub const PREDICTION_COLLECTION: &str = "prediction";

/// A card transaction as submitted for scoring.
///
/// Values of this type only come out of `TransactionValidator`, so every
/// range constraint has already been checked when the scorer sees one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Amount in USD.
    pub amount: f64,
    pub merchant: String,
    pub category: String,
    /// Kilometres from the cardholder's home.
    pub distance_from_home: f64,
    /// Kilometres from the previous transaction on the card.
    pub distance_from_last_transaction: f64,
    pub repeat_retailer: bool,
    pub used_chip: bool,
    pub used_pin_number: bool,
    pub online_order: bool,
    /// Hour of day, 0-23.
    pub hour: u8,
    /// Cardholder age, 16-120.
    pub age: u8,
    pub international: bool,
    /// Transactions on the card in the trailing 24 hours.
    pub velocity_24h: u32,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumDisplay, IntoStaticStr,
)]
pub enum FraudLabel {
    Fraud,
    Legit,
}

impl FraudLabel {
    pub fn from_score(score: f64, threshold: f64) -> Self {
        if score >= threshold {
            FraudLabel::Fraud
        } else {
            FraudLabel::Legit
        }
    }

    pub fn as_str(&self) -> &'static str {
        (*self).into()
    }
}

/// Output of a scorer for a single transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    pub score: f64,
    pub label: FraudLabel,
    pub explanation: String,
}

/// A scored transaction, as persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub transaction: Transaction,
    pub score: f64,
    pub label: FraudLabel,
    pub explanation: String,
}

impl Prediction {
    pub fn new(transaction: Transaction, assessment: Assessment) -> Self {
        Self {
            transaction,
            score: assessment.score,
            label: assessment.label,
            explanation: assessment.explanation,
        }
    }
}

/// Body returned by `POST /predict`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictResponse {
    pub score: f64,
    pub label: FraudLabel,
    pub explanation: String,
    pub stored_id: Option<String>,
}

impl PredictResponse {
    pub fn new(prediction: Prediction, stored_id: Option<String>) -> Self {
        Self {
            score: prediction.score,
            label: prediction.label,
            explanation: prediction.explanation,
            stored_id,
        }
    }
}
