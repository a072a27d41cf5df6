use mongodb::bson::DateTime as BsonDateTime;
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::model::{FraudLabel, Prediction, Transaction};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PredictionDocument {
    pub _id: ObjectId,
    pub transaction: Transaction,
    pub score: f64,
    pub label: FraudLabel,
    pub explanation: String,
    pub created_at: BsonDateTime,
    pub updated_at: BsonDateTime,
}

impl PredictionDocument {
    pub fn from_prediction(prediction: &Prediction) -> Self {
        let now = BsonDateTime::now();
        Self {
            _id: ObjectId::new(),
            transaction: prediction.transaction.clone(),
            score: prediction.score,
            label: prediction.label,
            explanation: prediction.explanation.clone(),
            created_at: now,
            updated_at: now,
        }
    }
}
