use std::sync::{Arc, Mutex};
use async_trait::async_trait;
use axum::{Router, body::Body};
use mockall::mock;
use processing::{
    executable_utils::{AppState, build_router},
    model::Prediction,
    storage::{PredictionStorage, StorageDiagnostics, StorageError},
};
use serde_json::Value;

mock! {
    pub PredictionStorage {}

    #[async_trait]
    impl PredictionStorage for PredictionStorage {
        async fn store(&self, collection: &str, prediction: &Prediction) -> Result<String, StorageError>;
        async fn diagnostics(&self) -> StorageDiagnostics;
    }
}

/// Accepts every write and remembers what it was given.
pub struct MockSuccessStorage {
    pub next_id: String,
    pub stored: Mutex<Vec<(String, Prediction)>>,
}

impl MockSuccessStorage {
    pub fn new(next_id: &str) -> Self {
        Self {
            next_id: next_id.to_string(),
            stored: Mutex::new(Vec::new()),
        }
    }

    pub fn stored(&self) -> Vec<(String, Prediction)> {
        self.stored.lock().unwrap().clone()
    }
}

#[async_trait]
impl PredictionStorage for MockSuccessStorage {
    async fn store(&self, collection: &str, prediction: &Prediction) -> Result<String, StorageError> {
        self.stored
            .lock()
            .unwrap()
            .push((collection.to_string(), prediction.clone()));
        Ok(self.next_id.clone())
    }

    async fn diagnostics(&self) -> StorageDiagnostics {
        StorageDiagnostics::Connected {
            database_name: "fraud_test".to_string(),
            collections: Ok(vec!["prediction".to_string()]),
        }
    }
}

/// Connected, but every write fails as if the server went away.
pub struct MockFailingStorage;

#[async_trait]
impl PredictionStorage for MockFailingStorage {
    async fn store(&self, _collection: &str, _prediction: &Prediction) -> Result<String, StorageError> {
        Err(StorageError::MissingId)
    }

    async fn diagnostics(&self) -> StorageDiagnostics {
        StorageDiagnostics::Connected {
            database_name: "fraud_test".to_string(),
            collections: Err("server selection timeout".to_string()),
        }
    }
}

// Helper function to create test app with the production router
pub fn create_test_app(storage: Arc<dyn PredictionStorage>) -> Router {
    let state = AppState::with_storage(storage).expect("transaction schema should compile");
    build_router(state)
}

pub fn into_axum_request(request: http::Request<String>) -> http::Request<Body> {
    request.map(Body::from)
}

pub async fn response_body_string(response: axum::response::Response) -> String {
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await
        .expect("Failed to read response body");
    String::from_utf8(body_bytes.to_vec())
        .expect("Response body is not valid UTF-8")
}

pub async fn response_body_json(response: axum::response::Response) -> Value {
    let body = response_body_string(response).await;
    serde_json::from_str(&body).expect("Response body is not valid JSON")
}
