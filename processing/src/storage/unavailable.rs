use crate::model::Prediction;
use crate::storage::common::{PredictionStorage, StorageDiagnostics, StorageError};
use async_trait::async_trait;

/// Stand-in used when no database is configured. Every write fails.
#[derive(Debug, Clone, Default)]
pub struct UnavailableStorage;

#[async_trait]
impl PredictionStorage for UnavailableStorage {
    async fn store(
        &self,
        _collection: &str,
        _prediction: &Prediction,
    ) -> Result<String, StorageError> {
        Err(StorageError::NotConfigured)
    }

    async fn diagnostics(&self) -> StorageDiagnostics {
        StorageDiagnostics::Unavailable
    }
}
