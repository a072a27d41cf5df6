use crate::model::Prediction;
use async_trait::async_trait;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("No database is configured")]
    NotConfigured,

    #[error("MongoDB error: {0}")]
    Mongo(#[from] mongodb::error::Error),

    #[error("Inserted document has no ObjectId")]
    MissingId,
}

/// Reachability of the document store, as reported by `GET /test`.
#[derive(Debug, Clone, PartialEq)]
pub enum StorageDiagnostics {
    Unavailable,
    Connected {
        database_name: String,
        /// Collection names, or the error raised while listing them.
        collections: Result<Vec<String>, String>,
    },
}

/// Document store that receives scored transactions.
///
/// Writes are best-effort from the caller's point of view: the handler turns
/// any error into a missing `stored_id`.
#[async_trait]
pub trait PredictionStorage: Send + Sync {
    /// Inserts one prediction document and returns its identifier.
    async fn store(
        &self,
        collection: &str,
        prediction: &Prediction,
    ) -> Result<String, StorageError>;

    async fn diagnostics(&self) -> StorageDiagnostics;
}
