// Re-export all storage-related modules
pub mod common;
pub mod mongo_common;
pub mod unavailable;

pub use self::common::*;
pub use self::mongo_common::*;
pub use self::unavailable::*;

use ::common::config::CommonConfig;
use std::sync::Arc;
use std::time::Duration;

/// Builds the prediction store described by `config`.
///
/// Falls back to `UnavailableStorage` when no database URL is set or the
/// client cannot be built, so the service always starts.
pub async fn connect_storage(config: &CommonConfig) -> Arc<dyn PredictionStorage> {
    let Some(url) = config.database_url.as_deref() else {
        tracing::warn!("DATABASE_URL not set, predictions will not be stored");
        return Arc::new(UnavailableStorage);
    };

    let timeout = Duration::from_millis(config.storage_timeout_ms);
    match MongoPredictionStorage::new(url, &config.database_name, timeout).await {
        Ok(storage) => {
            tracing::info!(database = %config.database_name, "Prediction storage configured");
            Arc::new(storage)
        }
        Err(e) => {
            tracing::warn!(error = %e, "Failed to set up MongoDB, predictions will not be stored");
            Arc::new(UnavailableStorage)
        }
    }
}
