use crate::model::Prediction;
use crate::model::mongo_model::PredictionDocument;
use crate::storage::common::{PredictionStorage, StorageDiagnostics, StorageError};
use async_trait::async_trait;
use mongodb::options::ClientOptions;
use mongodb::{Client, Collection, Database};
use std::time::Duration;
use tracing::debug;

#[derive(Clone)]
pub struct MongoPredictionStorage {
    database: Database,
}

impl MongoPredictionStorage {
    async fn get_connection(
        conn_str: &str,
        db_name: &str,
        server_selection_timeout: Duration,
    ) -> Result<Database, StorageError> {
        let mut options = ClientOptions::parse(conn_str).await?;
        options.server_selection_timeout = Some(server_selection_timeout);
        let client = Client::with_options(options)?;
        let database = client.database(db_name);
        debug!(database = db_name, "MongoDB client created");
        Ok(database)
    }

    /// Builds the client. The driver connects lazily, so an unreachable
    /// server surfaces on the first write rather than here.
    pub async fn new(
        conn_str: &str,
        db_name: &str,
        server_selection_timeout: Duration,
    ) -> Result<Self, StorageError> {
        let database = Self::get_connection(conn_str, db_name, server_selection_timeout).await?;
        Ok(Self { database })
    }

    fn predictions(&self, collection: &str) -> Collection<PredictionDocument> {
        self.database.collection(collection)
    }
}

#[async_trait]
impl PredictionStorage for MongoPredictionStorage {
    async fn store(
        &self,
        collection: &str,
        prediction: &Prediction,
    ) -> Result<String, StorageError> {
        let doc = PredictionDocument::from_prediction(prediction);
        let result = self.predictions(collection).insert_one(&doc).await?;
        let id = result
            .inserted_id
            .as_object_id()
            .ok_or(StorageError::MissingId)?;
        debug!(collection, id = %id, "Stored prediction");
        Ok(id.to_hex())
    }

    async fn diagnostics(&self) -> StorageDiagnostics {
        let collections = self
            .database
            .list_collection_names()
            .await
            .map_err(|e| e.to_string());
        StorageDiagnostics::Connected {
            database_name: self.database.name().to_string(),
            collections,
        }
    }
}
