use std::{error::Error, sync::Arc, time::Instant};

use axum::{
    Router,
    extract::{Json, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use clap::Parser;
use common::config::{BackendConfig, Config};
use metrics::{counter, histogram};
use serde::Serialize;
use serde_json::{Value, json};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::EnvFilter;

use crate::{
    error::ApiError,
    model::{GenericError, PREDICTION_COLLECTION, PredictResponse, Prediction},
    scorers::{Scorer, WeightedSumScorer},
    storage::{PredictionStorage, StorageDiagnostics},
    validation::TransactionValidator,
};

pub const ROOT_MESSAGE: &str = "Credit Card Fraud Detection API is running";

/// Longest error excerpt reported by `GET /test`.
const DIAGNOSTIC_ERROR_CHARS: usize = 50;
const MAX_LISTED_COLLECTIONS: usize = 10;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Optional YAML config file; environment variables override its values
    #[arg(short, long)]
    pub config: Option<String>,
}

pub fn initialize_executable() -> Result<Config, Box<dyn Error + Send + Sync>> {
    if let Ok(path) = dotenvy::dotenv() {
        println!("Loaded environment from {:?}", path);
    }

    let args = Args::parse();
    let config = match args.config.as_deref() {
        Some(path) => {
            println!("Loading config from: {}", path);
            Config::load(path)?
        }
        None => Config::default(),
    };

    Ok(config.with_env_overrides()?)
}

/// `RUST_LOG` takes precedence over the configured level.
pub fn initialize_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    if let Err(e) = tracing_subscriber::fmt().with_env_filter(filter).try_init() {
        eprintln!("Tracing already initialized: {}", e);
    }
}

#[derive(Clone)]
pub struct AppState {
    validator: Arc<TransactionValidator>,
    scorer: Arc<dyn Scorer>,
    storage: Arc<dyn PredictionStorage>,
}

impl AppState {
    pub fn new(
        validator: Arc<TransactionValidator>,
        scorer: Arc<dyn Scorer>,
        storage: Arc<dyn PredictionStorage>,
    ) -> Self {
        Self {
            validator,
            scorer,
            storage,
        }
    }

    /// State with the schema validator and the weighted-sum scorer.
    pub fn with_storage(storage: Arc<dyn PredictionStorage>) -> Result<Self, GenericError> {
        Ok(Self::new(
            Arc::new(TransactionValidator::new()?),
            Arc::new(WeightedSumScorer::new()),
            storage,
        ))
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(read_root))
        .route("/test", get(test_database))
        .route("/predict", post(predict))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

pub async fn run_backend(
    config: BackendConfig,
    storage: Arc<dyn PredictionStorage>,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let app = build_router(AppState::with_storage(storage)?);

    let address = config.server_address();
    tracing::info!("Starting fraud scoring service at {}", address);
    let listener = tokio::net::TcpListener::bind(&address).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

pub async fn read_root() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({ "message": ROOT_MESSAGE })))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiagnosticsReport {
    pub backend: String,
    pub database: String,
    pub database_url: Option<String>,
    pub database_name: Option<String>,
    pub connection_status: String,
    pub collections: Vec<String>,
}

impl DiagnosticsReport {
    pub fn from_diagnostics(diagnostics: StorageDiagnostics) -> Self {
        let mut report = Self {
            backend: "Running".to_string(),
            database: "Not Available".to_string(),
            database_url: None,
            database_name: None,
            connection_status: "Not Connected".to_string(),
            collections: Vec::new(),
        };

        if let StorageDiagnostics::Connected { database_name, collections } = diagnostics {
            report.database_url = Some("Set".to_string());
            report.database_name = Some(database_name);
            report.connection_status = "Connected".to_string();
            match collections {
                Ok(names) => {
                    report.collections = names.into_iter().take(MAX_LISTED_COLLECTIONS).collect();
                    report.database = "Connected & Working".to_string();
                }
                Err(e) => {
                    let excerpt: String = e.chars().take(DIAGNOSTIC_ERROR_CHARS).collect();
                    report.database = format!("Connected but Error: {}", excerpt);
                }
            }
        }

        report
    }
}

/// Reports backend and database reachability. Never touches scoring.
pub async fn test_database(State(state): State<AppState>) -> impl IntoResponse {
    let report = DiagnosticsReport::from_diagnostics(state.storage.diagnostics().await);
    tracing::debug!(database = %report.database, "Diagnostics requested");
    (StatusCode::OK, Json(report))
}

pub async fn predict(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<PredictResponse>, ApiError> {
    let Json(body) = payload?;
    let transaction = state.validator.validate(&body)?;

    let started = Instant::now();
    let assessment = state.scorer.score(&transaction);
    histogram!("fraud_prediction_scoring_seconds").record(started.elapsed().as_secs_f64());
    counter!("fraud_predictions_total", "label" => assessment.label.as_str()).increment(1);

    let prediction = Prediction::new(transaction, assessment);

    let stored_id = match state.storage.store(PREDICTION_COLLECTION, &prediction).await {
        Ok(id) => Some(id),
        Err(e) => {
            // Scoring must not depend on the database being reachable.
            tracing::warn!(error = %e, "Failed to store prediction, continuing without id");
            counter!("fraud_prediction_store_failures_total").increment(1);
            None
        }
    };

    tracing::info!(
        score = prediction.score,
        label = %prediction.label,
        stored_id = ?stored_id,
        "Scored transaction"
    );

    Ok(Json(PredictResponse::new(prediction, stored_id)))
}
