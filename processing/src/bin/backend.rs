use std::error::Error;

use processing::executable_utils::{initialize_executable, initialize_tracing, run_backend};
use processing::storage::connect_storage;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    println!("Starting backend...");
    let config = initialize_executable()?;
    initialize_tracing(&config.backend.log_level);
    let storage = connect_storage(&config.common).await;
    run_backend(config.backend, storage).await
}
