use domain::{MemoryStore, Store};
use log::{error, info};
use service::{config::Config, logging::Logger};
use std::sync::Arc;
use web::AppState;

#[tokio::main]
async fn main() {
    let config = Config::new();
    if let Err(e) = Logger::init_logger(&config) {
        eprintln!("Failed to initialize logger: {e}");
        std::process::exit(1);
    }

    info!(
        "Starting CRM integrations server on port {}...",
        config.port
    );

    let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
    let app_state = AppState::new(config, store);

    if let Err(e) = web::init_server(app_state).await {
        error!("Server failed: {e}");
        std::process::exit(1);
    }
}
