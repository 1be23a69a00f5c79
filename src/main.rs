mod api;
mod bitquery;
mod config;
mod ingest;
mod poller;
mod respository;
mod shutdown;
mod types;

use crate::api::AppState;
use crate::bitquery::BitqueryClient;
use crate::config::Settings;
use crate::poller::{HttpPollTarget, PollController};
use crate::respository::RepositoryWrapper;
use crate::types::AppError;

use log::info;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // 1. Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    info!("Application starting...");

    // 2. Load configuration (.env, config.toml, then APP__ overrides)
    dotenv::dotenv().ok();
    let settings = Settings::new()?;
    info!("Configuration loaded.");

    // 3. Wire the repository (PostgreSQL, or in-memory when configured)
    let repository = Arc::new(RepositoryWrapper::from_settings(&settings).await?);
    info!("Repository ready.");

    // 4. Create the Bitquery client
    let bitquery = BitqueryClient::new(
        settings.bitquery.api_url.clone(),
        settings.bitquery.api_key.clone(),
    );

    // 5. Build the HTTP app
    let cors_layer = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);
    let state = AppState::new(repository, bitquery);
    let app = api::router(state).layer(cors_layer);

    // 6. Optionally start the background poller against the backend URL
    let mut poll_controller = None;
    if settings.poller.enabled {
        let target = Arc::new(HttpPollTarget::new(&settings.poller.backend_url));
        let mut controller = PollController::new(target, settings.poller.interval_ms);
        controller.start().await;
        poll_controller = Some(controller);
    }

    // 7. Serve until a shutdown signal arrives
    let result = api::serve(&settings.bind_addr(), app).await;

    // 8. Dropping the controller aborts its timer
    drop(poll_controller);
    info!("Application exited cleanly.");
    result
}
