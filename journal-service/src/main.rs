//! Journal Service — persists diary entries, tasks, meetings and sticky notes
//! as JSON documents and serves them over a small REST API.
//!
//! Default: http://127.0.0.1:3000/api/<entries|tasks|meetings|stickynotes>

mod config;
mod error;
mod routes;
mod store;

use config::Config;
use routes::AppState;
use std::sync::Arc;

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    env_logger::init();

    let config = Config::from_env();

    log::info!("Opening collections in {}", config.data_dir.display());
    if config.reject_duplicate_ids {
        log::info!("Duplicate record ids will be rejected");
    }
    let state = Arc::new(
        AppState::open(&config)
            .await
            .expect("Failed to open data directory"),
    );

    let cors = tower_http::cors::CorsLayer::permissive();
    let app = routes::router(state).layer(cors);

    let addr = config.bind_addr();
    log::info!("Journal Service listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    log::info!("Journal Service stopped");
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    log::info!("Shutdown signal received");
}
