pub mod handlers;
mod types;

pub use types::*;

use crate::{Result, config::Config, upscaler::RealEsrgan};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{Method, header},
    routing::{get, post},
};
use std::{net::SocketAddr, sync::Arc};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

pub fn router(state: handlers::AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/", get(handlers::index))
        .route("/index.html", get(handlers::index))
        .route("/results/:filename", get(handlers::result_image))
        // Base64 image uploads exceed the default body limit (other routes
        // keep it)
        .route(
            "/enhance",
            post(handlers::enhance).layer(DefaultBodyLimit::disable()),
        )
        .fallback(handlers::not_found)
        .method_not_allowed_fallback(handlers::not_found)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

pub async fn run(config: Config) -> Result<()> {
    // The results directory must exist before the first download request
    tokio::fs::create_dir_all(config.storage.results_path()).await?;

    let upscaler = RealEsrgan::new(config.upscaler.clone(), config.storage.base_path());

    let state = handlers::AppState {
        index_page: config.storage.index_path(),
        temp_dir: config.storage.temp_path(),
        results_dir: config.storage.results_path(),
        upscaler: Arc::new(upscaler),
    };

    let app = router(state);

    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);

    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        return;
    }

    info!("Shutting down...");
}
