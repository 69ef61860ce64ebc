use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::controllers::{
    download::DownloadController, health, meditation::MeditationController,
};
use crate::infrastructure::auth::request_id_middleware;
use crate::infrastructure::config::Config;

/// Build the application router with all routes and layers
pub fn build_router(
    meditation_controller: Arc<MeditationController>,
    download_controller: Arc<DownloadController>,
) -> Router {
    // Generation route (password is checked against the request body)
    let meditation_routes = Router::new()
        .route("/api/generate-meditation", post(MeditationController::generate))
        .with_state(meditation_controller);

    // Download routes (public, served under both prefixes)
    let download_routes = Router::new()
        .route("/download/:filename", get(DownloadController::download))
        .route("/api/download/:filename", get(DownloadController::download))
        .with_state(download_controller);

    Router::new()
        .route("/health", get(health::health))
        .route("/api/health", get(health::api_health))
        .merge(meditation_routes)
        .merge(download_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive())
                .layer(middleware::from_fn(request_id_middleware)),
        )
}

/// Start the HTTP server with all routes configured
pub async fn start_http_server(
    config: Arc<Config>,
    meditation_controller: Arc<MeditationController>,
    download_controller: Arc<DownloadController>,
) -> Result<(), Box<dyn std::error::Error>> {
    let app = build_router(meditation_controller, download_controller);

    let listener =
        tokio::net::TcpListener::bind(format!("{}:{}", config.host, config.port)).await?;

    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
