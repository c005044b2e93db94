use axum::{Router, http::StatusCode, response::IntoResponse, routing::get};
use tower::Layer;
use tower_http::services::ServeDir;

use super::error::NegotiationError;
use super::layer::NegotiationLayer;
use crate::config::Config;

/// Application router: `/health` plus the negotiated static files of the web root
pub fn router(config: &Config) -> Result<Router, NegotiationError> {
    let layer = NegotiationLayer::from_config(config)?;
    let files = layer.layer(ServeDir::new(&config.server.web_root));

    Ok(Router::new()
        .route("/health", get(health))
        .fallback_service(files))
}

async fn health() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}
