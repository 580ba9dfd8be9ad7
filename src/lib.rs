//! A minimal endpoint that acknowledges OpenRTB bid requests.
//!
//! `POST /api` accepts a bid request, optionally gzip-compressed when the
//! query carries `gzip=1`, and answers with a gzip-compressed JSON summary of
//! what it received. The route is wrapped in permissive CORS handling.

use axum::{middleware, routing::any, Router};
use tracing::info;

pub mod codec;
pub mod config;
pub mod cors;
pub mod error;
pub mod handlers;
pub mod ortb;
pub mod telemetry;

use crate::config::AppConfig;

pub const API_ROUTE: &str = "/api";

pub fn app() -> Router {
    let api = Router::new().route(API_ROUTE, any(handlers::handle_bid_request));

    cors::permissive(api).layer(middleware::from_fn(telemetry::access_log))
}

/// Binds the configured address and serves [`app`] until the process exits.
pub async fn serve(config: &AppConfig) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    info!("ORTB endpoint listening on {}", listener.local_addr()?);

    axum::serve(listener, app()).await
}
