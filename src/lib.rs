pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod media;
pub mod middleware;
pub mod models;
pub mod response;
pub mod services;
pub mod utils;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::{header, HeaderValue, Method};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::db::Database;
use crate::media::MediaStore;

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub config: Config,
    pub media: Arc<dyn MediaStore>,
}

/// Assemble the full application router: versioned API, CORS restricted
/// to the configured origin with credentials, static assets, request
/// tracing, and the default JSON body cap (multipart routes raise it
/// per-route).
pub fn app(state: AppState) -> anyhow::Result<Router> {
    let origin: HeaderValue = state
        .config
        .cors
        .origin
        .parse()
        .map_err(|_| anyhow::anyhow!("Invalid CORS origin: {}", state.config.cors.origin))?;

    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    let router = Router::new()
        .nest("/api/v1", api::routes(state.clone()))
        .nest_service("/static", ServeDir::new(&state.config.server.public_dir))
        .layer(DefaultBodyLimit::max(state.config.server.body_limit))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    Ok(router)
}
