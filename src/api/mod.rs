mod comments;
mod dashboard;
mod likes;
mod playlists;
mod subscriptions;
mod tweets;
mod users;
mod videos;

use std::path::PathBuf;

use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;

use crate::response::ApiResponse;
use crate::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/healthcheck", get(healthcheck))
        .nest("/users", users::routes(state.clone()))
        .nest("/videos", videos::routes(state.clone()))
        .nest("/comments", comments::routes(state.clone()))
        .nest("/likes", likes::routes(state.clone()))
        .nest("/tweets", tweets::routes(state.clone()))
        .nest("/playlists", playlists::routes(state.clone()))
        .nest("/subscriptions", subscriptions::routes(state.clone()))
        .nest("/dashboard", dashboard::routes(state))
}

async fn healthcheck() -> ApiResponse<serde_json::Value> {
    ApiResponse::new(StatusCode::OK, serde_json::json!({}), "OK")
}

/// Spool directory for in-flight multipart uploads.
pub(crate) fn upload_temp_dir(state: &AppState) -> PathBuf {
    PathBuf::from(&state.config.server.public_dir).join("temp")
}
