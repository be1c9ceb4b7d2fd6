use axum::{extract::State, middleware, routing::get, Extension, Router};

use crate::error::Result;
use crate::middleware::{require_auth, CurrentUser};
use crate::models::{ChannelStats, Video};
use crate::response::ApiResponse;
use crate::services::DashboardService;
use crate::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/stats", get(channel_stats))
        .route("/videos", get(channel_videos))
        .route_layer(middleware::from_fn_with_state(state, require_auth))
}

async fn channel_stats(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
) -> Result<ApiResponse<ChannelStats>> {
    let stats = DashboardService::new(state.db.pg.clone())
        .channel_stats(current_user.id)
        .await?;

    Ok(ApiResponse::ok(stats, "Channel stats fetched successfully"))
}

async fn channel_videos(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
) -> Result<ApiResponse<Vec<Video>>> {
    let videos = DashboardService::new(state.db.pg.clone())
        .channel_videos(current_user.id)
        .await?;

    Ok(ApiResponse::ok(videos, "Channel videos fetched successfully"))
}
