use axum::{
    extract::{Path, State},
    middleware,
    routing::{get, post},
    Extension, Router,
};
use uuid::Uuid;

use crate::error::Result;
use crate::middleware::{require_auth, CurrentUser};
use crate::models::{Like, VideoWithOwner};
use crate::response::ApiResponse;
use crate::services::{LikeService, LikeTarget, LikeToggleOutcome};
use crate::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/toggle/v/:videoId", post(toggle_video_like))
        .route("/toggle/c/:commentId", post(toggle_comment_like))
        .route("/toggle/t/:tweetId", post(toggle_tweet_like))
        .route("/videos", get(liked_videos))
        .route_layer(middleware::from_fn_with_state(state, require_auth))
}

async fn toggle(
    state: &AppState,
    current_user: &CurrentUser,
    target: LikeTarget,
) -> Result<ApiResponse<Like>> {
    let outcome = LikeService::new(state.db.pg.clone())
        .toggle(current_user.id, target)
        .await?;

    // Either way the affected tuple is returned as confirmation.
    Ok(match outcome {
        LikeToggleOutcome::Removed(like) => ApiResponse::ok(like, "Like removed successfully"),
        LikeToggleOutcome::Created(like) => ApiResponse::created(like, "Like added successfully"),
    })
}

async fn toggle_video_like(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(video_id): Path<Uuid>,
) -> Result<ApiResponse<Like>> {
    toggle(&state, &current_user, LikeTarget::Video(video_id)).await
}

async fn toggle_comment_like(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(comment_id): Path<Uuid>,
) -> Result<ApiResponse<Like>> {
    toggle(&state, &current_user, LikeTarget::Comment(comment_id)).await
}

async fn toggle_tweet_like(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(tweet_id): Path<Uuid>,
) -> Result<ApiResponse<Like>> {
    toggle(&state, &current_user, LikeTarget::Tweet(tweet_id)).await
}

async fn liked_videos(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
) -> Result<ApiResponse<Vec<VideoWithOwner>>> {
    let videos = LikeService::new(state.db.pg.clone())
        .liked_videos(current_user.id)
        .await?;

    Ok(ApiResponse::ok(videos, "Liked videos fetched successfully"))
}
