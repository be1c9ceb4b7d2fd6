use axum::{
    extract::{Path, Query, State},
    middleware,
    routing::{delete, get, patch, post},
    Extension, Json, Router,
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::middleware::{require_auth, CurrentUser};
use crate::models::Comment;
use crate::response::ApiResponse;
use crate::services::CommentService;
use crate::utils::Pagination;
use crate::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/:videoId", get(list_comments))
        .route("/:videoId", post(add_comment))
        .route("/c/:commentId", patch(update_comment))
        .route("/c/:commentId", delete(delete_comment))
        .route_layer(middleware::from_fn_with_state(state, require_auth))
}

#[derive(Debug, Deserialize)]
pub struct ListCommentsQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

async fn list_comments(
    State(state): State<AppState>,
    Path(video_id): Path<Uuid>,
    Query(query): Query<ListCommentsQuery>,
) -> Result<ApiResponse<Vec<Comment>>> {
    let page = Pagination::new(query.page, query.limit);

    let comments = CommentService::new(state.db.pg.clone())
        .list_for_video(video_id, page.limit, page.offset())
        .await?;

    Ok(ApiResponse::ok(comments, "Comments fetched successfully"))
}

#[derive(Debug, Deserialize, Validate)]
pub struct CommentRequest {
    #[validate(length(min = 1))]
    pub content: String,
}

async fn add_comment(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(video_id): Path<Uuid>,
    Json(payload): Json<CommentRequest>,
) -> Result<ApiResponse<Comment>> {
    payload
        .validate()
        .map_err(|_| AppError::BadRequest("Content is required".to_string()))?;

    let comment = CommentService::new(state.db.pg.clone())
        .add(video_id, current_user.id, payload.content.trim())
        .await?;

    Ok(ApiResponse::created(comment, "Comment added successfully"))
}

async fn update_comment(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(comment_id): Path<Uuid>,
    Json(payload): Json<CommentRequest>,
) -> Result<ApiResponse<Comment>> {
    payload
        .validate()
        .map_err(|_| AppError::BadRequest("Content is required".to_string()))?;

    let service = CommentService::new(state.db.pg.clone());
    let comment = service.get(comment_id).await?;

    if comment.owner_id != current_user.id {
        return Err(AppError::Forbidden(
            "Only the owner can update this comment".to_string(),
        ));
    }

    let comment = service.update(comment_id, payload.content.trim()).await?;

    Ok(ApiResponse::ok(comment, "Comment updated successfully"))
}

async fn delete_comment(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(comment_id): Path<Uuid>,
) -> Result<ApiResponse<Comment>> {
    let service = CommentService::new(state.db.pg.clone());
    let comment = service.get(comment_id).await?;

    if comment.owner_id != current_user.id {
        return Err(AppError::Forbidden(
            "Only the owner can delete this comment".to_string(),
        ));
    }

    let deleted = service.delete(comment_id).await?;

    Ok(ApiResponse::ok(deleted, "Comment deleted successfully"))
}
