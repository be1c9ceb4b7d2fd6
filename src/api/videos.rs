use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, Query, State},
    middleware,
    routing::{get, patch},
    Extension, Router,
};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::media::MediaKind;
use crate::middleware::{require_auth, CurrentUser};
use crate::models::{Video, VideoWithOwner};
use crate::response::ApiResponse;
use crate::services::{CreateVideo, ListVideosParams, VideoService, UserService};
use crate::utils::{MultipartForm, Pagination};
use crate::AppState;

use super::upload_temp_dir;

pub fn routes(state: AppState) -> Router<AppState> {
    let upload_limit = state.config.server.upload_limit;

    Router::new()
        .route(
            "/",
            get(list_videos)
                .post(publish_video)
                .layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route(
            "/:videoId",
            get(get_video)
                .patch(update_video)
                .delete(delete_video)
                .layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/toggle/publish/:videoId", patch(toggle_publish))
        .route_layer(middleware::from_fn_with_state(state, require_auth))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListVideosQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub query: Option<String>,
    pub sort_by: Option<String>,
    pub sort_type: Option<String>,
    pub user_id: Option<Uuid>,
}

async fn list_videos(
    State(state): State<AppState>,
    Query(query): Query<ListVideosQuery>,
) -> Result<ApiResponse<Vec<VideoWithOwner>>> {
    let page = Pagination::new(query.page, query.limit);

    let videos = VideoService::new(state.db.pg.clone())
        .list(ListVideosParams {
            limit: page.limit,
            offset: page.offset(),
            owner_id: query.user_id,
            query: query.query,
            sort_by: query.sort_by,
            descending: query.sort_type.as_deref() == Some("desc"),
        })
        .await?;

    Ok(ApiResponse::ok(videos, "Videos fetched successfully"))
}

async fn publish_video(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    multipart: Multipart,
) -> Result<ApiResponse<Video>> {
    let form = MultipartForm::read(multipart, &upload_temp_dir(&state)).await?;

    let title = form.require_field("title")?;
    let description = form.require_field("description")?;

    let video_file = form
        .files
        .get("videoFile")
        .ok_or_else(|| AppError::BadRequest("Video file is required".to_string()))?;
    let thumb_file = form
        .files
        .get("thumbnail")
        .ok_or_else(|| AppError::BadRequest("Thumbnail file is required".to_string()))?;

    // Both uploads must succeed before the record is created; a failure
    // here leaves no partially-created video behind.
    let video_media = state.media.upload(video_file.path(), MediaKind::Video).await?;
    let thumbnail = state.media.upload(thumb_file.path(), MediaKind::Image).await?;

    // Object storage cannot probe duration, so the client may supply it.
    let duration = video_media.duration.or_else(|| {
        form.fields
            .get("duration")
            .and_then(|d| d.trim().parse::<f64>().ok())
    });

    let video = VideoService::new(state.db.pg.clone())
        .create(CreateVideo {
            owner_id: current_user.id,
            title,
            description,
            video_url: video_media.url,
            thumbnail_url: thumbnail.url,
            duration: duration.unwrap_or(0.0),
        })
        .await?;

    Ok(ApiResponse::created(video, "Video published successfully"))
}

async fn get_video(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(video_id): Path<Uuid>,
) -> Result<ApiResponse<Video>> {
    let service = VideoService::new(state.db.pg.clone());
    let video = service.get(video_id).await?;

    service.increment_views(video_id).await?;
    UserService::new(state.db.pg.clone())
        .record_watch(current_user.id, video_id)
        .await?;

    Ok(ApiResponse::ok(video, "Video fetched successfully"))
}

async fn update_video(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(video_id): Path<Uuid>,
    multipart: Multipart,
) -> Result<ApiResponse<Video>> {
    let form = MultipartForm::read(multipart, &upload_temp_dir(&state)).await?;

    let title = form.fields.get("title").map(|t| t.trim().to_string());
    let description = form.fields.get("description").map(|d| d.trim().to_string());
    let thumbnail_file = form.files.get("thumbnail");

    if title.is_none() && description.is_none() && thumbnail_file.is_none() {
        return Err(AppError::BadRequest(
            "Title, description or thumbnail is required".to_string(),
        ));
    }

    let service = VideoService::new(state.db.pg.clone());
    let video = service.get(video_id).await?;

    if video.owner_id != current_user.id {
        return Err(AppError::Forbidden(
            "Only the owner can update this video".to_string(),
        ));
    }

    let new_thumbnail = match thumbnail_file {
        Some(file) => Some(state.media.upload(file.path(), MediaKind::Image).await?.url),
        None => None,
    };

    let updated = service
        .update(
            video_id,
            title.as_deref(),
            description.as_deref(),
            new_thumbnail.as_deref(),
        )
        .await?;

    if new_thumbnail.is_some() {
        if let Err(e) = state.media.delete(&video.thumbnail_url, MediaKind::Image).await {
            tracing::warn!("Failed to delete replaced thumbnail: {e}");
        }
    }

    Ok(ApiResponse::ok(updated, "Video updated successfully"))
}

async fn delete_video(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(video_id): Path<Uuid>,
) -> Result<ApiResponse<serde_json::Value>> {
    let service = VideoService::new(state.db.pg.clone());
    let video = service.get(video_id).await?;

    if video.owner_id != current_user.id {
        return Err(AppError::Forbidden(
            "Only the owner can delete this video".to_string(),
        ));
    }

    service.delete(video_id).await?;

    // The record is gone; backing media cleanup follows.
    state.media.delete(&video.video_url, MediaKind::Video).await?;
    state.media.delete(&video.thumbnail_url, MediaKind::Image).await?;

    Ok(ApiResponse::ok(json!({}), "Video deleted successfully"))
}

async fn toggle_publish(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(video_id): Path<Uuid>,
) -> Result<ApiResponse<Video>> {
    let service = VideoService::new(state.db.pg.clone());
    let video = service.get(video_id).await?;

    if video.owner_id != current_user.id {
        return Err(AppError::Forbidden(
            "Only the owner can toggle publish status".to_string(),
        ));
    }

    let video = service.toggle_publish(video_id).await?;

    Ok(ApiResponse::ok(video, "Publish status toggled successfully"))
}
