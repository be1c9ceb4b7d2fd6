use axum::{
    extract::{Path, State},
    middleware,
    routing::{delete, get, patch, post},
    Extension, Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::middleware::{require_auth, CurrentUser};
use crate::models::Playlist;
use crate::response::ApiResponse;
use crate::services::PlaylistService;
use crate::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", post(create_playlist))
        .route("/user/:userId", get(user_playlists))
        .route("/:playlistId", get(get_playlist))
        .route("/:playlistId", patch(update_playlist))
        .route("/:playlistId", delete(delete_playlist))
        .route("/add/:videoId/:playlistId", patch(add_video))
        .route("/remove/:videoId/:playlistId", patch(remove_video))
        .route_layer(middleware::from_fn_with_state(state, require_auth))
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreatePlaylistRequest {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(length(min = 1))]
    pub description: String,
}

async fn create_playlist(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<CreatePlaylistRequest>,
) -> Result<ApiResponse<Playlist>> {
    payload
        .validate()
        .map_err(|_| AppError::BadRequest("Name and description are required".to_string()))?;

    let playlist = PlaylistService::new(state.db.pg.clone())
        .create(
            current_user.id,
            payload.name.trim(),
            payload.description.trim(),
        )
        .await?;

    Ok(ApiResponse::created(playlist, "Playlist created successfully"))
}

async fn user_playlists(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<ApiResponse<Vec<Playlist>>> {
    let playlists = PlaylistService::new(state.db.pg.clone())
        .list_for_user(user_id)
        .await?;

    Ok(ApiResponse::ok(playlists, "Playlists fetched successfully"))
}

async fn get_playlist(
    State(state): State<AppState>,
    Path(playlist_id): Path<Uuid>,
) -> Result<ApiResponse<Playlist>> {
    let playlist = PlaylistService::new(state.db.pg.clone())
        .get(playlist_id)
        .await?;

    Ok(ApiResponse::ok(playlist, "Playlist fetched successfully"))
}

/// Loads the playlist and enforces that the caller owns it.
async fn owned_playlist(
    service: &PlaylistService,
    playlist_id: Uuid,
    current_user: &CurrentUser,
) -> Result<Playlist> {
    let playlist = service.get(playlist_id).await?;

    if playlist.owner_id != current_user.id {
        return Err(AppError::Forbidden(
            "Only the owner can modify this playlist".to_string(),
        ));
    }

    Ok(playlist)
}

async fn add_video(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path((video_id, playlist_id)): Path<(Uuid, Uuid)>,
) -> Result<ApiResponse<Playlist>> {
    let service = PlaylistService::new(state.db.pg.clone());
    owned_playlist(&service, playlist_id, &current_user).await?;

    let playlist = service.add_video(playlist_id, video_id).await?;

    Ok(ApiResponse::ok(playlist, "Video added to playlist successfully"))
}

async fn remove_video(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path((video_id, playlist_id)): Path<(Uuid, Uuid)>,
) -> Result<ApiResponse<Playlist>> {
    let service = PlaylistService::new(state.db.pg.clone());
    owned_playlist(&service, playlist_id, &current_user).await?;

    let playlist = service.remove_video(playlist_id, video_id).await?;

    Ok(ApiResponse::ok(
        playlist,
        "Video removed from playlist successfully",
    ))
}

#[derive(Debug, Deserialize)]
pub struct UpdatePlaylistRequest {
    pub name: Option<String>,
    pub description: Option<String>,
}

async fn update_playlist(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(playlist_id): Path<Uuid>,
    Json(payload): Json<UpdatePlaylistRequest>,
) -> Result<ApiResponse<Playlist>> {
    if payload.name.is_none() && payload.description.is_none() {
        return Err(AppError::BadRequest(
            "Name or description is required".to_string(),
        ));
    }

    let service = PlaylistService::new(state.db.pg.clone());
    owned_playlist(&service, playlist_id, &current_user).await?;

    let playlist = service
        .update(
            playlist_id,
            payload.name.as_deref(),
            payload.description.as_deref(),
        )
        .await?;

    Ok(ApiResponse::ok(playlist, "Playlist updated successfully"))
}

async fn delete_playlist(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(playlist_id): Path<Uuid>,
) -> Result<ApiResponse<serde_json::Value>> {
    let service = PlaylistService::new(state.db.pg.clone());
    owned_playlist(&service, playlist_id, &current_user).await?;

    service.delete(playlist_id).await?;

    Ok(ApiResponse::ok(json!({}), "Playlist deleted successfully"))
}
