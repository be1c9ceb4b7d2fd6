use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, Query, State},
    middleware,
    routing::{get, patch, post},
    Extension, Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use serde::Deserialize;
use serde_json::json;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::media::MediaKind;
use crate::middleware::{require_auth, CurrentUser};
use crate::models::{ChannelProfile, User, VideoWithOwner};
use crate::response::ApiResponse;
use crate::services::{AuthService, RegisterUser, UserService};
use crate::utils::{MultipartForm, Pagination};
use crate::AppState;

use super::upload_temp_dir;

pub fn routes(state: AppState) -> Router<AppState> {
    // Multipart routes carry image uploads and need more room than the
    // default JSON body cap.
    let upload_limit = state.config.server.upload_limit;
    let auth = middleware::from_fn_with_state(state, require_auth);

    let public = Router::new()
        .route(
            "/register",
            post(register).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/login", post(login))
        .route("/refresh-token", post(refresh_token));

    let protected = Router::new()
        .route("/logout", post(logout))
        .route("/change-password", post(change_password))
        .route("/current-user", get(current_user))
        .route("/update-account", patch(update_account))
        .route(
            "/avatar",
            patch(update_avatar).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route(
            "/cover-image",
            patch(update_cover_image).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/c/:username", get(channel_profile))
        .route("/history", get(watch_history))
        .route_layer(auth);

    public.merge(protected)
}

fn auth_service(state: &AppState) -> AuthService {
    AuthService::new(state.db.pg.clone(), state.config.jwt.clone())
}

fn token_cookie(name: &'static str, value: String) -> Cookie<'static> {
    Cookie::build((name, value))
        .path("/")
        .http_only(true)
        .secure(true)
        .build()
}

fn clear_cookie(name: &'static str) -> Cookie<'static> {
    Cookie::build((name, ""))
        .path("/")
        .http_only(true)
        .secure(true)
        .build()
}

async fn register(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<ApiResponse<User>> {
    let form = MultipartForm::read(multipart, &upload_temp_dir(&state)).await?;

    let username = form.require_field("username")?;
    let fullname = form.require_field("fullname")?;
    let email = form.require_field("email")?;
    let password = form.require_field("password")?;

    let avatar_file = form
        .files
        .get("avatar")
        .ok_or_else(|| AppError::BadRequest("Avatar file is required".to_string()))?;

    // Uploads happen before the user row exists; any failure aborts the
    // registration so no user is persisted without its avatar.
    let avatar = state.media.upload(avatar_file.path(), MediaKind::Image).await?;

    let cover_image_url = match form.files.get("coverImage") {
        Some(file) => Some(state.media.upload(file.path(), MediaKind::Image).await?.url),
        None => None,
    };

    let user = auth_service(&state)
        .register(RegisterUser {
            username,
            email,
            fullname,
            password,
            avatar_url: avatar.url,
            cover_image_url,
        })
        .await?;

    Ok(ApiResponse::created(user, "User registered successfully"))
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    #[validate(length(min = 1))]
    pub password: String,
}

async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<LoginRequest>,
) -> Result<(CookieJar, ApiResponse<serde_json::Value>)> {
    payload
        .validate()
        .map_err(|_| AppError::BadRequest("Password is required".to_string()))?;

    let identifier = payload
        .username
        .as_deref()
        .or(payload.email.as_deref())
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest("Username or email is required".to_string()))?;

    let (user, access_token, refresh_token) =
        auth_service(&state).login(identifier, &payload.password).await?;

    let jar = jar
        .add(token_cookie("accessToken", access_token.clone()))
        .add(token_cookie("refreshToken", refresh_token.clone()));

    // The cookies are authoritative for browsers; the body carries the
    // tokens for non-browser clients.
    let body = json!({
        "user": user,
        "accessToken": access_token,
        "refreshToken": refresh_token,
    });

    Ok((jar, ApiResponse::ok(body, "User logged in successfully")))
}

async fn logout(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    jar: CookieJar,
) -> Result<(CookieJar, ApiResponse<serde_json::Value>)> {
    auth_service(&state).logout(current_user.id).await?;

    let jar = jar
        .remove(clear_cookie("accessToken"))
        .remove(clear_cookie("refreshToken"));

    Ok((jar, ApiResponse::ok(json!({}), "User logged out successfully")))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh_token: Option<String>,
}

async fn refresh_token(
    State(state): State<AppState>,
    jar: CookieJar,
    payload: Option<Json<RefreshRequest>>,
) -> Result<(CookieJar, ApiResponse<serde_json::Value>)> {
    let presented = jar
        .get("refreshToken")
        .map(|c| c.value().to_string())
        .or_else(|| payload.and_then(|Json(p)| p.refresh_token))
        .ok_or_else(|| AppError::Unauthorized("Refresh token is missing".to_string()))?;

    let (_user, access_token, refresh_token) = auth_service(&state).refresh(&presented).await?;

    let jar = jar
        .add(token_cookie("accessToken", access_token.clone()))
        .add(token_cookie("refreshToken", refresh_token.clone()));

    let body = json!({
        "accessToken": access_token,
        "refreshToken": refresh_token,
    });

    Ok((jar, ApiResponse::ok(body, "Access token refreshed successfully")))
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1))]
    pub old_password: String,
    #[validate(length(min = 1))]
    pub new_password: String,
}

async fn change_password(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<ChangePasswordRequest>,
) -> Result<ApiResponse<serde_json::Value>> {
    payload
        .validate()
        .map_err(|_| AppError::BadRequest("Old and new password are required".to_string()))?;

    auth_service(&state)
        .change_password(current_user.id, &payload.old_password, &payload.new_password)
        .await?;

    Ok(ApiResponse::ok(json!({}), "Password changed successfully"))
}

async fn current_user(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
) -> Result<ApiResponse<User>> {
    let user = UserService::new(state.db.pg.clone()).get(current_user.id).await?;

    Ok(ApiResponse::ok(user, "Current user fetched successfully"))
}

#[derive(Debug, Deserialize)]
pub struct UpdateAccountRequest {
    pub fullname: Option<String>,
    pub email: Option<String>,
}

async fn update_account(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<UpdateAccountRequest>,
) -> Result<ApiResponse<User>> {
    if payload.fullname.is_none() && payload.email.is_none() {
        return Err(AppError::BadRequest(
            "Fullname or email is required".to_string(),
        ));
    }

    let user = UserService::new(state.db.pg.clone())
        .update_account(
            current_user.id,
            payload.fullname.as_deref(),
            payload.email.as_deref(),
        )
        .await?;

    Ok(ApiResponse::ok(user, "Account details updated successfully"))
}

async fn update_avatar(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    multipart: Multipart,
) -> Result<ApiResponse<User>> {
    let form = MultipartForm::read(multipart, &upload_temp_dir(&state)).await?;
    let file = form
        .files
        .get("avatar")
        .ok_or_else(|| AppError::BadRequest("Avatar file is required".to_string()))?;

    let uploaded = state.media.upload(file.path(), MediaKind::Image).await?;

    let (user, old_url) = UserService::new(state.db.pg.clone())
        .update_avatar(current_user.id, &uploaded.url)
        .await?;

    if let Err(e) = state.media.delete(&old_url, MediaKind::Image).await {
        tracing::warn!("Failed to delete replaced avatar: {e}");
    }

    Ok(ApiResponse::ok(user, "Avatar updated successfully"))
}

async fn update_cover_image(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    multipart: Multipart,
) -> Result<ApiResponse<User>> {
    let form = MultipartForm::read(multipart, &upload_temp_dir(&state)).await?;
    let file = form
        .files
        .get("coverImage")
        .ok_or_else(|| AppError::BadRequest("Cover image file is required".to_string()))?;

    let uploaded = state.media.upload(file.path(), MediaKind::Image).await?;

    let (user, old_url) = UserService::new(state.db.pg.clone())
        .update_cover_image(current_user.id, &uploaded.url)
        .await?;

    if let Some(old_url) = old_url {
        if let Err(e) = state.media.delete(&old_url, MediaKind::Image).await {
            tracing::warn!("Failed to delete replaced cover image: {e}");
        }
    }

    Ok(ApiResponse::ok(user, "Cover image updated successfully"))
}

async fn channel_profile(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(username): Path<String>,
) -> Result<ApiResponse<ChannelProfile>> {
    let username = username.trim().to_lowercase();
    if username.is_empty() {
        return Err(AppError::BadRequest("Username is required".to_string()));
    }

    let profile = UserService::new(state.db.pg.clone())
        .channel_profile(&username, current_user.id)
        .await?;

    Ok(ApiResponse::ok(profile, "Channel profile fetched successfully"))
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

async fn watch_history(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Query(query): Query<HistoryQuery>,
) -> Result<ApiResponse<Vec<VideoWithOwner>>> {
    let page = Pagination::new(query.page, query.limit);

    let videos = UserService::new(state.db.pg.clone())
        .watch_history(current_user.id, page.limit, page.offset())
        .await?;

    Ok(ApiResponse::ok(videos, "Watch history fetched successfully"))
}
