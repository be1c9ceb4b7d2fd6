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
use crate::models::{Tweet, TweetWithAuthor};
use crate::response::ApiResponse;
use crate::services::TweetService;
use crate::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", post(create_tweet))
        .route("/user/:userId", get(user_tweets))
        .route("/:tweetId", patch(update_tweet))
        .route("/:tweetId", delete(delete_tweet))
        .route_layer(middleware::from_fn_with_state(state, require_auth))
}

#[derive(Debug, Deserialize, Validate)]
pub struct TweetRequest {
    #[validate(length(min = 1))]
    pub content: String,
}

async fn create_tweet(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<TweetRequest>,
) -> Result<ApiResponse<Tweet>> {
    payload
        .validate()
        .map_err(|_| AppError::BadRequest("Content is required".to_string()))?;

    let tweet = TweetService::new(state.db.pg.clone())
        .create(current_user.id, payload.content.trim())
        .await?;

    Ok(ApiResponse::created(tweet, "Tweet created successfully"))
}

async fn user_tweets(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<ApiResponse<Vec<TweetWithAuthor>>> {
    let tweets = TweetService::new(state.db.pg.clone())
        .list_for_user(user_id)
        .await?;

    Ok(ApiResponse::ok(tweets, "Tweets fetched successfully"))
}

async fn update_tweet(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(tweet_id): Path<Uuid>,
    Json(payload): Json<TweetRequest>,
) -> Result<ApiResponse<Tweet>> {
    payload
        .validate()
        .map_err(|_| AppError::BadRequest("Content is required".to_string()))?;

    let service = TweetService::new(state.db.pg.clone());
    let tweet = service.get(tweet_id).await?;

    if tweet.owner_id != current_user.id {
        return Err(AppError::Forbidden(
            "Only the owner can update this tweet".to_string(),
        ));
    }

    let tweet = service.update(tweet_id, payload.content.trim()).await?;

    Ok(ApiResponse::ok(tweet, "Tweet updated successfully"))
}

async fn delete_tweet(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(tweet_id): Path<Uuid>,
) -> Result<ApiResponse<serde_json::Value>> {
    let service = TweetService::new(state.db.pg.clone());
    let tweet = service.get(tweet_id).await?;

    if tweet.owner_id != current_user.id {
        return Err(AppError::Forbidden(
            "Only the owner can delete this tweet".to_string(),
        ));
    }

    service.delete(tweet_id).await?;

    Ok(ApiResponse::ok(json!({}), "Tweet deleted successfully"))
}
