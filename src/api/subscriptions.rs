use axum::{
    extract::{Path, State},
    middleware,
    routing::{get, post},
    Extension, Router,
};
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::middleware::{require_auth, CurrentUser};
use crate::models::{Subscription, SubscriptionEntry};
use crate::response::ApiResponse;
use crate::services::{SubscriptionService, SubscriptionToggleOutcome};
use crate::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/c/:channelId", post(toggle_subscription))
        .route("/c/:channelId", get(channel_subscribers))
        .route("/u/:subscriberId", get(subscribed_channels))
        .route_layer(middleware::from_fn_with_state(state, require_auth))
}

async fn toggle_subscription(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(channel_id): Path<Uuid>,
) -> Result<ApiResponse<Subscription>> {
    if channel_id == current_user.id {
        return Err(AppError::BadRequest(
            "Cannot subscribe to your own channel".to_string(),
        ));
    }

    let outcome = SubscriptionService::new(state.db.pg.clone())
        .toggle(channel_id, current_user.id)
        .await?;

    Ok(match outcome {
        SubscriptionToggleOutcome::Unsubscribed(s) => {
            ApiResponse::ok(s, "Unsubscribed successfully")
        }
        SubscriptionToggleOutcome::Subscribed(s) => {
            ApiResponse::created(s, "Subscribed successfully")
        }
    })
}

async fn channel_subscribers(
    State(state): State<AppState>,
    Path(channel_id): Path<Uuid>,
) -> Result<ApiResponse<Vec<SubscriptionEntry>>> {
    let subscribers = SubscriptionService::new(state.db.pg.clone())
        .subscribers(channel_id)
        .await?;

    Ok(ApiResponse::ok(subscribers, "Subscribers fetched successfully"))
}

async fn subscribed_channels(
    State(state): State<AppState>,
    Path(subscriber_id): Path<Uuid>,
) -> Result<ApiResponse<Vec<SubscriptionEntry>>> {
    let channels = SubscriptionService::new(state.db.pg.clone())
        .subscribed_channels(subscriber_id)
        .await?;

    Ok(ApiResponse::ok(
        channels,
        "Subscribed channels fetched successfully",
    ))
}
