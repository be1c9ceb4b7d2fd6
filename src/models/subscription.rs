use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub id: Uuid,
    pub channel_id: Uuid,
    pub subscriber_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// A subscription joined with the related user's public fields; used for
/// both the subscriber list and the subscribed-to list (email, password
/// and refresh token are projected away).
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub username: String,
    pub fullname: String,
    #[serde(rename = "avatar")]
    pub avatar_url: String,
    pub subscribed_at: DateTime<Utc>,
}
