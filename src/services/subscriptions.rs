//! Subscription toggles and the subscriber/subscribed-to views.
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::{Subscription, SubscriptionEntry};

const SUBSCRIPTION_COLUMNS: &str = "id, channel_id, subscriber_id, created_at";

pub enum ToggleOutcome {
    Unsubscribed(Subscription),
    Subscribed(Subscription),
}

pub struct SubscriptionService {
    pool: PgPool,
}

impl SubscriptionService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Toggle the (channel, subscriber) tuple. Delete-first then insert;
    /// the unique constraint keeps concurrent toggles from duplicating.
    pub async fn toggle(&self, channel_id: Uuid, subscriber_id: Uuid) -> Result<ToggleOutcome> {
        let channel_exists: Option<(Uuid,)> =
            sqlx::query_as("SELECT id FROM users WHERE id = $1")
                .bind(channel_id)
                .fetch_optional(&self.pool)
                .await?;

        if channel_exists.is_none() {
            return Err(AppError::NotFound("Channel not found".to_string()));
        }

        let removed: Option<Subscription> = sqlx::query_as(&format!(
            "DELETE FROM subscriptions WHERE channel_id = $1 AND subscriber_id = $2 \
             RETURNING {SUBSCRIPTION_COLUMNS}"
        ))
        .bind(channel_id)
        .bind(subscriber_id)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(subscription) = removed {
            return Ok(ToggleOutcome::Unsubscribed(subscription));
        }

        let created: Subscription = sqlx::query_as(&format!(
            "INSERT INTO subscriptions (channel_id, subscriber_id) VALUES ($1, $2) \
             RETURNING {SUBSCRIPTION_COLUMNS}"
        ))
        .bind(channel_id)
        .bind(subscriber_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(ToggleOutcome::Subscribed(created))
    }

    /// Everyone subscribed to a channel, public fields only.
    pub async fn subscribers(&self, channel_id: Uuid) -> Result<Vec<SubscriptionEntry>> {
        let entries = sqlx::query_as::<_, SubscriptionEntry>(
            r#"
            SELECT s.id, u.id AS user_id, u.username, u.fullname, u.avatar_url,
                   s.created_at AS subscribed_at
            FROM subscriptions s
            JOIN users u ON u.id = s.subscriber_id
            WHERE s.channel_id = $1
            ORDER BY s.created_at DESC
            "#,
        )
        .bind(channel_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }

    /// Channels a user is subscribed to, public fields only.
    pub async fn subscribed_channels(&self, subscriber_id: Uuid) -> Result<Vec<SubscriptionEntry>> {
        let entries = sqlx::query_as::<_, SubscriptionEntry>(
            r#"
            SELECT s.id, u.id AS user_id, u.username, u.fullname, u.avatar_url,
                   s.created_at AS subscribed_at
            FROM subscriptions s
            JOIN users u ON u.id = s.channel_id
            WHERE s.subscriber_id = $1
            ORDER BY s.created_at DESC
            "#,
        )
        .bind(subscriber_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }
}
