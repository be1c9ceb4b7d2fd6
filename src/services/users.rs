//! User profile operations and the aggregated channel/history views.
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::{ChannelProfile, User, VideoWithOwner};

const USER_COLUMNS: &str = "id, username, email, fullname, password_hash, avatar_url, \
     cover_image_url, refresh_token, created_at, updated_at";

pub struct UserService {
    pool: PgPool,
}

impl UserService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn get(&self, user_id: Uuid) -> Result<User> {
        let user: User = sqlx::query_as(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        Ok(user)
    }

    pub async fn update_account(
        &self,
        user_id: Uuid,
        fullname: Option<&str>,
        email: Option<&str>,
    ) -> Result<User> {
        let user: User = sqlx::query_as(&format!(
            "UPDATE users SET fullname = COALESCE($1, fullname), \
             email = COALESCE($2, email), updated_at = NOW() \
             WHERE id = $3 RETURNING {USER_COLUMNS}"
        ))
        .bind(fullname)
        .bind(email)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        Ok(user)
    }

    /// Swap the avatar URL, returning the updated user plus the replaced
    /// URL so the handler can delete the old asset.
    pub async fn update_avatar(&self, user_id: Uuid, avatar_url: &str) -> Result<(User, String)> {
        let old: (String,) = sqlx::query_as("SELECT avatar_url FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        let user: User = sqlx::query_as(&format!(
            "UPDATE users SET avatar_url = $1, updated_at = NOW() WHERE id = $2 \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(avatar_url)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok((user, old.0))
    }

    pub async fn update_cover_image(
        &self,
        user_id: Uuid,
        cover_image_url: &str,
    ) -> Result<(User, Option<String>)> {
        let old: (Option<String>,) =
            sqlx::query_as("SELECT cover_image_url FROM users WHERE id = $1")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?
                .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        let user: User = sqlx::query_as(&format!(
            "UPDATE users SET cover_image_url = $1, updated_at = NOW() WHERE id = $2 \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(cover_image_url)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok((user, old.0))
    }

    /// Channel profile with subscriber counts and whether the viewer is
    /// subscribed. Replaces the original's $lookup pipeline with scalar
    /// subqueries.
    pub async fn channel_profile(
        &self,
        username: &str,
        viewer_id: Uuid,
    ) -> Result<ChannelProfile> {
        let profile: ChannelProfile = sqlx::query_as(
            r#"
            SELECT u.id, u.username, u.fullname, u.avatar_url, u.cover_image_url,
                   (SELECT COUNT(*) FROM subscriptions s WHERE s.channel_id = u.id)
                       AS subscribers_count,
                   (SELECT COUNT(*) FROM subscriptions s WHERE s.subscriber_id = u.id)
                       AS subscribed_to_count,
                   EXISTS (SELECT 1 FROM subscriptions s
                           WHERE s.channel_id = u.id AND s.subscriber_id = $2)
                       AS is_subscribed
            FROM users u
            WHERE u.username = $1
            "#,
        )
        .bind(username)
        .bind(viewer_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Channel does not exist".to_string()))?;

        Ok(profile)
    }

    /// Watched videos joined with their owners, most recent first.
    pub async fn watch_history(
        &self,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<VideoWithOwner>> {
        let videos = sqlx::query_as::<_, VideoWithOwner>(
            r#"
            SELECT v.id, v.owner_id, v.title, v.description, v.video_url,
                   v.thumbnail_url, v.duration, v.views, v.is_published, v.created_at,
                   u.username AS owner_username, u.fullname AS owner_fullname,
                   u.avatar_url AS owner_avatar_url
            FROM watch_history h
            JOIN videos v ON v.id = h.video_id
            JOIN users u ON u.id = v.owner_id
            WHERE h.user_id = $1
            ORDER BY h.watched_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(videos)
    }

    /// Upsert a watch-history entry; re-watching bumps the entry to the
    /// front of the history.
    pub async fn record_watch(&self, user_id: Uuid, video_id: Uuid) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO watch_history (user_id, video_id, watched_at)
            VALUES ($1, $2, NOW())
            ON CONFLICT (user_id, video_id) DO UPDATE SET watched_at = NOW()
            "#,
        )
        .bind(user_id)
        .bind(video_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
