//! Like toggles and the liked-videos view.
//!
//! Toggling is delete-first then insert-if-absent; the partial unique
//! indexes on (liked_by, target) make concurrent toggles race-safe: a
//! lost insert race surfaces as a unique violation, never a duplicate.
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::{Like, VideoWithOwner};

const LIKE_COLUMNS: &str = "id, liked_by, video_id, comment_id, tweet_id, created_at";

/// Outcome of a toggle: the removed tuple or the created one.
pub enum ToggleOutcome {
    Removed(Like),
    Created(Like),
}

#[derive(Clone, Copy)]
pub enum LikeTarget {
    Video(Uuid),
    Comment(Uuid),
    Tweet(Uuid),
}

impl LikeTarget {
    fn column(&self) -> &'static str {
        match self {
            LikeTarget::Video(_) => "video_id",
            LikeTarget::Comment(_) => "comment_id",
            LikeTarget::Tweet(_) => "tweet_id",
        }
    }

    fn table(&self) -> &'static str {
        match self {
            LikeTarget::Video(_) => "videos",
            LikeTarget::Comment(_) => "comments",
            LikeTarget::Tweet(_) => "tweets",
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            LikeTarget::Video(_) => "Video",
            LikeTarget::Comment(_) => "Comment",
            LikeTarget::Tweet(_) => "Tweet",
        }
    }

    fn id(&self) -> Uuid {
        match self {
            LikeTarget::Video(id) | LikeTarget::Comment(id) | LikeTarget::Tweet(id) => *id,
        }
    }
}

pub struct LikeService {
    pool: PgPool,
}

impl LikeService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn toggle(&self, liked_by: Uuid, target: LikeTarget) -> Result<ToggleOutcome> {
        let column = target.column();

        let exists: Option<(Uuid,)> =
            sqlx::query_as(&format!("SELECT id FROM {} WHERE id = $1", target.table()))
                .bind(target.id())
                .fetch_optional(&self.pool)
                .await?;

        if exists.is_none() {
            return Err(AppError::NotFound(format!("{} not found", target.kind())));
        }

        let removed: Option<Like> = sqlx::query_as(&format!(
            "DELETE FROM likes WHERE liked_by = $1 AND {column} = $2 RETURNING {LIKE_COLUMNS}"
        ))
        .bind(liked_by)
        .bind(target.id())
        .fetch_optional(&self.pool)
        .await?;

        if let Some(like) = removed {
            return Ok(ToggleOutcome::Removed(like));
        }

        let created: Like = sqlx::query_as(&format!(
            "INSERT INTO likes (liked_by, {column}) VALUES ($1, $2) RETURNING {LIKE_COLUMNS}"
        ))
        .bind(liked_by)
        .bind(target.id())
        .fetch_one(&self.pool)
        .await?;

        Ok(ToggleOutcome::Created(created))
    }

    pub async fn liked_videos(&self, liked_by: Uuid) -> Result<Vec<VideoWithOwner>> {
        let videos = sqlx::query_as::<_, VideoWithOwner>(
            r#"
            SELECT v.id, v.owner_id, v.title, v.description, v.video_url,
                   v.thumbnail_url, v.duration, v.views, v.is_published, v.created_at,
                   u.username AS owner_username, u.fullname AS owner_fullname,
                   u.avatar_url AS owner_avatar_url
            FROM likes l
            JOIN videos v ON v.id = l.video_id
            JOIN users u ON u.id = v.owner_id
            WHERE l.liked_by = $1 AND l.video_id IS NOT NULL
            ORDER BY l.created_at DESC
            "#,
        )
        .bind(liked_by)
        .fetch_all(&self.pool)
        .await?;

        Ok(videos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_maps_to_matching_table_and_column() {
        let id = Uuid::new_v4();

        let video = LikeTarget::Video(id);
        assert_eq!((video.table(), video.column()), ("videos", "video_id"));

        let comment = LikeTarget::Comment(id);
        assert_eq!((comment.table(), comment.column()), ("comments", "comment_id"));

        let tweet = LikeTarget::Tweet(id);
        assert_eq!((tweet.table(), tweet.column()), ("tweets", "tweet_id"));

        assert_eq!(video.id(), id);
        assert_eq!(video.kind(), "Video");
    }
}
