//! Comment operations, paginated per video.
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::Comment;

const COMMENT_COLUMNS: &str = "id, video_id, owner_id, content, created_at, updated_at";

pub struct CommentService {
    pool: PgPool,
}

impl CommentService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_for_video(
        &self,
        video_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Comment>> {
        let comments = sqlx::query_as::<_, Comment>(&format!(
            "SELECT {COMMENT_COLUMNS} FROM comments \
             WHERE video_id = $1 ORDER BY created_at ASC LIMIT $2 OFFSET $3"
        ))
        .bind(video_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(comments)
    }

    pub async fn add(&self, video_id: Uuid, owner_id: Uuid, content: &str) -> Result<Comment> {
        let video_exists: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM videos WHERE id = $1")
            .bind(video_id)
            .fetch_optional(&self.pool)
            .await?;

        if video_exists.is_none() {
            return Err(AppError::NotFound("Video not found".to_string()));
        }

        let comment: Comment = sqlx::query_as(&format!(
            "INSERT INTO comments (video_id, owner_id, content) \
             VALUES ($1, $2, $3) RETURNING {COMMENT_COLUMNS}"
        ))
        .bind(video_id)
        .bind(owner_id)
        .bind(content)
        .fetch_one(&self.pool)
        .await?;

        Ok(comment)
    }

    pub async fn get(&self, comment_id: Uuid) -> Result<Comment> {
        let comment: Comment = sqlx::query_as(&format!(
            "SELECT {COMMENT_COLUMNS} FROM comments WHERE id = $1"
        ))
        .bind(comment_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Comment not found".to_string()))?;

        Ok(comment)
    }

    pub async fn update(&self, comment_id: Uuid, content: &str) -> Result<Comment> {
        let comment: Comment = sqlx::query_as(&format!(
            "UPDATE comments SET content = $1, updated_at = NOW() \
             WHERE id = $2 RETURNING {COMMENT_COLUMNS}"
        ))
        .bind(content)
        .bind(comment_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Comment not found".to_string()))?;

        Ok(comment)
    }

    pub async fn delete(&self, comment_id: Uuid) -> Result<Comment> {
        let comment: Comment = sqlx::query_as(&format!(
            "DELETE FROM comments WHERE id = $1 RETURNING {COMMENT_COLUMNS}"
        ))
        .bind(comment_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Comment not found".to_string()))?;

        Ok(comment)
    }
}
