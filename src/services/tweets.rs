//! Tweet operations.
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::{Tweet, TweetWithAuthor};

const TWEET_COLUMNS: &str = "id, owner_id, content, created_at, updated_at";

pub struct TweetService {
    pool: PgPool,
}

impl TweetService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, owner_id: Uuid, content: &str) -> Result<Tweet> {
        let tweet: Tweet = sqlx::query_as(&format!(
            "INSERT INTO tweets (owner_id, content) VALUES ($1, $2) RETURNING {TWEET_COLUMNS}"
        ))
        .bind(owner_id)
        .bind(content)
        .fetch_one(&self.pool)
        .await?;

        Ok(tweet)
    }

    pub async fn list_for_user(&self, owner_id: Uuid) -> Result<Vec<TweetWithAuthor>> {
        let tweets = sqlx::query_as::<_, TweetWithAuthor>(
            r#"
            SELECT t.id, t.owner_id, t.content, t.created_at,
                   u.username AS author_username
            FROM tweets t
            JOIN users u ON u.id = t.owner_id
            WHERE t.owner_id = $1
            ORDER BY t.created_at DESC
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(tweets)
    }

    pub async fn get(&self, tweet_id: Uuid) -> Result<Tweet> {
        let tweet: Tweet = sqlx::query_as(&format!(
            "SELECT {TWEET_COLUMNS} FROM tweets WHERE id = $1"
        ))
        .bind(tweet_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Tweet not found".to_string()))?;

        Ok(tweet)
    }

    pub async fn update(&self, tweet_id: Uuid, content: &str) -> Result<Tweet> {
        let tweet: Tweet = sqlx::query_as(&format!(
            "UPDATE tweets SET content = $1, updated_at = NOW() \
             WHERE id = $2 RETURNING {TWEET_COLUMNS}"
        ))
        .bind(content)
        .bind(tweet_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Tweet not found".to_string()))?;

        Ok(tweet)
    }

    pub async fn delete(&self, tweet_id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM tweets WHERE id = $1")
            .bind(tweet_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Tweet not found".to_string()));
        }

        Ok(())
    }
}
