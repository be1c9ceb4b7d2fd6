//! Video catalog operations.
use sqlx::{PgPool, QueryBuilder};
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::{Video, VideoWithOwner};

const VIDEO_COLUMNS: &str = "id, owner_id, title, description, video_url, thumbnail_url, \
     duration, views, is_published, created_at, updated_at";

/// Sort fields a caller may request; anything else falls back to
/// `created_at`. Keeps user input out of the ORDER BY clause.
pub fn sort_column(requested: Option<&str>) -> &'static str {
    match requested {
        Some("title") => "title",
        Some("duration") => "duration",
        Some("views") => "views",
        _ => "created_at",
    }
}

pub struct ListVideosParams {
    pub limit: i64,
    pub offset: i64,
    pub owner_id: Option<Uuid>,
    pub query: Option<String>,
    pub sort_by: Option<String>,
    pub descending: bool,
}

pub struct CreateVideo {
    pub owner_id: Uuid,
    pub title: String,
    pub description: String,
    pub video_url: String,
    pub thumbnail_url: String,
    pub duration: f64,
}

pub struct VideoService {
    pool: PgPool,
}

impl VideoService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Filtered, sorted, paginated listing joined with owner fields.
    /// The free-text query matches title/description via the GIN index.
    pub async fn list(&self, params: ListVideosParams) -> Result<Vec<VideoWithOwner>> {
        let mut qb = QueryBuilder::new(
            "SELECT v.id, v.owner_id, v.title, v.description, v.video_url, \
             v.thumbnail_url, v.duration, v.views, v.is_published, v.created_at, \
             u.username AS owner_username, u.fullname AS owner_fullname, \
             u.avatar_url AS owner_avatar_url \
             FROM videos v JOIN users u ON u.id = v.owner_id \
             WHERE v.is_published = TRUE",
        );

        if let Some(owner_id) = params.owner_id {
            qb.push(" AND v.owner_id = ");
            qb.push_bind(owner_id);
        }

        if let Some(query) = params.query.as_deref().filter(|q| !q.trim().is_empty()) {
            qb.push(
                " AND to_tsvector('english', v.title || ' ' || v.description) @@ plainto_tsquery('english', ",
            );
            qb.push_bind(query.to_string());
            qb.push(")");
        }

        qb.push(format!(
            " ORDER BY v.{} {}",
            sort_column(params.sort_by.as_deref()),
            if params.descending { "DESC" } else { "ASC" }
        ));

        qb.push(" LIMIT ");
        qb.push_bind(params.limit);
        qb.push(" OFFSET ");
        qb.push_bind(params.offset);

        let videos = qb
            .build_query_as::<VideoWithOwner>()
            .fetch_all(&self.pool)
            .await?;

        Ok(videos)
    }

    pub async fn create(&self, input: CreateVideo) -> Result<Video> {
        let video: Video = sqlx::query_as(&format!(
            "INSERT INTO videos (owner_id, title, description, video_url, thumbnail_url, duration) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {VIDEO_COLUMNS}"
        ))
        .bind(input.owner_id)
        .bind(&input.title)
        .bind(&input.description)
        .bind(&input.video_url)
        .bind(&input.thumbnail_url)
        .bind(input.duration)
        .fetch_one(&self.pool)
        .await?;

        Ok(video)
    }

    pub async fn get(&self, video_id: Uuid) -> Result<Video> {
        let video: Video = sqlx::query_as(&format!(
            "SELECT {VIDEO_COLUMNS} FROM videos WHERE id = $1"
        ))
        .bind(video_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Video not found".to_string()))?;

        Ok(video)
    }

    pub async fn increment_views(&self, video_id: Uuid) -> Result<()> {
        sqlx::query("UPDATE videos SET views = views + 1 WHERE id = $1")
            .bind(video_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    pub async fn update(
        &self,
        video_id: Uuid,
        title: Option<&str>,
        description: Option<&str>,
        thumbnail_url: Option<&str>,
    ) -> Result<Video> {
        let video: Video = sqlx::query_as(&format!(
            "UPDATE videos SET title = COALESCE($1, title), \
             description = COALESCE($2, description), \
             thumbnail_url = COALESCE($3, thumbnail_url), updated_at = NOW() \
             WHERE id = $4 RETURNING {VIDEO_COLUMNS}"
        ))
        .bind(title)
        .bind(description)
        .bind(thumbnail_url)
        .bind(video_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Video not found".to_string()))?;

        Ok(video)
    }

    pub async fn delete(&self, video_id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM videos WHERE id = $1")
            .bind(video_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Video not found".to_string()));
        }

        Ok(())
    }

    pub async fn toggle_publish(&self, video_id: Uuid) -> Result<Video> {
        let video: Video = sqlx::query_as(&format!(
            "UPDATE videos SET is_published = NOT is_published, updated_at = NOW() \
             WHERE id = $1 RETURNING {VIDEO_COLUMNS}"
        ))
        .bind(video_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Video not found".to_string()))?;

        Ok(video)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_column_is_allow_listed() {
        assert_eq!(sort_column(Some("views")), "views");
        assert_eq!(sort_column(Some("title")), "title");
        assert_eq!(sort_column(Some("duration")), "duration");
        // Unknown or hostile input falls back to the default
        assert_eq!(sort_column(Some("views; DROP TABLE videos")), "created_at");
        assert_eq!(sort_column(None), "created_at");
    }
}
