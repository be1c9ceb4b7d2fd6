//! Channel-owner dashboard aggregates.
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{ChannelStats, Video};

pub struct DashboardService {
    pool: PgPool,
}

impl DashboardService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn channel_stats(&self, owner_id: Uuid) -> Result<ChannelStats> {
        let stats: ChannelStats = sqlx::query_as(
            r#"
            SELECT
                (SELECT COUNT(*) FROM videos v WHERE v.owner_id = $1) AS total_videos,
                (SELECT COALESCE(SUM(v.views), 0)::BIGINT FROM videos v WHERE v.owner_id = $1)
                    AS total_views,
                (SELECT COUNT(*) FROM likes l
                 JOIN videos v ON v.id = l.video_id
                 WHERE v.owner_id = $1) AS total_likes,
                (SELECT COUNT(*) FROM subscriptions s WHERE s.channel_id = $1)
                    AS total_subscribers
            "#,
        )
        .bind(owner_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(stats)
    }

    pub async fn channel_videos(&self, owner_id: Uuid) -> Result<Vec<Video>> {
        let videos = sqlx::query_as::<_, Video>(
            "SELECT id, owner_id, title, description, video_url, thumbnail_url, \
             duration, views, is_published, created_at, updated_at \
             FROM videos WHERE owner_id = $1 ORDER BY created_at DESC",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(videos)
    }
}
