//! Playlist operations. The video list is an ordered array column;
//! duplicates are allowed and removal takes the first occurrence.
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::Playlist;

const PLAYLIST_COLUMNS: &str = "id, owner_id, name, description, video_ids, created_at, updated_at";

/// Remove the first occurrence of `video_id`, preserving order.
/// Returns None when the video is not in the list.
pub fn remove_first_occurrence(video_ids: &[Uuid], video_id: Uuid) -> Option<Vec<Uuid>> {
    let index = video_ids.iter().position(|id| *id == video_id)?;
    let mut updated = video_ids.to_vec();
    updated.remove(index);
    Some(updated)
}

pub struct PlaylistService {
    pool: PgPool,
}

impl PlaylistService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, owner_id: Uuid, name: &str, description: &str) -> Result<Playlist> {
        let playlist: Playlist = sqlx::query_as(&format!(
            "INSERT INTO playlists (owner_id, name, description) \
             VALUES ($1, $2, $3) RETURNING {PLAYLIST_COLUMNS}"
        ))
        .bind(owner_id)
        .bind(name)
        .bind(description)
        .fetch_one(&self.pool)
        .await?;

        Ok(playlist)
    }

    pub async fn list_for_user(&self, owner_id: Uuid) -> Result<Vec<Playlist>> {
        let playlists = sqlx::query_as::<_, Playlist>(&format!(
            "SELECT {PLAYLIST_COLUMNS} FROM playlists WHERE owner_id = $1 ORDER BY created_at DESC"
        ))
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(playlists)
    }

    pub async fn get(&self, playlist_id: Uuid) -> Result<Playlist> {
        let playlist: Playlist = sqlx::query_as(&format!(
            "SELECT {PLAYLIST_COLUMNS} FROM playlists WHERE id = $1"
        ))
        .bind(playlist_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Playlist not found".to_string()))?;

        Ok(playlist)
    }

    pub async fn add_video(&self, playlist_id: Uuid, video_id: Uuid) -> Result<Playlist> {
        let playlist: Playlist = sqlx::query_as(&format!(
            "UPDATE playlists SET video_ids = array_append(video_ids, $1), updated_at = NOW() \
             WHERE id = $2 RETURNING {PLAYLIST_COLUMNS}"
        ))
        .bind(video_id)
        .bind(playlist_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Playlist not found".to_string()))?;

        Ok(playlist)
    }

    pub async fn remove_video(&self, playlist_id: Uuid, video_id: Uuid) -> Result<Playlist> {
        let playlist = self.get(playlist_id).await?;

        let updated = remove_first_occurrence(&playlist.video_ids, video_id)
            .ok_or_else(|| AppError::NotFound("Video not found in playlist".to_string()))?;

        let playlist: Playlist = sqlx::query_as(&format!(
            "UPDATE playlists SET video_ids = $1, updated_at = NOW() \
             WHERE id = $2 RETURNING {PLAYLIST_COLUMNS}"
        ))
        .bind(&updated)
        .bind(playlist_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(playlist)
    }

    pub async fn update(
        &self,
        playlist_id: Uuid,
        name: Option<&str>,
        description: Option<&str>,
    ) -> Result<Playlist> {
        let playlist: Playlist = sqlx::query_as(&format!(
            "UPDATE playlists SET name = COALESCE($1, name), \
             description = COALESCE($2, description), updated_at = NOW() \
             WHERE id = $3 RETURNING {PLAYLIST_COLUMNS}"
        ))
        .bind(name)
        .bind(description)
        .bind(playlist_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Playlist not found".to_string()))?;

        Ok(playlist)
    }

    pub async fn delete(&self, playlist_id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM playlists WHERE id = $1")
            .bind(playlist_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Playlist not found".to_string()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removes_only_the_first_duplicate() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let list = vec![a, b, a];

        let updated = remove_first_occurrence(&list, a).expect("present");
        assert_eq!(updated, vec![b, a]);
    }

    #[test]
    fn preserves_order_of_remaining_entries() {
        let ids: Vec<Uuid> = (0..4).map(|_| Uuid::new_v4()).collect();
        let updated = remove_first_occurrence(&ids, ids[2]).expect("present");
        assert_eq!(updated, vec![ids[0], ids[1], ids[3]]);
    }

    #[test]
    fn absent_video_yields_none() {
        let list = vec![Uuid::new_v4()];
        assert!(remove_first_occurrence(&list, Uuid::new_v4()).is_none());
    }
}
