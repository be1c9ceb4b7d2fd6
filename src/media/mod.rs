//! Media delegate: the object-storage collaborator behind avatar, cover,
//! video and thumbnail uploads. Treated as opaque by handlers; an upload
//! failure is fatal to the enclosing operation.
use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use aws_sdk_s3::config::Region;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use uuid::Uuid;

use crate::config::StorageConfig;
use crate::error::{AppError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    fn key_prefix(&self) -> &'static str {
        match self {
            MediaKind::Image => "images",
            MediaKind::Video => "videos",
        }
    }
}

#[derive(Debug, Clone)]
pub struct UploadedMedia {
    pub url: String,
    /// Duration in seconds when the provider can report it; object
    /// storage cannot probe media, so this stays None for S3.
    pub duration: Option<f64>,
}

#[async_trait]
pub trait MediaStore: Send + Sync {
    async fn upload(&self, local_path: &Path, kind: MediaKind) -> Result<UploadedMedia>;
    async fn delete(&self, url: &str, kind: MediaKind) -> Result<()>;
}

pub struct S3MediaStore {
    client: Client,
    bucket: String,
    public_base_url: String,
    call_timeout: Duration,
}

impl S3MediaStore {
    pub async fn new(config: &StorageConfig) -> Self {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(Region::new(config.region.clone()));

        if let Some(endpoint) = &config.endpoint {
            loader = loader.endpoint_url(endpoint.clone());
        }

        let sdk_config = loader.load().await;

        Self {
            client: Client::new(&sdk_config),
            bucket: config.bucket.clone(),
            public_base_url: config.public_base_url.trim_end_matches('/').to_string(),
            call_timeout: Duration::from_secs(config.upload_timeout_secs),
        }
    }

    fn object_key(&self, local_path: &Path, kind: MediaKind) -> String {
        let ext = local_path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("bin");
        format!("{}/{}.{}", kind.key_prefix(), Uuid::new_v4(), ext)
    }

    fn key_from_url<'a>(&self, url: &'a str) -> Result<&'a str> {
        url.strip_prefix(&self.public_base_url)
            .map(|k| k.trim_start_matches('/'))
            .ok_or_else(|| {
                AppError::Internal(anyhow::anyhow!("URL does not belong to media storage: {url}"))
            })
    }
}

#[async_trait]
impl MediaStore for S3MediaStore {
    async fn upload(&self, local_path: &Path, kind: MediaKind) -> Result<UploadedMedia> {
        let key = self.object_key(local_path, kind);
        let content_type = mime_guess::from_path(local_path)
            .first_or_octet_stream()
            .to_string();

        let body = ByteStream::from_path(local_path)
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to read upload: {e}")))?;

        let put = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .content_type(content_type)
            .body(body)
            .send();

        tokio::time::timeout(self.call_timeout, put)
            .await
            .map_err(|_| AppError::Internal(anyhow::anyhow!("Media upload timed out")))?
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Media upload failed: {e}")))?;

        Ok(UploadedMedia {
            url: format!("{}/{}", self.public_base_url, key),
            duration: None,
        })
    }

    async fn delete(&self, url: &str, _kind: MediaKind) -> Result<()> {
        let key = self.key_from_url(url)?;

        let del = self
            .client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send();

        tokio::time::timeout(self.call_timeout, del)
            .await
            .map_err(|_| AppError::Internal(anyhow::anyhow!("Media delete timed out")))?
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Media delete failed: {e}")))?;

        Ok(())
    }
}
