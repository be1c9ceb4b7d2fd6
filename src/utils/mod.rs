use std::collections::HashMap;
use std::path::{Path, PathBuf};

use axum::extract::multipart::Field;
use axum::extract::Multipart;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use crate::error::{AppError, Result};

const MAX_LIMIT: i64 = 100;

/// Normalized page/limit pair: 1-indexed page, default page=1 limit=10,
/// limit capped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
}

impl Pagination {
    pub fn new(page: Option<i64>, limit: Option<i64>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            limit: limit.unwrap_or(10).clamp(1, MAX_LIMIT),
        }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.limit
    }
}

/// A file part spooled to the local temp directory. The file is removed
/// when the handle drops, so a handler bailing out after the form is
/// read cannot leak temp files.
#[derive(Debug)]
pub struct SpooledFile {
    pub file_name: String,
    path: PathBuf,
}

impl SpooledFile {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for SpooledFile {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            tracing::warn!("Failed to remove temp file {}: {}", self.path.display(), e);
        }
    }
}

/// A fully-read multipart form: text fields by name, file parts spooled
/// to disk under the given temp directory so uploads never sit whole in
/// memory.
#[derive(Debug, Default)]
pub struct MultipartForm {
    pub fields: HashMap<String, String>,
    pub files: HashMap<String, SpooledFile>,
}

impl MultipartForm {
    pub async fn read(mut multipart: Multipart, temp_dir: &Path) -> Result<Self> {
        let mut form = MultipartForm::default();

        while let Some(mut field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::BadRequest(format!("Malformed multipart body: {e}")))?
        {
            let Some(name) = field.name().map(String::from) else {
                continue;
            };

            if let Some(file_name) = field.file_name().map(String::from) {
                let spooled = spool_field(&mut field, temp_dir, file_name).await?;
                form.files.insert(name, spooled);
            } else {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Failed to read field: {e}")))?;
                form.fields.insert(name, value);
            }
        }

        Ok(form)
    }

    /// Required non-blank text field, trimmed.
    pub fn require_field(&self, name: &str) -> Result<String> {
        self.fields
            .get(name)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| AppError::BadRequest(format!("{name} is required")))
    }
}

/// Stream a file part to the temp directory chunk by chunk.
async fn spool_field(field: &mut Field<'_>, dir: &Path, file_name: String) -> Result<SpooledFile> {
    let ext = Path::new(&file_name)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("bin");
    let path = dir.join(format!("{}.{}", Uuid::new_v4(), ext));

    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to create temp dir: {e}")))?;
    let mut file = tokio::fs::File::create(&path)
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to create temp file: {e}")))?;

    // From here on the Drop impl cleans up, whichever branch returns.
    let spooled = SpooledFile { file_name, path };

    while let Some(chunk) = field
        .chunk()
        .await
        .map_err(|e| AppError::BadRequest(format!("Failed to read upload: {e}")))?
    {
        file.write_all(&chunk)
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to spool upload: {e}")))?;
    }
    file.flush()
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to spool upload: {e}")))?;

    Ok(spooled)
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::body::Body;
    use axum::extract::FromRequest;
    use axum::http::{header::CONTENT_TYPE, Request};

    #[test]
    fn pagination_defaults() {
        let p = Pagination::new(None, None);
        assert_eq!(p.page, 1);
        assert_eq!(p.limit, 10);
        assert_eq!(p.offset(), 0);
    }

    #[test]
    fn pagination_offset_is_one_indexed() {
        // page=2, limit=5 skips items 1-5 and returns 6-10
        let p = Pagination::new(Some(2), Some(5));
        assert_eq!(p.offset(), 5);
        assert_eq!(p.limit, 5);
    }

    #[test]
    fn pagination_clamps_bad_input() {
        let p = Pagination::new(Some(0), Some(10_000));
        assert_eq!(p.page, 1);
        assert_eq!(p.limit, MAX_LIMIT);

        let p = Pagination::new(Some(-3), Some(0));
        assert_eq!(p.page, 1);
        assert_eq!(p.limit, 1);
    }

    fn multipart_body(boundary: &str) -> Vec<u8> {
        let mut body = Vec::new();
        body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
        body.extend_from_slice(b"Content-Disposition: form-data; name=\"title\"\r\n\r\n");
        body.extend_from_slice(b"hello\r\n");
        body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
        body.extend_from_slice(
            b"Content-Disposition: form-data; name=\"clip\"; filename=\"clip.mp4\"\r\n\r\n",
        );
        body.extend_from_slice(b"data");
        body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());
        body
    }

    #[tokio::test]
    async fn read_spools_files_and_cleans_up_on_drop() {
        let boundary = "form-test-boundary";
        let request = Request::builder()
            .header(
                CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(multipart_body(boundary)))
            .unwrap();
        let multipart = Multipart::from_request(request, &())
            .await
            .expect("multipart extractor");

        let dir = std::env::temp_dir().join("vidtube-form-test");
        let form = MultipartForm::read(multipart, &dir)
            .await
            .expect("should read");

        assert_eq!(form.fields.get("title").map(String::as_str), Some("hello"));

        let clip = form.files.get("clip").expect("file part");
        assert_eq!(clip.file_name, "clip.mp4");
        assert_eq!(clip.path().extension().and_then(|e| e.to_str()), Some("mp4"));
        assert_eq!(std::fs::read(clip.path()).expect("spooled"), b"data");

        let path = clip.path().to_path_buf();
        drop(form);
        assert!(!path.exists());
    }

    #[test]
    fn require_field_rejects_blank_values() {
        let mut form = MultipartForm::default();
        form.fields.insert("title".to_string(), "  ".to_string());

        assert!(form.require_field("title").is_err());
        assert!(form.require_field("missing").is_err());

        form.fields.insert("name".to_string(), " chai ".to_string());
        assert_eq!(form.require_field("name").expect("present"), "chai");
    }
}
