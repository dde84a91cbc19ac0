//! 本地磁盘图片存储

use std::path::PathBuf;

use async_trait::async_trait;

use super::{ImageStore, ImageUpload, calculate_hash, prepare};
use crate::{AppError, ErrorCode};

/// 文件名 = 内容 SHA256, 相同图片只存一份
#[derive(Debug, Clone)]
pub struct LocalImageStore {
    images_dir: PathBuf,
    public_base_url: String,
}

impl LocalImageStore {
    pub fn new(images_dir: impl Into<PathBuf>, public_base_url: impl Into<String>) -> Self {
        Self {
            images_dir: images_dir.into(),
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn images_dir(&self) -> &PathBuf {
        &self.images_dir
    }
}

#[async_trait]
impl ImageStore for LocalImageStore {
    async fn store(&self, upload: ImageUpload) -> Result<String, AppError> {
        let original_name = upload.file_name.clone().unwrap_or_default();
        let compressed = prepare(upload).await?;
        let file_name = format!("{}.jpg", calculate_hash(&compressed));
        let file_path = self.images_dir.join(&file_name);

        if tokio::fs::try_exists(&file_path).await.unwrap_or(false) {
            tracing::info!(
                original_name = %original_name,
                existing_file = %file_name,
                "Duplicate image detected, reusing existing file"
            );
        } else {
            tokio::fs::create_dir_all(&self.images_dir)
                .await
                .map_err(|e| {
                    AppError::with_message(
                        ErrorCode::FileStorageFailed,
                        format!("Failed to create images directory: {}", e),
                    )
                })?;
            tokio::fs::write(&file_path, &compressed).await.map_err(|e| {
                AppError::with_message(
                    ErrorCode::FileStorageFailed,
                    format!("Failed to save file: {}", e),
                )
            })?;
            tracing::info!(
                original_name = %original_name,
                size = compressed.len(),
                file = %file_name,
                "Image stored"
            );
        }

        Ok(format!("{}/api/images/{}", self.public_base_url, file_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::images::sample_png;

    #[tokio::test]
    async fn test_store_writes_jpeg_and_dedupes() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalImageStore::new(dir.path().join("images"), "http://localhost:5000/");

        let upload = ImageUpload {
            file_name: Some("cake.png".into()),
            content_type: Some("image/png".into()),
            data: sample_png(),
        };
        let first = store.store(upload.clone()).await.unwrap();
        let second = store.store(upload).await.unwrap();

        assert_eq!(first, second);
        assert!(first.starts_with("http://localhost:5000/api/images/"));
        assert!(first.ends_with(".jpg"));

        let files: Vec<_> = std::fs::read_dir(store.images_dir()).unwrap().collect();
        assert_eq!(files.len(), 1);
    }

    #[tokio::test]
    async fn test_store_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalImageStore::new(dir.path(), "http://localhost");
        let result = store
            .store(ImageUpload {
                file_name: Some("cake.png".into()),
                content_type: None,
                data: b"garbage".to_vec(),
            })
            .await;
        assert_eq!(result.unwrap_err().code, ErrorCode::InvalidImageFile);
    }
}
