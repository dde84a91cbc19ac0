//! Cloudinary 图片存储 (签名上传)

use async_trait::async_trait;
use serde::Deserialize;
use sha2::{Digest, Sha256};

use super::{ImageStore, ImageUpload, prepare};
use crate::core::config::CloudinaryConfig;
use crate::{AppError, ErrorCode};

const API_BASE: &str = "https://api.cloudinary.com/v1_1";

#[derive(Debug, Deserialize)]
struct UploadResult {
    secure_url: String,
}

pub struct CloudinaryImageStore {
    client: reqwest::Client,
    config: CloudinaryConfig,
}

impl CloudinaryImageStore {
    pub fn new(config: CloudinaryConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    fn upload_url(&self) -> String {
        format!("{}/{}/image/upload", API_BASE, self.config.cloud_name)
    }
}

/// 签名: 参数按名称排序拼接 `k=v&k=v`, 末尾追加 secret, 取 SHA256
pub fn sign(params: &[(&str, String)], api_secret: &str) -> String {
    let mut sorted: Vec<_> = params.iter().collect();
    sorted.sort_by(|a, b| a.0.cmp(b.0));
    let joined = sorted
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&");

    let mut hasher = Sha256::new();
    hasher.update(joined.as_bytes());
    hasher.update(api_secret.as_bytes());
    hex::encode(hasher.finalize())
}

fn storage_error(msg: String) -> AppError {
    AppError::with_message(ErrorCode::FileStorageFailed, msg)
}

#[async_trait]
impl ImageStore for CloudinaryImageStore {
    async fn store(&self, upload: ImageUpload) -> Result<String, AppError> {
        let compressed = prepare(upload).await?;

        let timestamp = chrono::Utc::now().timestamp();
        let suffix = uuid::Uuid::new_v4().simple().to_string();
        let public_id = format!("cake-{}-{}", timestamp * 1000, &suffix[..7]);

        let params = [
            ("folder", self.config.folder.clone()),
            ("public_id", public_id.clone()),
            ("timestamp", timestamp.to_string()),
        ];
        let signature = sign(&params, &self.config.api_secret);

        let part = reqwest::multipart::Part::bytes(compressed)
            .file_name(format!("{}.jpg", public_id))
            .mime_str("image/jpeg")
            .map_err(|e| storage_error(format!("Failed to create multipart: {}", e)))?;

        let mut form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("api_key", self.config.api_key.clone())
            .text("signature", signature)
            .text("signature_algorithm", "sha256");
        for (key, value) in params {
            form = form.text(key, value);
        }

        let resp = self
            .client
            .post(self.upload_url())
            .multipart(form)
            .send()
            .await
            .map_err(|e| storage_error(format!("Upload failed: {}", e)))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(storage_error(format!("Upload failed ({}): {}", status, text)));
        }

        let result: UploadResult = resp
            .json()
            .await
            .map_err(|e| storage_error(format!("Failed to parse response: {}", e)))?;

        tracing::info!(public_id = %public_id, url = %result.secure_url, "Image uploaded to Cloudinary");
        Ok(result.secure_url)
    }
}
