//! 图片存储
//!
//! 蛋糕图片和定制申请参考图都经过同一条处理管线:
//! 校验 (大小 / 格式 / 可解码) → 转码 JPEG (质量 85) → 存储。
//!
//! - [`LocalImageStore`] - 写入 `{work_dir}/uploads/images`, 由 `/api/images/{filename}` 提供
//! - [`CloudinaryImageStore`] - 签名上传到 Cloudinary

mod cloudinary;
mod local;

pub use cloudinary::CloudinaryImageStore;
pub use local::LocalImageStore;

use std::io::Cursor;
use std::path::Path;

use async_trait::async_trait;
use sha2::{Digest, Sha256};

use crate::{AppError, ErrorCode};

/// Maximum file size (5MB)
pub const MAX_FILE_SIZE: usize = 5 * 1024 * 1024;

/// 每次请求最多图片数
pub const MAX_IMAGES_PER_REQUEST: usize = 5;

/// Supported image formats
pub const SUPPORTED_FORMATS: &[&str] = &["png", "jpg", "jpeg", "webp"];

/// JPEG quality (85% - 保持蛋糕颜色观感, 同时控制文件大小)
const JPEG_QUALITY: u8 = 85;

/// 上传的原始文件
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

/// 图片存储端口
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// 存储图片并返回可公开访问的 URL
    async fn store(&self, upload: ImageUpload) -> Result<String, AppError>;
}

/// Calculate SHA256 hash of data
pub fn calculate_hash(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// 推断扩展名: 优先文件名, 其次 Content-Type
fn detect_extension(upload: &ImageUpload) -> Option<String> {
    let from_name = upload
        .file_name
        .as_deref()
        .and_then(|name| Path::new(name).extension())
        .and_then(|ext| ext.to_str())
        .map(str::to_lowercase);
    if from_name.is_some() {
        return from_name;
    }

    let content_type = upload.content_type.as_deref()?;
    mime_guess::get_mime_extensions_str(content_type)?
        .iter()
        .find(|ext| SUPPORTED_FORMATS.contains(ext))
        .map(|ext| ext.to_string())
}

/// Validate image file
pub fn validate_image(upload: &ImageUpload) -> Result<(), AppError> {
    if upload.data.is_empty() {
        return Err(AppError::new(ErrorCode::EmptyFile));
    }

    if upload.data.len() > MAX_FILE_SIZE {
        return Err(AppError::with_message(
            ErrorCode::FileTooLarge,
            format!(
                "File too large. Maximum size is {} bytes ({}MB)",
                MAX_FILE_SIZE,
                MAX_FILE_SIZE / 1024 / 1024
            ),
        ));
    }

    let ext = detect_extension(upload).unwrap_or_default();
    if !SUPPORTED_FORMATS.contains(&ext.as_str()) {
        return Err(AppError::with_message(
            ErrorCode::UnsupportedFileFormat,
            format!(
                "Unsupported file format '{}'. Supported: {}",
                ext,
                SUPPORTED_FORMATS.join(", ")
            ),
        ));
    }

    Ok(())
}

/// 解码并重新编码为 JPEG
pub fn compress_to_jpeg(data: &[u8]) -> Result<Vec<u8>, AppError> {
    let img = image::load_from_memory(data).map_err(|e| {
        AppError::with_message(ErrorCode::InvalidImageFile, format!("Invalid image: {}", e))
    })?;

    let mut buffer = Vec::new();
    {
        let mut cursor = Cursor::new(&mut buffer);
        let rgb_img = img.to_rgb8();
        let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut cursor, JPEG_QUALITY);
        rgb_img.write_with_encoder(encoder).map_err(|e| {
            AppError::with_message(
                ErrorCode::ImageProcessingFailed,
                format!("Failed to compress image: {}", e),
            )
        })?;
    }

    Ok(buffer)
}

/// 校验 + 转码, CPU 密集部分放到阻塞线程
pub async fn prepare(upload: ImageUpload) -> Result<Vec<u8>, AppError> {
    validate_image(&upload)?;
    tokio::task::spawn_blocking(move || compress_to_jpeg(&upload.data))
        .await
        .map_err(|e| AppError::internal(format!("Image task failed: {}", e)))?
}

/// 文件名安全检查 (防止路径穿越)
pub fn is_safe_file_name(name: &str) -> bool {
    !(name.is_empty() || name.contains("..") || name.contains('/') || name.contains('\\'))
}

#[cfg(test)]
pub(crate) fn sample_png() -> Vec<u8> {
    let img = image::RgbImage::from_pixel(4, 4, image::Rgb([200, 100, 150]));
    let mut buffer = Vec::new();
    img.write_to(&mut Cursor::new(&mut buffer), image::ImageFormat::Png)
        .unwrap();
    buffer
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload(name: Option<&str>, content_type: Option<&str>, data: Vec<u8>) -> ImageUpload {
        ImageUpload {
            file_name: name.map(String::from),
            content_type: content_type.map(String::from),
            data,
        }
    }

    #[test]
    fn test_validate_rejects_empty_and_large() {
        let err = validate_image(&upload(Some("a.png"), None, vec![])).unwrap_err();
        assert_eq!(err.code, ErrorCode::EmptyFile);

        let err =
            validate_image(&upload(Some("a.png"), None, vec![0; MAX_FILE_SIZE + 1])).unwrap_err();
        assert_eq!(err.code, ErrorCode::FileTooLarge);
    }

    #[test]
    fn test_validate_checks_format() {
        let err = validate_image(&upload(Some("notes.pdf"), None, vec![1, 2, 3])).unwrap_err();
        assert_eq!(err.code, ErrorCode::UnsupportedFileFormat);

        assert!(validate_image(&upload(Some("CAKE.PNG"), None, vec![1])).is_ok());
        assert!(validate_image(&upload(None, Some("image/jpeg"), vec![1])).is_ok());
        assert!(validate_image(&upload(None, None, vec![1])).is_err());
    }

    #[test]
    fn test_compress_to_jpeg() {
        let jpeg = compress_to_jpeg(&sample_png()).unwrap();
        // JPEG SOI marker
        assert_eq!(&jpeg[..2], &[0xFF, 0xD8]);

        let err = compress_to_jpeg(b"not an image").unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidImageFile);
    }

    #[test]
    fn test_is_safe_file_name() {
        assert!(is_safe_file_name("abc123.jpg"));
        assert!(!is_safe_file_name(""));
        assert!(!is_safe_file_name("../secret"));
        assert!(!is_safe_file_name("a/b.jpg"));
        assert!(!is_safe_file_name("a\\b.jpg"));
    }

    #[test]
    fn test_hash_is_hex_sha256() {
        let hash = calculate_hash(b"cake");
        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
