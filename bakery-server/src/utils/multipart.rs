//! Multipart 表单读取
//!
//! 文本字段收集为 map, 文件字段 (`images`) 收集为 [`ImageUpload`]。

use std::collections::HashMap;

use axum::extract::Multipart;

use crate::services::images::{ImageUpload, MAX_IMAGES_PER_REQUEST};
use crate::utils::{AppError, AppResult, ErrorCode};

/// 图片字段名
pub const IMAGES_FIELD: &str = "images";

#[derive(Debug, Default)]
pub struct MultipartForm {
    pub fields: HashMap<String, String>,
    pub images: Vec<ImageUpload>,
}

impl MultipartForm {
    /// 读取完整表单; 图片超过上限返回 TooManyImages
    pub async fn read(mut multipart: Multipart) -> AppResult<Self> {
        let mut form = Self::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::validation(format!("Invalid multipart request: {}", e)))?
        {
            let name = field.name().unwrap_or_default().to_string();
            let file_name = field.file_name().map(str::to_string);

            if name == IMAGES_FIELD || file_name.is_some() {
                let content_type = field.content_type().map(str::to_string);
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::validation(format!("Multipart error: {}", e)))?;
                // 空文件输入框 (未选择文件) 直接忽略
                if data.is_empty() && file_name.as_deref().is_none_or(str::is_empty) {
                    continue;
                }
                form.images.push(ImageUpload {
                    file_name,
                    content_type,
                    data: data.to_vec(),
                });
                if form.images.len() > MAX_IMAGES_PER_REQUEST {
                    return Err(AppError::with_message(
                        ErrorCode::TooManyImages,
                        format!("At most {} images are allowed", MAX_IMAGES_PER_REQUEST),
                    ));
                }
            } else {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::validation(format!("Multipart error: {}", e)))?;
                form.fields.insert(name, value);
            }
        }

        Ok(form)
    }

    /// 取出文本字段, 空白视为未填写
    pub fn take(&mut self, key: &str) -> Option<String> {
        self.fields
            .remove(key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_take_trims_and_drops_blank() {
        let mut form = MultipartForm::default();
        form.fields.insert("name".into(), "  Rose Cake ".into());
        form.fields.insert("color".into(), "   ".into());

        assert_eq!(form.take("name").as_deref(), Some("Rose Cake"));
        assert_eq!(form.take("name"), None);
        assert_eq!(form.take("color"), None);
        assert_eq!(form.take("missing"), None);
    }
}
