//! Image Routes
//!
//! 提供本地图片存储的文件访问 (Cloudinary 图片直接走 CDN)

use axum::{
    Router,
    body::Bytes,
    extract::{Path, State},
    response::IntoResponse,
    routing::get,
};
use http::header;

use crate::core::ServerState;
use crate::services::images::is_safe_file_name;

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/images/{filename}", get(serve_image))
}

/// Image file response
enum ImageFileResponse {
    Ok(Bytes),
    NotFound,
    BadRequest(&'static str),
}

impl IntoResponse for ImageFileResponse {
    fn into_response(self) -> axum::response::Response {
        match self {
            ImageFileResponse::Ok(content) => (
                http::StatusCode::OK,
                [
                    (header::CONTENT_TYPE, "image/jpeg"),
                    (header::CACHE_CONTROL, "public, max-age=31536000, immutable"),
                ],
                content,
            )
                .into_response(),
            ImageFileResponse::NotFound => {
                (http::StatusCode::NOT_FOUND, "File not found").into_response()
            }
            ImageFileResponse::BadRequest(msg) => {
                (http::StatusCode::BAD_REQUEST, msg).into_response()
            }
        }
    }
}

/// GET /api/images/:filename
///
/// 文件名为内容哈希, 内容不变, 可长期缓存
async fn serve_image(
    State(state): State<ServerState>,
    Path(filename): Path<String>,
) -> ImageFileResponse {
    // Security check: prevent path traversal
    if !is_safe_file_name(&filename) {
        return ImageFileResponse::BadRequest("Invalid filename");
    }

    let file_path = state.config.images_dir().join(&filename);
    match tokio::fs::read(&file_path).await {
        Ok(content) => ImageFileResponse::Ok(Bytes::from(content)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => ImageFileResponse::NotFound,
        Err(e) => {
            tracing::error!(path = %file_path.display(), error = %e, "Failed to read image");
            ImageFileResponse::NotFound
        }
    }
}
