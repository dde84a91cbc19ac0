//! 定制蛋糕申请路由
//!
//! | 路径 | 方法 | 说明 | 认证 |
//! |------|------|------|------|
//! | /api/custom-cakes | POST | multipart 表单, 最多 5 张参考图 (`images`) | 无 |

mod handler;

use axum::{Router, routing::post};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/custom-cakes", post(handler::create))
}
