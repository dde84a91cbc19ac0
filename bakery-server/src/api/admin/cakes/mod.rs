//! Admin Cake Routes
//!
//! 创建 / 更新支持 JSON 或 multipart (最多 5 张图片, 字段 `images`)

mod handler;
mod payload;

use axum::{Router, middleware, routing::get};

use crate::auth::permissions::CAKES_MANAGE;
use crate::auth::require_permission;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/admin/cakes", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
        .layer(middleware::from_fn(require_permission(CAKES_MANAGE)))
}
