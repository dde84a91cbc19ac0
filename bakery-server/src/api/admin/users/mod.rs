//! Admin User Routes
//!
//! 仅管理员 (users:manage 不在员工的可配置权限中)

mod handler;

use axum::{
    Router, middleware,
    routing::{get, put},
};

use crate::auth::permissions::USERS_MANAGE;
use crate::auth::{require_admin, require_permission};
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/admin/users", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/{id}", put(handler::update).delete(handler::delete))
        .layer(middleware::from_fn(require_permission(USERS_MANAGE)))
        .layer(middleware::from_fn(require_admin))
}
