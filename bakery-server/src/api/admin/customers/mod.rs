//! Admin Customer Routes
//!
//! 客户不是独立集合: 按订单电话号码聚合

mod handler;

use axum::{Router, middleware, routing::get};

use crate::auth::permissions::CUSTOMERS_VIEW;
use crate::auth::require_permission;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/admin/customers", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list))
        .route("/{phone}", get(handler::get_by_phone))
        .route("/{phone}/lifetime-value", get(handler::lifetime_value))
        .layer(middleware::from_fn(require_permission(CUSTOMERS_VIEW)))
}
