//! Admin Bulk Operation Routes (admin only by default)

mod handler;

use axum::{Router, middleware, routing::post};

use crate::auth::permissions::BULK_MANAGE;
use crate::auth::require_permission;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/admin/bulk", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/price-update", post(handler::price_update))
        .route("/availability", post(handler::availability))
        .route("/order-status", post(handler::order_status))
        .route("/delete-cakes", post(handler::delete_cakes))
        .route("/featured", post(handler::featured))
        .layer(middleware::from_fn(require_permission(BULK_MANAGE)))
}
