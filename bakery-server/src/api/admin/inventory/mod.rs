//! Admin Inventory Routes

mod handler;

use axum::{
    Router, middleware,
    routing::{get, patch, post},
};

use crate::auth::permissions::INVENTORY_MANAGE;
use crate::auth::require_permission;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/admin/inventory", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/low-stock", get(handler::low_stock))
        .route("/analytics", get(handler::analytics))
        .route("/bulk-stock", post(handler::bulk_stock))
        .route("/{id}/stock", patch(handler::update_stock))
        .layer(middleware::from_fn(require_permission(INVENTORY_MANAGE)))
}
