//! Admin Custom Request Routes

mod handler;

use axum::{
    Router, middleware,
    routing::{get, patch},
};

use crate::auth::permissions::REQUESTS_MANAGE;
use crate::auth::require_permission;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/admin/custom-requests", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/status", patch(handler::update_status))
        .layer(middleware::from_fn(require_permission(REQUESTS_MANAGE)))
}
