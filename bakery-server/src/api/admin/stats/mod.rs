//! Dashboard Stats

mod handler;

use axum::{Router, middleware, routing::get};

use crate::auth::permissions::DASHBOARD_VIEW;
use crate::auth::require_permission;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/admin/stats", get(handler::stats))
        .layer(middleware::from_fn(require_permission(DASHBOARD_VIEW)))
}
