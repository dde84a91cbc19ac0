//! Admin Analytics Routes (admin only by default)

mod handler;

use axum::{Router, middleware, routing::get};

use crate::auth::permissions::ANALYTICS_VIEW;
use crate::auth::require_permission;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/admin/analytics", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/sales-overview", get(handler::sales_overview))
        .route("/revenue-trends", get(handler::revenue_trends))
        .route("/customer-analytics", get(handler::customer_analytics))
        .route("/export-orders", get(handler::export_orders))
        .layer(middleware::from_fn(require_permission(ANALYTICS_VIEW)))
}
