//! 店面蛋糕目录

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/cakes", cake_routes())
}

fn cake_routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list))
        .route("/featured", get(handler::featured))
        .route("/{id}", get(handler::get_by_id))
}
