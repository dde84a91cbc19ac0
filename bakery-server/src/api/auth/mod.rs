//! Authentication Routes

mod handler;

use axum::{Router, routing::get, routing::post};

use crate::core::ServerState;

/// Build authentication router
/// - /api/auth/login: public (no auth required)
/// - /api/auth/me: protected by the global require_auth middleware
pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/auth/login", post(handler::login))
        .route("/api/auth/me", get(handler::me))
}
