//! 健康检查路由
//!
//! # 路由列表
//!
//! | 路径 | 方法 | 说明 | 认证 |
//! |------|------|------|------|
//! | /health | GET | 健康检查 | 无 |
//! | /api/health | GET | 同上 | 无 |
//!
//! # 响应示例
//!
//! ```json
//! {
//!   "status": "OK",
//!   "timestamp": "2026-02-14T09:30:00+00:00",
//!   "environment": "production",
//!   "database": "connected",
//!   "version": "0.1.0"
//! }
//! ```

use axum::{Json, Router, extract::State, routing::get};
use shared::response::HealthResponse;
use shared::util::{millis_to_rfc3339, now_millis};

use crate::core::ServerState;
use crate::db::DbService;

/// 健康检查路由 - 公共路由 (无需认证)
pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/health", get(health))
        .route("/api/health", get(health))
}

async fn health(State(state): State<ServerState>) -> Json<HealthResponse> {
    let database = if DbService::ping(&state.db).await {
        "connected"
    } else {
        tracing::warn!("Health check: database unreachable");
        "disconnected"
    };

    Json(HealthResponse {
        status: "OK".to_string(),
        timestamp: millis_to_rfc3339(now_millis()),
        environment: state.config.environment.clone(),
        database: database.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
