//! Server Implementation
//!
//! HTTP 服务器启动和管理

use std::net::SocketAddr;
use std::time::{Duration, Instant};

use axum::extract::{DefaultBodyLimit, MatchedPath, Request};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::Router;
use http::{HeaderName, HeaderValue};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use tower_http::timeout::TimeoutLayer;
use uuid::Uuid;

use crate::auth::require_auth;
use crate::core::{Config, Result, ServerError, ServerState};
use crate::services::images::{MAX_FILE_SIZE, MAX_IMAGES_PER_REQUEST};

/// 请求体上限: 5 张图片 + 表单字段
const MAX_BODY_SIZE: usize = MAX_IMAGES_PER_REQUEST * MAX_FILE_SIZE + 1024 * 1024;

#[derive(Clone)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// HTTP 请求日志中间件
///
/// 记录方法、路径、状态码和延迟
async fn log_request(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let request_id = req
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-")
        .to_string();
    let method = req.method().clone();
    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| req.uri().path().to_string());

    let response = next.run(req).await;

    let latency_ms = start.elapsed().as_millis() as u64;
    let status = response.status();
    if status.is_server_error() {
        tracing::warn!(target: "http_access", request_id = %request_id, method = %method, path = %path, status = status.as_u16(), latency_ms, "Request completed with server error");
    } else if status.is_client_error() {
        tracing::warn!(target: "http_access", request_id = %request_id, method = %method, path = %path, status = status.as_u16(), latency_ms, "Request completed with client error");
    } else {
        tracing::info!(target: "http_access", request_id = %request_id, method = %method, path = %path, status = status.as_u16(), latency_ms, "Request completed");
    }

    response
}

/// Build a router with all routes registered (no middleware, no state)
pub fn build_router() -> Router<ServerState> {
    Router::<ServerState>::new()
        // Public
        .merge(crate::api::health::router())
        .merge(crate::api::auth::router())
        .merge(crate::api::cakes::router())
        .merge(crate::api::orders::router())
        .merge(crate::api::custom_cakes::router())
        .merge(crate::api::images::router())
        // Dashboard
        .merge(crate::api::admin::router())
}

/// Build a fully configured application with all middleware and state
///
/// HTTP 服务器和集成测试 (`oneshot`) 共用
pub fn build_app(state: &ServerState) -> Router {
    let timeout = Duration::from_millis(state.config.request_timeout_ms);

    build_router()
        // JWT 认证 - 在 Router 级别应用, require_auth 内部会跳过公共路由
        .layer(middleware::from_fn_with_state(state.clone(), require_auth))
        .layer(DefaultBodyLimit::max(MAX_BODY_SIZE))
        .with_state(state.clone())
        // ========== Tower HTTP Middleware ==========
        .layer(TimeoutLayer::new(timeout))
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .layer(middleware::from_fn(log_request))
        .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
            "x-request-id",
        )))
        .layer(SetRequestIdLayer::new(
            HeaderName::from_static("x-request-id"),
            XRequestId,
        ))
}

/// HTTP Server
pub struct Server {
    config: Config,
    state: Option<ServerState>,
}

impl Server {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            state: None,
        }
    }

    /// Create server with existing state
    pub fn with_state(config: Config, state: ServerState) -> Self {
        Self {
            config,
            state: Some(state),
        }
    }

    pub async fn run(&self) -> Result<()> {
        let state = match &self.state {
            Some(s) => s.clone(),
            None => ServerState::initialize(&self.config).await?,
        };

        let app = build_app(&state);
        let addr = SocketAddr::from(([0, 0, 0, 0], self.config.http_port));
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|source| ServerError::Bind { addr, source })?;

        tracing::info!("🎂 Bakery Server listening on {}", addr);

        let shutdown = async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutting down...");
        };

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| ServerError::Internal(e.into()))?;

        Ok(())
    }
}
