//! 认证中间件
//!
//! 为 JWT 认证和授权提供 Axum 中间件

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use http::Method;

use crate::AppError;
use crate::auth::{CurrentUser, JwtService};
use crate::core::ServerState;
use crate::security_log;

/// 判断请求是否为公共路由 (无需登录)
///
/// - `OPTIONS *` (CORS 预检)
/// - 非 `/api/` 路径
/// - `/api/health`、`/api/auth/login`
/// - `GET /api/cakes`、`GET /api/cakes/{id}`
/// - `POST /api/orders` (结账)
/// - `POST /api/custom-cakes` (定制申请)
/// - `GET /api/images/{file}` (本地图片)
pub fn is_public_route(method: &Method, path: &str) -> bool {
    if method == Method::OPTIONS || !path.starts_with("/api/") {
        return true;
    }

    let path = path.trim_end_matches('/');
    match path {
        "/api/health" | "/api/auth/login" => true,
        "/api/cakes" => method == Method::GET,
        "/api/orders" | "/api/custom-cakes" => method == Method::POST,
        _ => {
            method == Method::GET
                && (path.starts_with("/api/cakes/") || path.starts_with("/api/images/"))
        }
    }
}

/// 认证中间件 - 要求用户登录
///
/// 从 `Authorization: Bearer <token>` 头提取并验证 JWT。
/// 验证成功后将 [`CurrentUser`] 注入请求扩展。
///
/// # 错误处理
///
/// | 错误 | HTTP 状态码 |
/// |------|------------|
/// | 无 Authorization 头 | 401 NotAuthenticated |
/// | 令牌过期 | 401 TokenExpired |
/// | 无效令牌 | 401 TokenInvalid |
/// | customer 角色 | 403 RoleRequired |
pub async fn require_auth(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    if is_public_route(req.method(), req.uri().path()) {
        return Ok(next.run(req).await);
    }

    let jwt_service = state.get_jwt_service();
    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let token = match auth_header {
        Some(header) => JwtService::extract_from_header(header)
            .ok_or_else(|| AppError::invalid_token("Invalid authorization header"))?,
        None => {
            security_log!("WARN", "auth_missing", uri = format!("{:?}", req.uri()));
            return Err(AppError::unauthorized());
        }
    };

    match jwt_service.validate_token(token) {
        Ok(claims) => {
            let user = CurrentUser::try_from(claims)
                .map_err(|e| AppError::invalid_token(format!("Malformed JWT claims: {}", e)))?;

            // 管理接口只对 admin / staff 开放
            if !user.role.can_access_dashboard() {
                security_log!(
                    "WARN",
                    "role_required",
                    user_id = user.id.clone(),
                    user_role = user.role.as_str()
                );
                return Err(AppError::new(shared::ErrorCode::RoleRequired));
            }

            req.extensions_mut().insert(user);
            Ok(next.run(req).await)
        }
        Err(e) => {
            security_log!(
                "WARN",
                "auth_failed",
                error = format!("{}", e),
                uri = format!("{:?}", req.uri())
            );

            match e {
                crate::auth::JwtError::ExpiredToken => Err(AppError::token_expired()),
                _ => Err(AppError::invalid_token("Invalid token")),
            }
        }
    }
}

/// 权限检查中间件 - 要求特定权限
///
/// # 用法
///
/// ```ignore
/// use axum::middleware;
/// Router::new()
///     .route("/api/admin/orders", get(handler::list))
///     .layer(middleware::from_fn(require_permission("orders:manage")));
/// ```
///
/// 无权限返回 403 Forbidden
pub fn require_permission(
    permission: &'static str,
) -> impl Fn(
    Request,
    Next,
) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<Response, AppError>> + Send>>
+ Clone {
    move |req: Request, next: Next| {
        Box::pin(async move {
            let user = req
                .extensions()
                .get::<CurrentUser>()
                .ok_or(AppError::unauthorized())?;

            if !user.has_permission(permission) {
                security_log!(
                    "WARN",
                    "permission_denied",
                    user_id = user.id.clone(),
                    username = user.username.clone(),
                    required_permission = permission
                );
                return Err(AppError::forbidden(format!(
                    "Permission denied: {}",
                    permission
                )));
            }

            Ok(next.run(req).await)
        })
    }
}

/// 管理员中间件 - 要求管理员角色
///
/// 非管理员返回 403 AdminRequired
pub async fn require_admin(req: Request, next: Next) -> Result<Response, AppError> {
    let user = req
        .extensions()
        .get::<CurrentUser>()
        .ok_or(AppError::unauthorized())?;
    if !user.is_admin() {
        security_log!(
            "WARN",
            "admin_required",
            user_id = user.id.clone(),
            username = user.username.clone(),
            user_role = user.role.as_str()
        );
        return Err(AppError::new(shared::ErrorCode::AdminRequired));
    }

    Ok(next.run(req).await)
}
