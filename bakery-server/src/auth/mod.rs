//! 认证授权模块
//!
//! - [`JwtService`] - JWT 令牌服务
//! - [`CurrentUser`] - 当前用户上下文
//! - [`require_auth`] - 认证中间件 (公共店面路由放行)
//! - [`require_permission`] - 权限检查中间件

pub mod jwt;
pub mod middleware;
pub mod permissions;

pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService};
pub use middleware::{is_public_route, require_admin, require_auth, require_permission};
