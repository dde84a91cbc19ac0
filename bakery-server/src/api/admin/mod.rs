//! 管理后台接口
//!
//! 所有路由都在 `/api/admin` 下, 由全局 `require_auth` 保证已登录 (admin / staff),
//! 各子模块再按权限加 `require_permission`。
//!
//! | 模块 | 权限 |
//! |------|------|
//! | [`stats`] | `dashboard:view` |
//! | [`orders`] | `orders:manage` |
//! | [`custom_requests`] | `requests:manage` |
//! | [`cakes`] | `cakes:manage` |
//! | [`inventory`] | `inventory:manage` |
//! | [`customers`] | `customers:view` |
//! | [`analytics`] | `analytics:view` |
//! | [`bulk`] | `bulk:manage` |
//! | [`users`] | `users:manage` (admin) |

pub mod analytics;
pub mod bulk;
pub mod cakes;
pub mod custom_requests;
pub mod customers;
pub mod inventory;
pub mod orders;
pub mod stats;
pub mod users;

use axum::Router;
use shared::models::{CakeCategory, OrderStatus, RequestStatus};

use crate::core::ServerState;
use crate::utils::{AppError, AppResult, ErrorCode};

pub fn router() -> Router<ServerState> {
    Router::new()
        .merge(stats::router())
        .merge(orders::router())
        .merge(custom_requests::router())
        .merge(cakes::router())
        .merge(inventory::router())
        .merge(customers::router())
        .merge(analytics::router())
        .merge(bulk::router())
        .merge(users::router())
}

/// 解析订单状态; 枚举外的值返回 400 并附带允许值
pub(crate) fn parse_order_status(value: &str) -> AppResult<OrderStatus> {
    value.parse::<OrderStatus>().map_err(|e| {
        AppError::with_message(ErrorCode::InvalidOrderStatus, e.to_string())
            .with_detail("allowed", e.expected)
    })
}

pub(crate) fn parse_request_status(value: &str) -> AppResult<RequestStatus> {
    value.parse::<RequestStatus>().map_err(|e| {
        AppError::with_message(ErrorCode::InvalidRequestStatus, e.to_string())
            .with_detail("allowed", e.expected)
    })
}

pub(crate) fn parse_category(value: &str) -> AppResult<CakeCategory> {
    value.parse::<CakeCategory>().map_err(|e| {
        AppError::with_message(ErrorCode::CakeCategoryInvalid, e.to_string())
            .with_detail("allowed", e.expected)
    })
}

/// 分类过滤: None / 空 / "all" 表示全部
pub(crate) fn category_filter(value: Option<&str>) -> AppResult<Option<CakeCategory>> {
    match value.map(str::trim) {
        None | Some("") | Some("all") => Ok(None),
        Some(category) => parse_category(category).map(Some),
    }
}

/// 批量接口的 ID 列表不能为空; 返回去掉空白项后的列表
pub(crate) fn require_ids(ids: &[String], field: &str) -> AppResult<Vec<String>> {
    let ids: Vec<String> = ids
        .iter()
        .map(|id| id.trim())
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect();
    if ids.is_empty() {
        return Err(AppError::with_message(
            ErrorCode::RequiredField,
            format!("{} must contain at least one id", field),
        ));
    }
    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_order_status_is_rejected() {
        let err = parse_order_status("archived").unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidOrderStatus);
        assert_eq!(parse_order_status("delivered").unwrap(), OrderStatus::Delivered);
    }

    #[test]
    fn test_unknown_request_status_is_rejected() {
        let err = parse_request_status("done").unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidRequestStatus);
        assert_eq!(parse_request_status("quoted").unwrap(), RequestStatus::Quoted);
    }

    #[test]
    fn test_category_filter() {
        assert_eq!(category_filter(None).unwrap(), None);
        assert_eq!(category_filter(Some("all")).unwrap(), None);
        assert_eq!(
            category_filter(Some("wedding")).unwrap(),
            Some(CakeCategory::Wedding)
        );
        assert!(category_filter(Some("bread")).is_err());
    }

    #[test]
    fn test_require_ids() {
        assert!(require_ids(&[], "ids").is_err());
        assert!(require_ids(&[" ".into()], "ids").is_err());
        assert_eq!(
            require_ids(&["cake:a".into(), "".into()], "ids").unwrap(),
            vec!["cake:a".to_string()]
        );
    }
}
