//! Permission Definitions
//!
//! Role-based permissions for the admin dashboard.
//!
//! ## 设计原则
//! - 店面接口 (浏览、下单、定制申请) 无需登录
//! - 员工 (staff) 负责日常运营: 订单、定制申请、蛋糕、库存、客户
//! - 分析、批量操作、用户管理仅 admin 可用

use shared::models::UserRole;

/// 仪表盘统计
pub const DASHBOARD_VIEW: &str = "dashboard:view";
/// 订单列表 / 详情 / 状态
pub const ORDERS_MANAGE: &str = "orders:manage";
/// 定制申请列表 / 详情 / 状态
pub const REQUESTS_MANAGE: &str = "requests:manage";
/// 蛋糕增删改
pub const CAKES_MANAGE: &str = "cakes:manage";
/// 库存调整
pub const INVENTORY_MANAGE: &str = "inventory:manage";
/// 客户查询
pub const CUSTOMERS_VIEW: &str = "customers:view";
/// 销售分析 / 导出
pub const ANALYTICS_VIEW: &str = "analytics:view";
/// 批量操作
pub const BULK_MANAGE: &str = "bulk:manage";
/// 用户管理
pub const USERS_MANAGE: &str = "users:manage";

/// 可配置权限列表
pub const ALL_PERMISSIONS: &[&str] = &[
    DASHBOARD_VIEW,
    ORDERS_MANAGE,
    REQUESTS_MANAGE,
    CAKES_MANAGE,
    INVENTORY_MANAGE,
    CUSTOMERS_VIEW,
    ANALYTICS_VIEW,
    BULK_MANAGE,
];

/// Admin 专属权限（不在可配置列表中）
pub const ADMIN_ONLY_PERMISSIONS: &[&str] = &[USERS_MANAGE, "all"];

pub const DEFAULT_ADMIN_PERMISSIONS: &[&str] = &["all"];

/// 员工默认权限
pub const DEFAULT_STAFF_PERMISSIONS: &[&str] = &[
    DASHBOARD_VIEW,
    ORDERS_MANAGE,
    REQUESTS_MANAGE,
    CAKES_MANAGE,
    INVENTORY_MANAGE,
    CUSTOMERS_VIEW,
];

/// Get permissions for a role
pub fn get_default_permissions(role: UserRole) -> Vec<String> {
    let permissions = match role {
        UserRole::Admin => DEFAULT_ADMIN_PERMISSIONS,
        UserRole::Staff => DEFAULT_STAFF_PERMISSIONS,
        UserRole::Customer => &[],
    };
    permissions.iter().map(|s| s.to_string()).collect()
}

/// Validate if a permission string is valid
pub fn is_valid_permission(permission: &str) -> bool {
    ALL_PERMISSIONS.contains(&permission)
        || ADMIN_ONLY_PERMISSIONS.contains(&permission)
        || permission.ends_with(":*")
}
