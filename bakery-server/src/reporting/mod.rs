//! 报表引擎
//!
//! 仪表盘和分析接口使用的纯函数: 输入是已查询出的记录, 每次请求重新计算。
//! 处理器负责查询, 这里只做聚合, 方便单元测试。
//!
//! # 模块结构
//!
//! - [`dashboard`] - 总数、营收、最近动态、热门分类
//! - [`customers`] - 按电话聚合客户、客户分层、生命周期价值
//! - [`sales`] - 销售概览、营收趋势、订单导出
//! - [`inventory`] - 库存统计

pub mod customers;
pub mod dashboard;
pub mod inventory;
pub mod sales;

pub use customers::{
    CustomerAnalytics, CustomerSummary, CustomerType, LifetimeValue, customer_analytics,
    lifetime_value, summarize_customers,
};
pub use dashboard::{
    Activity, ActivityKind, CategoryCount, DashboardTotals, activity_feed, delivered_revenue,
    popular_categories,
};
pub use inventory::{InventoryAnalytics, inventory_analytics};
pub use sales::{
    ExportRow, Period, ProductSales, RevenueBucket, SalesOverview, export_rows, parse_date_range,
    revenue_trends, sales_overview,
};

use std::collections::HashMap;

use crate::db::models::Cake;

/// cake id → cake, 用于订单行关联蛋糕名称和分类
pub fn index_cakes(cakes: &[Cake]) -> HashMap<String, &Cake> {
    cakes.iter().map(|c| (c.id_string(), c)).collect()
}
