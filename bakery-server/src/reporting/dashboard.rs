//! 仪表盘统计

use serde::Serialize;
use shared::models::CakeCategory;
use shared::money;

use crate::db::models::{Cake, CustomCakeRequest, Order};

/// 最近动态条数
pub const ACTIVITY_FEED_SIZE: usize = 5;

/// 热门分类条数
pub const POPULAR_CATEGORY_LIMIT: usize = 5;

/// 各集合计数
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardTotals {
    pub total_cakes: u64,
    pub total_orders: u64,
    pub pending_orders: u64,
    pub total_custom_requests: u64,
    pub pending_custom_requests: u64,
    pub total_users: u64,
    /// 最近 7 天新订单
    pub recent_orders: u64,
    pub total_revenue: f64,
}

/// 营收: 只统计 `delivered` 订单
pub fn delivered_revenue<'a>(orders: impl IntoIterator<Item = &'a Order>) -> f64 {
    money::sum(
        orders
            .into_iter()
            .filter(|o| o.status.counts_as_revenue())
            .map(|o| o.total_amount),
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    Order,
    CustomRequest,
}

/// 最近动态条目
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Activity {
    #[serde(rename = "type")]
    pub kind: ActivityKind,
    pub id: String,
    pub title: String,
    pub description: String,
    pub status: String,
    pub timestamp: i64,
}

impl Activity {
    pub fn from_order(order: &Order) -> Self {
        Self {
            kind: ActivityKind::Order,
            id: order.id_string(),
            title: format!("New order from {}", order.customer_name),
            description: format!(
                "Order #{} - KSh {}",
                order.short_ref(),
                money::format_amount(order.total_amount)
            ),
            status: order.status.to_string(),
            timestamp: order.created_at,
        }
    }

    pub fn from_request(request: &CustomCakeRequest) -> Self {
        Self {
            kind: ActivityKind::CustomRequest,
            id: request.id_string(),
            title: format!("Custom cake request from {}", request.customer_name),
            description: format!("{} cake - {}", request.occasion, request.cake_size),
            status: request.status.to_string(),
            timestamp: request.created_at,
        }
    }
}

/// 合并订单和定制申请, 按时间倒序 (稳定排序) 取前 5 条
pub fn activity_feed(orders: &[Order], requests: &[CustomCakeRequest]) -> Vec<Activity> {
    let mut feed: Vec<Activity> = orders
        .iter()
        .map(Activity::from_order)
        .chain(requests.iter().map(Activity::from_request))
        .collect();
    feed.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    feed.truncate(ACTIVITY_FEED_SIZE);
    feed
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    #[serde(rename = "_id")]
    pub category: CakeCategory,
    pub count: u64,
}

/// 按分类统计蛋糕数量, 降序; `limit` 为 None 时返回全部
pub fn popular_categories(cakes: &[Cake], limit: Option<usize>) -> Vec<CategoryCount> {
    let mut counts: Vec<CategoryCount> = CakeCategory::ALL
        .iter()
        .map(|category| CategoryCount {
            category: *category,
            count: cakes.iter().filter(|c| c.category == *category).count() as u64,
        })
        .filter(|c| c.count > 0)
        .collect();
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    if let Some(limit) = limit {
        counts.truncate(limit);
    }
    counts
}
