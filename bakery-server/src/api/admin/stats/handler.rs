use axum::{Json, extract::State};
use serde::Serialize;
use shared::models::{OrderStatus, RequestStatus};
use shared::util::{DAY_MILLIS, now_millis};

use crate::core::ServerState;
use crate::db::repository::{
    CakeRepository, CustomRequestRepository, OrderRepository, UserRepository,
};
use crate::reporting::dashboard::{ACTIVITY_FEED_SIZE, POPULAR_CATEGORY_LIMIT};
use crate::reporting::{
    Activity, CategoryCount, DashboardTotals, activity_feed, delivered_revenue,
    popular_categories,
};
use crate::utils::AppResult;

/// "最近订单" 统计窗口
const RECENT_ORDER_DAYS: i64 = 7;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    success: bool,
    stats: DashboardTotals,
    recent_activity: Vec<Activity>,
    popular_categories: Vec<CategoryCount>,
}

/// GET /api/admin/stats
///
/// 每次请求重新计算; 任一查询失败整个请求失败
pub async fn stats(State(state): State<ServerState>) -> AppResult<Json<StatsResponse>> {
    let db = state.get_db();
    let cake_repo = CakeRepository::new(db.clone());
    let order_repo = OrderRepository::new(db.clone());
    let request_repo = CustomRequestRepository::new(db.clone());
    let user_repo = UserRepository::new(db);

    let cakes = cake_repo.find_all().await?;
    let orders = order_repo.find_all().await?;
    let recent_since = now_millis() - RECENT_ORDER_DAYS * DAY_MILLIS;

    let totals = DashboardTotals {
        total_cakes: cakes.len() as u64,
        total_orders: orders.len() as u64,
        pending_orders: orders
            .iter()
            .filter(|o| o.status == OrderStatus::Pending)
            .count() as u64,
        total_custom_requests: request_repo.count().await?,
        pending_custom_requests: request_repo.count_by_status(RequestStatus::Pending).await?,
        total_users: user_repo.count().await?,
        recent_orders: orders.iter().filter(|o| o.created_at >= recent_since).count() as u64,
        total_revenue: delivered_revenue(&orders),
    };

    let recent_orders: Vec<_> = orders.into_iter().take(ACTIVITY_FEED_SIZE).collect();
    let recent_requests = request_repo.find_recent(ACTIVITY_FEED_SIZE as u32).await?;

    Ok(Json(StatsResponse {
        success: true,
        stats: totals,
        recent_activity: activity_feed(&recent_orders, &recent_requests),
        popular_categories: popular_categories(&cakes, Some(POPULAR_CATEGORY_LIMIT)),
    }))
}
