//! Admin Analytics Handlers

use axum::{
    Json,
    extract::{Query, State},
};
use chrono::Utc;
use serde::Serialize;
use shared::request::{DateRangeQuery, PeriodQuery};

use crate::core::ServerState;
use crate::db::repository::{CakeRepository, OrderRepository};
use crate::reporting::{
    self, CustomerAnalytics, ExportRow, Period, RevenueBucket, SalesOverview, index_cakes,
    parse_date_range, summarize_customers,
};
use crate::utils::AppResult;

#[derive(Debug, Serialize)]
pub struct SalesOverviewResponse {
    success: bool,
    overview: SalesOverview,
}

#[derive(Debug, Serialize)]
pub struct RevenueTrendsResponse {
    success: bool,
    trends: Vec<RevenueBucket>,
}

#[derive(Debug, Serialize)]
pub struct CustomerAnalyticsResponse {
    success: bool,
    analytics: CustomerAnalytics,
}

#[derive(Debug, Serialize)]
pub struct ExportResponse {
    success: bool,
    count: usize,
    orders: Vec<ExportRow>,
}

/// GET /api/admin/analytics/sales-overview?period=week|month|year
pub async fn sales_overview(
    State(state): State<ServerState>,
    Query(query): Query<PeriodQuery>,
) -> AppResult<Json<SalesOverviewResponse>> {
    let period = Period::from_query(query.period.as_deref());
    let db = state.get_db();
    let orders = OrderRepository::new(db.clone()).find_all().await?;
    let cakes = CakeRepository::new(db).find_all().await?;

    Ok(Json(SalesOverviewResponse {
        success: true,
        overview: reporting::sales_overview(&orders, &index_cakes(&cakes), period, Utc::now()),
    }))
}

/// GET /api/admin/analytics/revenue-trends - 最近 12 个月 (已送达)
pub async fn revenue_trends(
    State(state): State<ServerState>,
) -> AppResult<Json<RevenueTrendsResponse>> {
    let orders = OrderRepository::new(state.get_db()).find_all().await?;
    Ok(Json(RevenueTrendsResponse {
        success: true,
        trends: reporting::revenue_trends(&orders),
    }))
}

/// GET /api/admin/analytics/customer-analytics
pub async fn customer_analytics(
    State(state): State<ServerState>,
) -> AppResult<Json<CustomerAnalyticsResponse>> {
    let db = state.get_db();
    let orders = OrderRepository::new(db.clone()).find_all().await?;
    let cakes = CakeRepository::new(db).find_all().await?;
    let customers = summarize_customers(&orders, &index_cakes(&cakes));

    Ok(Json(CustomerAnalyticsResponse {
        success: true,
        analytics: reporting::customer_analytics(customers),
    }))
}

/// GET /api/admin/analytics/export-orders?startDate=&endDate=
pub async fn export_orders(
    State(state): State<ServerState>,
    Query(query): Query<DateRangeQuery>,
) -> AppResult<Json<ExportResponse>> {
    let (from, to) = parse_date_range(query.start_date.as_deref(), query.end_date.as_deref())?;
    let db = state.get_db();
    let orders = OrderRepository::new(db.clone()).find_between(from, to).await?;
    let cakes = CakeRepository::new(db).find_all().await?;

    let rows = reporting::export_rows(&orders, &index_cakes(&cakes));
    tracing::info!(count = rows.len(), "Orders exported");
    Ok(Json(ExportResponse {
        success: true,
        count: rows.len(),
        orders: rows,
    }))
}
