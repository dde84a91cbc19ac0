//! Admin Customer Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Serialize;
use shared::request::ListQuery;
use shared::response::PageResponse;

use crate::core::ServerState;
use crate::db::models::Order;
use crate::db::repository::{CakeRepository, OrderRepository};
use crate::reporting::{self, CustomerSummary, LifetimeValue, index_cakes, summarize_customers};
use crate::utils::{AppError, AppResult};

#[derive(Debug, Serialize)]
pub struct CustomerDetailResponse {
    success: bool,
    customer: CustomerSummary,
    orders: Vec<Order>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LifetimeValueResponse {
    success: bool,
    lifetime_value: LifetimeValue,
}

fn customer_not_found(phone: &str) -> AppError {
    AppError::not_found(format!("Customer {}", phone))
}

/// GET /api/admin/customers?page=&limit=&search= - 按消费额降序
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<PageResponse<CustomerSummary>>> {
    let db = state.get_db();
    let orders = OrderRepository::new(db.clone()).find_all().await?;
    let cakes = CakeRepository::new(db).find_all().await?;

    let mut customers = summarize_customers(&orders, &index_cakes(&cakes));
    if let Some(term) = query.search_term() {
        customers.retain(|c| c.matches(&term));
    }

    let total = customers.len() as u64;
    let page: Vec<CustomerSummary> = customers
        .into_iter()
        .skip(query.offset() as usize)
        .take(query.limit() as usize)
        .collect();
    Ok(Json(PageResponse::new(
        page,
        total,
        query.page(),
        query.limit(),
    )))
}

/// GET /api/admin/customers/:phone - 客户汇总 + 订单历史 (最新在前)
pub async fn get_by_phone(
    State(state): State<ServerState>,
    Path(phone): Path<String>,
) -> AppResult<Json<CustomerDetailResponse>> {
    let db = state.get_db();
    let orders = OrderRepository::new(db.clone())
        .find_by_phone(phone.trim())
        .await?;
    let cakes = CakeRepository::new(db).find_all().await?;

    let customer = summarize_customers(&orders, &index_cakes(&cakes))
        .into_iter()
        .next()
        .ok_or_else(|| customer_not_found(&phone))?;

    Ok(Json(CustomerDetailResponse {
        success: true,
        customer,
        orders,
    }))
}

/// GET /api/admin/customers/:phone/lifetime-value
pub async fn lifetime_value(
    State(state): State<ServerState>,
    Path(phone): Path<String>,
) -> AppResult<Json<LifetimeValueResponse>> {
    let orders = OrderRepository::new(state.get_db())
        .find_by_phone(phone.trim())
        .await?;
    let lifetime_value =
        reporting::lifetime_value(&orders).ok_or_else(|| customer_not_found(&phone))?;
    Ok(Json(LifetimeValueResponse {
        success: true,
        lifetime_value,
    }))
}
