//! Admin Bulk Operation Handlers
//!
//! 所有接口返回 `{ success, message, modifiedCount | deletedCount }`

use axum::{Extension, Json, extract::State};
use shared::money;
use shared::request::{
    BulkAvailabilityRequest, BulkFeaturedRequest, BulkIdsRequest, BulkOrderStatusRequest,
    BulkPriceRequest, CakeQuery, PriceOperation,
};
use shared::response::BulkResponse;

use super::super::{category_filter, parse_order_status, require_ids};
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::{CakeRepository, OrderRepository};
use crate::utils::{AppError, AppResult, ErrorCode};

/// 单次降价幅度上限 (%)
const MAX_DECREASE_PERCENT: f64 = 100.0;
/// 单次涨价幅度上限 (%)
const MAX_INCREASE_PERCENT: f64 = 1000.0;

/// 百分比 → 带符号的调整量
pub(crate) fn signed_percentage(percentage: f64, operation: PriceOperation) -> AppResult<f64> {
    let max = match operation {
        PriceOperation::Increase => MAX_INCREASE_PERCENT,
        PriceOperation::Decrease => MAX_DECREASE_PERCENT,
    };
    if !percentage.is_finite() || percentage <= 0.0 || percentage > max {
        return Err(AppError::with_message(
            ErrorCode::ValueOutOfRange,
            format!("percentage must be between 0 and {}", max),
        ));
    }
    Ok(match operation {
        PriceOperation::Increase => percentage,
        PriceOperation::Decrease => -percentage,
    })
}

/// POST /api/admin/bulk/price-update - 按分类 (或全部) 调价
pub async fn price_update(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Json(req): Json<BulkPriceRequest>,
) -> AppResult<Json<BulkResponse>> {
    let change = signed_percentage(req.percentage, req.operation)?;
    let category = category_filter(req.category.as_deref())?;

    let repo = CakeRepository::new(state.get_db());
    let cakes = repo
        .find_catalog(&CakeQuery {
            category: category.map(|c| c.as_str().to_string()),
            ..Default::default()
        })
        .await?;

    let mut modified = 0u64;
    for cake in &cakes {
        let price = money::apply_percentage(cake.price, change).max(0.0);
        repo.set_price(&cake.id_string(), price).await?;
        modified += 1;
    }

    tracing::info!(
        modified,
        percentage = change,
        category = category.map(|c| c.as_str()).unwrap_or("all"),
        operator = %user.username,
        "Bulk price update"
    );
    Ok(Json(BulkResponse::modified(
        modified,
        format!("Updated prices for {} cakes", modified),
    )))
}

/// POST /api/admin/bulk/availability - 按分类和 / 或 ID 设置上架状态
pub async fn availability(
    State(state): State<ServerState>,
    Json(req): Json<BulkAvailabilityRequest>,
) -> AppResult<Json<BulkResponse>> {
    let category = category_filter(req.category.as_deref())?;
    let ids: Vec<String> = req
        .ids
        .into_iter()
        .filter(|id| !id.trim().is_empty())
        .collect();

    let modified = CakeRepository::new(state.get_db())
        .set_availability(category.map(|c| c.as_str()), &ids, req.available)
        .await?;

    let verb = if req.available { "available" } else { "unavailable" };
    Ok(Json(BulkResponse::modified(
        modified,
        format!("Marked {} cakes as {}", modified, verb),
    )))
}

/// POST /api/admin/bulk/order-status
pub async fn order_status(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Json(req): Json<BulkOrderStatusRequest>,
) -> AppResult<Json<BulkResponse>> {
    let status = parse_order_status(&req.status)?;
    let ids = require_ids(&req.order_ids, "orderIds")?;

    let modified = OrderRepository::new(state.get_db())
        .update_status_many(&ids, status)
        .await?;

    tracing::info!(modified, status = %status, operator = %user.username, "Bulk order status update");
    Ok(Json(BulkResponse::modified(
        modified,
        format!("Updated {} orders to {}", modified, status),
    )))
}

/// POST /api/admin/bulk/delete-cakes
pub async fn delete_cakes(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Json(req): Json<BulkIdsRequest>,
) -> AppResult<Json<BulkResponse>> {
    let ids = require_ids(&req.ids, "ids")?;
    let deleted = CakeRepository::new(state.get_db())
        .delete_many(&ids)
        .await?;

    tracing::info!(deleted, operator = %user.username, "Bulk cake delete");
    Ok(Json(BulkResponse::deleted(
        deleted,
        format!("Deleted {} cakes", deleted),
    )))
}

/// POST /api/admin/bulk/featured
pub async fn featured(
    State(state): State<ServerState>,
    Json(req): Json<BulkFeaturedRequest>,
) -> AppResult<Json<BulkResponse>> {
    let ids = require_ids(&req.ids, "ids")?;
    let modified = CakeRepository::new(state.get_db())
        .set_featured(&ids, req.featured)
        .await?;

    Ok(Json(BulkResponse::modified(
        modified,
        format!("Updated featured flag on {} cakes", modified),
    )))
}
