//! Admin Inventory Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;
use shared::request::{BulkStockRequest, UpdateStockRequest};
use shared::response::{BulkResponse, CakeResponse, CakesResponse};

use crate::core::ServerState;
use crate::db::models::Cake;
use crate::db::repository::{CakeRepository, RepoError};
use crate::reporting::{InventoryAnalytics, inventory_analytics};
use crate::utils::{AppError, AppResult, ErrorCode};

#[derive(Debug, Serialize)]
pub struct InventoryAnalyticsResponse {
    success: bool,
    analytics: InventoryAnalytics,
}

fn check_level(value: i64, field: &str) -> AppResult<i64> {
    if value < 0 {
        return Err(AppError::with_message(
            ErrorCode::ValueOutOfRange,
            format!("{} must not be negative", field),
        ));
    }
    Ok(value)
}

/// GET /api/admin/inventory/low-stock - 库存 ≤ 预警线, 库存少的在前
pub async fn low_stock(State(state): State<ServerState>) -> AppResult<Json<CakesResponse<Cake>>> {
    let cakes = CakeRepository::new(state.get_db()).find_low_stock().await?;
    Ok(Json(CakesResponse::new(cakes)))
}

/// GET /api/admin/inventory/analytics
pub async fn analytics(
    State(state): State<ServerState>,
) -> AppResult<Json<InventoryAnalyticsResponse>> {
    let cakes = CakeRepository::new(state.get_db()).find_all().await?;
    Ok(Json(InventoryAnalyticsResponse {
        success: true,
        analytics: inventory_analytics(&cakes),
    }))
}

/// PATCH /api/admin/inventory/:id/stock
pub async fn update_stock(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateStockRequest>,
) -> AppResult<Json<CakeResponse<Cake>>> {
    let stock = req
        .stock_quantity
        .ok_or_else(|| AppError::required("stockQuantity"))?;
    let stock = check_level(stock, "stockQuantity")?;
    let threshold = req
        .low_stock_threshold
        .map(|t| check_level(t, "lowStockThreshold"))
        .transpose()?;

    let cake = CakeRepository::new(state.get_db())
        .set_stock(&id, stock, threshold)
        .await
        .map_err(|e| match e {
            RepoError::NotFound(msg) => AppError::with_message(ErrorCode::CakeNotFound, msg),
            other => other.into(),
        })?;

    tracing::info!(cake_id = %cake.id_string(), stock, "Stock updated");
    Ok(Json(CakeResponse::new(cake)))
}

/// POST /api/admin/inventory/bulk-stock
///
/// 整批先校验; 逐条写入, 不存在的蛋糕跳过不计数
pub async fn bulk_stock(
    State(state): State<ServerState>,
    Json(req): Json<BulkStockRequest>,
) -> AppResult<Json<BulkResponse>> {
    if req.updates.is_empty() {
        return Err(AppError::with_message(
            ErrorCode::RequiredField,
            "updates must contain at least one entry",
        ));
    }
    for update in &req.updates {
        check_level(update.stock_quantity, "stockQuantity")?;
    }

    let repo = CakeRepository::new(state.get_db());
    let mut modified = 0u64;
    for update in &req.updates {
        match repo.set_stock(&update.id, update.stock_quantity, None).await {
            Ok(_) => modified += 1,
            Err(RepoError::NotFound(_)) => {
                tracing::warn!(cake_id = %update.id, "Bulk stock update skipped missing cake");
            }
            Err(e) => return Err(e.into()),
        }
    }

    Ok(Json(BulkResponse::modified(
        modified,
        format!("Updated stock for {} cakes", modified),
    )))
}
