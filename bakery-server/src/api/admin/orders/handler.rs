//! Admin Order Handlers

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use shared::request::{ListQuery, UpdateOrderStatusRequest};
use shared::response::{OrderResponse, PageResponse};

use super::super::parse_order_status;
use crate::auth::CurrentUser;
use crate::checkout::{PostCommit, SideTask};
use crate::core::ServerState;
use crate::db::models::Order;
use crate::db::repository::OrderRepository;
use crate::services::notification::Notification;
use crate::utils::{AppError, AppResult, ErrorCode};

fn order_not_found(id: &str) -> AppError {
    AppError::with_message(ErrorCode::OrderNotFound, format!("Order {} not found", id))
}

/// GET /api/admin/orders?page=&limit=&status=&search=
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<PageResponse<Order>>> {
    let status = query.status_filter().map(parse_order_status).transpose()?;
    let (orders, total) = OrderRepository::new(state.get_db())
        .find_page(status, &query)
        .await?;
    Ok(Json(PageResponse::new(
        orders,
        total,
        query.page(),
        query.limit(),
    )))
}

/// GET /api/admin/orders/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<OrderResponse<Order>>> {
    let order = OrderRepository::new(state.get_db())
        .find_by_id(&id)
        .await?
        .ok_or_else(|| order_not_found(&id))?;
    Ok(Json(OrderResponse::new(order)))
}

/// PATCH /api/admin/orders/:id/status
///
/// 状态必须是枚举值之一, 否则 400 且不修改; 成功后通知客户 (有邮箱时)
pub async fn update_status(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(req): Json<UpdateOrderStatusRequest>,
) -> AppResult<Json<OrderResponse<Order>>> {
    let status = parse_order_status(&req.status)?;
    let repo = OrderRepository::new(state.get_db());

    let current = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| order_not_found(&id))?;
    if !current.status.can_transition_to(status) {
        return Err(AppError::with_message(
            ErrorCode::InvalidOrderStatus,
            format!("Cannot move order from {} to {}", current.status, status),
        ));
    }

    let order = repo
        .update_status(&id, status)
        .await?
        .ok_or_else(|| order_not_found(&id))?;

    tracing::info!(
        order_id = %order.id_string(),
        from = %current.status,
        to = %status,
        operator = %user.username,
        "Order status updated"
    );

    if current.status != status {
        PostCommit::new()
            .then(SideTask::NotifyCustomer(Notification::OrderStatusChanged(
                Box::new(order.clone()),
            )))
            .run(&state.notifier);
    }

    Ok(Json(OrderResponse::new(order)))
}
