use axum::{Json, extract::State, http::StatusCode};
use shared::request::CreateOrderRequest;
use shared::response::OrderResponse;

use crate::checkout::Checkout;
use crate::core::ServerState;
use crate::db::models::Order;
use crate::utils::AppResult;

/// POST /api/orders - 201 `{ success, order }`
pub async fn create(
    State(state): State<ServerState>,
    Json(req): Json<CreateOrderRequest>,
) -> AppResult<(StatusCode, Json<OrderResponse<Order>>)> {
    let order = Checkout::from_state(&state).place_order(req).await?;
    Ok((StatusCode::CREATED, Json(OrderResponse::new(order))))
}
