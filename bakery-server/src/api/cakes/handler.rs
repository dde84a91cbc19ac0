//! Storefront Cake Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use shared::request::CakeQuery;
use shared::response::{CakeResponse, CakesResponse};

use crate::core::ServerState;
use crate::db::models::Cake;
use crate::db::repository::CakeRepository;
use crate::utils::{AppError, AppResult, ErrorCode};

/// GET /api/cakes - 目录 (category / flavor / featured / available / search)
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<CakeQuery>,
) -> AppResult<Json<CakesResponse<Cake>>> {
    let cakes = CakeRepository::new(state.get_db())
        .find_catalog(&query)
        .await?;
    Ok(Json(CakesResponse::new(cakes)))
}

/// GET /api/cakes/featured - 推荐且在售
pub async fn featured(State(state): State<ServerState>) -> AppResult<Json<CakesResponse<Cake>>> {
    let cakes = CakeRepository::new(state.get_db()).find_featured().await?;
    Ok(Json(CakesResponse::new(cakes)))
}

/// GET /api/cakes/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<CakeResponse<Cake>>> {
    let cake = CakeRepository::new(state.get_db())
        .find_by_id(&id)
        .await?
        .ok_or_else(|| {
            AppError::with_message(ErrorCode::CakeNotFound, format!("Cake {} not found", id))
        })?;
    Ok(Json(CakeResponse::new(cake)))
}
