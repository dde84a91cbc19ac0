//! Admin Cake Handlers

use axum::{
    Json,
    extract::{Path, Query, Request, State},
    http::StatusCode,
};
use shared::request::{CakeQuery, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use shared::response::{CakeResponse, PageResponse};

use super::payload::{build_cake, build_update, read_payload};
use crate::checkout::custom_request::upload_images;
use crate::core::ServerState;
use crate::db::models::Cake;
use crate::db::repository::CakeRepository;
use crate::services::images::ImageUpload;
use crate::utils::{ApiResponse, AppError, AppResult, ErrorCode};

fn cake_not_found(id: &str) -> AppError {
    AppError::with_message(ErrorCode::CakeNotFound, format!("Cake {} not found", id))
}

/// 上传新图片, 返回成功的 URL (失败的跳过)
async fn store_images(state: &ServerState, uploads: Vec<ImageUpload>) -> Vec<String> {
    if uploads.is_empty() {
        return Vec::new();
    }
    upload_images(state.images.as_ref(), uploads)
        .await
        .iter()
        .filter_map(|o| o.url().map(str::to_string))
        .collect()
}

/// GET /api/admin/cakes?page=&limit=&category=&flavor=&search=
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<CakeQuery>,
) -> AppResult<Json<PageResponse<Cake>>> {
    let page = query.page.unwrap_or(1).max(1);
    let limit = query
        .limit
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);
    let (cakes, total) = CakeRepository::new(state.get_db())
        .find_page(&query, (page - 1).saturating_mul(limit), limit)
        .await?;
    Ok(Json(PageResponse::new(cakes, total, page, limit)))
}

/// GET /api/admin/cakes/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<CakeResponse<Cake>>> {
    let cake = CakeRepository::new(state.get_db())
        .find_by_id(&id)
        .await?
        .ok_or_else(|| cake_not_found(&id))?;
    Ok(Json(CakeResponse::new(cake)))
}

/// POST /api/admin/cakes - 201
///
/// 先校验再上传图片, 校验失败不会产生孤儿图片
pub async fn create(
    State(state): State<ServerState>,
    req: Request,
) -> AppResult<(StatusCode, Json<CakeResponse<Cake>>)> {
    let (payload, uploads) = read_payload(req, &state).await?;
    let mut cake = build_cake(payload)?;
    cake.images.extend(store_images(&state, uploads).await);

    let cake = CakeRepository::new(state.get_db()).create(cake).await?;
    tracing::info!(cake_id = %cake.id_string(), name = %cake.name, "Cake created");
    Ok((StatusCode::CREATED, Json(CakeResponse::new(cake))))
}

/// PUT /api/admin/cakes/:id - 部分更新; 上传的图片追加到现有图片之后
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    req: Request,
) -> AppResult<Json<CakeResponse<Cake>>> {
    let (payload, uploads) = read_payload(req, &state).await?;
    let mut update = build_update(payload)?;
    let repo = CakeRepository::new(state.get_db());

    let existing = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| cake_not_found(&id))?;

    if !uploads.is_empty() {
        let mut images = update.images.take().unwrap_or(existing.images);
        images.extend(store_images(&state, uploads).await);
        update.images = Some(images);
    }
    if update.is_empty() {
        return Err(AppError::validation("No fields to update"));
    }

    let cake = repo.update(&id, update).await?;
    tracing::info!(cake_id = %cake.id_string(), "Cake updated");
    Ok(Json(CakeResponse::new(cake)))
}

/// DELETE /api/admin/cakes/:id
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<()>>> {
    let deleted = CakeRepository::new(state.get_db()).delete(&id).await?;
    if !deleted {
        return Err(cake_not_found(&id));
    }
    tracing::info!(cake_id = %id, "Cake deleted");
    Ok(Json(ApiResponse::ok()))
}
