//! Admin Custom Request Handlers

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use serde::Serialize;
use shared::money;
use shared::request::{ListQuery, UpdateRequestStatusRequest};
use shared::response::PageResponse;

use super::super::parse_request_status;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::CustomCakeRequest;
use crate::db::repository::CustomRequestRepository;
use crate::utils::validation::{MAX_NOTE_LEN, normalize_optional, validate_optional_text};
use crate::utils::{AppError, AppResult, ErrorCode};

#[derive(Debug, Serialize)]
pub struct CustomRequestResponse {
    success: bool,
    request: CustomCakeRequest,
}

fn request_not_found(id: &str) -> AppError {
    AppError::with_message(
        ErrorCode::CustomRequestNotFound,
        format!("Custom request {} not found", id),
    )
}

/// GET /api/admin/custom-requests?page=&limit=&status=&search=
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<PageResponse<CustomCakeRequest>>> {
    let status = query
        .status_filter()
        .map(parse_request_status)
        .transpose()?;
    let (requests, total) = CustomRequestRepository::new(state.get_db())
        .find_page(status, &query)
        .await?;
    Ok(Json(PageResponse::new(
        requests,
        total,
        query.page(),
        query.limit(),
    )))
}

/// GET /api/admin/custom-requests/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<CustomRequestResponse>> {
    let request = CustomRequestRepository::new(state.get_db())
        .find_by_id(&id)
        .await?
        .ok_or_else(|| request_not_found(&id))?;
    Ok(Json(CustomRequestResponse {
        success: true,
        request,
    }))
}

/// PATCH /api/admin/custom-requests/:id/status
///
/// body: `{ status, adminNotes?, quoteAmount? }`
pub async fn update_status(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(req): Json<UpdateRequestStatusRequest>,
) -> AppResult<Json<CustomRequestResponse>> {
    let status = parse_request_status(&req.status)?;
    validate_optional_text(&req.admin_notes, "adminNotes", MAX_NOTE_LEN)?;
    if req.quote_amount.is_some_and(|quote| !money::is_valid_amount(quote)) {
        return Err(AppError::with_message(
            ErrorCode::ValueOutOfRange,
            "quoteAmount must be a non-negative amount",
        ));
    }

    let repo = CustomRequestRepository::new(state.get_db());
    let current = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| request_not_found(&id))?;
    if !current.status.can_transition_to(status) {
        return Err(AppError::with_message(
            ErrorCode::InvalidRequestStatus,
            format!("Cannot move request from {} to {}", current.status, status),
        ));
    }

    let request = repo
        .update_status(
            &id,
            status,
            normalize_optional(req.admin_notes),
            req.quote_amount,
        )
        .await?
        .ok_or_else(|| request_not_found(&id))?;

    tracing::info!(
        request_id = %request.id_string(),
        from = %current.status,
        to = %status,
        operator = %user.username,
        "Custom request status updated"
    );

    Ok(Json(CustomRequestResponse {
        success: true,
        request,
    }))
}
