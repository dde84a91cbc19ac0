use axum::{
    Json,
    extract::{Multipart, State},
    http::StatusCode,
};
use shared::response::CustomRequestCreatedResponse;

use crate::checkout::{Checkout, CustomRequestForm};
use crate::core::ServerState;
use crate::utils::AppResult;
use crate::utils::multipart::MultipartForm;

const SUBMITTED_MESSAGE: &str =
    "Custom cake request submitted successfully! We will contact you within 24 hours.";

/// POST /api/custom-cakes - 201 `{ success, requestId, message }`
pub async fn create(
    State(state): State<ServerState>,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<CustomRequestCreatedResponse>)> {
    let mut form = MultipartForm::read(multipart).await?;
    let fields = CustomRequestForm::from_multipart(&mut form);

    let request = Checkout::from_state(&state)
        .submit_custom_request(fields, form.images)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CustomRequestCreatedResponse {
            success: true,
            request_id: request.id_string(),
            message: SUBMITTED_MESSAGE.to_string(),
        }),
    ))
}
