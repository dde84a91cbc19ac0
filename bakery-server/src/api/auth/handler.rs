//! Authentication Handlers
//!
//! Handles login and current-user lookup

use std::time::Duration;

use axum::{Extension, Json, extract::State};
use shared::request::LoginRequest;
use shared::response::{CurrentUserResponse, LoginResponse};

use crate::auth::CurrentUser;
use crate::auth::permissions::get_default_permissions;
use crate::core::ServerState;
use crate::db::repository::UserRepository;
use crate::security_log;
use crate::utils::{AppError, AppResult, ErrorCode};

/// Fixed delay for authentication to prevent timing attacks
const AUTH_FIXED_DELAY_MS: u64 = 300;

/// Login handler
///
/// 邮箱 + 密码认证, 返回 JWT。未找到、已停用、密码错误统一返回 401。
pub async fn login(
    State(state): State<ServerState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    if req.email.trim().is_empty() || req.password.is_empty() {
        return Err(AppError::validation("Email and password are required"));
    }

    let repo = UserRepository::new(state.get_db());
    let user = repo.find_by_email(&req.email).await?;

    // Fixed delay to prevent timing attacks (before checking result)
    tokio::time::sleep(Duration::from_millis(AUTH_FIXED_DELAY_MS)).await;

    let user = match user {
        Some(u) if u.is_active => {
            let password_valid = u
                .verify_password(&req.password)
                .map_err(|e| AppError::internal(format!("Password verification failed: {}", e)))?;
            if !password_valid {
                security_log!("WARN", "login_failed", email = req.email.clone(), reason = "invalid_password");
                return Err(AppError::invalid_credentials());
            }
            u
        }
        Some(_) => {
            security_log!("WARN", "login_failed", email = req.email.clone(), reason = "inactive");
            return Err(AppError::invalid_credentials());
        }
        None => {
            security_log!("WARN", "login_failed", email = req.email.clone(), reason = "user_not_found");
            return Err(AppError::invalid_credentials());
        }
    };

    if !user.role.can_access_dashboard() {
        security_log!(
            "WARN",
            "role_required",
            email = req.email.clone(),
            user_role = user.role.as_str()
        );
        return Err(AppError::new(ErrorCode::RoleRequired));
    }

    let user_id = user.id_string();
    let token = state
        .get_jwt_service()
        .generate_token(
            &user_id,
            &user.username,
            user.role,
            &get_default_permissions(user.role),
        )
        .map_err(|e| AppError::internal(format!("Failed to generate token: {}", e)))?;

    if let Err(e) = repo.touch_last_login(&user_id).await {
        tracing::warn!(user_id = %user_id, error = %e, "Failed to record last login");
    }

    tracing::info!(
        user_id = %user_id,
        username = %user.username,
        role = %user.role,
        "User logged in successfully"
    );

    Ok(Json(LoginResponse {
        success: true,
        token,
        user: user.info(),
    }))
}

/// Get current user info (fresh from the database)
pub async fn me(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
) -> AppResult<Json<CurrentUserResponse>> {
    let account = UserRepository::new(state.get_db())
        .find_by_id(&user.id)
        .await?
        .filter(|u| u.is_active)
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound))?;

    Ok(Json(CurrentUserResponse {
        success: true,
        user: account.info(),
    }))
}
