//! Admin User Handlers

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Serialize;
use shared::models::{UserInfo, UserRole};
use shared::request::{CreateUserRequest, UpdateUserRequest};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::user::TABLE as USER_TABLE;
use crate::db::repository::user::{NewUser, UserChanges};
use crate::db::repository::{RepoError, UserRepository};
use crate::utils::validation::{
    MAX_PASSWORD_LEN, MAX_SHORT_TEXT_LEN, MIN_PASSWORD_LEN, validate_email,
    validate_required_text,
};
use crate::utils::{ApiResponse, AppError, AppResult, ErrorCode};

#[derive(Debug, Serialize)]
pub struct UsersResponse {
    success: bool,
    users: Vec<UserInfo>,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    success: bool,
    user: UserInfo,
}

fn user_not_found(id: &str) -> AppError {
    AppError::with_message(ErrorCode::UserNotFound, format!("User {} not found", id))
}

/// 路径 ID 可省略表前缀
fn is_self(id: &str, operator: &CurrentUser) -> bool {
    let id = id.trim();
    id == operator.id || format!("{}:{}", USER_TABLE, id) == operator.id
}

fn parse_role(value: &str) -> AppResult<UserRole> {
    value
        .parse::<UserRole>()
        .map_err(|e| AppError::validation(e.to_string()).with_detail("allowed", e.expected))
}

fn validate_password(password: &str) -> AppResult<()> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::with_message(
            ErrorCode::PasswordTooShort,
            format!("Password must be at least {} characters", MIN_PASSWORD_LEN),
        ));
    }
    if password.len() > MAX_PASSWORD_LEN {
        return Err(AppError::validation("Password is too long"));
    }
    Ok(())
}

/// 重复用户名 / 邮箱 → 对应的 409 错误码
fn map_repo_error(err: RepoError, id: &str) -> AppError {
    match err {
        RepoError::Duplicate(msg) if msg.starts_with("Username") => {
            AppError::with_message(ErrorCode::UsernameExists, msg)
        }
        RepoError::Duplicate(msg) => AppError::with_message(ErrorCode::EmailExists, msg),
        RepoError::NotFound(_) => user_not_found(id),
        other => other.into(),
    }
}

/// GET /api/admin/users
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<UsersResponse>> {
    let users = UserRepository::new(state.get_db()).find_all().await?;
    Ok(Json(UsersResponse {
        success: true,
        users: users.iter().map(|u| u.info()).collect(),
    }))
}

/// POST /api/admin/users - 201
pub async fn create(
    State(state): State<ServerState>,
    Extension(operator): Extension<CurrentUser>,
    Json(req): Json<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    validate_required_text(&req.username, "username", MAX_SHORT_TEXT_LEN)?;
    validate_required_text(&req.email, "email", MAX_SHORT_TEXT_LEN)?;
    validate_email(req.email.trim(), "email")?;
    validate_password(&req.password)?;
    let role = match req.role.as_deref().map(str::trim) {
        None | Some("") => UserRole::Staff,
        Some(role) => parse_role(role)?,
    };

    let user = UserRepository::new(state.get_db())
        .create(NewUser {
            username: req.username,
            email: req.email,
            password: req.password,
            role,
        })
        .await
        .map_err(|e| map_repo_error(e, ""))?;

    tracing::info!(
        user_id = %user.id_string(),
        role = %user.role,
        operator = %operator.username,
        "User created"
    );
    Ok((
        StatusCode::CREATED,
        Json(UserResponse {
            success: true,
            user: user.info(),
        }),
    ))
}

/// PUT /api/admin/users/:id
pub async fn update(
    State(state): State<ServerState>,
    Extension(operator): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(req): Json<UpdateUserRequest>,
) -> AppResult<Json<UserResponse>> {
    if let Some(username) = &req.username {
        validate_required_text(username, "username", MAX_SHORT_TEXT_LEN)?;
    }
    if let Some(email) = &req.email {
        validate_email(email.trim(), "email")?;
    }
    if let Some(password) = &req.password {
        validate_password(password)?;
    }
    let role = req.role.as_deref().map(parse_role).transpose()?;

    // 管理员不能停用自己或取消自己的管理员角色
    if is_self(&id, &operator)
        && (req.is_active == Some(false) || role.is_some_and(|r| r != UserRole::Admin))
    {
        return Err(AppError::forbidden("Cannot demote or deactivate your own account"));
    }

    let user = UserRepository::new(state.get_db())
        .update(
            &id,
            UserChanges {
                username: req.username,
                email: req.email,
                password: req.password,
                role,
                is_active: req.is_active,
            },
        )
        .await
        .map_err(|e| map_repo_error(e, &id))?;

    tracing::info!(user_id = %id, operator = %operator.username, "User updated");
    Ok(Json(UserResponse {
        success: true,
        user: user.info(),
    }))
}

/// DELETE /api/admin/users/:id - 不能删除自己
pub async fn delete(
    State(state): State<ServerState>,
    Extension(operator): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<()>>> {
    if is_self(&id, &operator) {
        return Err(AppError::new(ErrorCode::CannotDeleteSelf));
    }

    let deleted = UserRepository::new(state.get_db()).delete(&id).await?;
    if !deleted {
        return Err(user_not_found(&id));
    }

    tracing::info!(user_id = %id, operator = %operator.username, "User deleted");
    Ok(Json(ApiResponse::ok()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_length() {
        assert_eq!(
            validate_password("12345").unwrap_err().code,
            ErrorCode::PasswordTooShort
        );
        assert!(validate_password("123456").is_ok());
    }

    #[test]
    fn test_is_self_accepts_bare_key() {
        let operator = CurrentUser {
            id: "user_account:admin".into(),
            username: "admin".into(),
            role: UserRole::Admin,
            permissions: vec!["all".into()],
        };
        assert!(is_self("user_account:admin", &operator));
        assert!(is_self("admin", &operator));
        assert!(!is_self("staff", &operator));
    }

    #[test]
    fn test_duplicate_mapping() {
        let err = map_repo_error(RepoError::Duplicate("Username 'a' already exists".into()), "");
        assert_eq!(err.code, ErrorCode::UsernameExists);
        let err = map_repo_error(RepoError::Duplicate("Email 'a@b.c' already exists".into()), "");
        assert_eq!(err.code, ErrorCode::EmailExists);
    }
}
