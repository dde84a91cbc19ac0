//! 启动时的数据初始化
//!
//! 仅在没有任何管理员账号时创建种子管理员。

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::core::config::SeedAdmin;
use crate::db::models::User;
use crate::db::repository::user::NewUser;
use crate::db::repository::{RepoResult, UserRepository};
use shared::models::UserRole;

/// 确保存在管理员账号; 返回新建的管理员 (已存在时为 None)
pub async fn ensure_admin(db: &Surreal<Db>, seed: &SeedAdmin) -> RepoResult<Option<User>> {
    let repo = UserRepository::new(db.clone());
    if repo.count_by_role(UserRole::Admin).await? > 0 {
        tracing::debug!("Admin account already present, skipping seed");
        return Ok(None);
    }

    let admin = repo
        .create(NewUser {
            username: seed.username.clone(),
            email: seed.email.clone(),
            password: seed.password.clone(),
            role: UserRole::Admin,
        })
        .await?;

    tracing::info!(username = %admin.username, email = %admin.email, "Seed admin account created");
    Ok(Some(admin))
}
