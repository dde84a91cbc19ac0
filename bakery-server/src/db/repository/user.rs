//! User Account Repository

use super::{BaseRepository, Conditions, RepoError, RepoResult, parse_record_id};
use crate::db::models::User;
use crate::db::models::user::TABLE;
use shared::models::UserRole;
use shared::util::now_millis;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

/// 新建用户参数 (密码为明文, 写入前哈希)
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: UserRole,
}

/// 已校验的用户更新
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<UserRole>,
    pub is_active: Option<bool>,
}

#[derive(Clone)]
pub struct UserRepository {
    base: BaseRepository,
}

impl UserRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn find_all(&self) -> RepoResult<Vec<User>> {
        let users: Vec<User> = self
            .base
            .db()
            .query("SELECT * FROM user_account ORDER BY username")
            .await?
            .take(0)?;
        Ok(users)
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<User>> {
        let thing = parse_record_id(TABLE, id)?;
        let user: Option<User> = self.base.db().select(thing).await?;
        Ok(user)
    }

    /// 邮箱不区分大小写
    pub async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        let email_owned = email.trim().to_lowercase();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM user_account WHERE email = $email LIMIT 1")
            .bind(("email", email_owned))
            .await?;
        let users: Vec<User> = result.take(0)?;
        Ok(users.into_iter().next())
    }

    pub async fn find_by_username(&self, username: &str) -> RepoResult<Option<User>> {
        let username_owned = username.trim().to_string();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM user_account WHERE username = $username LIMIT 1")
            .bind(("username", username_owned))
            .await?;
        let users: Vec<User> = result.take(0)?;
        Ok(users.into_iter().next())
    }

    pub async fn count(&self) -> RepoResult<u64> {
        self.base.count(TABLE, Conditions::new()).await
    }

    pub async fn count_by_role(&self, role: UserRole) -> RepoResult<u64> {
        self.base
            .count(TABLE, Conditions::new().eq("role", "role", role.as_str()))
            .await
    }

    /// Create a new user
    pub async fn create(&self, data: NewUser) -> RepoResult<User> {
        let email = data.email.trim().to_lowercase();
        let username = data.username.trim().to_string();

        if self.find_by_username(&username).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Username '{}' already exists",
                username
            )));
        }
        if self.find_by_email(&email).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Email '{}' already exists",
                email
            )));
        }

        let password_hash = User::hash_password(&data.password)
            .map_err(|e| RepoError::Database(format!("Failed to hash password: {}", e)))?;

        let mut result = self
            .base
            .db()
            .query(
                r#"CREATE user_account SET
                    username = $username,
                    email = $email,
                    passwordHash = $password_hash,
                    role = $role,
                    isActive = true,
                    createdAt = $now
                RETURN AFTER"#,
            )
            .bind(("username", username))
            .bind(("email", email))
            .bind(("password_hash", password_hash))
            .bind(("role", data.role))
            .bind(("now", now_millis()))
            .await?;

        let created: Option<User> = result.take(0)?;
        created.ok_or_else(|| RepoError::Database("Failed to create user".to_string()))
    }

    /// Update a user; 修改密码时重新哈希
    pub async fn update(&self, id: &str, data: UserChanges) -> RepoResult<User> {
        let thing = parse_record_id(TABLE, id)?;
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("User {} not found", id)))?;

        let username = data.username.map(|u| u.trim().to_string());
        let email = data.email.map(|e| e.trim().to_lowercase());

        if let Some(ref new_username) = username
            && new_username != &existing.username
            && self.find_by_username(new_username).await?.is_some()
        {
            return Err(RepoError::Duplicate(format!(
                "Username '{}' already exists",
                new_username
            )));
        }
        if let Some(ref new_email) = email
            && new_email != &existing.email
            && self.find_by_email(new_email).await?.is_some()
        {
            return Err(RepoError::Duplicate(format!(
                "Email '{}' already exists",
                new_email
            )));
        }

        let password_hash = match data.password {
            Some(ref password) => Some(
                User::hash_password(password)
                    .map_err(|e| RepoError::Database(format!("Failed to hash password: {}", e)))?,
            ),
            None => None,
        };

        let mut sets = Vec::new();
        if username.is_some() {
            sets.push("username = $username");
        }
        if email.is_some() {
            sets.push("email = $email");
        }
        if password_hash.is_some() {
            sets.push("passwordHash = $password_hash");
        }
        if data.role.is_some() {
            sets.push("role = $role");
        }
        if data.is_active.is_some() {
            sets.push("isActive = $is_active");
        }
        if sets.is_empty() {
            return Ok(existing);
        }

        let sql = format!("UPDATE $thing SET {} RETURN AFTER", sets.join(", "));
        let mut result = self
            .base
            .db()
            .query(sql)
            .bind(("thing", thing))
            .bind(("username", username))
            .bind(("email", email))
            .bind(("password_hash", password_hash))
            .bind(("role", data.role))
            .bind(("is_active", data.is_active))
            .await?;

        let updated: Option<User> = result.take(0)?;
        updated.ok_or_else(|| RepoError::NotFound(format!("User {} not found", id)))
    }

    /// 登录成功后记录时间
    pub async fn touch_last_login(&self, id: &str) -> RepoResult<()> {
        let thing = parse_record_id(TABLE, id)?;
        self.base
            .db()
            .query("UPDATE $thing SET lastLogin = $now")
            .bind(("thing", thing))
            .bind(("now", now_millis()))
            .await?
            .check()?;
        Ok(())
    }

    /// Hard delete; 返回记录是否存在
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let thing = parse_record_id(TABLE, id)?;
        let deleted: Option<User> = self.base.db().delete(thing).await?;
        Ok(deleted.is_some())
    }
}
