//! User Account Model
//!
//! 密码哈希从不序列化; 写入通过 `UserRepository` 的 SET 语句完成。

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use shared::models::{UserInfo, UserRole};
use surrealdb::RecordId;

pub type UserId = RecordId;

pub const TABLE: &str = "user_account";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<UserId>,
    pub username: String,
    pub email: String,
    #[serde(default, skip_serializing)]
    pub password_hash: String,
    #[serde(default)]
    pub role: UserRole,
    #[serde(default = "default_true", deserialize_with = "serde_helpers::bool_true")]
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_login: Option<i64>,
    #[serde(default)]
    pub created_at: i64,
}

fn default_true() -> bool {
    true
}

impl User {
    /// Verify password using argon2
    pub fn verify_password(&self, password: &str) -> Result<bool, argon2::password_hash::Error> {
        use argon2::{
            Argon2,
            password_hash::{PasswordHash, PasswordVerifier},
        };

        let parsed_hash = PasswordHash::new(&self.password_hash)?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Hash password using argon2
    pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
        use argon2::{
            Argon2,
            password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
        };

        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
        Ok(hash.to_string())
    }

    pub fn id_string(&self) -> String {
        serde_helpers::id_string(&self.id)
    }

    /// 对外用户信息 (不含密码)
    pub fn info(&self) -> UserInfo {
        UserInfo {
            id: self.id_string(),
            username: self.username.clone(),
            email: self.email.clone(),
            role: self.role,
            is_active: self.is_active,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(password: &str) -> User {
        User {
            id: Some("user_account:admin".parse().unwrap()),
            username: "admin".into(),
            email: "admin@bakery.local".into(),
            password_hash: User::hash_password(password).unwrap(),
            role: UserRole::Admin,
            is_active: true,
            last_login: None,
            created_at: 0,
        }
    }

    #[test]
    fn test_password_hash_and_verify() {
        let u = user("secret123");
        assert!(u.verify_password("secret123").unwrap());
        assert!(!u.verify_password("wrong").unwrap());
    }

    #[test]
    fn test_password_hash_is_salted() {
        assert_ne!(
            User::hash_password("same").unwrap(),
            User::hash_password("same").unwrap()
        );
    }

    #[test]
    fn test_password_hash_never_serialized() {
        let json = serde_json::to_value(user("secret123")).unwrap();
        assert!(json.get("passwordHash").is_none());
        assert_eq!(json["id"], "user_account:admin");
        assert_eq!(json["role"], "admin");
    }
}
