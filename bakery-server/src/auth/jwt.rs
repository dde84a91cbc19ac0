//! JWT 令牌服务
//!
//! 处理 JWT 令牌的生成、验证和解析。

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use ring::rand::{SecureRandom, SystemRandom};
use serde::{Deserialize, Serialize};
use shared::models::UserRole;
use thiserror::Error;

/// JWT 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    /// JWT 密钥 (应至少 32 字节)
    pub secret: String,
    /// 令牌过期时间 (分钟)
    pub expiration_minutes: i64,
    /// 令牌签发者
    pub issuer: String,
    /// 令牌受众
    pub audience: String,
}

impl JwtConfig {
    /// 从环境变量读取
    ///
    /// JWT_SECRET 缺失或过短时使用进程内随机密钥, 重启后已签发的令牌全部失效。
    /// 随机数生成失败直接返回错误。
    pub fn from_env() -> Result<Self, JwtError> {
        let secret = match load_jwt_secret() {
            Ok(secret) => secret,
            Err(e) => {
                tracing::warn!("JWT configuration error: {}, using temporary key", e);
                generate_secure_printable_jwt_secret()?
            }
        };

        Ok(Self {
            secret,
            expiration_minutes: std::env::var("JWT_EXPIRATION_MINUTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(7 * 24 * 60), // 默认 7 天
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "bakery-server".to_string()),
            audience: std::env::var("JWT_AUDIENCE")
                .unwrap_or_else(|_| "bakery-dashboard".to_string()),
        })
    }

    /// 使用固定密钥的配置 (测试 / 嵌入场景)
    pub fn with_secret(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            expiration_minutes: 60,
            issuer: "bakery-server".to_string(),
            audience: "bakery-dashboard".to_string(),
        }
    }
}

/// 存储在令牌中的 JWT Claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// 用户 ID (Subject)
    pub sub: String,
    /// 用户名
    pub username: String,
    /// 角色名称
    pub role: String,
    /// 权限列表 (逗号分隔)
    pub permissions: String,
    /// 过期时间戳
    pub exp: i64,
    /// 签发时间戳
    pub iat: i64,
    /// 签发者
    pub iss: String,
    /// 受众
    pub aud: String,
}

/// JWT 错误
#[derive(Error, Debug)]
pub enum JwtError {
    #[error("无效令牌: {0}")]
    InvalidToken(String),

    #[error("令牌已过期")]
    ExpiredToken,

    #[error("无效签名")]
    InvalidSignature,

    #[error("令牌生成失败: {0}")]
    GenerationFailed(String),

    #[error("配置错误: {0}")]
    ConfigError(String),
}

/// 生成可打印的安全 JWT 密钥 (用于开发环境)
pub fn generate_secure_printable_jwt_secret() -> Result<String, JwtError> {
    const ALLOWED: &[u8] =
        b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789!@#$%^&*()-_=+";

    let rng = SystemRandom::new();
    let mut bytes = [0u8; 64];
    rng.fill(&mut bytes)
        .map_err(|_| JwtError::ConfigError("Failed to generate secure random key".to_string()))?;

    Ok(bytes
        .iter()
        .map(|b| ALLOWED[(*b as usize) % ALLOWED.len()] as char)
        .collect())
}

/// 从环境变量加载 JWT 密钥 (至少 32 字符)
fn load_jwt_secret() -> Result<String, JwtError> {
    let secret = std::env::var("JWT_SECRET")
        .map_err(|_| JwtError::ConfigError("JWT_SECRET not set".to_string()))?;
    if secret.len() < 32 {
        return Err(JwtError::ConfigError(
            "JWT_SECRET must be at least 32 characters long".to_string(),
        ));
    }
    Ok(secret)
}

/// JWT 令牌服务
#[derive(Clone)]
pub struct JwtService {
    pub config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl std::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("issuer", &self.config.issuer)
            .field("audience", &self.config.audience)
            .finish_non_exhaustive()
    }
}

impl JwtService {
    /// 使用指定配置创建新的 JWT 服务
    pub fn with_config(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// 为用户生成新令牌
    pub fn generate_token(
        &self,
        user_id: &str,
        username: &str,
        role: UserRole,
        permissions: &[String],
    ) -> Result<String, JwtError> {
        let now = Utc::now();
        let expiration = now + Duration::minutes(self.config.expiration_minutes);

        let claims = Claims {
            sub: user_id.to_string(),
            username: username.to_string(),
            role: role.as_str().to_string(),
            permissions: permissions.join(","),
            exp: expiration.timestamp(),
            iat: now.timestamp(),
            iss: self.config.issuer.clone(),
            aud: self.config.audience.clone(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| JwtError::GenerationFailed(e.to_string()))
    }

    /// 验证并解码令牌
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[&self.config.audience]);
        validation.set_issuer(&[&self.config.issuer]);
        validation.set_required_spec_claims(&["sub", "exp", "iat", "iss", "aud"]);

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::ExpiredToken,
                ErrorKind::InvalidSignature => JwtError::InvalidSignature,
                ErrorKind::InvalidToken => JwtError::InvalidToken(e.to_string()),
                _ => JwtError::InvalidToken(format!("Token validation failed: {}", e)),
            }
        })?;

        Ok(token_data.claims)
    }

    /// 从 Authorization 头提取令牌
    pub fn extract_from_header(header: &str) -> Option<&str> {
        header.strip_prefix("Bearer ")
    }
}

/// 当前用户上下文 (从 JWT Claims 解析)
///
/// 由认证中间件创建，注入到请求处理函数
#[derive(Debug, Clone)]
pub struct CurrentUser {
    /// 用户 ID ("user_account:xxx")
    pub id: String,
    /// 用户名
    pub username: String,
    /// 角色
    pub role: UserRole,
    /// 权限列表
    pub permissions: Vec<String>,
}

impl TryFrom<Claims> for CurrentUser {
    type Error = shared::models::UnknownVariant;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        let role = claims.role.parse::<UserRole>()?;
        let permissions = if claims.permissions.is_empty() {
            vec![]
        } else {
            claims
                .permissions
                .split(',')
                .map(|s| s.to_string())
                .collect()
        };

        Ok(Self {
            id: claims.sub,
            username: claims.username,
            role,
            permissions,
        })
    }
}

impl CurrentUser {
    /// 是否管理员
    ///
    /// 管理员角色拥有所有权限
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    /// 检查是否拥有指定权限
    ///
    /// 支持通配符匹配：
    /// - `"orders:*"` 匹配 `"orders:manage"` 等
    /// - `"all"` 表示拥有所有权限
    pub fn has_permission(&self, permission: &str) -> bool {
        if self.is_admin() {
            return true;
        }

        self.permissions.iter().any(|p| {
            if p == "all" || p == permission {
                return true;
            }
            // "orders:*" 匹配 "orders:manage"
            if let Some(prefix) = p.strip_suffix(":*") {
                permission.starts_with(&format!("{}:", prefix))
            } else {
                false
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> JwtService {
        JwtService::with_config(JwtConfig::with_secret(
            "test-secret-key-that-is-long-enough-for-hs256",
        ))
    }

    #[test]
    fn test_env_config_uses_random_key_without_secret() {
        let config = JwtConfig::from_env().unwrap();
        assert!(config.secret.len() >= 32);
        if std::env::var("JWT_SECRET").is_err() {
            // 每次都是新的随机密钥, 不存在固定兜底值
            let again = JwtConfig::from_env().unwrap();
            assert_ne!(config.secret, again.secret);
        }
    }

    #[test]
    fn test_generated_secret_is_printable() {
        let secret = generate_secure_printable_jwt_secret().unwrap();
        assert_eq!(secret.len(), 64);
        assert!(secret.chars().all(|c| c.is_ascii_graphic()));
    }

    #[test]
    fn test_jwt_generation_and_validation() {
        let service = service();
        let permissions = vec!["orders:manage".to_string(), "cakes:manage".to_string()];

        let token = service
            .generate_token("user_account:abc", "baker", UserRole::Staff, &permissions)
            .expect("Failed to generate test token");

        let claims = service
            .validate_token(&token)
            .expect("Failed to validate test token");

        assert_eq!(claims.sub, "user_account:abc");
        assert_eq!(claims.username, "baker");
        assert_eq!(claims.role, "staff");
        assert_eq!(claims.permissions, "orders:manage,cakes:manage");
    }

    #[test]
    fn test_token_from_other_secret_is_rejected() {
        let token = service()
            .generate_token("user_account:abc", "baker", UserRole::Admin, &[])
            .unwrap();
        let other = JwtService::with_config(JwtConfig::with_secret(
            "a-completely-different-secret-of-enough-length",
        ));
        assert!(matches!(
            other.validate_token(&token),
            Err(JwtError::InvalidSignature)
        ));
    }

    #[test]
    fn test_extract_from_header() {
        assert_eq!(JwtService::extract_from_header("Bearer abc"), Some("abc"));
        assert_eq!(JwtService::extract_from_header("Basic abc"), None);
    }

    #[test]
    fn test_current_user_permissions() {
        let user = CurrentUser {
            id: "1".to_string(),
            username: "baker".to_string(),
            role: UserRole::Staff,
            permissions: vec!["orders:manage".to_string(), "cakes:*".to_string()],
        };

        assert!(user.has_permission("orders:manage"));
        assert!(user.has_permission("cakes:manage")); // Wildcard match
        assert!(!user.has_permission("users:manage"));
    }

    #[test]
    fn test_admin_has_all_permissions() {
        let admin = CurrentUser {
            id: "1".to_string(),
            username: "admin".to_string(),
            role: UserRole::Admin,
            permissions: vec![],
        };

        assert!(admin.has_permission("analytics:view"));
        assert!(admin.has_permission("users:manage"));
        assert!(admin.is_admin());
    }

    #[test]
    fn test_claims_with_unknown_role_are_rejected() {
        let claims = Claims {
            sub: "1".into(),
            username: "x".into(),
            role: "superuser".into(),
            permissions: String::new(),
            exp: 0,
            iat: 0,
            iss: String::new(),
            aud: String::new(),
        };
        assert!(CurrentUser::try_from(claims).is_err());
    }

    #[test]
    fn test_printable_secret_generation() {
        let a = generate_secure_printable_jwt_secret().unwrap();
        let b = generate_secure_printable_jwt_secret().unwrap();
        assert_eq!(a.len(), 64);
        assert_ne!(a, b);
    }
}
