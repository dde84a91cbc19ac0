use std::path::PathBuf;

use super::Result;
use crate::auth::JwtConfig;

/// SMTP 配置 (未配置时邮件只写日志)
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    /// 发件人地址, 默认同 username
    pub from: String,
}

/// Cloudinary 配置 (未配置时图片存本地)
#[derive(Debug, Clone)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
    pub folder: String,
}

/// 初始管理员账号 (仅在没有任何管理员时创建)
#[derive(Debug, Clone)]
pub struct SeedAdmin {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// 服务器配置
///
/// # 环境变量
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | ./data | 工作目录 (数据库、上传图片、日志) |
/// | HTTP_PORT | 5000 | HTTP 服务端口 |
/// | ENVIRONMENT | development | 运行环境 |
/// | PUBLIC_BASE_URL | http://localhost:5000 | 本地图片 URL 前缀 |
/// | ADMIN_EMAIL | - | 新订单 / 定制申请通知收件人 (默认 SMTP 发件人) |
/// | ADMIN_URL | http://localhost:5173 | 通知邮件中的管理后台链接 |
/// | SMTP_HOST / SMTP_PORT / SMTP_USER / SMTP_PASS / SMTP_FROM | - / 587 | 邮件发送 |
/// | CLOUDINARY_CLOUD_NAME / CLOUDINARY_API_KEY / CLOUDINARY_API_SECRET | - | 远程图片存储 |
/// | SEED_ADMIN_USERNAME / SEED_ADMIN_EMAIL / SEED_ADMIN_PASSWORD | admin / admin@bakery.local / - | 初始管理员 |
/// | REQUEST_TIMEOUT_MS | 30000 | 请求超时(毫秒) |
/// | NOTIFICATION_QUEUE_SIZE | 256 | 通知队列容量 |
/// | LOG_LEVEL / LOG_JSON | info / false | 日志 |
///
/// # 示例
///
/// ```ignore
/// WORK_DIR=/data/bakery HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录
    pub work_dir: String,
    /// HTTP API 服务端口
    pub http_port: u16,
    /// 运行环境: development | staging | production
    pub environment: String,
    /// 对外访问地址, 用于拼接本地图片 URL
    pub public_base_url: String,
    /// JWT 认证配置
    pub jwt: JwtConfig,
    /// 通知收件人
    pub admin_email: Option<String>,
    /// 管理后台地址 (邮件链接)
    pub admin_url: String,
    pub smtp: Option<SmtpConfig>,
    pub cloudinary: Option<CloudinaryConfig>,
    pub seed_admin: Option<SeedAdmin>,
    /// 请求超时时间 (毫秒)
    pub request_timeout_ms: u64,
    /// 通知队列容量
    pub notification_queue_size: usize,
    pub log_level: String,
    pub log_json: bool,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值; 只有 JWT 密钥无法生成时失败
    pub fn from_env() -> Result<Self> {
        let http_port = env_parse("HTTP_PORT", 5000);
        Ok(Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "./data".into()),
            http_port,
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            public_base_url: std::env::var("PUBLIC_BASE_URL")
                .unwrap_or_else(|_| format!("http://localhost:{}", http_port)),
            jwt: JwtConfig::from_env()?,
            admin_email: env_opt("ADMIN_EMAIL"),
            admin_url: std::env::var("ADMIN_URL").unwrap_or_else(|_| "http://localhost:5173".into()),
            smtp: smtp_from_env(),
            cloudinary: cloudinary_from_env(),
            seed_admin: env_opt("SEED_ADMIN_PASSWORD").map(|password| SeedAdmin {
                username: std::env::var("SEED_ADMIN_USERNAME").unwrap_or_else(|_| "admin".into()),
                email: std::env::var("SEED_ADMIN_EMAIL")
                    .unwrap_or_else(|_| "admin@bakery.local".into()),
                password,
            }),
            request_timeout_ms: env_parse("REQUEST_TIMEOUT_MS", 30000),
            notification_queue_size: env_parse("NOTIFICATION_QUEUE_SIZE", 256),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_json: env_parse("LOG_JSON", false),
        })
    }

    /// 使用自定义值覆盖部分配置
    ///
    /// 常用于测试场景: 不连接 SMTP / Cloudinary, 不创建种子管理员
    pub fn with_overrides(work_dir: impl Into<String>, http_port: u16) -> Result<Self> {
        let mut config = Self::from_env()?;
        config.work_dir = work_dir.into();
        config.http_port = http_port;
        config.public_base_url = format!("http://localhost:{}", http_port);
        config.smtp = None;
        config.cloudinary = None;
        config.seed_admin = None;
        Ok(config)
    }

    /// 员工通知收件人: ADMIN_EMAIL, 否则 SMTP 发件地址
    pub fn staff_recipient(&self) -> Option<String> {
        self.admin_email
            .clone()
            .or_else(|| self.smtp.as_ref().map(|smtp| smtp.from.clone()))
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// 数据库目录
    pub fn database_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("database")
    }

    /// 本地图片目录
    pub fn images_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("uploads").join("images")
    }

    /// 日志目录: LOG_DIR, 否则 {work_dir}/logs
    pub fn log_dir(&self) -> PathBuf {
        env_opt("LOG_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(&self.work_dir).join("logs"))
    }
}

fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn smtp_from_env() -> Option<SmtpConfig> {
    let host = env_opt("SMTP_HOST")?;
    let username = env_opt("SMTP_USER")?;
    let password = env_opt("SMTP_PASS")?;
    Some(SmtpConfig {
        host,
        port: env_parse("SMTP_PORT", 587),
        from: env_opt("SMTP_FROM").unwrap_or_else(|| username.clone()),
        username,
        password,
    })
}

fn cloudinary_from_env() -> Option<CloudinaryConfig> {
    Some(CloudinaryConfig {
        cloud_name: env_opt("CLOUDINARY_CLOUD_NAME")?,
        api_key: env_opt("CLOUDINARY_API_KEY")?,
        api_secret: env_opt("CLOUDINARY_API_SECRET")?,
        folder: std::env::var("CLOUDINARY_FOLDER").unwrap_or_else(|_| "bakery".into()),
    })
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
