use std::path::PathBuf;
use std::sync::Arc;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::auth::JwtService;
use crate::core::{Config, Result, ServerError};
use crate::db::{DbService, seed};
use crate::services::images::{CloudinaryImageStore, ImageStore, LocalImageStore};
use crate::services::notification::{
    LogMailer, Mailer, NotificationService, NotificationWorker, Recipients, SmtpMailer,
};

/// 服务器状态 - 持有所有服务的共享引用
///
/// 使用 Arc / 句柄实现浅拷贝, 每个请求克隆一份。
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | db | Surreal<Db> | 嵌入式数据库 |
/// | jwt_service | Arc<JwtService> | JWT 认证服务 |
/// | notifier | NotificationService | 通知入队句柄 |
/// | images | Arc<dyn ImageStore> | 图片存储 (本地 / Cloudinary) |
#[derive(Clone)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// 嵌入式数据库 (SurrealDB)
    pub db: Surreal<Db>,
    /// JWT 认证服务 (Arc 共享所有权)
    pub jwt_service: Arc<JwtService>,
    /// 通知队列
    pub notifier: NotificationService,
    /// 图片存储
    pub images: Arc<dyn ImageStore>,
}

impl std::fmt::Debug for ServerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerState")
            .field("config", &self.config)
            .field("jwt_service", &self.jwt_service)
            .finish_non_exhaustive()
    }
}

impl ServerState {
    /// 手动构造 (测试使用内存数据库和自定义通知接收端)
    pub fn from_parts(
        config: Config,
        db: Surreal<Db>,
        notifier: NotificationService,
        images: Arc<dyn ImageStore>,
    ) -> Self {
        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));
        Self {
            config,
            db,
            jwt_service,
            notifier,
            images,
        }
    }

    /// 初始化服务器状态
    ///
    /// 按顺序初始化：
    /// 1. 数据库 (work_dir/database) 与 schema
    /// 2. 种子管理员 (仅配置了密码且没有管理员时)
    /// 3. 通知 worker (SMTP 或仅日志)
    /// 4. 图片存储 (Cloudinary 或本地)
    pub async fn initialize(config: &Config) -> Result<Self> {
        // 1. Database
        let db = DbService::open(&config.database_dir())
            .await
            .map_err(|e| ServerError::Database(e.message))?
            .db;

        // 2. Seed admin
        if let Some(seed_admin) = &config.seed_admin {
            seed::ensure_admin(&db, seed_admin)
                .await
                .map_err(|e| ServerError::Database(e.to_string()))?;
        }

        // 3. Notifications
        let mailer: Arc<dyn Mailer> = match &config.smtp {
            Some(smtp) => match SmtpMailer::new(smtp) {
                Ok(mailer) => {
                    tracing::info!(host = %smtp.host, "📧 SMTP mailer configured");
                    Arc::new(mailer)
                }
                Err(e) => {
                    return Err(ServerError::Config(format!("Invalid SMTP config: {}", e)));
                }
            },
            None => {
                tracing::warn!("SMTP not configured, notification emails will only be logged");
                Arc::new(LogMailer)
            }
        };
        let (notifier, rx) = NotificationService::new(config.notification_queue_size);
        let worker = NotificationWorker::new(
            mailer,
            Recipients {
                staff: config.staff_recipient(),
                dashboard_url: config.admin_url.clone(),
                shop_url: config.public_base_url.clone(),
            },
        );
        tokio::spawn(worker.run(rx));

        // 4. Image store
        let images: Arc<dyn ImageStore> = match &config.cloudinary {
            Some(cloudinary) => {
                tracing::info!(cloud = %cloudinary.cloud_name, "☁️ Cloudinary image store configured");
                Arc::new(CloudinaryImageStore::new(cloudinary.clone()))
            }
            None => {
                tracing::info!(dir = %config.images_dir().display(), "Using local image store");
                Arc::new(LocalImageStore::new(
                    config.images_dir(),
                    config.public_base_url.clone(),
                ))
            }
        };

        Ok(Self::from_parts(config.clone(), db, notifier, images))
    }

    /// 获取数据库实例
    pub fn get_db(&self) -> Surreal<Db> {
        self.db.clone()
    }

    /// 获取工作目录
    pub fn work_dir(&self) -> PathBuf {
        PathBuf::from(&self.config.work_dir)
    }

    /// 获取 JWT 服务
    pub fn get_jwt_service(&self) -> Arc<JwtService> {
        self.jwt_service.clone()
    }
}
