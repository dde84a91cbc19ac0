//! Database Module
//!
//! 嵌入式 SurrealDB: 生产使用 RocksDB 引擎, 测试使用内存引擎

pub mod models;
pub mod repository;
pub mod seed;

use std::path::Path;

use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem, RocksDb};

use crate::utils::AppError;

const NAMESPACE: &str = "bakery";
const DATABASE: &str = "store";

/// 表与唯一索引定义 (幂等)
const SCHEMA: &str = r#"
    DEFINE TABLE IF NOT EXISTS cake SCHEMALESS;
    DEFINE TABLE IF NOT EXISTS order SCHEMALESS;
    DEFINE TABLE IF NOT EXISTS custom_request SCHEMALESS;
    DEFINE TABLE IF NOT EXISTS user_account SCHEMALESS;

    DEFINE INDEX IF NOT EXISTS cake_category ON TABLE cake FIELDS category;
    DEFINE INDEX IF NOT EXISTS order_phone ON TABLE order FIELDS phone;
    DEFINE INDEX IF NOT EXISTS order_status ON TABLE order FIELDS status;
    DEFINE INDEX IF NOT EXISTS custom_request_status ON TABLE custom_request FIELDS status;
    DEFINE INDEX IF NOT EXISTS user_account_username ON TABLE user_account FIELDS username UNIQUE;
    DEFINE INDEX IF NOT EXISTS user_account_email ON TABLE user_account FIELDS email UNIQUE;
"#;

/// Database service — owns the embedded SurrealDB handle
#[derive(Clone)]
pub struct DbService {
    pub db: Surreal<Db>,
}

impl DbService {
    /// 打开 (或创建) RocksDB 数据目录
    pub async fn open(path: &Path) -> Result<Self, AppError> {
        std::fs::create_dir_all(path)
            .map_err(|e| AppError::database(format!("Failed to create database dir: {e}")))?;

        let db = Surreal::new::<RocksDb>(path.to_string_lossy().to_string())
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;

        tracing::info!(path = %path.display(), "Database connection established (RocksDB)");
        Self::init(db).await
    }

    /// 内存数据库 (测试 / 临时运行)
    pub async fn memory() -> Result<Self, AppError> {
        let db = Surreal::new::<Mem>(())
            .await
            .map_err(|e| AppError::database(format!("Failed to open in-memory database: {e}")))?;
        Self::init(db).await
    }

    async fn init(db: Surreal<Db>) -> Result<Self, AppError> {
        db.use_ns(NAMESPACE)
            .use_db(DATABASE)
            .await
            .map_err(|e| AppError::database(format!("Failed to select namespace: {e}")))?;

        db.query(SCHEMA)
            .await
            .and_then(|response| response.check())
            .map_err(|e| AppError::database(format!("Failed to define schema: {e}")))?;
        tracing::info!("Database schema ready");

        Ok(Self { db })
    }

    /// 数据库连通性检查 (健康检查使用)
    pub async fn ping(db: &Surreal<Db>) -> bool {
        db.query("RETURN true").await.is_ok()
    }
}
