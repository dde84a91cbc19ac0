//! Bakery Server - 蛋糕店电商后端
//!
//! # 架构概述
//!
//! - **店面 API** (`api`): 蛋糕目录、下单、定制蛋糕申请
//! - **管理 API** (`api::admin`): 订单/申请状态、蛋糕 CRUD、批量操作、库存、分析
//! - **数据库** (`db`): 嵌入式 SurrealDB 存储
//! - **认证** (`auth`): JWT + Argon2 认证体系
//! - **结账流程** (`checkout`): 订单与定制申请的提交和提交后副作用
//! - **报表引擎** (`reporting`): 仪表盘统计与分析聚合
//! - **服务** (`services`): 邮件通知 worker、图片存储
//!
//! # 模块结构
//!
//! ```text
//! bakery-server/src/
//! ├── core/          # 配置、状态、错误
//! ├── auth/          # JWT 认证、权限
//! ├── api/           # HTTP 路由和处理器
//! ├── checkout/      # 下单 / 定制申请流程
//! ├── reporting/     # 统计聚合 (纯函数)
//! ├── services/      # 通知、图片存储
//! ├── utils/         # 日志、校验
//! └── db/            # 数据库层
//! ```

pub mod api;
pub mod auth;
pub mod checkout;
pub mod core;
pub mod db;
pub mod reporting;
pub mod services;
pub mod utils;

// Re-export 公共类型
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use utils::{AppError, AppResult};

// Re-export unified error types from shared
pub use utils::{ApiResponse, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

// Security logging macro - 支持 tracing 格式说明符
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

/// 设置运行环境 (dotenv, 工作目录, 日志)
pub fn setup_environment() -> anyhow::Result<Config> {
    dotenv::dotenv().ok();

    let config = Config::from_env()?;
    std::fs::create_dir_all(&config.work_dir)?;

    let log_dir = config.log_dir();
    std::fs::create_dir_all(&log_dir)?;
    init_logger_with_file(
        Some(&config.log_level),
        Some(config.log_json),
        log_dir.to_str(),
    );

    Ok(config)
}

pub fn print_banner() {
    println!(
        r#"
    ____        __
   / __ )____ _/ /_____  _______  __
  / __  / __ `/ //_/ _ \/ ___/ / / /
 / /_/ / /_/ / ,< /  __/ /  / /_/ /
/_____/\__,_/_/|_|\___/_/   \__, /
                           /____/
    "#
    );
}
