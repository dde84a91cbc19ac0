use thiserror::Error;

/// 服务器启动 / 运行错误
///
/// HTTP 处理器使用 [`crate::AppError`]; 这里只覆盖进程级别的失败。
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: std::net::SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("Database initialization failed: {0}")]
    Database(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<crate::auth::JwtError> for ServerError {
    fn from(err: crate::auth::JwtError) -> Self {
        ServerError::Config(err.to_string())
    }
}

impl From<crate::AppError> for ServerError {
    fn from(err: crate::AppError) -> Self {
        ServerError::Database(err.message)
    }
}

/// 服务器级 Result 类型别名
pub type Result<T> = std::result::Result<T, ServerError>;
