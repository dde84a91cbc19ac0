//! Logging Infrastructure
//!
//! Structured logging setup with support for both development and production environments.

use std::path::Path;

use tracing_subscriber::EnvFilter;

/// Initialize the logger
pub fn init_logger() {
    init_logger_with_file(None, None, None);
}

/// Initialize the logger with optional file output
///
/// `RUST_LOG` 优先于 `log_level`; `json = Some(true)` 输出 JSON 行 (生产环境日志采集)
pub fn init_logger_with_file(log_level: Option<&str>, json: Option<bool>, log_dir: Option<&str>) {
    let level = log_level.unwrap_or("info");
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(false);

    let file_appender = log_dir
        .map(Path::new)
        .filter(|p| p.exists())
        .and_then(|p| p.to_str())
        .map(|dir| tracing_appender::rolling::daily(dir, "bakery-server"));

    // try_init: 测试中可能被多次调用
    let result = match (file_appender, json.unwrap_or(false)) {
        (Some(appender), true) => builder.json().with_writer(appender).try_init(),
        (Some(appender), false) => builder.with_writer(appender).try_init(),
        (None, true) => builder.json().try_init(),
        (None, false) => builder.try_init(),
    };

    if result.is_err() {
        tracing::debug!("Logger already initialized");
    }
}
