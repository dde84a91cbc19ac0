//! Repository Module
//!
//! Provides CRUD operations for SurrealDB tables.

pub mod cake;
pub mod custom_request;
pub mod order;
pub mod user;

pub use cake::CakeRepository;
pub use custom_request::CustomRequestRepository;
pub use order::OrderRepository;
pub use user::UserRepository;

use serde_json::Value;
use shared::ErrorCode;
use surrealdb::engine::local::Db;
use surrealdb::method::Query;
use surrealdb::{RecordId, Surreal};
use thiserror::Error;

use crate::utils::AppError;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => AppError::with_message(ErrorCode::NotFound, msg),
            RepoError::Duplicate(msg) => AppError::conflict(msg),
            RepoError::Validation(msg) => AppError::validation(msg),
            RepoError::Database(msg) => {
                tracing::error!(error = %msg, "Database operation failed");
                AppError::database(msg)
            }
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

// =============================================================================
// ID Convention: 对外统一使用 "table:id" 格式
// =============================================================================
//
//   - 解析: parse_record_id("cake", "cake:abc") / parse_record_id("cake", "abc")
//   - CRUD: db.select(id) / db.delete(id) 直接使用 RecordId

/// 解析记录 ID, 允许省略表前缀; 表名不符视为无效
pub fn parse_record_id(table: &str, id: &str) -> RepoResult<RecordId> {
    let id = id.trim();
    if id.is_empty() {
        return Err(RepoError::Validation(format!("Invalid ID: '{}'", id)));
    }
    let full = if id.contains(':') {
        id.to_string()
    } else {
        format!("{}:{}", table, id)
    };
    let record: RecordId = full
        .parse()
        .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;
    if record.table() != table {
        return Err(RepoError::Validation(format!(
            "ID {} does not belong to {}",
            id, table
        )));
    }
    Ok(record)
}

/// 批量解析; 任何一个无效则整体失败
pub fn parse_record_ids(table: &str, ids: &[String]) -> RepoResult<Vec<RecordId>> {
    ids.iter().map(|id| parse_record_id(table, id)).collect()
}

/// Base repository with database reference
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }

    /// `SELECT count() FROM <table> <where> GROUP ALL`
    pub async fn count(&self, table: &str, conditions: Conditions) -> RepoResult<u64> {
        let sql = format!(
            "SELECT count() FROM {} {} GROUP ALL",
            table,
            conditions.where_sql()
        );
        let mut result = conditions.bind_all(self.db.query(sql)).await?;
        let count: Option<i64> = result.take((0, "count"))?;
        Ok(count.unwrap_or(0).max(0) as u64)
    }
}

/// WHERE 子句构建器: 条件片段 + 绑定参数
#[derive(Debug, Default, Clone)]
pub struct Conditions {
    clauses: Vec<String>,
    binds: Vec<(String, Value)>,
}

impl Conditions {
    pub fn new() -> Self {
        Self::default()
    }

    /// `field = $name`
    pub fn eq(mut self, field: &str, name: &str, value: impl Into<Value>) -> Self {
        self.clauses.push(format!("{} = ${}", field, name));
        self.binds.push((name.to_string(), value.into()));
        self
    }

    /// `field >= $name`
    pub fn gte(mut self, field: &str, name: &str, value: impl Into<Value>) -> Self {
        self.clauses.push(format!("{} >= ${}", field, name));
        self.binds.push((name.to_string(), value.into()));
        self
    }

    /// `field <= $name`
    pub fn lte(mut self, field: &str, name: &str, value: impl Into<Value>) -> Self {
        self.clauses.push(format!("{} <= ${}", field, name));
        self.binds.push((name.to_string(), value.into()));
        self
    }

    /// 不区分大小写的包含匹配, 任一字段命中即可
    pub fn search(mut self, fields: &[&str], term: String) -> Self {
        if fields.is_empty() {
            return self;
        }
        let any = fields
            .iter()
            .map(|f| format!("string::contains(string::lowercase({} ?? ''), $search)", f))
            .collect::<Vec<_>>()
            .join(" OR ");
        self.clauses.push(format!("({})", any));
        self.binds.push(("search".to_string(), Value::String(term)));
        self
    }

    /// 原始条件片段 (不带参数)
    pub fn raw(mut self, clause: &str) -> Self {
        self.clauses.push(clause.to_string());
        self
    }

    pub fn where_sql(&self) -> String {
        if self.clauses.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", self.clauses.join(" AND "))
        }
    }

    pub fn bind_all<'r>(&self, mut query: Query<'r, Db>) -> Query<'r, Db> {
        for (name, value) in &self.binds {
            query = query.bind((name.clone(), value.clone()));
        }
        query
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_record_id_accepts_bare_key() {
        let id = parse_record_id("cake", "abc").unwrap();
        assert_eq!(id.table(), "cake");
        assert_eq!(id.to_string(), "cake:abc");
        assert_eq!(parse_record_id("cake", "cake:abc").unwrap(), id);
    }

    #[test]
    fn test_parse_record_id_rejects_other_table() {
        assert!(matches!(
            parse_record_id("cake", "order:abc"),
            Err(RepoError::Validation(_))
        ));
        assert!(parse_record_id("cake", "  ").is_err());
    }

    #[test]
    fn test_conditions_sql() {
        let c = Conditions::new()
            .eq("status", "status", "pending")
            .search(&["customerName", "phone"], "jane".into());
        assert_eq!(
            c.where_sql(),
            "WHERE status = $status AND (string::contains(string::lowercase(customerName ?? ''), $search) OR string::contains(string::lowercase(phone ?? ''), $search))"
        );
        assert_eq!(Conditions::new().where_sql(), "");
    }

    #[test]
    fn test_repo_error_maps_to_http_codes() {
        let err: AppError = RepoError::Duplicate("x".into()).into();
        assert_eq!(err.http_status(), http::StatusCode::CONFLICT);
        let err: AppError = RepoError::NotFound("x".into()).into();
        assert_eq!(err.http_status(), http::StatusCode::NOT_FOUND);
        let err: AppError = RepoError::Validation("x".into()).into();
        assert_eq!(err.http_status(), http::StatusCode::BAD_REQUEST);
    }
}
