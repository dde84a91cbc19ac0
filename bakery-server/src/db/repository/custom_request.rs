//! Custom Cake Request Repository

use super::{BaseRepository, Conditions, RepoError, RepoResult, parse_record_id};
use crate::db::models::CustomCakeRequest;
use crate::db::models::custom_request::TABLE;
use shared::models::RequestStatus;
use shared::request::ListQuery;
use shared::util::now_millis;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

/// 客户名 / 电话 / 场合 模糊搜索
const SEARCH_FIELDS: &[&str] = &["customerName", "phone", "occasion"];

#[derive(Clone)]
pub struct CustomRequestRepository {
    base: BaseRepository,
}

impl CustomRequestRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn create(&self, mut request: CustomCakeRequest) -> RepoResult<CustomCakeRequest> {
        let now = now_millis();
        request.id = None;
        request.status = RequestStatus::Pending;
        request.created_at = now;
        request.updated_at = now;
        let created: Option<CustomCakeRequest> =
            self.base.db().create(TABLE).content(request).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create custom request".to_string()))
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<CustomCakeRequest>> {
        let thing = parse_record_id(TABLE, id)?;
        let request: Option<CustomCakeRequest> = self.base.db().select(thing).await?;
        Ok(request)
    }

    pub async fn find_page(
        &self,
        status: Option<RequestStatus>,
        query: &ListQuery,
    ) -> RepoResult<(Vec<CustomCakeRequest>, u64)> {
        let mut conditions = Conditions::new();
        if let Some(status) = status {
            conditions = conditions.eq("status", "status", status.as_str());
        }
        if let Some(term) = query.search_term() {
            conditions = conditions.search(SEARCH_FIELDS, term);
        }

        let sql = format!(
            "SELECT * FROM custom_request {} ORDER BY createdAt DESC LIMIT $limit START $start",
            conditions.where_sql()
        );
        let requests: Vec<CustomCakeRequest> = conditions
            .bind_all(self.base.db().query(sql))
            .bind(("limit", query.limit()))
            .bind(("start", query.offset()))
            .await?
            .take(0)?;
        let total = self.base.count(TABLE, conditions).await?;
        Ok((requests, total))
    }

    pub async fn find_all(&self) -> RepoResult<Vec<CustomCakeRequest>> {
        let requests: Vec<CustomCakeRequest> = self
            .base
            .db()
            .query("SELECT * FROM custom_request ORDER BY createdAt DESC")
            .await?
            .take(0)?;
        Ok(requests)
    }

    pub async fn find_recent(&self, limit: u32) -> RepoResult<Vec<CustomCakeRequest>> {
        let requests: Vec<CustomCakeRequest> = self
            .base
            .db()
            .query("SELECT * FROM custom_request ORDER BY createdAt DESC LIMIT $limit")
            .bind(("limit", limit))
            .await?
            .take(0)?;
        Ok(requests)
    }

    pub async fn count(&self) -> RepoResult<u64> {
        self.base.count(TABLE, Conditions::new()).await
    }

    pub async fn count_by_status(&self, status: RequestStatus) -> RepoResult<u64> {
        self.base
            .count(TABLE, Conditions::new().eq("status", "status", status.as_str()))
            .await
    }

    /// 写入状态和可选的备注 / 报价; 记录不存在返回 None
    pub async fn update_status(
        &self,
        id: &str,
        status: RequestStatus,
        admin_notes: Option<String>,
        quote_amount: Option<f64>,
    ) -> RepoResult<Option<CustomCakeRequest>> {
        let thing = parse_record_id(TABLE, id)?;
        let mut sets = vec!["status = $status", "updatedAt = $now"];
        if admin_notes.is_some() {
            sets.push("adminNotes = $notes");
        }
        if quote_amount.is_some() {
            sets.push("quoteAmount = $quote");
        }
        let sql = format!("UPDATE $thing SET {} RETURN AFTER", sets.join(", "));

        let updated: Option<CustomCakeRequest> = self
            .base
            .db()
            .query(sql)
            .bind(("thing", thing))
            .bind(("status", status))
            .bind(("now", now_millis()))
            .bind(("notes", admin_notes))
            .bind(("quote", quote_amount))
            .await?
            .take(0)?;
        Ok(updated)
    }
}
