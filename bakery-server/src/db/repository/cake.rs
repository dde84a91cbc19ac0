//! Cake Repository

use super::{BaseRepository, Conditions, RepoError, RepoResult, parse_record_id, parse_record_ids};
use crate::db::models::cake::TABLE;
use crate::db::models::{Cake, CakeUpdate};
use shared::request::CakeQuery;
use shared::util::now_millis;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

/// 名称 / 描述 / 口味 模糊搜索
const SEARCH_FIELDS: &[&str] = &["name", "description", "flavor"];

#[derive(Clone)]
pub struct CakeRepository {
    base: BaseRepository,
}

impl CakeRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    fn conditions(query: &CakeQuery) -> Conditions {
        let mut c = Conditions::new();
        if let Some(category) = query.category_filter() {
            c = c.eq("category", "category", category);
        }
        if let Some(flavor) = query.flavor_filter() {
            c = c.eq("flavor", "flavor", flavor);
        }
        if let Some(featured) = query.featured {
            c = c.eq("featured", "featured", featured);
        }
        if let Some(available) = query.available {
            c = c.eq("available", "available", available);
        }
        if let Some(term) = query.search_term() {
            c = c.search(SEARCH_FIELDS, term);
        }
        c
    }

    /// 店面目录: 按过滤条件返回全部, 最新在前
    pub async fn find_catalog(&self, query: &CakeQuery) -> RepoResult<Vec<Cake>> {
        let conditions = Self::conditions(query);
        let sql = format!(
            "SELECT * FROM cake {} ORDER BY createdAt DESC",
            conditions.where_sql()
        );
        let cakes: Vec<Cake> = conditions
            .bind_all(self.base.db().query(sql))
            .await?
            .take(0)?;
        Ok(cakes)
    }

    /// 推荐蛋糕 (featured 且 available)
    pub async fn find_featured(&self) -> RepoResult<Vec<Cake>> {
        let cakes: Vec<Cake> = self
            .base
            .db()
            .query(
                "SELECT * FROM cake WHERE featured = true AND available = true ORDER BY createdAt DESC",
            )
            .await?
            .take(0)?;
        Ok(cakes)
    }

    /// 管理端分页列表, 返回 (当前页, 总数)
    pub async fn find_page(
        &self,
        query: &CakeQuery,
        offset: u32,
        limit: u32,
    ) -> RepoResult<(Vec<Cake>, u64)> {
        let conditions = Self::conditions(query);
        let sql = format!(
            "SELECT * FROM cake {} ORDER BY createdAt DESC LIMIT $limit START $start",
            conditions.where_sql()
        );
        let cakes: Vec<Cake> = conditions
            .bind_all(self.base.db().query(sql))
            .bind(("limit", limit))
            .bind(("start", offset))
            .await?
            .take(0)?;
        let total = self.base.count(TABLE, conditions).await?;
        Ok((cakes, total))
    }

    /// 全部蛋糕 (报表)
    pub async fn find_all(&self) -> RepoResult<Vec<Cake>> {
        let cakes: Vec<Cake> = self
            .base
            .db()
            .query("SELECT * FROM cake ORDER BY createdAt DESC")
            .await?
            .take(0)?;
        Ok(cakes)
    }

    /// Find cake by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Cake>> {
        let thing = parse_record_id(TABLE, id)?;
        let cake: Option<Cake> = self.base.db().select(thing).await?;
        Ok(cake)
    }

    pub async fn find_by_ids(&self, ids: &[String]) -> RepoResult<Vec<Cake>> {
        let things = parse_record_ids(TABLE, ids)?;
        let cakes: Vec<Cake> = self
            .base
            .db()
            .query("SELECT * FROM cake WHERE id IN $ids")
            .bind(("ids", things))
            .await?
            .take(0)?;
        Ok(cakes)
    }

    /// 库存不高于预警线的蛋糕, 库存少的在前
    pub async fn find_low_stock(&self) -> RepoResult<Vec<Cake>> {
        let cakes: Vec<Cake> = self
            .base
            .db()
            .query("SELECT * FROM cake WHERE stockQuantity <= lowStockThreshold ORDER BY stockQuantity ASC")
            .await?
            .take(0)?;
        Ok(cakes)
    }

    pub async fn count(&self) -> RepoResult<u64> {
        self.base.count(TABLE, Conditions::new()).await
    }

    /// Create a new cake
    pub async fn create(&self, mut cake: Cake) -> RepoResult<Cake> {
        let now = now_millis();
        cake.id = None;
        cake.created_at = now;
        cake.updated_at = now;
        let created: Option<Cake> = self.base.db().create(TABLE).content(cake).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create cake".to_string()))
    }

    /// Partial update (MERGE)
    pub async fn update(&self, id: &str, mut data: CakeUpdate) -> RepoResult<Cake> {
        let thing = parse_record_id(TABLE, id)?;
        if self.find_by_id(id).await?.is_none() {
            return Err(RepoError::NotFound(format!("Cake {} not found", id)));
        }
        data.updated_at = Some(now_millis());
        let updated: Option<Cake> = self.base.db().update(thing).merge(data).await?;
        updated.ok_or_else(|| RepoError::NotFound(format!("Cake {} not found", id)))
    }

    /// Hard delete; 返回记录是否存在
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let thing = parse_record_id(TABLE, id)?;
        let deleted: Option<Cake> = self.base.db().delete(thing).await?;
        Ok(deleted.is_some())
    }

    /// 设置库存 (及可选的预警线)
    pub async fn set_stock(
        &self,
        id: &str,
        stock_quantity: i64,
        low_stock_threshold: Option<i64>,
    ) -> RepoResult<Cake> {
        self.update(
            id,
            CakeUpdate {
                stock_quantity: Some(stock_quantity),
                low_stock_threshold,
                ..Default::default()
            },
        )
        .await
    }

    /// 按分类 (None = 全部) 和 / 或 ID 列表设置上架状态
    pub async fn set_availability(
        &self,
        category: Option<&str>,
        ids: &[String],
        available: bool,
    ) -> RepoResult<u64> {
        let mut conditions = Conditions::new();
        if let Some(category) = category {
            conditions = conditions.eq("category", "category", category);
        }
        let things = parse_record_ids(TABLE, ids)?;
        if !things.is_empty() {
            conditions = conditions.raw("id IN $ids");
        }
        let sql = format!(
            "UPDATE cake SET available = $available, updatedAt = $now {} RETURN AFTER",
            conditions.where_sql()
        );
        let updated: Vec<Cake> = conditions
            .bind_all(self.base.db().query(sql))
            .bind(("ids", things))
            .bind(("available", available))
            .bind(("now", now_millis()))
            .await?
            .take(0)?;
        Ok(updated.len() as u64)
    }

    pub async fn set_featured(&self, ids: &[String], featured: bool) -> RepoResult<u64> {
        let things = parse_record_ids(TABLE, ids)?;
        if things.is_empty() {
            return Ok(0);
        }
        let updated: Vec<Cake> = self
            .base
            .db()
            .query("UPDATE cake SET featured = $featured, updatedAt = $now WHERE id IN $ids RETURN AFTER")
            .bind(("ids", things))
            .bind(("featured", featured))
            .bind(("now", now_millis()))
            .await?
            .take(0)?;
        Ok(updated.len() as u64)
    }

    /// 写回单个价格 (批量调价逐条调用)
    pub async fn set_price(&self, id: &str, price: f64) -> RepoResult<Cake> {
        self.update(
            id,
            CakeUpdate {
                price: Some(price),
                ..Default::default()
            },
        )
        .await
    }

    pub async fn delete_many(&self, ids: &[String]) -> RepoResult<u64> {
        let things = parse_record_ids(TABLE, ids)?;
        if things.is_empty() {
            return Ok(0);
        }
        let deleted: Vec<Cake> = self
            .base
            .db()
            .query("DELETE cake WHERE id IN $ids RETURN BEFORE")
            .bind(("ids", things))
            .await?
            .take(0)?;
        Ok(deleted.len() as u64)
    }
}
