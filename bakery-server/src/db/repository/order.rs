//! Order Repository
//!
//! 订单行项目创建后不可变, 这里只提供创建、查询和状态写入。

use super::{BaseRepository, Conditions, RepoError, RepoResult, parse_record_id, parse_record_ids};
use crate::db::models::Order;
use crate::db::models::order::TABLE;
use shared::models::OrderStatus;
use shared::request::ListQuery;
use shared::util::now_millis;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

/// 客户名 / 电话 / 配送地址 模糊搜索
const SEARCH_FIELDS: &[&str] = &["customerName", "phone", "deliveryLocation"];

#[derive(Clone)]
pub struct OrderRepository {
    base: BaseRepository,
}

impl OrderRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Persist a new order (status and timestamps set here)
    pub async fn create(&self, mut order: Order) -> RepoResult<Order> {
        let now = now_millis();
        order.id = None;
        order.status = OrderStatus::Pending;
        order.created_at = now;
        order.updated_at = now;
        let created: Option<Order> = self.base.db().create(TABLE).content(order).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create order".to_string()))
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Order>> {
        let thing = parse_record_id(TABLE, id)?;
        let order: Option<Order> = self.base.db().select(thing).await?;
        Ok(order)
    }

    /// 管理端分页列表, 返回 (当前页, 总数)
    ///
    /// `status` 必须已经过枚举校验
    pub async fn find_page(
        &self,
        status: Option<OrderStatus>,
        query: &ListQuery,
    ) -> RepoResult<(Vec<Order>, u64)> {
        let mut conditions = Conditions::new();
        if let Some(status) = status {
            conditions = conditions.eq("status", "status", status.as_str());
        }
        if let Some(term) = query.search_term() {
            conditions = conditions.search(SEARCH_FIELDS, term);
        }

        let sql = format!(
            "SELECT * FROM order {} ORDER BY createdAt DESC LIMIT $limit START $start",
            conditions.where_sql()
        );
        let orders: Vec<Order> = conditions
            .bind_all(self.base.db().query(sql))
            .bind(("limit", query.limit()))
            .bind(("start", query.offset()))
            .await?
            .take(0)?;
        let total = self.base.count(TABLE, conditions).await?;
        Ok((orders, total))
    }

    /// 全部订单, 最新在前 (报表)
    pub async fn find_all(&self) -> RepoResult<Vec<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query("SELECT * FROM order ORDER BY createdAt DESC")
            .await?
            .take(0)?;
        Ok(orders)
    }

    /// 最近 N 个订单
    pub async fn find_recent(&self, limit: u32) -> RepoResult<Vec<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query("SELECT * FROM order ORDER BY createdAt DESC LIMIT $limit")
            .bind(("limit", limit))
            .await?
            .take(0)?;
        Ok(orders)
    }

    /// 创建时间落在 [from, to] 内的订单 (毫秒; None 表示不限)
    pub async fn find_between(&self, from: Option<i64>, to: Option<i64>) -> RepoResult<Vec<Order>> {
        let mut conditions = Conditions::new();
        if let Some(from) = from {
            conditions = conditions.gte("createdAt", "from", from);
        }
        if let Some(to) = to {
            conditions = conditions.lte("createdAt", "to", to);
        }
        let sql = format!(
            "SELECT * FROM order {} ORDER BY createdAt DESC",
            conditions.where_sql()
        );
        let orders: Vec<Order> = conditions
            .bind_all(self.base.db().query(sql))
            .await?
            .take(0)?;
        Ok(orders)
    }

    /// 某客户 (按电话) 的全部订单, 最新在前
    pub async fn find_by_phone(&self, phone: &str) -> RepoResult<Vec<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query("SELECT * FROM order WHERE phone = $phone ORDER BY createdAt DESC")
            .bind(("phone", phone.to_string()))
            .await?
            .take(0)?;
        Ok(orders)
    }

    pub async fn count(&self) -> RepoResult<u64> {
        self.base.count(TABLE, Conditions::new()).await
    }

    pub async fn count_by_status(&self, status: OrderStatus) -> RepoResult<u64> {
        self.base
            .count(TABLE, Conditions::new().eq("status", "status", status.as_str()))
            .await
    }

    pub async fn count_since(&self, since_millis: i64) -> RepoResult<u64> {
        self.base
            .count(TABLE, Conditions::new().gte("createdAt", "since", since_millis))
            .await
    }

    /// 写入新状态; 记录不存在返回 None
    pub async fn update_status(&self, id: &str, status: OrderStatus) -> RepoResult<Option<Order>> {
        let thing = parse_record_id(TABLE, id)?;
        let updated: Option<Order> = self
            .base
            .db()
            .query("UPDATE $thing SET status = $status, updatedAt = $now RETURN AFTER")
            .bind(("thing", thing))
            .bind(("status", status))
            .bind(("now", now_millis()))
            .await?
            .take(0)?;
        Ok(updated)
    }

    /// 批量写入状态, 返回实际修改条数
    pub async fn update_status_many(&self, ids: &[String], status: OrderStatus) -> RepoResult<u64> {
        let things = parse_record_ids(TABLE, ids)?;
        if things.is_empty() {
            return Ok(0);
        }
        let updated: Vec<Order> = self
            .base
            .db()
            .query("UPDATE order SET status = $status, updatedAt = $now WHERE id IN $ids RETURN AFTER")
            .bind(("ids", things))
            .bind(("status", status))
            .bind(("now", now_millis()))
            .await?
            .take(0)?;
        Ok(updated.len() as u64)
    }
}
