//! 结账流程
//!
//! 店面提交 (订单、定制申请) 的共同形态:
//!
//! 1. 边界校验 - 失败直接 400, 不写库、不上传、不通知
//! 2. 持久化 - 状态固定为 `pending`
//! 3. 提交后副作用 ([`PostCommit`]) - 尽力而为, 每个任务独立记录结果, 失败只写日志

pub mod custom_request;
pub mod effects;
pub mod order;

pub use custom_request::CustomRequestForm;
pub use effects::{PostCommit, SideTask, SideTaskOutcome, UploadOutcome};

use std::sync::Arc;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::core::ServerState;
use crate::services::images::ImageStore;
use crate::services::notification::NotificationService;

/// 结账依赖 (数据库、通知队列、图片存储)
#[derive(Clone)]
pub struct Checkout {
    db: Surreal<Db>,
    notifier: NotificationService,
    images: Arc<dyn ImageStore>,
}

impl Checkout {
    pub fn new(
        db: Surreal<Db>,
        notifier: NotificationService,
        images: Arc<dyn ImageStore>,
    ) -> Self {
        Self {
            db,
            notifier,
            images,
        }
    }

    pub fn from_state(state: &ServerState) -> Self {
        Self::new(
            state.db.clone(),
            state.notifier.clone(),
            state.images.clone(),
        )
    }
}
