//! 提交后副作用
//!
//! 主记录写入成功之后执行; 任何任务失败都不会回滚或影响响应。

use crate::services::notification::{Notification, NotificationService};

/// 一个提交后任务
#[derive(Debug, Clone)]
pub enum SideTask {
    /// 通知员工 (新订单 / 新定制申请)
    NotifyStaff(Notification),
    /// 通知客户 (订单状态变更)
    NotifyCustomer(Notification),
}

impl SideTask {
    pub fn name(&self) -> &'static str {
        match self {
            SideTask::NotifyStaff(_) => "notify_staff",
            SideTask::NotifyCustomer(_) => "notify_customer",
        }
    }
}

/// 单个任务的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SideTaskOutcome {
    Dispatched,
    Failed(String),
}

impl SideTaskOutcome {
    pub fn is_dispatched(&self) -> bool {
        matches!(self, SideTaskOutcome::Dispatched)
    }
}

/// 单张图片的上传结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    Stored(String),
    Skipped(String),
}

impl UploadOutcome {
    pub fn url(&self) -> Option<&str> {
        match self {
            UploadOutcome::Stored(url) => Some(url),
            UploadOutcome::Skipped(_) => None,
        }
    }
}

/// 提交后任务列表
#[derive(Debug, Default)]
pub struct PostCommit {
    tasks: Vec<SideTask>,
}

impl PostCommit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn then(mut self, task: SideTask) -> Self {
        self.tasks.push(task);
        self
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// 逐个执行, 返回每个任务的结果 (顺序与添加顺序一致)
    pub fn run(self, notifier: &NotificationService) -> Vec<(&'static str, SideTaskOutcome)> {
        self.tasks
            .into_iter()
            .map(|task| {
                let name = task.name();
                let outcome = match task {
                    SideTask::NotifyStaff(notification) | SideTask::NotifyCustomer(notification) => {
                        match notifier.notify(notification) {
                            Ok(()) => SideTaskOutcome::Dispatched,
                            Err(e) => SideTaskOutcome::Failed(e.to_string()),
                        }
                    }
                };
                if let SideTaskOutcome::Failed(reason) = &outcome {
                    tracing::warn!(task = name, reason = %reason, "Post-commit task failed");
                }
                (name, outcome)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::Order;
    use shared::models::OrderStatus;

    fn notification() -> Notification {
        Notification::NewOrder(Box::new(Order {
            id: None,
            customer_name: "Jane".into(),
            phone: "0712".into(),
            email: None,
            delivery_location: "CBD".into(),
            items: vec![],
            total_amount: 0.0,
            message: None,
            special_instructions: None,
            status: OrderStatus::Pending,
            created_at: 0,
            updated_at: 0,
        }))
    }

    #[test]
    fn test_each_task_gets_an_outcome() {
        let (notifier, _rx) = NotificationService::new(1);
        let outcomes = PostCommit::new()
            .then(SideTask::NotifyStaff(notification()))
            .then(SideTask::NotifyStaff(notification()))
            .run(&notifier);

        assert_eq!(outcomes.len(), 2);
        assert_eq!(outcomes[0], ("notify_staff", SideTaskOutcome::Dispatched));
        // 队列容量 1, 第二个被丢弃
        assert!(matches!(outcomes[1].1, SideTaskOutcome::Failed(_)));
    }

    #[test]
    fn test_closed_queue_fails_without_panicking() {
        let (notifier, rx) = NotificationService::new(4);
        drop(rx);
        let outcomes = PostCommit::new()
            .then(SideTask::NotifyCustomer(notification()))
            .run(&notifier);
        assert!(!outcomes[0].1.is_dispatched());
    }

    #[test]
    fn test_upload_outcome_url() {
        assert_eq!(UploadOutcome::Stored("u".into()).url(), Some("u"));
        assert_eq!(UploadOutcome::Skipped("bad".into()).url(), None);
    }
}
