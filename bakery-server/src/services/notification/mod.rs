//! 通知服务
//!
//! 订单 / 定制申请提交后的邮件通知。
//!
//! - [`NotificationService`] - 非阻塞入队 (`try_send`), 队列满或关闭时丢弃并返回错误
//! - [`NotificationWorker`] - 后台消费队列, 渲染邮件并通过 [`Mailer`] 发送
//! - [`SmtpMailer`] / [`LogMailer`] - SMTP 发送 / 仅写日志

pub mod mailer;
pub mod templates;
pub mod worker;

pub use mailer::{EmailMessage, LogMailer, MailError, Mailer, SmtpMailer};
pub use worker::{NotificationWorker, Recipients};

use thiserror::Error;
use tokio::sync::mpsc;

use crate::db::models::{CustomCakeRequest, Order};

/// 待发送的通知
#[derive(Debug, Clone)]
pub enum Notification {
    /// 新订单 → 员工
    NewOrder(Box<Order>),
    /// 新定制申请 → 员工
    CustomRequest(Box<CustomCakeRequest>),
    /// 订单状态变更 → 客户 (留有邮箱时)
    OrderStatusChanged(Box<Order>),
}

impl Notification {
    pub fn kind(&self) -> &'static str {
        match self {
            Notification::NewOrder(_) => "new_order",
            Notification::CustomRequest(_) => "custom_request",
            Notification::OrderStatusChanged(_) => "order_status_changed",
        }
    }
}

/// 入队失败
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NotifyError {
    #[error("notification queue is full")]
    QueueFull,

    #[error("notification worker is not running")]
    Closed,
}

/// 通知入队句柄 (可克隆, 放在 ServerState 中)
#[derive(Debug, Clone)]
pub struct NotificationService {
    tx: mpsc::Sender<Notification>,
}

impl NotificationService {
    /// 创建服务和对应的接收端 (交给 [`NotificationWorker::run`])
    pub fn new(buffer_size: usize) -> (Self, mpsc::Receiver<Notification>) {
        let (tx, rx) = mpsc::channel(buffer_size.max(1));
        (Self { tx }, rx)
    }

    /// 非阻塞入队
    pub fn notify(&self, notification: Notification) -> Result<(), NotifyError> {
        let kind = notification.kind();
        self.tx.try_send(notification).map_err(|e| {
            let err = match e {
                mpsc::error::TrySendError::Full(_) => NotifyError::QueueFull,
                mpsc::error::TrySendError::Closed(_) => NotifyError::Closed,
            };
            tracing::warn!(kind, error = %err, "Notification dropped");
            err
        })
    }
}
