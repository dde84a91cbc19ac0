//! 通知后台 Worker
//!
//! 从 mpsc 通道消费通知, 渲染邮件并发送。
//! 发送失败只记录日志, 通道关闭时自动退出。

use std::sync::Arc;

use tokio::sync::mpsc;

use super::mailer::{EmailMessage, Mailer};
use super::{Notification, templates};

/// 收件人与邮件中的链接
#[derive(Debug, Clone)]
pub struct Recipients {
    /// 员工收件人, 为空时跳过新订单 / 定制申请通知
    pub staff: Option<String>,
    /// 管理后台地址
    pub dashboard_url: String,
    /// 店面地址 (客户邮件中的链接)
    pub shop_url: String,
}

/// 通知后台 Worker
pub struct NotificationWorker {
    mailer: Arc<dyn Mailer>,
    recipients: Recipients,
}

impl NotificationWorker {
    pub fn new(mailer: Arc<dyn Mailer>, recipients: Recipients) -> Self {
        Self { mailer, recipients }
    }

    /// 通知 → 邮件; 没有收件人时返回 None
    pub fn render(&self, notification: &Notification) -> Option<EmailMessage> {
        let dashboard = &self.recipients.dashboard_url;
        match notification {
            Notification::NewOrder(order) => {
                let to = self.recipients.staff.as_deref()?;
                Some(templates::new_order(order, to, dashboard))
            }
            Notification::CustomRequest(request) => {
                let to = self.recipients.staff.as_deref()?;
                Some(templates::custom_request(request, to, dashboard))
            }
            Notification::OrderStatusChanged(order) => {
                templates::order_status_changed(order, &self.recipients.shop_url)
            }
        }
    }

    /// 运行 worker（阻塞直到通道关闭）
    pub async fn run(self, mut rx: mpsc::Receiver<Notification>) {
        tracing::info!("📧 Notification worker started");

        while let Some(notification) = rx.recv().await {
            let kind = notification.kind();
            let Some(message) = self.render(&notification) else {
                tracing::debug!(kind, "No recipient, notification skipped");
                continue;
            };

            match self.mailer.send(&message).await {
                Ok(()) => {
                    tracing::info!(kind, to = %message.to, "Notification email sent");
                }
                Err(e) => {
                    tracing::error!(kind, to = %message.to, "Failed to send notification: {}", e);
                }
            }
        }

        tracing::info!("Notification channel closed, worker stopping");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::Order;
    use crate::services::notification::{MailError, NotificationService};
    use async_trait::async_trait;
    use shared::models::OrderStatus;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingMailer {
        sent: Mutex<Vec<EmailMessage>>,
        fail: bool,
    }

    #[async_trait]
    impl Mailer for RecordingMailer {
        async fn send(&self, message: &EmailMessage) -> Result<(), MailError> {
            if self.fail {
                return Err(MailError::Transport("connection refused".into()));
            }
            self.sent.lock().unwrap().push(message.clone());
            Ok(())
        }
    }

    fn order(email: Option<&str>) -> Order {
        Order {
            id: Some("order:xyz987654".parse().unwrap()),
            customer_name: "Jane".into(),
            phone: "0712".into(),
            email: email.map(String::from),
            delivery_location: "CBD".into(),
            items: vec![],
            total_amount: 3000.0,
            message: None,
            special_instructions: None,
            status: OrderStatus::Confirmed,
            created_at: 0,
            updated_at: 0,
        }
    }

    fn recipients(staff: Option<&str>) -> Recipients {
        Recipients {
            staff: staff.map(String::from),
            dashboard_url: "http://admin".into(),
            shop_url: "http://shop".into(),
        }
    }

    #[tokio::test]
    async fn test_worker_sends_until_channel_closes() {
        let mailer = Arc::new(RecordingMailer::default());
        let worker = NotificationWorker::new(mailer.clone(), recipients(Some("staff@bakery.local")));
        let (service, rx) = NotificationService::new(8);

        service
            .notify(Notification::NewOrder(Box::new(order(None))))
            .unwrap();
        // 没有客户邮箱 → 跳过
        service
            .notify(Notification::OrderStatusChanged(Box::new(order(None))))
            .unwrap();
        service
            .notify(Notification::OrderStatusChanged(Box::new(order(Some(
                "jane@example.com",
            )))))
            .unwrap();
        drop(service);

        worker.run(rx).await;

        let sent = mailer.sent.lock().unwrap();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].to, "staff@bakery.local");
        assert_eq!(sent[1].to, "jane@example.com");
    }

    #[test]
    fn test_no_staff_recipient_skips_staff_mail() {
        let worker = NotificationWorker::new(Arc::new(RecordingMailer::default()), recipients(None));
        assert!(
            worker
                .render(&Notification::NewOrder(Box::new(order(None))))
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_send_failure_does_not_stop_worker() {
        let mailer = Arc::new(RecordingMailer {
            fail: true,
            ..Default::default()
        });
        let worker = NotificationWorker::new(mailer, recipients(Some("staff@bakery.local")));
        let (service, rx) = NotificationService::new(4);
        service
            .notify(Notification::NewOrder(Box::new(order(None))))
            .unwrap();
        service
            .notify(Notification::NewOrder(Box::new(order(None))))
            .unwrap();
        drop(service);

        // 返回即说明两条都被消费
        worker.run(rx).await;
    }
}
