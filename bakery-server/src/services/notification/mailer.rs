//! 邮件发送端口

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use thiserror::Error;

use crate::core::config::SmtpConfig;

/// 渲染好的邮件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub html: String,
}

#[derive(Debug, Error)]
pub enum MailError {
    #[error("invalid address '{0}'")]
    Address(String),

    #[error("failed to build message: {0}")]
    Build(String),

    #[error("smtp transport error: {0}")]
    Transport(String),
}

/// 邮件发送端口
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, message: &EmailMessage) -> Result<(), MailError>;
}

/// SMTP (STARTTLS) 发送
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: String,
}

impl SmtpMailer {
    pub fn new(config: &SmtpConfig) -> Result<Self, MailError> {
        let creds = Credentials::new(config.username.clone(), config.password.clone());
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
            .map_err(|e| MailError::Transport(e.to_string()))?
            .port(config.port)
            .credentials(creds)
            .build();

        Ok(Self {
            transport,
            from: config.from.clone(),
        })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, message: &EmailMessage) -> Result<(), MailError> {
        let email = Message::builder()
            .from(
                self.from
                    .parse()
                    .map_err(|_| MailError::Address(self.from.clone()))?,
            )
            .to(message
                .to
                .parse()
                .map_err(|_| MailError::Address(message.to.clone()))?)
            .subject(message.subject.clone())
            .header(ContentType::TEXT_HTML)
            .body(message.html.clone())
            .map_err(|e| MailError::Build(e.to_string()))?;

        self.transport
            .send(email)
            .await
            .map_err(|e| MailError::Transport(e.to_string()))?;
        Ok(())
    }
}

/// 未配置 SMTP 时使用: 只记录日志
#[derive(Debug, Default, Clone)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, message: &EmailMessage) -> Result<(), MailError> {
        tracing::info!(
            to = %message.to,
            subject = %message.subject,
            "📧 [dev] email not sent (SMTP not configured)"
        );
        Ok(())
    }
}
