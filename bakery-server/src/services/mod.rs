//! 后台服务
//!
//! - [`notification`] - 邮件通知 (队列 + worker)
//! - [`images`] - 图片处理与存储

pub mod images;
pub mod notification;

pub use images::{CloudinaryImageStore, ImageStore, ImageUpload, LocalImageStore};
pub use notification::{Notification, NotificationService, NotifyError};
