//! Database Models
//!
//! 与存储文档一一对应; 字段名使用 camelCase, 与店面 JSON 一致。
//! `id` 以 "table:id" 字符串对外输出。

pub mod serde_helpers;

pub mod cake;
pub mod custom_request;
pub mod order;
pub mod user;

pub use cake::{Cake, CakeId, CakeUpdate};
pub use custom_request::{CustomCakeRequest, CustomRequestId};
pub use order::{Order, OrderId};
pub use user::{User, UserId};
