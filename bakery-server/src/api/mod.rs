//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`auth`] - 登录 / 当前用户
//! - [`cakes`] - 店面蛋糕目录
//! - [`orders`] - 结账下单
//! - [`custom_cakes`] - 定制蛋糕申请
//! - [`images`] - 本地图片访问
//! - [`admin`] - 管理后台接口

pub mod admin;
pub mod auth;
pub mod cakes;
pub mod custom_cakes;
pub mod health;
pub mod images;
pub mod orders;

// Re-export common types for handlers
pub use crate::utils::{AppError, AppResult};
