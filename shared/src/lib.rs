//! Shared types for the bakery storefront
//!
//! Common types used by both the server and the client: domain enums,
//! wire schemas, the unified error system and money helpers.

pub mod error;
pub mod models;
pub mod money;
pub mod request;
pub mod response;
pub mod util;

// Re-exports
pub use axum::{Json, body};
pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
pub use http;
pub use serde::{Deserialize, Serialize};
