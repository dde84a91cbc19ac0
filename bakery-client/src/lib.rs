//! Bakery Client - storefront and dashboard client state
//!
//! - [`HttpClient`]: REST calls to the bakery server
//! - [`Cart`]: cart state container over a [`CartStore`] persistence port
//! - [`Session`]: admin session token over a [`TokenStore`] persistence port

pub mod cart;
pub mod config;
pub mod error;
pub mod http;
pub mod session;

pub use cart::{
    Cart, CartAction, CartItem, CartStore, DeliverySummary, FileCartStore, MemoryCartStore,
    DEFAULT_DELIVERY_FEE,
};
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use http::{CustomCakeForm, HttpClient, ImageUpload};
pub use session::{FileTokenStore, MemoryTokenStore, Session, TokenStore};

// Re-export shared types for convenience
pub use shared::request::{CreateOrderRequest, DeliveryDetails};
pub use shared::response::{CurrentUserResponse, LoginResponse};
