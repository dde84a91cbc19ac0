//! Response bodies returned by the storefront API
//!
//! Entity-carrying envelopes are generic so the server can return its
//! database records while the client decodes into the shared views.

use serde::{Deserialize, Serialize};

use crate::models::{Cake, Order, UserInfo};

/// `GET /api/cakes`, `GET /api/cakes/featured`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CakesResponse<C = Cake> {
    pub success: bool,
    pub cakes: Vec<C>,
}

impl<C> CakesResponse<C> {
    pub fn new(cakes: Vec<C>) -> Self {
        Self {
            success: true,
            cakes,
        }
    }
}

/// `GET /api/cakes/{id}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CakeResponse<C = Cake> {
    pub success: bool,
    pub cake: C,
}

impl<C> CakeResponse<C> {
    pub fn new(cake: C) -> Self {
        Self {
            success: true,
            cake,
        }
    }
}

/// `POST /api/orders` and single-order admin endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderResponse<O = Order> {
    pub success: bool,
    pub order: O,
}

impl<O> OrderResponse<O> {
    pub fn new(order: O) -> Self {
        Self {
            success: true,
            order,
        }
    }
}

/// `POST /api/custom-cakes`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomRequestCreatedResponse {
    pub success: bool,
    pub request_id: String,
    pub message: String,
}

/// `POST /api/auth/login`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub success: bool,
    pub token: String,
    pub user: UserInfo,
}

/// `GET /api/auth/me`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUserResponse {
    pub success: bool,
    pub user: UserInfo,
}

/// Paginated admin listing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResponse<T> {
    pub success: bool,
    pub items: Vec<T>,
    pub total: u64,
    pub current_page: u32,
    pub total_pages: u32,
}

impl<T> PageResponse<T> {
    pub fn new(items: Vec<T>, total: u64, page: u32, limit: u32) -> Self {
        Self {
            success: true,
            items,
            total,
            current_page: page,
            total_pages: total_pages(total, limit),
        }
    }
}

/// Number of pages needed for `total` rows at `limit` rows per page
pub fn total_pages(total: u64, limit: u32) -> u32 {
    if limit == 0 {
        return 0;
    }
    total.div_ceil(u64::from(limit)) as u32
}

/// Result of a bulk mutation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_count: Option<u64>,
}

impl BulkResponse {
    pub fn modified(count: u64, message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            modified_count: Some(count),
            deleted_count: None,
        }
    }

    pub fn deleted(count: u64, message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            modified_count: None,
            deleted_count: Some(count),
        }
    }
}

/// `GET /health`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub environment: String,
    pub database: String,
    pub version: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(0, 10), 0);
        assert_eq!(total_pages(1, 10), 1);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(11, 10), 2);
        assert_eq!(total_pages(5, 0), 0);
    }

    #[test]
    fn test_page_response_shape() {
        let page = PageResponse::new(vec![1, 2], 12, 2, 5);
        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["currentPage"], 2);
        assert_eq!(json["totalPages"], 3);
        assert_eq!(json["total"], 12);
    }

    #[test]
    fn test_bulk_response_shape() {
        let json = serde_json::to_value(BulkResponse::modified(3, "Updated 3 cakes")).unwrap();
        assert_eq!(json["modifiedCount"], 3);
        assert!(json.get("deletedCount").is_none());
    }
}
