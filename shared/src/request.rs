//! Request bodies accepted by the storefront API
//!
//! Text fields default to empty so that a missing field reaches the
//! validation layer and produces a descriptive 400 instead of a decode error.

use serde::{Deserialize, Serialize};

/// Line item as posted by the cart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItemInput {
    /// Cake record id ("cake:xyz")
    #[serde(default)]
    pub cake: String,
    #[serde(default)]
    pub quantity: i64,
    #[serde(default)]
    pub price: f64,
}

/// `POST /api/orders`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    #[serde(default)]
    pub customer_name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default)]
    pub delivery_location: String,
    #[serde(default)]
    pub items: Vec<OrderItemInput>,
    #[serde(default)]
    pub total_amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_instructions: Option<String>,
}

/// Customer-supplied delivery details entered at checkout
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryDetails {
    pub customer_name: String,
    pub phone: String,
    #[serde(default)]
    pub email: Option<String>,
    pub delivery_location: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub special_instructions: Option<String>,
}

/// `PATCH /api/admin/orders/{id}/status`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateOrderStatusRequest {
    #[serde(default)]
    pub status: String,
}

/// `PATCH /api/admin/custom-requests/{id}/status`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRequestStatusRequest {
    #[serde(default)]
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quote_amount: Option<f64>,
}

/// Admin listing query: `?page=&limit=&status=&search=`
///
/// `status=all` (or absent) applies no status filter.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub search: Option<String>,
}

pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const MAX_PAGE_SIZE: u32 = 100;

impl ListQuery {
    /// 1-based page number
    pub fn page(&self) -> u32 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn limit(&self) -> u32 {
        self.limit
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE)
    }

    pub fn offset(&self) -> u32 {
        (self.page() - 1).saturating_mul(self.limit())
    }

    /// Status filter, `None` for "all"
    pub fn status_filter(&self) -> Option<&str> {
        self.status
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty() && *s != "all")
    }

    /// Lowercased search term, `None` when blank
    pub fn search_term(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase)
    }
}

/// Catalog query: `GET /api/cakes` and `GET /api/admin/cakes`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CakeQuery {
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub flavor: Option<String>,
    #[serde(default)]
    pub featured: Option<bool>,
    #[serde(default)]
    pub available: Option<bool>,
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub limit: Option<u32>,
}

impl CakeQuery {
    /// Category filter, `None` for "all"
    pub fn category_filter(&self) -> Option<&str> {
        self.category
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty() && *s != "all")
    }

    pub fn flavor_filter(&self) -> Option<&str> {
        self.flavor
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty() && *s != "all")
    }

    pub fn search_term(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase)
    }
}

/// Admin cake create / update body
///
/// Every field is optional on the wire; create enforces the required set,
/// update applies only what is present.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CakePayload {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub flavor: Option<String>,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub images: Option<Vec<String>>,
    #[serde(default)]
    pub featured: Option<bool>,
    #[serde(default)]
    pub available: Option<bool>,
    #[serde(default)]
    pub stock_quantity: Option<i64>,
    #[serde(default)]
    pub low_stock_threshold: Option<i64>,
    #[serde(default)]
    pub preparation_time: Option<i64>,
}

/// `PATCH /api/admin/inventory/{id}/stock`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStockRequest {
    #[serde(default)]
    pub stock_quantity: Option<i64>,
    #[serde(default)]
    pub low_stock_threshold: Option<i64>,
}

/// One entry of `POST /api/admin/inventory/bulk-stock`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockUpdate {
    pub id: String,
    pub stock_quantity: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BulkStockRequest {
    #[serde(default)]
    pub updates: Vec<StockUpdate>,
}

/// Direction of a bulk price adjustment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceOperation {
    Increase,
    Decrease,
}

/// `POST /api/admin/bulk/price-update`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkPriceRequest {
    pub percentage: f64,
    pub operation: PriceOperation,
    /// Category name or "all"
    #[serde(default)]
    pub category: Option<String>,
}

/// `POST /api/admin/bulk/availability`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkAvailabilityRequest {
    pub available: bool,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub ids: Vec<String>,
}

/// `POST /api/admin/bulk/order-status`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkOrderStatusRequest {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub order_ids: Vec<String>,
}

/// `POST /api/admin/bulk/delete-cakes`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BulkIdsRequest {
    #[serde(default)]
    pub ids: Vec<String>,
}

/// `POST /api/admin/bulk/featured`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkFeaturedRequest {
    pub featured: bool,
    #[serde(default)]
    pub ids: Vec<String>,
}

/// `GET /api/admin/analytics/sales-overview?period=week|month|year`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PeriodQuery {
    #[serde(default)]
    pub period: Option<String>,
}

/// `GET /api/admin/analytics/export-orders?startDate=&endDate=` (YYYY-MM-DD)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRangeQuery {
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
}

/// `POST /api/admin/users`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateUserRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub role: Option<String>,
}

/// `PUT /api/admin/users/{id}`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

/// `POST /api/auth/login`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}
