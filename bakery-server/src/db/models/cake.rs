//! Cake Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use shared::models::{CakeCategory, CakeFlavor, CakeSize, StockStatus};
use surrealdb::RecordId;

pub type CakeId = RecordId;

pub const TABLE: &str = "cake";

/// Cake model matching the `cake` table
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cake {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<CakeId>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    pub category: CakeCategory,
    pub flavor: CakeFlavor,
    #[serde(default)]
    pub size: CakeSize,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default, deserialize_with = "serde_helpers::bool_false")]
    pub featured: bool,
    #[serde(default = "default_true", deserialize_with = "serde_helpers::bool_true")]
    pub available: bool,
    #[serde(default)]
    pub stock_quantity: i64,
    #[serde(default = "default_low_stock_threshold")]
    pub low_stock_threshold: i64,
    #[serde(default = "default_preparation_time")]
    pub preparation_time: i64,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub updated_at: i64,
}

fn default_true() -> bool {
    true
}

fn default_low_stock_threshold() -> i64 {
    shared::models::cake::DEFAULT_LOW_STOCK_THRESHOLD
}

fn default_preparation_time() -> i64 {
    shared::models::cake::DEFAULT_PREPARATION_HOURS
}

impl Cake {
    pub fn stock_status(&self) -> StockStatus {
        StockStatus::from_levels(self.stock_quantity, self.low_stock_threshold)
    }

    pub fn id_string(&self) -> String {
        serde_helpers::id_string(&self.id)
    }
}

/// 部分更新 (MERGE); 未设置的字段保持不变
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CakeUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<CakeCategory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flavor: Option<CakeFlavor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<CakeSize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub featured: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock_quantity: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub low_stock_threshold: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preparation_time: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<i64>,
}

impl CakeUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.price.is_none()
            && self.category.is_none()
            && self.flavor.is_none()
            && self.size.is_none()
            && self.images.is_none()
            && self.featured.is_none()
            && self.available.is_none()
            && self.stock_quantity.is_none()
            && self.low_stock_threshold.is_none()
            && self.preparation_time.is_none()
    }
}
