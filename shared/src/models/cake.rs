//! Cake catalog model

use serde::{Deserialize, Serialize};

string_enum! {
    /// Catalog category
    pub enum CakeCategory: "category" {
        Birthday => "birthday",
        Wedding => "wedding",
        Kids => "kids",
        Custom => "custom",
        Anniversary => "anniversary",
        Graduation => "graduation",
    }
}

string_enum! {
    /// Base flavor
    pub enum CakeFlavor: "flavor" {
        Vanilla => "vanilla",
        Chocolate => "chocolate",
        RedVelvet => "red-velvet",
        Strawberry => "strawberry",
        Lemon => "lemon",
        Carrot => "carrot",
    }
}

string_enum! {
    /// Size of a catalog cake or of a custom request
    pub enum CakeSize: "size" {
        Small => "small",
        Medium => "medium",
        Large => "large",
        Custom => "custom",
    }
}

impl Default for CakeSize {
    fn default() -> Self {
        Self::Medium
    }
}

string_enum! {
    /// Stock level derived from quantity and the cake's low-stock threshold
    pub enum StockStatus: "stock status" {
        OutOfStock => "out-of-stock",
        LowStock => "low-stock",
        InStock => "in-stock",
    }
}

impl StockStatus {
    pub fn from_levels(quantity: i64, low_stock_threshold: i64) -> Self {
        if quantity <= 0 {
            Self::OutOfStock
        } else if quantity <= low_stock_threshold {
            Self::LowStock
        } else {
            Self::InStock
        }
    }
}

/// Default low-stock threshold for new cakes
pub const DEFAULT_LOW_STOCK_THRESHOLD: i64 = 5;

/// Default preparation time for new cakes (hours)
pub const DEFAULT_PREPARATION_HOURS: i64 = 24;

/// Cake as returned by the storefront API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cake {
    pub id: String,
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
    #[serde(default)]
    pub featured: bool,
    #[serde(default = "default_true")]
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

impl Cake {
    pub fn stock_status(&self) -> StockStatus {
        StockStatus::from_levels(self.stock_quantity, self.low_stock_threshold)
    }

    /// First catalog image, used as the cart thumbnail
    pub fn primary_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }
}

fn default_true() -> bool {
    true
}

fn default_low_stock_threshold() -> i64 {
    DEFAULT_LOW_STOCK_THRESHOLD
}

fn default_preparation_time() -> i64 {
    DEFAULT_PREPARATION_HOURS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_parse_and_display() {
        assert_eq!("wedding".parse::<CakeCategory>(), Ok(CakeCategory::Wedding));
        assert_eq!(CakeCategory::Graduation.to_string(), "graduation");
        let err = "bread".parse::<CakeCategory>().unwrap_err();
        assert_eq!(err.kind, "category");
        assert!(err.to_string().contains("birthday"));
    }

    #[test]
    fn test_flavor_uses_kebab_case() {
        assert_eq!(
            serde_json::to_string(&CakeFlavor::RedVelvet).unwrap(),
            "\"red-velvet\""
        );
        assert_eq!("red-velvet".parse::<CakeFlavor>(), Ok(CakeFlavor::RedVelvet));
    }

    #[test]
    fn test_stock_status_thresholds() {
        assert_eq!(StockStatus::from_levels(0, 5), StockStatus::OutOfStock);
        assert_eq!(StockStatus::from_levels(5, 5), StockStatus::LowStock);
        assert_eq!(StockStatus::from_levels(1, 5), StockStatus::LowStock);
        assert_eq!(StockStatus::from_levels(6, 5), StockStatus::InStock);
    }

    #[test]
    fn test_cake_defaults_on_deserialize() {
        let json = r#"{
            "id": "cake:abc",
            "name": "Chocolate Dream",
            "price": 2500,
            "category": "birthday",
            "flavor": "chocolate"
        }"#;
        let cake: Cake = serde_json::from_str(json).unwrap();
        assert_eq!(cake.size, CakeSize::Medium);
        assert!(cake.available);
        assert!(!cake.featured);
        assert_eq!(cake.low_stock_threshold, 5);
        assert_eq!(cake.preparation_time, 24);
        assert_eq!(cake.stock_status(), StockStatus::OutOfStock);
        assert_eq!(cake.primary_image(), None);
    }
}
