//! Order Model
//!
//! 行项目创建后不可变; 管理端只修改 `status`。

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use shared::models::{OrderItem, OrderStatus};
use surrealdb::RecordId;

pub type OrderId = RecordId;

pub const TABLE: &str = "order";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<OrderId>,
    pub customer_name: String,
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub delivery_location: String,
    pub items: Vec<OrderItem>,
    pub total_amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_instructions: Option<String>,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub updated_at: i64,
}

impl Order {
    pub fn id_string(&self) -> String {
        serde_helpers::id_string(&self.id)
    }

    /// 订单短号: 记录 ID 的最后 6 位
    pub fn short_ref(&self) -> String {
        let key = self
            .id
            .as_ref()
            .map(|id| id.key().to_string())
            .unwrap_or_default();
        let chars: Vec<char> = key.chars().collect();
        chars[chars.len().saturating_sub(6)..].iter().collect()
    }

    /// 商品总件数
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(id: Option<&str>) -> Order {
        Order {
            id: id.map(|s| s.parse().unwrap()),
            customer_name: "Jane".into(),
            phone: "0712345678".into(),
            email: None,
            delivery_location: "Westlands".into(),
            items: vec![
                OrderItem {
                    cake: "cake:a".into(),
                    quantity: 2,
                    price: 2500.0,
                },
                OrderItem {
                    cake: "cake:b".into(),
                    quantity: 1,
                    price: 1000.0,
                },
            ],
            total_amount: 6000.0,
            message: None,
            special_instructions: None,
            status: OrderStatus::Pending,
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn test_short_ref_takes_last_six() {
        assert_eq!(order(Some("order:abcdefghij")).short_ref(), "efghij");
        assert_eq!(order(Some("order:abc")).short_ref(), "abc");
        assert_eq!(order(None).short_ref(), "");
    }

    #[test]
    fn test_item_count() {
        assert_eq!(order(None).item_count(), 3);
    }
}
