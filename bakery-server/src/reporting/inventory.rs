//! 库存统计

use serde::Serialize;
use shared::models::StockStatus;
use shared::money;

use super::dashboard::{CategoryCount, popular_categories};
use crate::db::models::Cake;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryAnalytics {
    pub total_cakes: u64,
    pub out_of_stock: u64,
    pub low_stock: u64,
    pub in_stock: u64,
    /// Σ 单价 × 库存
    pub total_stock_value: f64,
    pub popular_categories: Vec<CategoryCount>,
}

/// 三个库存档位互斥, 合计等于蛋糕总数
pub fn inventory_analytics(cakes: &[Cake]) -> InventoryAnalytics {
    let count = |status: StockStatus| {
        cakes.iter().filter(|c| c.stock_status() == status).count() as u64
    };

    InventoryAnalytics {
        total_cakes: cakes.len() as u64,
        out_of_stock: count(StockStatus::OutOfStock),
        low_stock: count(StockStatus::LowStock),
        in_stock: count(StockStatus::InStock),
        total_stock_value: money::to_f64(
            cakes
                .iter()
                .map(|c| money::line_total(c.price, c.stock_quantity.max(0) as u32))
                .sum(),
        ),
        popular_categories: popular_categories(cakes, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporting::dashboard::fixtures::cake;
    use shared::models::CakeCategory;

    #[test]
    fn test_inventory_analytics() {
        let cakes = vec![
            cake("a", CakeCategory::Birthday, 1000.0, 0),
            cake("b", CakeCategory::Birthday, 1000.0, 5),
            cake("c", CakeCategory::Wedding, 2000.0, 10),
        ];
        let stats = inventory_analytics(&cakes);
        assert_eq!(stats.total_cakes, 3);
        assert_eq!(stats.out_of_stock, 1);
        assert_eq!(stats.low_stock, 1);
        assert_eq!(stats.in_stock, 1);
        assert_eq!(stats.total_stock_value, 25000.0);
        assert_eq!(stats.popular_categories[0].category, CakeCategory::Birthday);
    }
}
