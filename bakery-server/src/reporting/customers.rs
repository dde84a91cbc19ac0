//! 客户聚合
//!
//! 没有独立的客户表: 客户由订单上的电话号码识别。

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;
use shared::models::CakeCategory;
use shared::money;
use shared::util::DAY_MILLIS;

use crate::db::models::{Cake, Order};

/// 分析接口返回的头部客户数
pub const TOP_CUSTOMERS: usize = 10;

/// 客户分层: ≥3 单 Regular, 1 单 New, 其余 Returning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum CustomerType {
    Regular,
    New,
    Returning,
}

impl CustomerType {
    pub fn from_order_count(count: u64) -> Self {
        match count {
            n if n >= 3 => CustomerType::Regular,
            1 => CustomerType::New,
            _ => CustomerType::Returning,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerSummary {
    pub phone: String,
    /// 最近一单上的姓名
    pub customer_name: String,
    pub email: Option<String>,
    pub total_orders: u64,
    pub total_spent: f64,
    pub first_order: i64,
    pub last_order: i64,
    pub favorite_category: Option<CakeCategory>,
    pub customer_type: CustomerType,
}

impl CustomerSummary {
    /// 搜索: 姓名 / 电话 / 邮箱 (已小写的关键字)
    pub fn matches(&self, term: &str) -> bool {
        self.customer_name.to_lowercase().contains(term)
            || self.phone.to_lowercase().contains(term)
            || self
                .email
                .as_deref()
                .is_some_and(|e| e.to_lowercase().contains(term))
    }
}

/// 购买数量最多的分类; 数量相同时取分类声明顺序靠前者
fn favorite_category(orders: &[&Order], cakes: &HashMap<String, &Cake>) -> Option<CakeCategory> {
    let mut quantities: BTreeMap<usize, (CakeCategory, u64)> = BTreeMap::new();
    for item in orders.iter().flat_map(|o| o.items.iter()) {
        if let Some(cake) = cakes.get(&item.cake) {
            let rank = CakeCategory::ALL
                .iter()
                .position(|c| *c == cake.category)
                .unwrap_or(usize::MAX);
            quantities.entry(rank).or_insert((cake.category, 0)).1 += u64::from(item.quantity);
        }
    }
    quantities
        .into_values()
        .fold(None, |best: Option<(CakeCategory, u64)>, (category, qty)| match best {
            Some((_, best_qty)) if best_qty >= qty => best,
            _ => Some((category, qty)),
        })
        .map(|(category, _)| category)
}

fn summarize(phone: &str, mut orders: Vec<&Order>, cakes: &HashMap<String, &Cake>) -> CustomerSummary {
    orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    let total_orders = orders.len() as u64;
    let newest = orders.first();
    CustomerSummary {
        phone: phone.to_string(),
        customer_name: newest.map(|o| o.customer_name.clone()).unwrap_or_default(),
        email: orders.iter().find_map(|o| o.email.clone()),
        total_orders,
        total_spent: money::sum(orders.iter().map(|o| o.total_amount)),
        first_order: orders.iter().map(|o| o.created_at).min().unwrap_or_default(),
        last_order: orders.iter().map(|o| o.created_at).max().unwrap_or_default(),
        favorite_category: favorite_category(&orders, cakes),
        customer_type: CustomerType::from_order_count(total_orders),
    }
}

/// 按电话聚合全部订单, 按消费总额降序
pub fn summarize_customers(orders: &[Order], cakes: &HashMap<String, &Cake>) -> Vec<CustomerSummary> {
    let mut by_phone: BTreeMap<&str, Vec<&Order>> = BTreeMap::new();
    for order in orders {
        by_phone.entry(order.phone.as_str()).or_default().push(order);
    }

    let mut customers: Vec<CustomerSummary> = by_phone
        .into_iter()
        .map(|(phone, orders)| summarize(phone, orders, cakes))
        .collect();
    customers.sort_by(|a, b| b.total_spent.total_cmp(&a.total_spent));
    customers
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerAnalytics {
    pub total_customers: u64,
    pub customer_types: BTreeMap<CustomerType, u64>,
    pub top_customers: Vec<CustomerSummary>,
}

pub fn customer_analytics(customers: Vec<CustomerSummary>) -> CustomerAnalytics {
    let mut customer_types = BTreeMap::new();
    for c in &customers {
        *customer_types.entry(c.customer_type).or_insert(0) += 1;
    }
    let total_customers = customers.len() as u64;
    let mut top_customers = customers;
    top_customers.truncate(TOP_CUSTOMERS);
    CustomerAnalytics {
        total_customers,
        customer_types,
        top_customers,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LifetimeValue {
    pub total_spent: f64,
    pub order_count: u64,
    pub average_order_value: f64,
    pub lifetime_in_days: i64,
    pub daily_spend: f64,
    pub customer_since: i64,
}

/// 单个客户的生命周期价值; 没有订单时返回 None
pub fn lifetime_value(orders: &[Order]) -> Option<LifetimeValue> {
    let first = orders.iter().map(|o| o.created_at).min()?;
    let last = orders.iter().map(|o| o.created_at).max()?;
    let total_spent = money::sum(orders.iter().map(|o| o.total_amount));
    let order_count = orders.len() as u64;
    let span = last - first;
    let lifetime_in_days = span / DAY_MILLIS + i64::from(span % DAY_MILLIS != 0);

    Some(LifetimeValue {
        total_spent,
        order_count,
        average_order_value: money::average(total_spent, order_count),
        lifetime_in_days,
        daily_spend: money::average(total_spent, lifetime_in_days.max(1) as u64),
        customer_since: first,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporting::dashboard::fixtures::{cake, order};
    use crate::reporting::index_cakes;
    use shared::models::OrderStatus;

    fn orders() -> Vec<Order> {
        vec![
            order("a1", "0711", 1000.0, OrderStatus::Delivered, 10),
            order("a2", "0711", 2000.0, OrderStatus::Pending, 20),
            order("a3", "0711", 500.0, OrderStatus::Cancelled, 30),
            order("b1", "0722", 9000.0, OrderStatus::Delivered, 15),
            order("c1", "0733", 100.0, OrderStatus::Pending, 5),
            order("c2", "0733", 100.0, OrderStatus::Pending, 6),
        ]
    }

    #[test]
    fn test_customer_type_thresholds() {
        assert_eq!(CustomerType::from_order_count(1), CustomerType::New);
        assert_eq!(CustomerType::from_order_count(2), CustomerType::Returning);
        assert_eq!(CustomerType::from_order_count(3), CustomerType::Regular);
        assert_eq!(CustomerType::from_order_count(10), CustomerType::Regular);
    }

    #[test]
    fn test_summaries_sorted_by_spend() {
        let cakes = vec![cake("choco", CakeCategory::Birthday, 1000.0, 3)];
        let index = index_cakes(&cakes);
        let customers = summarize_customers(&orders(), &index);

        let phones: Vec<_> = customers.iter().map(|c| c.phone.as_str()).collect();
        assert_eq!(phones, vec!["0722", "0711", "0733"]);

        let regular = &customers[1];
        assert_eq!(regular.total_orders, 3);
        assert_eq!(regular.total_spent, 3500.0);
        assert_eq!(regular.first_order, 10);
        assert_eq!(regular.last_order, 30);
        assert_eq!(regular.customer_type, CustomerType::Regular);
        assert_eq!(regular.favorite_category, Some(CakeCategory::Birthday));
        assert_eq!(customers[0].customer_type, CustomerType::New);
        assert_eq!(customers[2].customer_type, CustomerType::Returning);
    }

    #[test]
    fn test_customer_analytics_counts_types() {
        let index = HashMap::new();
        let analytics = customer_analytics(summarize_customers(&orders(), &index));
        assert_eq!(analytics.total_customers, 3);
        assert_eq!(analytics.customer_types[&CustomerType::Regular], 1);
        assert_eq!(analytics.customer_types[&CustomerType::New], 1);
        assert_eq!(analytics.customer_types[&CustomerType::Returning], 1);

        let json = serde_json::to_value(&analytics).unwrap();
        assert_eq!(json["customerTypes"]["Regular"], 1);
    }

    #[test]
    fn test_search_matches() {
        let index = HashMap::new();
        let customers = summarize_customers(&orders(), &index);
        assert!(customers[0].matches("0722"));
        assert!(customers[0].matches("customer"));
        assert!(!customers[0].matches("zzz"));
    }

    #[test]
    fn test_lifetime_value() {
        assert!(lifetime_value(&[]).is_none());

        let day = DAY_MILLIS;
        let orders = vec![
            order("a", "07", 1000.0, OrderStatus::Delivered, 0),
            order("b", "07", 3000.0, OrderStatus::Pending, 3 * day + 1),
        ];
        let ltv = lifetime_value(&orders).unwrap();
        assert_eq!(ltv.total_spent, 4000.0);
        assert_eq!(ltv.order_count, 2);
        assert_eq!(ltv.average_order_value, 2000.0);
        assert_eq!(ltv.lifetime_in_days, 4);
        assert_eq!(ltv.daily_spend, 1000.0);

        let single = lifetime_value(&orders[..1]).unwrap();
        assert_eq!(single.lifetime_in_days, 0);
        assert_eq!(single.daily_spend, 1000.0);
    }
}
