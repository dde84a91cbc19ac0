//! 销售分析与订单导出

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Datelike, Months, NaiveDate, Utc};
use serde::Serialize;
use shared::money;
use shared::util::DAY_MILLIS;

use crate::db::models::{Cake, Order};
use crate::utils::{AppError, AppResult};

/// 热销蛋糕条数
pub const TOP_PRODUCTS: usize = 5;

/// 营收趋势保留的月份数
pub const TREND_MONTHS: usize = 12;

/// 统计周期
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Week,
    Month,
    Year,
    All,
}

impl Period {
    /// 默认 month; 无法识别的值不做时间过滤
    pub fn from_query(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            None | Some("") | Some("month") => Period::Month,
            Some("week") => Period::Week,
            Some("year") => Period::Year,
            Some(_) => Period::All,
        }
    }

    /// 周期起点 (Unix 毫秒); All 返回 None
    pub fn start_millis(&self, now: DateTime<Utc>) -> Option<i64> {
        let start = match self {
            Period::Week => now.checked_sub_signed(chrono::Duration::days(7)),
            Period::Month => now.checked_sub_months(Months::new(1)),
            Period::Year => now.checked_sub_months(Months::new(12)),
            Period::All => None,
        };
        start.map(|dt| dt.timestamp_millis())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSales {
    pub cake_id: String,
    pub name: String,
    pub total_quantity: u64,
    pub total_revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesOverview {
    pub period: Period,
    /// 已送达订单营收
    pub total_revenue: f64,
    /// 周期内全部订单
    pub total_orders: u64,
    pub delivered_orders: u64,
    /// 营收 / 已送达订单数
    pub average_order_value: f64,
    pub popular_products: Vec<ProductSales>,
}

/// 按数量统计热销蛋糕; 目录中已不存在的蛋糕不计入
fn popular_products(orders: &[&Order], cakes: &HashMap<String, &Cake>) -> Vec<ProductSales> {
    let mut totals: BTreeMap<&str, (u64, rust_decimal::Decimal)> = BTreeMap::new();
    for item in orders.iter().flat_map(|o| o.items.iter()) {
        let entry = totals.entry(item.cake.as_str()).or_default();
        entry.0 += u64::from(item.quantity);
        entry.1 += money::line_total(item.price, item.quantity);
    }

    let mut products: Vec<ProductSales> = totals
        .into_iter()
        .filter_map(|(cake_id, (qty, revenue))| {
            cakes.get(cake_id).map(|cake| ProductSales {
                cake_id: cake_id.to_string(),
                name: cake.name.clone(),
                total_quantity: qty,
                total_revenue: money::to_f64(revenue),
            })
        })
        .collect();
    products.sort_by(|a, b| b.total_quantity.cmp(&a.total_quantity));
    products.truncate(TOP_PRODUCTS);
    products
}

pub fn sales_overview(
    orders: &[Order],
    cakes: &HashMap<String, &Cake>,
    period: Period,
    now: DateTime<Utc>,
) -> SalesOverview {
    let since = period.start_millis(now);
    let in_period: Vec<&Order> = orders
        .iter()
        .filter(|o| since.is_none_or(|s| o.created_at >= s))
        .collect();

    let delivered: Vec<&Order> = in_period
        .iter()
        .copied()
        .filter(|o| o.status.counts_as_revenue())
        .collect();
    let total_revenue = money::sum(delivered.iter().map(|o| o.total_amount));
    let delivered_orders = delivered.len() as u64;

    SalesOverview {
        period,
        total_revenue,
        total_orders: in_period.len() as u64,
        delivered_orders,
        average_order_value: money::average(total_revenue, delivered_orders),
        popular_products: popular_products(&in_period, cakes),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RevenueBucket {
    pub year: i32,
    pub month: u32,
    pub revenue: f64,
    pub orders: u64,
}

/// 已送达订单按 (年, 月) 分组, 保留最近 12 个月, 时间升序
pub fn revenue_trends(orders: &[Order]) -> Vec<RevenueBucket> {
    let mut buckets: BTreeMap<(i32, u32), (rust_decimal::Decimal, u64)> = BTreeMap::new();
    for order in orders.iter().filter(|o| o.status.counts_as_revenue()) {
        let Some(dt) = DateTime::from_timestamp_millis(order.created_at) else {
            continue;
        };
        let entry = buckets.entry((dt.year(), dt.month())).or_default();
        entry.0 += money::to_decimal(order.total_amount);
        entry.1 += 1;
    }

    let skip = buckets.len().saturating_sub(TREND_MONTHS);
    buckets
        .into_iter()
        .skip(skip)
        .map(|((year, month), (revenue, orders))| RevenueBucket {
            year,
            month,
            revenue: money::to_f64(revenue),
            orders,
        })
        .collect()
}

/// 导出行 (列名即表头)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportRow {
    #[serde(rename = "Order ID")]
    pub order_id: String,
    #[serde(rename = "Customer")]
    pub customer: String,
    #[serde(rename = "Phone")]
    pub phone: String,
    #[serde(rename = "Location")]
    pub location: String,
    #[serde(rename = "Amount")]
    pub amount: f64,
    #[serde(rename = "Status")]
    pub status: String,
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Items")]
    pub items: String,
}

/// 订单 → 导出行; 订单需已按时间倒序
pub fn export_rows(orders: &[Order], cakes: &HashMap<String, &Cake>) -> Vec<ExportRow> {
    orders
        .iter()
        .map(|order| ExportRow {
            order_id: order.short_ref(),
            customer: order.customer_name.clone(),
            phone: order.phone.clone(),
            location: order.delivery_location.clone(),
            amount: order.total_amount,
            status: order.status.to_string(),
            date: DateTime::from_timestamp_millis(order.created_at)
                .map(|dt| dt.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            items: order
                .items
                .iter()
                .map(|item| {
                    let name = cakes
                        .get(&item.cake)
                        .map(|c| c.name.as_str())
                        .unwrap_or("Custom");
                    format!("{}x {}", item.quantity, name)
                })
                .collect::<Vec<_>>()
                .join(", "),
        })
        .collect()
}

fn parse_day(value: &str, field: &str) -> AppResult<i64> {
    let date = NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| AppError::validation(format!("{} must be a YYYY-MM-DD date", field)))?;
    date.and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc().timestamp_millis())
        .ok_or_else(|| AppError::validation(format!("{} is out of range", field)))
}

/// `startDate` / `endDate` (YYYY-MM-DD, UTC) → [起始毫秒, 结束日末毫秒]
pub fn parse_date_range(
    start: Option<&str>,
    end: Option<&str>,
) -> AppResult<(Option<i64>, Option<i64>)> {
    let start = start
        .filter(|s| !s.trim().is_empty())
        .map(|s| parse_day(s, "startDate"))
        .transpose()?;
    let end = end
        .filter(|s| !s.trim().is_empty())
        .map(|s| parse_day(s, "endDate").map(|day| day + DAY_MILLIS - 1))
        .transpose()?;

    if let (Some(s), Some(e)) = (start, end) {
        if s > e {
            return Err(AppError::validation("startDate must not be after endDate"));
        }
    }
    Ok((start, end))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporting::dashboard::fixtures::{cake, order};
    use crate::reporting::index_cakes;
    use chrono::TimeZone;
    use shared::models::{CakeCategory, OrderItem, OrderStatus};

    fn at(y: i32, m: u32, d: u32) -> i64 {
        Utc.with_ymd_and_hms(y, m, d, 12, 0, 0)
            .unwrap()
            .timestamp_millis()
    }

    #[test]
    fn test_period_parsing() {
        assert_eq!(Period::from_query(None), Period::Month);
        assert_eq!(Period::from_query(Some("week")), Period::Week);
        assert_eq!(Period::from_query(Some("year")), Period::Year);
        assert_eq!(Period::from_query(Some("decade")), Period::All);
        assert_eq!(Period::All.start_millis(Utc::now()), None);
    }

    #[test]
    fn test_sales_overview() {
        let now = Utc.with_ymd_and_hms(2026, 3, 31, 0, 0, 0).unwrap();
        let mut big = order("a", "07", 3000.0, OrderStatus::Delivered, at(2026, 3, 20));
        big.items = vec![OrderItem {
            cake: "cake:choco".into(),
            quantity: 3,
            price: 1000.0,
        }];
        let orders = vec![
            big,
            order("b", "07", 1000.0, OrderStatus::Delivered, at(2026, 3, 25)),
            order("c", "07", 500.0, OrderStatus::Pending, at(2026, 3, 28)),
            // 周期外
            order("d", "07", 9999.0, OrderStatus::Delivered, at(2025, 1, 1)),
        ];
        let cakes = vec![cake("choco", CakeCategory::Birthday, 1000.0, 5)];
        let index = index_cakes(&cakes);

        let overview = sales_overview(&orders, &index, Period::Month, now);
        assert_eq!(overview.total_orders, 3);
        assert_eq!(overview.delivered_orders, 2);
        assert_eq!(overview.total_revenue, 4000.0);
        assert_eq!(overview.average_order_value, 2000.0);
        assert_eq!(overview.popular_products.len(), 1);
        assert_eq!(overview.popular_products[0].total_quantity, 5);
        assert_eq!(overview.popular_products[0].name, "Cake choco");

        let week = sales_overview(&orders, &index, Period::Week, now);
        assert_eq!(week.total_orders, 2);
    }

    #[test]
    fn test_revenue_trends_keep_latest_twelve_months() {
        let mut orders: Vec<Order> = (1..=12)
            .map(|m| order(&format!("a{m}"), "07", 100.0, OrderStatus::Delivered, at(2025, m, 1)))
            .collect();
        orders.push(order("b1", "07", 50.0, OrderStatus::Delivered, at(2026, 1, 3)));
        orders.push(order("b2", "07", 50.0, OrderStatus::Delivered, at(2026, 1, 9)));
        orders.push(order("c1", "07", 999.0, OrderStatus::Ready, at(2026, 1, 9)));

        let trends = revenue_trends(&orders);
        assert_eq!(trends.len(), TREND_MONTHS);
        assert_eq!((trends[0].year, trends[0].month), (2025, 2));
        let last = trends.last().unwrap();
        assert_eq!((last.year, last.month), (2026, 1));
        assert_eq!(last.revenue, 100.0);
        assert_eq!(last.orders, 2);
    }

    #[test]
    fn test_export_rows() {
        let mut o = order("abcdef987654", "0711", 2500.0, OrderStatus::Ready, at(2026, 2, 14));
        o.items.push(OrderItem {
            cake: "cake:gone".into(),
            quantity: 2,
            price: 10.0,
        });
        let cakes = vec![cake("choco", CakeCategory::Birthday, 2500.0, 5)];
        let index = index_cakes(&cakes);

        let rows = export_rows(&[o], &index);
        assert_eq!(rows[0].order_id, "987654");
        assert_eq!(rows[0].date, "2026-02-14");
        assert_eq!(rows[0].items, "1x Cake choco, 2x Custom");
        assert_eq!(rows[0].status, "ready");

        let json = serde_json::to_value(&rows[0]).unwrap();
        assert_eq!(json["Order ID"], "987654");
    }

    #[test]
    fn test_parse_date_range() {
        let (start, end) = parse_date_range(Some("2026-02-01"), Some("2026-02-01")).unwrap();
        assert_eq!(end.unwrap() - start.unwrap(), DAY_MILLIS - 1);
        assert_eq!(parse_date_range(None, Some("")).unwrap(), (None, None));
        assert!(parse_date_range(Some("01/02/2026"), None).is_err());
        assert!(parse_date_range(Some("2026-03-01"), Some("2026-02-01")).is_err());
    }
}
