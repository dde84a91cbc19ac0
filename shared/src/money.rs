//! Money calculation utilities using rust_decimal for precision
//!
//! All calculations are done using `Decimal` internally, then converted to `f64`
//! for storage/serialization.

use rust_decimal::prelude::*;

/// Rounding strategy for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// Maximum accepted unit price or order total (KSh)
pub const MAX_AMOUNT: f64 = 10_000_000.0;

/// Convert f64 to Decimal (non-finite values become zero)
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

/// Convert Decimal to f64, rounded to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}

/// unit price × quantity
pub fn line_total(unit_price: f64, quantity: u32) -> Decimal {
    to_decimal(unit_price) * Decimal::from(quantity)
}

/// Sum a sequence of amounts without accumulating f64 error
pub fn sum<I>(amounts: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    to_f64(amounts.into_iter().map(to_decimal).sum())
}

/// Average of `total` over `count`; zero when there is nothing to average
pub fn average(total: f64, count: u64) -> f64 {
    if count == 0 {
        return 0.0;
    }
    to_f64(to_decimal(total) / Decimal::from(count))
}

/// Apply a percentage change (positive increases, negative decreases)
pub fn apply_percentage(amount: f64, percentage: f64) -> f64 {
    let factor = Decimal::ONE + to_decimal(percentage) / Decimal::from(100);
    to_f64(to_decimal(amount) * factor)
}

/// Validate that a monetary amount is finite, non-negative and within bounds
pub fn is_valid_amount(value: f64) -> bool {
    value.is_finite() && (0.0..=MAX_AMOUNT).contains(&value)
}

/// Display form used in notifications and the activity feed:
/// thousands separators, cents only when non-zero (`12,500`, `1,234.50`)
pub fn format_amount(amount: f64) -> String {
    let cents_total = (to_decimal(amount)
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        * Decimal::from(100))
    .to_i64()
    .unwrap_or_default();
    let negative = cents_total < 0;
    let cents_total = cents_total.abs();
    let whole = cents_total / 100;
    let cents = cents_total % 100;

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if negative {
        grouped.push('-');
    }
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if cents > 0 {
        format!("{}.{:02}", grouped, cents)
    } else {
        grouped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sum_avoids_float_drift() {
        assert_eq!(sum([0.1, 0.2]), 0.3);
        assert_eq!(sum(Vec::<f64>::new()), 0.0);
    }

    #[test]
    fn test_line_total() {
        assert_eq!(to_f64(line_total(2500.0, 3)), 7500.0);
        assert_eq!(to_f64(line_total(19.99, 3)), 59.97);
    }

    #[test]
    fn test_average() {
        assert_eq!(average(100.0, 3), 33.33);
        assert_eq!(average(100.0, 0), 0.0);
    }

    #[test]
    fn test_apply_percentage() {
        assert_eq!(apply_percentage(2000.0, 10.0), 2200.0);
        assert_eq!(apply_percentage(2000.0, -25.0), 1500.0);
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(2500.0), "2,500");
        assert_eq!(format_amount(1234567.5), "1,234,567.50");
        assert_eq!(format_amount(0.0), "0");
        assert_eq!(format_amount(999.999), "1,000");
        assert_eq!(format_amount(-1500.0), "-1,500");
    }

    #[test]
    fn test_is_valid_amount() {
        assert!(is_valid_amount(0.0));
        assert!(is_valid_amount(2500.0));
        assert!(!is_valid_amount(-1.0));
        assert!(!is_valid_amount(f64::NAN));
        assert!(!is_valid_amount(f64::INFINITY));
    }
}
