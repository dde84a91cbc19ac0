/// 获取当前 UTC 时间戳（毫秒）
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Milliseconds in one day
pub const DAY_MILLIS: i64 = 24 * 60 * 60 * 1000;

/// Format a Unix millis timestamp as RFC 3339 (UTC)
pub fn millis_to_rfc3339(millis: i64) -> String {
    chrono::DateTime::from_timestamp_millis(millis)
        .map(|dt| dt.to_rfc3339())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_millis_to_rfc3339() {
        assert_eq!(millis_to_rfc3339(0), "1970-01-01T00:00:00+00:00");
    }
}
