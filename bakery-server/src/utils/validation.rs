//! Input validation helpers
//!
//! Centralized text length constants and validation functions.

use chrono::{DateTime, NaiveDate};
use shared::money;
use validator::ValidateEmail;

use crate::utils::{AppError, ErrorCode};

// ── Text length limits ──────────────────────────────────────────────

/// Cake names, customer names, occasions
pub const MAX_NAME_LEN: usize = 200;

/// Notes, descriptions, design descriptions, admin notes
pub const MAX_NOTE_LEN: usize = 2000;

/// Short identifiers: phone, sizes, flavors
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

/// Passwords (before hashing)
pub const MAX_PASSWORD_LEN: usize = 128;

pub const MIN_PASSWORD_LEN: usize = 6;

/// URLs / image paths
pub const MAX_URL_LEN: usize = 2048;

/// Delivery locations
pub const MAX_ADDRESS_LEN: usize = 500;

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::required(field));
    }
    if value.len() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        )));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value
        && v.len() > max_len
    {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.len()
        )));
    }
    Ok(())
}

/// Validate an optional email address (empty counts as absent).
pub fn validate_optional_email(value: &Option<String>, field: &str) -> Result<(), AppError> {
    match value.as_deref().map(str::trim) {
        None | Some("") => Ok(()),
        Some(email) => validate_email(email, field),
    }
}

/// Validate an email address shape.
pub fn validate_email(email: &str, field: &str) -> Result<(), AppError> {
    if email.len() > MAX_EMAIL_LEN || !email.validate_email() {
        return Err(AppError::validation(format!("{field} is not a valid email")));
    }
    Ok(())
}

/// Parse an optional non-negative amount (empty counts as absent).
pub fn parse_optional_amount(value: &Option<String>, field: &str) -> Result<Option<f64>, AppError> {
    let Some(raw) = value.as_deref().map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(None);
    };
    match raw.parse::<f64>() {
        Ok(amount) if money::is_valid_amount(amount) => Ok(Some(amount)),
        Ok(_) => Err(AppError::with_message(
            ErrorCode::ValueOutOfRange,
            format!("{field} must be a non-negative amount"),
        )
        .with_detail("field", field)),
        Err(_) => Err(AppError::validation(format!("{field} must be a number"))
            .with_detail("field", field)),
    }
}

/// Parse an optional calendar date: `YYYY-MM-DD` or an RFC 3339 timestamp.
pub fn parse_optional_date(
    value: &Option<String>,
    field: &str,
) -> Result<Option<NaiveDate>, AppError> {
    let Some(raw) = value.as_deref().map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(None);
    };
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| DateTime::parse_from_rfc3339(raw).map(|dt| dt.date_naive()))
        .map(Some)
        .map_err(|_| {
            AppError::validation(format!("{field} must be a YYYY-MM-DD date"))
                .with_detail("field", field)
        })
}

/// 去除首尾空白, 空字符串视为未填写
pub fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::ErrorCode;

    #[test]
    fn test_required_text() {
        assert!(validate_required_text("Jane", "customerName", MAX_NAME_LEN).is_ok());
        let err = validate_required_text("   ", "customerName", MAX_NAME_LEN).unwrap_err();
        assert_eq!(err.code, ErrorCode::RequiredField);
        assert!(err.message.contains("customerName"));
        assert!(validate_required_text(&"x".repeat(201), "name", MAX_NAME_LEN).is_err());
    }

    #[test]
    fn test_optional_email() {
        assert!(validate_optional_email(&None, "email").is_ok());
        assert!(validate_optional_email(&Some("".into()), "email").is_ok());
        assert!(validate_optional_email(&Some("jane@example.com".into()), "email").is_ok());
        assert!(validate_optional_email(&Some("not-an-email".into()), "email").is_err());
    }

    #[test]
    fn test_optional_amount() {
        assert_eq!(parse_optional_amount(&None, "budget").unwrap(), None);
        assert_eq!(parse_optional_amount(&Some(" ".into()), "budget").unwrap(), None);
        assert_eq!(
            parse_optional_amount(&Some("15000".into()), "budget").unwrap(),
            Some(15000.0)
        );
        let err = parse_optional_amount(&Some("-500".into()), "budget").unwrap_err();
        assert_eq!(err.code, ErrorCode::ValueOutOfRange);
        let err = parse_optional_amount(&Some("lots".into()), "budget").unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        assert!(parse_optional_amount(&Some("NaN".into()), "budget").is_err());
    }

    #[test]
    fn test_optional_date() {
        let day = NaiveDate::from_ymd_opt(2026, 2, 14);
        assert_eq!(
            parse_optional_date(&Some("2026-02-14".into()), "deliveryDate").unwrap(),
            day
        );
        assert_eq!(
            parse_optional_date(&Some("2026-02-14T09:30:00.000Z".into()), "deliveryDate")
                .unwrap(),
            day
        );
        assert_eq!(parse_optional_date(&None, "deliveryDate").unwrap(), None);
        let err = parse_optional_date(&Some("next week".into()), "deliveryDate").unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        assert!(parse_optional_date(&Some("2026-02-30".into()), "deliveryDate").is_err());
    }

    #[test]
    fn test_normalize_optional() {
        assert_eq!(normalize_optional(Some("  ".into())), None);
        assert_eq!(normalize_optional(Some(" a ".into())), Some("a".into()));
    }
}
