//! Unified error codes for the bakery storefront
//!
//! This module defines all error codes shared by bakery-server and bakery-client.
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 4xxx: Order errors
//! - 5xxx: Custom cake request errors
//! - 6xxx: Catalog errors (cakes, images)
//! - 8xxx: User account errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility (Rust, TypeScript, etc.)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,
    /// Value out of range
    ValueOutOfRange = 8,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials (email/password)
    InvalidCredentials = 1002,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,
    /// Account is disabled
    AccountDisabled = 1007,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Staff or admin role required
    RoleRequired = 2002,
    /// Admin role required
    AdminRequired = 2003,
    /// Users cannot delete their own account
    CannotDeleteSelf = 2006,

    // ==================== 4xxx: Order ====================
    /// Order not found
    OrderNotFound = 4001,
    /// Order has no line items
    OrderEmpty = 4007,
    /// Status value outside the order status set
    InvalidOrderStatus = 4008,
    /// Line item quantity or price invalid
    InvalidOrderItem = 4009,

    // ==================== 5xxx: Custom Request ====================
    /// Custom cake request not found
    CustomRequestNotFound = 5101,
    /// Status value outside the request status set
    InvalidRequestStatus = 5102,
    /// Too many reference images attached
    TooManyImages = 5103,

    // ==================== 6xxx: Catalog ====================
    /// Cake not found
    CakeNotFound = 6001,
    /// Cake price invalid
    CakeInvalidPrice = 6002,
    /// Cake category invalid
    CakeCategoryInvalid = 6204,

    // ==================== 65xx: File Upload ====================
    /// File too large
    FileTooLarge = 6501,
    /// Unsupported file format
    UnsupportedFileFormat = 6502,
    /// Invalid image file
    InvalidImageFile = 6503,
    /// Empty file
    EmptyFile = 6505,
    /// Image processing failed
    ImageProcessingFailed = 6508,
    /// File storage failed
    FileStorageFailed = 6509,

    // ==================== 8xxx: User ====================
    /// User not found
    UserNotFound = 8001,
    /// Username already exists
    UsernameExists = 8002,
    /// Email already exists
    EmailExists = 8006,
    /// Password too short
    PasswordTooShort = 8007,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Network error
    NetworkError = 9003,
    /// Timeout
    TimeoutError = 9004,
    /// Configuration error
    ConfigError = 9005,
    /// Notification delivery failed
    NotificationFailed = 9501,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this code represents success
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the default message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::ValueOutOfRange => "Value is out of range",

            // Auth
            ErrorCode::NotAuthenticated => "No token, authorization denied",
            ErrorCode::InvalidCredentials => "Invalid credentials",
            ErrorCode::TokenExpired => "Authentication token has expired",
            ErrorCode::TokenInvalid => "Token is not valid",
            ErrorCode::AccountDisabled => "Account is disabled",

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::RoleRequired => "Access denied. Admin privileges required.",
            ErrorCode::AdminRequired => "Administrator role is required",
            ErrorCode::CannotDeleteSelf => "Cannot delete your own account",

            // Order
            ErrorCode::OrderNotFound => "Order not found",
            ErrorCode::OrderEmpty => "Order must contain at least one item",
            ErrorCode::InvalidOrderStatus => "Invalid order status",
            ErrorCode::InvalidOrderItem => "Invalid order item",

            // Custom request
            ErrorCode::CustomRequestNotFound => "Custom request not found",
            ErrorCode::InvalidRequestStatus => "Invalid custom request status",
            ErrorCode::TooManyImages => "Too many images attached",

            // Catalog
            ErrorCode::CakeNotFound => "Cake not found",
            ErrorCode::CakeInvalidPrice => "Cake price is invalid",
            ErrorCode::CakeCategoryInvalid => "Cake category is invalid",

            // File upload
            ErrorCode::FileTooLarge => "File is too large",
            ErrorCode::UnsupportedFileFormat => "Unsupported file format",
            ErrorCode::InvalidImageFile => "Invalid image file",
            ErrorCode::EmptyFile => "Empty file provided",
            ErrorCode::ImageProcessingFailed => "Image processing failed",
            ErrorCode::FileStorageFailed => "Failed to store file",

            // User
            ErrorCode::UserNotFound => "User not found",
            ErrorCode::UsernameExists => "Username already exists",
            ErrorCode::EmailExists => "Email already exists",
            ErrorCode::PasswordTooShort => "Password must be at least 6 characters",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::NetworkError => "Network error",
            ErrorCode::TimeoutError => "Operation timed out",
            ErrorCode::ConfigError => "Configuration error",
            ErrorCode::NotificationFailed => "Notification delivery failed",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            6 => Ok(ErrorCode::InvalidFormat),
            7 => Ok(ErrorCode::RequiredField),
            8 => Ok(ErrorCode::ValueOutOfRange),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1002 => Ok(ErrorCode::InvalidCredentials),
            1003 => Ok(ErrorCode::TokenExpired),
            1004 => Ok(ErrorCode::TokenInvalid),
            1007 => Ok(ErrorCode::AccountDisabled),

            // Permission
            2001 => Ok(ErrorCode::PermissionDenied),
            2002 => Ok(ErrorCode::RoleRequired),
            2003 => Ok(ErrorCode::AdminRequired),
            2006 => Ok(ErrorCode::CannotDeleteSelf),

            // Order
            4001 => Ok(ErrorCode::OrderNotFound),
            4007 => Ok(ErrorCode::OrderEmpty),
            4008 => Ok(ErrorCode::InvalidOrderStatus),
            4009 => Ok(ErrorCode::InvalidOrderItem),

            // Custom request
            5101 => Ok(ErrorCode::CustomRequestNotFound),
            5102 => Ok(ErrorCode::InvalidRequestStatus),
            5103 => Ok(ErrorCode::TooManyImages),

            // Catalog
            6001 => Ok(ErrorCode::CakeNotFound),
            6002 => Ok(ErrorCode::CakeInvalidPrice),
            6204 => Ok(ErrorCode::CakeCategoryInvalid),
            6501 => Ok(ErrorCode::FileTooLarge),
            6502 => Ok(ErrorCode::UnsupportedFileFormat),
            6503 => Ok(ErrorCode::InvalidImageFile),
            6505 => Ok(ErrorCode::EmptyFile),
            6508 => Ok(ErrorCode::ImageProcessingFailed),
            6509 => Ok(ErrorCode::FileStorageFailed),

            // User
            8001 => Ok(ErrorCode::UserNotFound),
            8002 => Ok(ErrorCode::UsernameExists),
            8006 => Ok(ErrorCode::EmailExists),
            8007 => Ok(ErrorCode::PasswordTooShort),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9003 => Ok(ErrorCode::NetworkError),
            9004 => Ok(ErrorCode::TimeoutError),
            9005 => Ok(ErrorCode::ConfigError),
            9501 => Ok(ErrorCode::NotificationFailed),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::Success.code(), 0);
        assert_eq!(ErrorCode::ValidationFailed.code(), 2);
        assert_eq!(ErrorCode::NotAuthenticated.code(), 1001);
        assert_eq!(ErrorCode::RoleRequired.code(), 2002);
        assert_eq!(ErrorCode::OrderNotFound.code(), 4001);
        assert_eq!(ErrorCode::CustomRequestNotFound.code(), 5101);
        assert_eq!(ErrorCode::CakeNotFound.code(), 6001);
        assert_eq!(ErrorCode::UserNotFound.code(), 8001);
        assert_eq!(ErrorCode::InternalError.code(), 9001);
    }

    #[test]
    fn test_is_success() {
        assert!(ErrorCode::Success.is_success());
        assert!(!ErrorCode::Unknown.is_success());
        assert!(!ErrorCode::InvalidOrderStatus.is_success());
    }

    #[test]
    fn test_try_from_roundtrip_all_codes() {
        let codes = [
            ErrorCode::Success,
            ErrorCode::ValidationFailed,
            ErrorCode::InvalidCredentials,
            ErrorCode::CannotDeleteSelf,
            ErrorCode::InvalidOrderStatus,
            ErrorCode::TooManyImages,
            ErrorCode::CakeCategoryInvalid,
            ErrorCode::FileStorageFailed,
            ErrorCode::EmailExists,
            ErrorCode::NotificationFailed,
        ];
        for code in codes {
            assert_eq!(ErrorCode::try_from(code.code()), Ok(code));
        }
    }

    #[test]
    fn test_try_from_invalid() {
        assert_eq!(ErrorCode::try_from(9999), Err(InvalidErrorCode(9999)));
        assert_eq!(ErrorCode::try_from(3001), Err(InvalidErrorCode(3001)));
    }

    #[test]
    fn test_serialize_as_number() {
        let json = serde_json::to_string(&ErrorCode::OrderNotFound).unwrap();
        assert_eq!(json, "4001");

        let code: ErrorCode = serde_json::from_str("5102").unwrap();
        assert_eq!(code, ErrorCode::InvalidRequestStatus);
    }

    #[test]
    fn test_deserialize_invalid() {
        let result: Result<ErrorCode, _> = serde_json::from_str("12345");
        assert!(result.is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", ErrorCode::CakeNotFound), "6001");
    }

    #[test]
    fn test_message() {
        assert_eq!(ErrorCode::InvalidCredentials.message(), "Invalid credentials");
        assert_eq!(
            ErrorCode::PasswordTooShort.message(),
            "Password must be at least 6 characters"
        );
    }
}
