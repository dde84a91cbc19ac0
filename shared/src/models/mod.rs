//! Domain models shared by server and client
//!
//! Status and catalog attributes are closed enums; the wire format is the
//! lowercase (kebab-case) string the storefront has always used.

use thiserror::Error;

/// A string that names no variant of a closed enum
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {kind} '{value}', expected one of: {expected}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
    pub expected: String,
}

/// Declares a closed string enum with `as_str`, `ALL`, `FromStr` and `Display`.
macro_rules! string_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident : $kind:literal {
            $( $(#[$vmeta:meta])* $variant:ident => $text:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        $vis enum $name {
            $( $(#[$vmeta])* #[serde(rename = $text)] $variant ),+
        }

        impl $name {
            /// Every variant, in declaration order
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Wire representation
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::models::UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim() {
                    $($text => Ok($name::$variant),)+
                    other => Err($crate::models::UnknownVariant {
                        kind: $kind,
                        value: other.to_string(),
                        expected: [$($text),+].join(", "),
                    }),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

pub mod cake;
pub mod custom_request;
pub mod order;
pub mod user;

pub use cake::{Cake, CakeCategory, CakeFlavor, CakeSize, StockStatus};
pub use custom_request::{CustomCakeRequest, RequestStatus};
pub use order::{Order, OrderItem, OrderStatus};
pub use user::{UserInfo, UserRole};
