//! User account model

use serde::{Deserialize, Serialize};

string_enum! {
    /// Account role
    pub enum UserRole: "role" {
        Admin => "admin",
        Staff => "staff",
        Customer => "customer",
    }
}

impl Default for UserRole {
    fn default() -> Self {
        Self::Customer
    }
}

impl UserRole {
    /// Admin and staff may sign in to the dashboard
    pub const fn can_access_dashboard(&self) -> bool {
        matches!(self, Self::Admin | Self::Staff)
    }
}

/// Public view of a user account (never carries the password hash)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub id: String,
    pub username: String,
    pub email: String,
    pub role: UserRole,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}
