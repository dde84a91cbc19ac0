//! Custom Cake Request Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use shared::models::RequestStatus;
use surrealdb::RecordId;

pub type CustomRequestId = RecordId;

pub const TABLE: &str = "custom_request";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomCakeRequest {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<CustomRequestId>,
    pub customer_name: String,
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub occasion: String,
    pub cake_size: String,
    pub flavor: String,
    pub icing: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    pub design_description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget: Option<f64>,
    /// `YYYY-MM-DD`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_instructions: Option<String>,
    #[serde(default)]
    pub reference_images: Vec<String>,
    #[serde(default)]
    pub status: RequestStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quote_amount: Option<f64>,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub updated_at: i64,
}

impl CustomCakeRequest {
    pub fn id_string(&self) -> String {
        serde_helpers::id_string(&self.id)
    }
}
