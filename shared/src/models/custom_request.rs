//! Custom cake request model

use serde::{Deserialize, Serialize};

string_enum! {
    /// Custom request status (admin driven, no ordering between values)
    pub enum RequestStatus: "request status" {
        Pending => "pending",
        Quoted => "quoted",
        Approved => "approved",
        Rejected => "rejected",
    }
}

impl Default for RequestStatus {
    fn default() -> Self {
        Self::Pending
    }
}

impl RequestStatus {
    /// Any enumerated status may follow any other
    pub fn allowed_transitions(&self) -> &'static [RequestStatus] {
        Self::ALL
    }

    pub fn can_transition_to(&self, target: RequestStatus) -> bool {
        self.allowed_transitions().contains(&target)
    }
}

/// Custom cake request as returned by the admin API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomCakeRequest {
    pub id: String,
    pub customer_name: String,
    pub phone: String,
    #[serde(default)]
    pub email: Option<String>,
    pub occasion: String,
    /// Free text as offered by the storefront (small, x-large, ...)
    pub cake_size: String,
    pub flavor: String,
    pub icing: String,
    #[serde(default)]
    pub color: Option<String>,
    pub design_description: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub budget: Option<f64>,
    /// `YYYY-MM-DD`
    #[serde(default)]
    pub delivery_date: Option<String>,
    #[serde(default)]
    pub delivery_location: Option<String>,
    #[serde(default)]
    pub special_instructions: Option<String>,
    #[serde(default)]
    pub reference_images: Vec<String>,
    #[serde(default)]
    pub status: RequestStatus,
    #[serde(default)]
    pub admin_notes: Option<String>,
    #[serde(default)]
    pub quote_amount: Option<f64>,
    #[serde(default)]
    pub created_at: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_status_set() {
        assert_eq!(RequestStatus::ALL.len(), 4);
        assert_eq!("quoted".parse::<RequestStatus>(), Ok(RequestStatus::Quoted));
        assert!("completed".parse::<RequestStatus>().is_err());
        assert!(RequestStatus::Rejected.can_transition_to(RequestStatus::Pending));
    }

    #[test]
    fn test_request_decodes_storefront_size_and_budget() {
        let json = r#"{
            "id": "custom_request:1",
            "customerName": "Amy",
            "phone": "0700111222",
            "occasion": "Wedding",
            "cakeSize": "x-large",
            "flavor": "Vanilla",
            "icing": "Fondant",
            "designDescription": "Five tiers",
            "budget": 15000,
            "deliveryDate": "2026-02-14"
        }"#;
        let request: CustomCakeRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.cake_size, "x-large");
        assert_eq!(request.budget, Some(15000.0));
        assert_eq!(request.status, RequestStatus::Pending);
    }
}
