//! Order model and status lifecycle

use serde::{Deserialize, Serialize};

string_enum! {
    /// Order status
    ///
    /// Normal progression is pending → confirmed → preparing → ready → delivered;
    /// `cancelled` is reachable from any non-terminal state.
    pub enum OrderStatus: "order status" {
        Pending => "pending",
        Confirmed => "confirmed",
        Preparing => "preparing",
        Ready => "ready",
        Delivered => "delivered",
        Cancelled => "cancelled",
    }
}

impl Default for OrderStatus {
    fn default() -> Self {
        Self::Pending
    }
}

impl OrderStatus {
    /// Delivered and cancelled orders take no further part in fulfilment
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled)
    }

    /// Next status in the normal progression, if any
    pub const fn next(&self) -> Option<Self> {
        match self {
            Self::Pending => Some(Self::Confirmed),
            Self::Confirmed => Some(Self::Preparing),
            Self::Preparing => Some(Self::Ready),
            Self::Ready => Some(Self::Delivered),
            Self::Delivered | Self::Cancelled => None,
        }
    }

    /// Statuses an admin may move an order to from `self`
    ///
    /// Admins may override the progression, so every enumerated status is
    /// allowed from every other one. Revenue only counts `Delivered`.
    pub fn allowed_transitions(&self) -> &'static [OrderStatus] {
        Self::ALL
    }

    pub fn can_transition_to(&self, target: OrderStatus) -> bool {
        self.allowed_transitions().contains(&target)
    }

    /// Whether orders in this status count towards revenue
    pub const fn counts_as_revenue(&self) -> bool {
        matches!(self, Self::Delivered)
    }
}

/// Order line item as captured by the cart at checkout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    /// Cake record id ("cake:xyz")
    pub cake: String,
    pub quantity: u32,
    /// Unit price captured client-side
    pub price: f64,
}

/// Order as returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    pub customer_name: String,
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub delivery_location: String,
    pub items: Vec<OrderItem>,
    pub total_amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_instructions: Option<String>,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub updated_at: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_status_is_rejected() {
        let err = "archived".parse::<OrderStatus>().unwrap_err();
        assert_eq!(err.kind, "order status");
        assert_eq!(err.value, "archived");
    }

    #[test]
    fn test_progression() {
        let mut status = OrderStatus::Pending;
        let mut seen = vec![status];
        while let Some(next) = status.next() {
            status = next;
            seen.push(status);
        }
        assert_eq!(
            seen,
            vec![
                OrderStatus::Pending,
                OrderStatus::Confirmed,
                OrderStatus::Preparing,
                OrderStatus::Ready,
                OrderStatus::Delivered
            ]
        );
        assert!(OrderStatus::Cancelled.next().is_none());
    }

    #[test]
    fn test_terminal_states() {
        assert!(OrderStatus::Delivered.is_terminal());
        assert!(OrderStatus::Cancelled.is_terminal());
        assert!(!OrderStatus::Ready.is_terminal());
    }

    #[test]
    fn test_cancellation_reachable_from_non_terminal() {
        for status in OrderStatus::ALL.iter().filter(|s| !s.is_terminal()) {
            assert!(status.can_transition_to(OrderStatus::Cancelled));
        }
    }

    #[test]
    fn test_only_delivered_counts_as_revenue() {
        let counted: Vec<_> = OrderStatus::ALL
            .iter()
            .filter(|s| s.counts_as_revenue())
            .collect();
        assert_eq!(counted, vec![&OrderStatus::Delivered]);
    }
}
