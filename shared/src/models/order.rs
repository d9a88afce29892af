//! Order Model

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Order lifecycle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Paid,
    Fulfilled,
    Cancelled,
}

impl OrderStatus {
    /// Transitions a client may request through `PUT /api/orders/{id}/status`.
    /// `pending -> paid` only happens through a succeeded payment.
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        matches!(
            (self, next),
            (OrderStatus::Pending, OrderStatus::Cancelled)
                | (OrderStatus::Paid, OrderStatus::Fulfilled)
        )
    }
}

/// How much of an order has been paid
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderPaymentStatus {
    #[default]
    Unpaid,
    Partial,
    Paid,
}

/// Item reference used to price a direct order or a direct sale
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LineItemInput {
    #[validate(length(min = 1, message = "product_id is required"))]
    pub product_id: String,
    pub variant_id: Option<String>,
    #[validate(range(min = 1, max = 9999, message = "quantity must be between 1 and 9999"))]
    pub quantity: i64,
}

/// `POST /api/orders`
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct OrderCreate {
    pub customer_id: Option<String>,
    #[validate(length(min = 1, message = "order needs at least one item"), nested)]
    pub items: Vec<LineItemInput>,
    #[validate(length(max = 500))]
    pub notes: Option<String>,
}

/// `PUT /api/orders/{id}/status`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderStatusUpdate {
    pub status: OrderStatus,
}

/// `GET /api/orders?status=&customer_id=`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderQuery {
    pub status: Option<OrderStatus>,
    pub customer_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allowed_transitions() {
        assert!(OrderStatus::Pending.can_transition_to(OrderStatus::Cancelled));
        assert!(OrderStatus::Paid.can_transition_to(OrderStatus::Fulfilled));
        assert!(!OrderStatus::Pending.can_transition_to(OrderStatus::Paid));
        assert!(!OrderStatus::Pending.can_transition_to(OrderStatus::Fulfilled));
        assert!(!OrderStatus::Cancelled.can_transition_to(OrderStatus::Pending));
        assert!(!OrderStatus::Fulfilled.can_transition_to(OrderStatus::Cancelled));
    }
}
