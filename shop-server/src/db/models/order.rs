//! Order Model

use super::{Payment, impl_document, serde_helpers};
use serde::{Deserialize, Serialize};
use shared::models::{CartItem, OrderPaymentStatus, OrderStatus};
use surrealdb::RecordId;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    #[serde(default, skip_serializing_if = "Option::is_none", with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    pub owner: String,
    /// ORD-YYYYMMDD-XXXX
    pub order_number: String,
    pub customer: Option<String>,
    /// Source cart, if checked out from one
    pub cart: Option<String>,
    #[serde(default)]
    pub items: Vec<CartItem>,
    pub total_amount: f64,
    #[serde(default, deserialize_with = "serde_helpers::f64_zero")]
    pub amount_paid: f64,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default)]
    pub payment_status: OrderPaymentStatus,
    pub notes: Option<String>,
    /// Sale recorded when the order became fully paid
    pub sale: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl_document!(Order, "order", owned);

/// Order with its payments (detail view)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderDetail {
    #[serde(flatten)]
    pub order: Order,
    pub payments: Vec<Payment>,
}
