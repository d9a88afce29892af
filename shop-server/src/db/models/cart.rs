//! Cart Model

use super::{impl_document, serde_helpers};
use serde::{Deserialize, Serialize};
use shared::models::{CartItem, CartStatus};
use surrealdb::RecordId;

/// Per-customer pending basket
///
/// `total_amount` is always the sum of item subtotals; it is recomputed by
/// `checkout::totals` on every mutation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cart {
    #[serde(default, skip_serializing_if = "Option::is_none", with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    pub owner: String,
    /// `None` = walk-in customer
    pub customer: Option<String>,
    #[serde(default)]
    pub items: Vec<CartItem>,
    #[serde(default, deserialize_with = "serde_helpers::f64_zero")]
    pub total_amount: f64,
    #[serde(default)]
    pub status: CartStatus,
    pub created_at: i64,
    pub updated_at: i64,
}

impl_document!(Cart, "cart", owned);

impl Cart {
    pub fn is_active(&self) -> bool {
        self.status == CartStatus::Active
    }
}
