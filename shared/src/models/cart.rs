//! Cart Model

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Cart lifecycle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CartStatus {
    #[default]
    Active,
    CheckedOut,
}

/// Line item (embedded in carts, orders and sales)
///
/// `name` and `price` are snapshots taken when the line is priced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub item_id: String,
    /// Product reference ("product:key")
    pub product: String,
    #[serde(default)]
    pub variant_id: Option<String>,
    pub name: String,
    pub price: f64,
    pub quantity: i64,
    pub subtotal: f64,
}

/// `POST /api/carts`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CartCreate {
    pub customer_id: Option<String>,
}

/// `POST /api/carts/{id}/items`
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AddCartItemRequest {
    #[validate(length(min = 1, message = "product_id is required"))]
    pub product_id: String,
    pub variant_id: Option<String>,
    #[serde(default = "default_quantity")]
    pub quantity: i64,
}

fn default_quantity() -> i64 {
    1
}

/// `PUT /api/carts/{id}/items/{item_id}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateCartItemRequest {
    pub quantity: i64,
}

/// `POST /api/carts/{id}/checkout`
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct CheckoutRequest {
    #[validate(length(max = 500))]
    pub notes: Option<String>,
}

/// `GET /api/carts?status=`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CartQuery {
    pub status: Option<CartStatus>,
}
