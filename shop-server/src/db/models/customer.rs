//! Customer Model

use super::{Sale, impl_document, serde_helpers};
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    #[serde(default, skip_serializing_if = "Option::is_none", with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    pub owner: String,
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
    #[serde(default, deserialize_with = "serde_helpers::f64_zero")]
    pub total_spent: f64,
    /// Sum of `amount_owed` over the customer's credit sales
    #[serde(default, deserialize_with = "serde_helpers::f64_zero")]
    pub outstanding_balance: f64,
    #[serde(default = "default_true", deserialize_with = "serde_helpers::bool_true")]
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

impl_document!(Customer, "customer", owned);

fn default_true() -> bool {
    true
}

/// Customer with outstanding credit sales (detail view)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerDetail {
    #[serde(flatten)]
    pub customer: Customer,
    pub credits: Vec<Sale>,
}
