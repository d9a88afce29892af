//! Payment Model

use super::{impl_document, serde_helpers};
use serde::{Deserialize, Serialize};
use shared::models::{PaymentMethod, PaymentPurpose, PaymentState};
use surrealdb::RecordId;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    #[serde(default, skip_serializing_if = "Option::is_none", with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    pub owner: String,
    pub order: Option<String>,
    pub sale: Option<String>,
    pub customer: Option<String>,
    pub amount: f64,
    pub method: PaymentMethod,
    #[serde(default)]
    pub status: PaymentState,
    /// Gateway reference, unique
    pub reference: String,
    pub checkout_url: Option<String>,
    #[serde(default)]
    pub purpose: PaymentPurpose,
    pub failure_reason: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl_document!(Payment, "payment", owned);
