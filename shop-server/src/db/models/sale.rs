//! Sale Model

use super::{impl_document, serde_helpers};
use serde::{Deserialize, Serialize};
use shared::models::{CartItem, CreditDetails, PaymentMethod, PaymentType};
use surrealdb::RecordId;

/// Completed sale; a credit sale carries `credit_details`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sale {
    #[serde(default, skip_serializing_if = "Option::is_none", with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    pub owner: String,
    pub customer: Option<String>,
    pub order: Option<String>,
    #[serde(default)]
    pub items: Vec<CartItem>,
    pub total_amount: f64,
    pub amount_paid: f64,
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub payment_type: PaymentType,
    pub credit_details: Option<CreditDetails>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl_document!(Sale, "sale", owned);

impl Sale {
    /// Outstanding amount, 0 for full sales
    pub fn amount_owed(&self) -> f64 {
        self.credit_details
            .as_ref()
            .map(|c| c.amount_owed)
            .unwrap_or(0.0)
    }
}
