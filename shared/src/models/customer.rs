//! Customer Model

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::payment::PaymentMethod;
use super::sale::CreditStatus;

/// Create customer payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CustomerCreate {
    #[validate(length(min = 1, max = 100, message = "name is required"))]
    pub name: String,
    #[validate(length(min = 3, max = 32))]
    pub phone: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(max = 255))]
    pub address: Option<String>,
    #[validate(length(max = 500))]
    pub notes: Option<String>,
}

/// Update customer payload
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct CustomerUpdate {
    #[validate(length(min = 1, max = 100))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[validate(length(min = 3, max = 32))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[validate(email)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[validate(length(max = 255))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[validate(length(max = 500))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// `GET /api/customers?q=`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CustomerQuery {
    pub q: Option<String>,
}

/// Credit repayment across all outstanding sales of a customer
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreditPaymentRequest {
    #[validate(range(exclusive_min = 0.0, max = 1000000000.0, message = "amount must be positive and at most 1000000000"))]
    pub amount: f64,
    #[serde(default)]
    pub method: PaymentMethod,
    #[validate(length(max = 255))]
    pub note: Option<String>,
}

/// Amount applied to one credit sale
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppliedCredit {
    pub sale_id: String,
    pub applied: f64,
    pub remaining_owed: f64,
    pub status: CreditStatus,
}

/// Outcome of a customer credit payment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconciliationResult {
    pub applied: Vec<AppliedCredit>,
    pub total_applied: f64,
    pub remaining_balance: f64,
    pub payment_id: Option<String>,
}
