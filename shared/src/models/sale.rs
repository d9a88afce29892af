//! Sale Model

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use validator::Validate;

use super::order::LineItemInput;
use super::payment::PaymentMethod;

/// Full payment at the counter or a sale on credit
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentType {
    #[default]
    Full,
    Credit,
}

/// Credit sale state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreditStatus {
    #[default]
    Outstanding,
    Partial,
    Settled,
}

/// One repayment against a credit sale
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Repayment {
    pub amount: f64,
    pub method: PaymentMethod,
    pub paid_at: i64,
    /// Payment reference ("payment:key")
    #[serde(default)]
    pub payment: Option<String>,
}

/// Credit sub-document of a credit sale
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditDetails {
    /// Never negative
    pub amount_owed: f64,
    #[serde(default)]
    pub due_date: Option<i64>,
    pub status: CreditStatus,
    #[serde(default)]
    pub repayments: Vec<Repayment>,
}

/// `POST /api/sales`
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SaleCreate {
    pub customer_id: Option<String>,
    #[validate(length(min = 1, message = "sale needs at least one item"), nested)]
    pub items: Vec<LineItemInput>,
    #[validate(range(min = 0.0, max = 1000000000.0, message = "amount_paid must be between 0 and 1000000000"))]
    pub amount_paid: f64,
    #[serde(default)]
    pub payment_method: PaymentMethod,
    /// Millis timestamp
    pub due_date: Option<i64>,
}

/// `POST /api/sales/{id}/payments`
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SalePaymentRequest {
    #[validate(range(exclusive_min = 0.0, max = 1000000000.0, message = "amount must be positive and at most 1000000000"))]
    pub amount: f64,
    #[serde(default)]
    pub method: PaymentMethod,
}

/// `GET /api/sales?customer_id=&payment_type=&from=&to=`
///
/// `from` / `to` are `YYYY-MM-DD` (inclusive, UTC).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SaleQuery {
    pub customer_id: Option<String>,
    pub payment_type: Option<PaymentType>,
    pub from: Option<String>,
    pub to: Option<String>,
}

/// `GET /api/sales/summary`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SalesSummary {
    pub count: u64,
    pub credit_count: u64,
    pub revenue: f64,
    pub collected: f64,
    pub outstanding_credit: f64,
    pub by_method: BTreeMap<String, f64>,
}
