//! Payment Model

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Payment method
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    #[default]
    Cash,
    Card,
    MobileMoney,
    BankTransfer,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::Card => "card",
            PaymentMethod::MobileMoney => "mobile_money",
            PaymentMethod::BankTransfer => "bank_transfer",
        }
    }

    /// Cash is settled at the counter; everything else goes through the gateway
    pub fn needs_gateway(&self) -> bool {
        !matches!(self, PaymentMethod::Cash)
    }
}

/// Payment lifecycle: pending -> succeeded | failed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentState {
    #[default]
    Pending,
    Succeeded,
    Failed,
}

impl PaymentState {
    pub fn is_final(&self) -> bool {
        !matches!(self, PaymentState::Pending)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentState::Pending => "pending",
            PaymentState::Succeeded => "succeeded",
            PaymentState::Failed => "failed",
        }
    }
}

/// What a payment settles
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentPurpose {
    #[default]
    Order,
    CreditRepayment,
}

/// `POST /api/payments`
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PaymentCreate {
    #[validate(length(min = 1, message = "order_id is required"))]
    pub order_id: String,
    /// Defaults to the order's unpaid balance
    #[validate(range(exclusive_min = 0.0, max = 1000000000.0, message = "amount must be positive and at most 1000000000"))]
    pub amount: Option<f64>,
    #[serde(default)]
    pub method: PaymentMethod,
}

/// Gateway callback body (`POST /api/payments/callback`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayCallback {
    pub reference: String,
    pub status: PaymentState,
    pub amount: f64,
    pub signature: String,
    #[serde(default)]
    pub failure_reason: Option<String>,
}

/// `POST /api/payments/{id}/simulate`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulatePaymentRequest {
    pub status: PaymentState,
    pub failure_reason: Option<String>,
}

/// `GET /api/payments?order_id=&status=`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaymentQuery {
    pub order_id: Option<String>,
    pub status: Option<PaymentState>,
}
