//! Payment gateway
//!
//! Card / mobile-money / bank-transfer payments go through a gateway: the
//! server asks it for a checkout URL, the gateway later calls
//! `POST /api/payments/callback` with the final status.

mod mock;

pub use mock::MockGateway;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use shared::models::{GatewayCallback, PaymentMethod};

/// Checkout session handed to the client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Checkout {
    pub reference: String,
    pub checkout_url: String,
}

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("Gateway unavailable: {0}")]
    Unavailable(String),
    #[error("Method {0} is not handled by the gateway")]
    UnsupportedMethod(&'static str),
}

impl From<GatewayError> for crate::utils::AppError {
    fn from(err: GatewayError) -> Self {
        use crate::utils::{AppError, ErrorCode};
        match err {
            GatewayError::Unavailable(msg) => AppError::with_message(ErrorCode::GatewayUnavailable, msg),
            GatewayError::UnsupportedMethod(_) => {
                AppError::with_message(ErrorCode::PaymentInvalidMethod, err.to_string())
            }
        }
    }
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Open a checkout session for `amount` under `reference`
    async fn create_checkout(
        &self,
        amount: f64,
        reference: &str,
        method: PaymentMethod,
    ) -> Result<Checkout, GatewayError>;

    /// Check the callback signature
    fn verify(&self, callback: &GatewayCallback) -> bool;

    /// Build a signed callback (development simulation)
    fn sign_callback(&self, callback: GatewayCallback) -> Option<GatewayCallback> {
        let _ = callback;
        None
    }
}

/// New unique gateway reference
pub fn new_reference() -> String {
    format!("PAY-{}", uuid::Uuid::new_v4().simple().to_string().to_uppercase())
}
