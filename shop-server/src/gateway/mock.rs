//! Mock gateway
//!
//! Signature: `hex(HMAC-SHA256(secret, "{reference}.{status}.{amount_2dp}"))`

use async_trait::async_trait;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use shared::models::{GatewayCallback, PaymentMethod, PaymentState};

use super::{Checkout, GatewayError, PaymentGateway};

#[derive(Debug, Clone)]
pub struct MockGateway {
    secret: String,
    base_url: String,
}

impl MockGateway {
    pub fn new(secret: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn mac(&self, reference: &str, status: PaymentState, amount: f64) -> Option<Hmac<Sha256>> {
        let mut mac = Hmac::<Sha256>::new_from_slice(self.secret.as_bytes()).ok()?;
        mac.update(signed_payload(reference, status, amount).as_bytes());
        Some(mac)
    }

    pub fn sign(&self, reference: &str, status: PaymentState, amount: f64) -> String {
        self.mac(reference, status, amount)
            .map(|mac| hex::encode(mac.finalize().into_bytes()))
            .unwrap_or_default()
    }
}

fn signed_payload(reference: &str, status: PaymentState, amount: f64) -> String {
    format!("{}.{}.{:.2}", reference, status.as_str(), amount)
}

#[async_trait]
impl PaymentGateway for MockGateway {
    async fn create_checkout(
        &self,
        amount: f64,
        reference: &str,
        method: PaymentMethod,
    ) -> Result<Checkout, GatewayError> {
        if !method.needs_gateway() {
            return Err(GatewayError::UnsupportedMethod(method.as_str()));
        }
        if self.base_url.is_empty() {
            return Err(GatewayError::Unavailable("GATEWAY_BASE_URL is not configured".into()));
        }
        tracing::debug!(reference = %reference, amount, method = method.as_str(), "Mock checkout created");
        Ok(Checkout {
            reference: reference.to_string(),
            checkout_url: format!("{}/checkout/{}", self.base_url, reference),
        })
    }

    fn verify(&self, callback: &GatewayCallback) -> bool {
        let Ok(signature) = hex::decode(&callback.signature) else {
            return false;
        };
        self.mac(&callback.reference, callback.status, callback.amount)
            .is_some_and(|mac| mac.verify_slice(&signature).is_ok())
    }

    fn sign_callback(&self, mut callback: GatewayCallback) -> Option<GatewayCallback> {
        callback.signature = self.sign(&callback.reference, callback.status, callback.amount);
        Some(callback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::{AppError, ErrorCode};

    fn gateway() -> MockGateway {
        MockGateway::new("secret", "https://pay.test.local/")
    }

    fn callback(status: PaymentState, amount: f64) -> GatewayCallback {
        GatewayCallback {
            reference: "PAY-1".into(),
            status,
            amount,
            signature: String::new(),
            failure_reason: None,
        }
    }

    #[tokio::test]
    async fn test_checkout_url() {
        let checkout = gateway()
            .create_checkout(10.0, "PAY-1", PaymentMethod::Card)
            .await
            .unwrap();
        assert_eq!(checkout.checkout_url, "https://pay.test.local/checkout/PAY-1");
        assert!(gateway()
            .create_checkout(10.0, "PAY-2", PaymentMethod::Cash)
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_unconfigured_gateway_is_unavailable() {
        let err = MockGateway::new("secret", "")
            .create_checkout(10.0, "PAY-1", PaymentMethod::Card)
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::Unavailable(_)));
        assert_eq!(AppError::from(err).code, ErrorCode::GatewayUnavailable);
    }

    #[test]
    fn test_signature_matches_contract() {
        let mut mac = Hmac::<Sha256>::new_from_slice(b"secret").unwrap();
        mac.update(b"PAY-1.succeeded.12.50");
        let expected = hex::encode(mac.finalize().into_bytes());
        assert_eq!(gateway().sign("PAY-1", PaymentState::Succeeded, 12.5), expected);
    }

    #[test]
    fn test_verify() {
        let gw = gateway();
        let signed = gw.sign_callback(callback(PaymentState::Succeeded, 12.5)).unwrap();
        assert!(gw.verify(&signed));

        // Tampered amount / status / foreign secret
        let mut tampered = signed.clone();
        tampered.amount = 1.0;
        assert!(!gw.verify(&tampered));
        let mut tampered = signed.clone();
        tampered.status = PaymentState::Failed;
        assert!(!gw.verify(&tampered));
        assert!(!MockGateway::new("other", "x").verify(&signed));
        assert!(!gw.verify(&callback(PaymentState::Succeeded, 12.5)));

        // Upper-case hex decodes to the same bytes, garbage does not decode
        let mut upper = signed.clone();
        upper.signature = upper.signature.to_uppercase();
        assert!(gw.verify(&upper));
        let mut garbage = signed.clone();
        garbage.signature = "not-hex".into();
        assert!(!gw.verify(&garbage));
    }
}
