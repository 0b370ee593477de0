//! # Payment Types
//!
//! The `Payment` document records a settled (or still-pending) checkout.
//! `PaymentIntentProvider` is the seam to the external payment API: the HTTP
//! layer only ever sees the trait, so tests can substitute a stub.

use crate::error::{ShelfError, ShelfResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;

/// Settlement state of a recorded payment.
///
/// A payment is inserted as `Pending`, and flipped to `Settled` only after
/// the referenced cart items have been deleted. A document stuck in
/// `Pending` therefore marks an incomplete checkout, never a silent success.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Settled,
}

/// A recorded checkout
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Owner email
    pub email: String,

    /// Decimal amount as charged
    pub price: f64,

    /// Provider-side transaction reference
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,

    /// Cart items covered by this payment, cleared on settlement
    #[serde(default)]
    pub cart_ids: Vec<String>,

    /// Server-managed; client-supplied values are overwritten
    #[serde(default)]
    pub status: PaymentStatus,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Payment {
    pub fn validate(&self) -> ShelfResult<()> {
        if self.email.trim().is_empty() {
            return Err(ShelfError::Validation("payment email is required".into()));
        }
        if !self.price.is_finite() || self.price <= 0.0 {
            return Err(ShelfError::Validation(format!(
                "payment price must be a positive number, got {}",
                self.price
            )));
        }
        Ok(())
    }
}

/// A provider-side payment intent, returned to the client for completion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentIntent {
    /// Provider's intent identifier
    pub intent_id: String,
    /// Secret the client uses to confirm the charge
    pub client_secret: String,
}

/// Seam to the external payment provider
#[async_trait]
pub trait PaymentIntentProvider: Send + Sync {
    /// Create a payment intent for `amount_minor` units of `currency`.
    ///
    /// Callers are expected to have validated the amount already; providers
    /// still refuse non-positive amounts.
    async fn create_intent(&self, amount_minor: i64, currency: &str)
        -> ShelfResult<PaymentIntent>;

    fn provider_name(&self) -> &'static str;
}

/// Type alias for shared provider handles
pub type BoxedPaymentIntentProvider = Arc<dyn PaymentIntentProvider>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_payment_defaults_to_pending() {
        let payment: Payment = serde_json::from_value(json!({
            "email": "reader@example.com",
            "price": 42.0,
            "cartIds": ["c1", "c2"],
            "transactionId": "pi_123"
        }))
        .unwrap();

        assert_eq!(payment.status, PaymentStatus::Pending);
        assert_eq!(payment.cart_ids, vec!["c1", "c2"]);
        assert!(payment.validate().is_ok());
    }

    #[test]
    fn test_status_wire_format() {
        assert_eq!(
            serde_json::to_value(PaymentStatus::Settled).unwrap(),
            json!("settled")
        );
    }

    #[test]
    fn test_payment_validation() {
        let mut payment: Payment = serde_json::from_value(json!({
            "email": "reader@example.com",
            "price": 10.0
        }))
        .unwrap();
        assert!(payment.validate().is_ok());

        payment.price = -1.0;
        assert!(payment.validate().is_err());

        payment.price = 10.0;
        payment.email = String::new();
        assert!(payment.validate().is_err());
    }
}
