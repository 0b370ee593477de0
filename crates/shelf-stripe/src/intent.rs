//! # Stripe Payment Intents
//!
//! Thin call-through to the Stripe PaymentIntents API: one form-encoded POST
//! per checkout, returning the client secret the frontend needs to confirm
//! the charge.

use crate::config::StripeConfig;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use shelf_core::{PaymentIntent, PaymentIntentProvider, ShelfError, ShelfResult};
use tracing::{debug, error, info, instrument};

/// Stripe-backed payment intent provider
pub struct StripeIntentClient {
    config: StripeConfig,
    client: Client,
}

impl StripeIntentClient {
    pub fn new(config: StripeConfig) -> ShelfResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| ShelfError::Configuration(format!("http client: {e}")))?;

        Ok(Self { config, client })
    }

    /// Create from environment variables
    pub fn from_env() -> ShelfResult<Self> {
        Self::new(StripeConfig::from_env()?)
    }
}

#[async_trait]
impl PaymentIntentProvider for StripeIntentClient {
    #[instrument(skip(self))]
    async fn create_intent(
        &self,
        amount_minor: i64,
        currency: &str,
    ) -> ShelfResult<PaymentIntent> {
        if amount_minor <= 0 {
            return Err(ShelfError::Validation(format!(
                "intent amount must be positive, got {amount_minor}"
            )));
        }

        let form_params = [
            ("amount", amount_minor.to_string()),
            ("currency", currency.to_string()),
            ("payment_method_types[]", "card".to_string()),
        ];

        let url = format!("{}/v1/payment_intents", self.config.api_base_url);
        debug!(amount_minor, currency, "creating payment intent");

        let response = self
            .client
            .post(&url)
            .header("Authorization", self.config.auth_header())
            .header("Stripe-Version", &self.config.api_version)
            .form(&form_params)
            .send()
            .await
            .map_err(|e| ShelfError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ShelfError::Network(e.to_string()))?;

        if !status.is_success() {
            error!("Stripe API error: status={}, body={}", status, body);

            if let Ok(error_response) = serde_json::from_str::<StripeErrorResponse>(&body) {
                return Err(ShelfError::Provider {
                    provider: "stripe".to_string(),
                    message: error_response.error.message,
                });
            }

            return Err(ShelfError::Provider {
                provider: "stripe".to_string(),
                message: format!("HTTP {status}: {body}"),
            });
        }

        let intent: StripeIntentResponse = serde_json::from_str(&body).map_err(|e| {
            ShelfError::Serialization(format!("failed to parse Stripe response: {e}"))
        })?;

        let client_secret = intent.client_secret.ok_or_else(|| {
            ShelfError::Provider {
                provider: "stripe".to_string(),
                message: format!("intent {} returned no client secret", intent.id),
            }
        })?;

        info!(intent_id = %intent.id, "created payment intent");

        Ok(PaymentIntent {
            intent_id: intent.id,
            client_secret,
        })
    }

    fn provider_name(&self) -> &'static str {
        "stripe"
    }
}

// =============================================================================
// Stripe API Types
// =============================================================================

#[derive(Debug, Deserialize)]
struct StripeIntentResponse {
    id: String,
    #[serde(default)]
    client_secret: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StripeErrorResponse {
    error: StripeApiError,
}

#[derive(Debug, Deserialize)]
struct StripeApiError {
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(base_url: &str) -> StripeIntentClient {
        StripeIntentClient::new(
            StripeConfig::new("sk_test_abc123").with_api_base_url(base_url),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_create_intent_sends_minor_units() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/payment_intents"))
            .and(header("Authorization", "Bearer sk_test_abc123"))
            .and(body_string_contains("amount=1999"))
            .and(body_string_contains("currency=usd"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "pi_123",
                "client_secret": "pi_123_secret_456"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let intent = client.create_intent(1999, "usd").await.unwrap();

        assert_eq!(intent.intent_id, "pi_123");
        assert_eq!(intent.client_secret, "pi_123_secret_456");
    }

    #[tokio::test]
    async fn test_create_intent_maps_stripe_errors() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/payment_intents"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": { "message": "Amount must be at least 50 cents" }
            })))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let err = client.create_intent(10, "usd").await.unwrap_err();

        match err {
            ShelfError::Provider { provider, message } => {
                assert_eq!(provider, "stripe");
                assert!(message.contains("50 cents"));
            }
            other => panic!("expected provider error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_create_intent_rejects_non_positive_amount() {
        let client = test_client("http://127.0.0.1:1");
        assert!(matches!(
            client.create_intent(0, "usd").await,
            Err(ShelfError::Validation(_))
        ));
        assert!(matches!(
            client.create_intent(-5, "usd").await,
            Err(ShelfError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_missing_client_secret_is_provider_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/payment_intents"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "id": "pi_123" })),
            )
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        assert!(matches!(
            client.create_intent(1999, "usd").await,
            Err(ShelfError::Provider { .. })
        ));
    }
}
