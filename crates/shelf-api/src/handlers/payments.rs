//! Checkout: intent creation against the external provider, self-only
//! payment history, and the two-phase record-and-clear settlement.

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;
use shelf_core::{minor_units, Filter, Payment, PaymentStatus, ShelfError};
use tracing::{error, info, instrument};

/// All charges are in US dollars
const INTENT_CURRENCY: &str = "usd";

/// `POST /create-payment-intent` request body
#[derive(Debug, Deserialize)]
pub struct CreateIntentRequest {
    pub price: f64,
}

/// `POST /create-payment-intent` response body
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateIntentResponse {
    pub client_secret: String,
}

/// Convert the decimal price to minor units and request a provider intent.
/// Invalid prices are rejected before any provider call.
#[instrument(skip(state), fields(price = request.price))]
pub async fn create_payment_intent(
    State(state): State<AppState>,
    Json(request): Json<CreateIntentRequest>,
) -> ApiResult<Json<CreateIntentResponse>> {
    let amount = minor_units(request.price)?;
    let intent = state.intents.create_intent(amount, INTENT_CURRENCY).await?;

    Ok(Json(CreateIntentResponse {
        client_secret: intent.client_secret,
    }))
}

/// List payments for the given email. Self-only: a mismatch with the token
/// identity is a 403 regardless of whether matching payments exist.
pub async fn list_payments(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(email): Path<String>,
) -> ApiResult<Json<Vec<Payment>>> {
    if email != auth.email {
        return Err(ShelfError::Forbidden("cannot list another user's payments".into()).into());
    }

    let payments = state
        .payments
        .find_many(Filter::field("email", email))
        .await?;
    Ok(Json(payments))
}

/// `POST /payments` response body
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordPaymentResponse {
    pub inserted_id: String,
    pub status: PaymentStatus,
    pub cleared_cart_items: u64,
}

/// Two-phase settlement: insert the payment as `pending`, delete the
/// referenced cart items, then flip the record to `settled`. A failure after
/// the insert leaves the document `pending` and returns a 502 naming it, so
/// a partial settlement is never reported as success.
#[instrument(skip(state, payment), fields(email = %payment.email, cart_items = payment.cart_ids.len()))]
pub async fn record_payment(
    State(state): State<AppState>,
    Json(payment): Json<Payment>,
) -> ApiResult<Json<RecordPaymentResponse>> {
    payment.validate()?;

    let payment = Payment {
        id: None,
        status: PaymentStatus::Pending,
        created_at: Some(Utc::now()),
        ..payment
    };
    let id = state.payments.insert_one(&payment).await?;

    let cleared = match state
        .carts
        .delete_many(Filter::IdIn(payment.cart_ids.clone()))
        .await
    {
        Ok(count) => count,
        Err(e) => {
            error!(payment_id = %id, error = %e, "cart cleanup failed, payment left pending");
            return Err(ShelfError::Store(format!(
                "payment {id} was recorded but its cart items were not cleared; \
                 the payment remains pending"
            ))
            .into());
        }
    };

    if let Err(e) = state
        .payments
        .update_one(Filter::by_id(&id), json!({ "status": PaymentStatus::Settled }))
        .await
    {
        error!(payment_id = %id, error = %e, "settlement update failed, payment left pending");
        return Err(ShelfError::Store(format!(
            "payment {id} cleared {cleared} cart items but could not be marked settled"
        ))
        .into());
    }

    info!(payment_id = %id, cleared, "payment settled");

    Ok(Json(RecordPaymentResponse {
        inserted_id: id,
        status: PaymentStatus::Settled,
        cleared_cart_items: cleared,
    }))
}
