//! Donated-book operations: append-only inserts, identity-scoped listing.
//! Same ownership rules as the cart.

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::handlers::carts::OwnerQuery;
use crate::handlers::InsertResponse;
use crate::state::AppState;
use axum::extract::{Query, State};
use axum::Json;
use shelf_core::{DonatedBook, Filter, ShelfError};
use tracing::{debug, instrument};

/// Record a donated book
#[instrument(skip(state, donation), fields(email = %donation.email))]
pub async fn add_donation(
    State(state): State<AppState>,
    Json(donation): Json<DonatedBook>,
) -> ApiResult<Json<InsertResponse>> {
    donation.validate()?;
    let id = state.donations.insert_one(&donation).await?;
    Ok(Json(InsertResponse { inserted_id: id }))
}

/// List the caller's donations
pub async fn list_donations(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<OwnerQuery>,
) -> ApiResult<Json<Vec<DonatedBook>>> {
    if let Some(email) = &query.email {
        if email != &auth.email {
            return Err(
                ShelfError::Forbidden("cannot list another user's donations".into()).into(),
            );
        }
    }

    let donations = state
        .donations
        .find_many(Filter::field("email", auth.email.clone()))
        .await?;
    debug!(email = %auth.email, count = donations.len(), "listed donations");
    Ok(Json(donations))
}
