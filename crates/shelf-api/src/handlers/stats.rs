//! Aggregate counts from the store's collection-size estimates. Approximate
//! by contract: values may lag exact counts but are never negative.

use crate::error::ApiResult;
use crate::state::AppState;
use axum::extract::State;
use axum::Json;
use serde::Serialize;

/// `GET /user-stats` response body. Despite the name these are
/// whole-collection counts, preserved from the original contract.
#[derive(Debug, Serialize)]
pub struct UserStatsResponse {
    pub cart: u64,
    #[serde(rename = "myDonation")]
    pub my_donation: u64,
}

pub async fn user_stats(State(state): State<AppState>) -> ApiResult<Json<UserStatsResponse>> {
    let cart = state.carts.estimated_count().await?;
    let my_donation = state.donations.estimated_count().await?;

    Ok(Json(UserStatsResponse { cart, my_donation }))
}

/// `GET /admin-stats` response body
#[derive(Debug, Serialize)]
pub struct AdminStatsResponse {
    pub books: u64,
    pub users: u64,
    pub reviews: u64,
    pub payments: u64,
}

pub async fn admin_stats(State(state): State<AppState>) -> ApiResult<Json<AdminStatsResponse>> {
    let books = state.books.estimated_count().await?;
    let users = state.users.estimated_count().await?;
    let reviews = state.reviews.estimated_count().await?;
    let payments = state.payments.estimated_count().await?;

    Ok(Json(AdminStatsResponse {
        books,
        users,
        reviews,
        payments,
    }))
}
