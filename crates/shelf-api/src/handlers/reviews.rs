//! Review operations: unconditional insert, global unbounded listing.

use crate::error::ApiResult;
use crate::handlers::InsertResponse;
use crate::state::AppState;
use axum::extract::State;
use axum::Json;
use shelf_core::{Filter, Review};
use tracing::debug;

pub async fn add_review(
    State(state): State<AppState>,
    Json(review): Json<Review>,
) -> ApiResult<Json<InsertResponse>> {
    let id = state.reviews.insert_one(&review).await?;
    Ok(Json(InsertResponse { inserted_id: id }))
}

pub async fn list_reviews(State(state): State<AppState>) -> ApiResult<Json<Vec<Review>>> {
    let reviews = state.reviews.find_many(Filter::All).await?;
    debug!(count = reviews.len(), "listed reviews");
    Ok(Json(reviews))
}
