//! Cart operations. Listing is scoped to the verified identity: the legacy
//! `?email=` query is still accepted for client compatibility but must match
//! the token, never widen it.

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::handlers::{DeleteResponse, InsertResponse};
use crate::state::AppState;
use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use shelf_core::{CartItem, Filter, ShelfError};
use tracing::{debug, instrument};

/// Optional owner filter carried over from the original API shape
#[derive(Debug, Deserialize)]
pub struct OwnerQuery {
    pub email: Option<String>,
}

/// Add an item to the cart. The referenced book is not checked for
/// existence, matching the documented behavior.
#[instrument(skip(state, item), fields(email = %item.email, book_id = %item.book_id))]
pub async fn add_to_cart(
    State(state): State<AppState>,
    Json(item): Json<CartItem>,
) -> ApiResult<Json<InsertResponse>> {
    item.validate()?;
    let id = state.carts.insert_one(&item).await?;
    Ok(Json(InsertResponse { inserted_id: id }))
}

/// List the caller's cart items
pub async fn list_cart(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<OwnerQuery>,
) -> ApiResult<Json<Vec<CartItem>>> {
    if let Some(email) = &query.email {
        if email != &auth.email {
            return Err(ShelfError::Forbidden("cannot list another user's cart".into()).into());
        }
    }

    let items = state
        .carts
        .find_many(Filter::field("email", auth.email.clone()))
        .await?;
    debug!(email = %auth.email, count = items.len(), "listed cart");
    Ok(Json(items))
}

/// Remove one item by identifier
pub async fn remove_from_cart(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<DeleteResponse>> {
    let deleted = state.carts.delete_one(Filter::by_id(&id)).await?;
    Ok(Json(DeleteResponse {
        deleted_count: deleted,
    }))
}
