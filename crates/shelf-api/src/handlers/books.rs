//! Catalog reads. Books are seeded out of band; this service never writes
//! them.

use crate::error::ApiResult;
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::Json;
use shelf_core::{Book, Filter, ShelfError};
use tracing::debug;

/// List the whole catalog, unfiltered
pub async fn list_books(State(state): State<AppState>) -> ApiResult<Json<Vec<Book>>> {
    let books = state.books.find_many(Filter::All).await?;
    debug!(count = books.len(), "listed books");
    Ok(Json(books))
}

/// Fetch one book by id. A missing id is an explicit 404, not an empty body.
pub async fn get_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Book>> {
    state
        .books
        .find_one(Filter::by_id(&id))
        .await?
        .map(Json)
        .ok_or_else(|| ShelfError::NotFound(format!("book {id}")).into())
}
