//! # Request Handlers
//!
//! One module per entity. Every handler maps a verb+path to one or two store
//! calls and returns the outcome with the field names existing clients
//! already parse (`insertedId`, `deletedCount`, ...).

pub mod books;
pub mod carts;
pub mod donations;
pub mod payments;
pub mod reviews;
pub mod stats;
pub mod users;

use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

/// Insert outcome
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertResponse {
    pub inserted_id: String,
}

/// Delete outcome. A zero count is a successful no-op, not an error.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResponse {
    pub deleted_count: u64,
}

/// Update outcome
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResponse {
    pub matched_count: u64,
    pub modified_count: u64,
}

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "bookshelf",
        "version": env!("CARGO_PKG_VERSION")
    }))
}
