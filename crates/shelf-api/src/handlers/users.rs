//! User management: listing and role changes are admin-gated; registration
//! is open and idempotent by email.

use crate::auth::{AdminUser, AuthUser};
use crate::error::ApiResult;
use crate::handlers::{DeleteResponse, UpdateResponse};
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;
use serde_json::json;
use shelf_core::{Filter, ShelfError, User};
use tracing::{debug, info, instrument};

/// List every user. Unpaginated, as documented.
pub async fn list_users(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> ApiResult<Json<Vec<User>>> {
    let users = state.users.find_many(Filter::All).await?;
    debug!(count = users.len(), "listed users");
    Ok(Json(users))
}

/// `GET /users/admin/{email}` response body
#[derive(Debug, Serialize)]
pub struct AdminFlagResponse {
    pub admin: bool,
}

/// Report whether the caller holds the admin role. Self-only: the path email
/// must match the token identity.
pub async fn is_admin(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(email): Path<String>,
) -> ApiResult<Json<AdminFlagResponse>> {
    if email != auth.email {
        return Err(ShelfError::Forbidden("can only query your own admin flag".into()).into());
    }

    let user = state.users.find_one(Filter::field("email", email)).await?;
    Ok(Json(AdminFlagResponse {
        admin: user.is_some_and(|user| user.is_admin()),
    }))
}

/// `POST /users` response body
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub inserted_id: Option<String>,
}

/// Idempotent registration: a second call with the same email inserts
/// nothing and reports `insertedId: null`.
#[instrument(skip(state, user), fields(email = %user.email))]
pub async fn register_user(
    State(state): State<AppState>,
    Json(user): Json<User>,
) -> ApiResult<Json<RegisterResponse>> {
    user.validate()?;

    let existing = state
        .users
        .find_one(Filter::field("email", user.email.clone()))
        .await?;
    if existing.is_some() {
        return Ok(Json(RegisterResponse {
            message: Some("user already exists".into()),
            inserted_id: None,
        }));
    }

    // the role is never client-assignable; promotion is a separate admin action
    let user = User { role: None, ..user };
    let id = state.users.insert_one(&user).await?;
    info!(id = %id, "registered user");

    Ok(Json(RegisterResponse {
        message: None,
        inserted_id: Some(id),
    }))
}

/// Promote a user to admin, unconditionally. The update outcome is the only
/// existence check.
pub async fn promote_admin(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<String>,
) -> ApiResult<Json<UpdateResponse>> {
    let outcome = state
        .users
        .update_one(Filter::by_id(&id), json!({ "role": "admin" }))
        .await?;
    info!(id = %id, matched = outcome.matched, "promoted user to admin");

    Ok(Json(UpdateResponse {
        matched_count: outcome.matched,
        modified_count: outcome.modified,
    }))
}

/// Delete a user by identifier
pub async fn delete_user(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<String>,
) -> ApiResult<Json<DeleteResponse>> {
    let deleted = state.users.delete_one(Filter::by_id(&id)).await?;
    info!(id = %id, deleted, "deleted user");
    Ok(Json(DeleteResponse {
        deleted_count: deleted,
    }))
}
