//! # Token Issuing and the Access Control Gate
//!
//! Tokens are HS256-signed with a shared secret and expire after one hour;
//! there is no refresh, clients simply request a new token. The gate is two
//! extractors: `AuthUser` (valid bearer token, else 401) and `AdminUser`,
//! which always runs the authentication step first and then checks the
//! user's role in the store (else 403).

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use axum::extract::{FromRequestParts, State};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::Json;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use shelf_core::{Filter, ShelfError, ShelfResult};
use tracing::debug;

/// Token lifetime in seconds, matching the issuing contract (one hour)
pub const TOKEN_TTL_SECS: i64 = 3600;

/// Signing and verification keys derived from the shared secret
pub struct AuthKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl AuthKeys {
    pub fn from_secret(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }
}

/// Identity payload carried inside a token
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub email: String,
    pub iat: usize,
    pub exp: usize,
}

/// Sign a one-hour token for the given identity
pub fn issue_token(keys: &AuthKeys, email: &str) -> ShelfResult<String> {
    let now = Utc::now();
    let claims = Claims {
        email: email.to_owned(),
        iat: now.timestamp() as usize,
        exp: (now + Duration::seconds(TOKEN_TTL_SECS)).timestamp() as usize,
    };

    encode(&Header::default(), &claims, &keys.encoding)
        .map_err(|e| ShelfError::Internal(format!("token signing failed: {e}")))
}

/// Verify signature and expiry, returning the claims
pub fn decode_token(keys: &AuthKeys, token: &str) -> ShelfResult<Claims> {
    decode::<Claims>(token, &keys.decoding, &Validation::default())
        .map(|data| data.claims)
        .map_err(|_| ShelfError::Unauthorized("invalid or expired token".into()))
}

/// `POST /jwt` request body
#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    pub email: String,
}

/// `POST /jwt` response body
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

/// Issue a token for the given identity payload
pub async fn issue_jwt(
    State(state): State<AppState>,
    Json(request): Json<TokenRequest>,
) -> ApiResult<Json<TokenResponse>> {
    if request.email.trim().is_empty() {
        return Err(ShelfError::Validation("email is required".into()).into());
    }

    let token = issue_token(&state.auth, &request.email)?;
    debug!(email = %request.email, "issued token");
    Ok(Json(TokenResponse { token }))
}

/// A request bearing a valid token
pub struct AuthUser {
    pub email: String,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| {
                ApiError(ShelfError::Unauthorized(
                    "missing Authorization header".into(),
                ))
            })?;

        let token = header.strip_prefix("Bearer ").ok_or_else(|| {
            ApiError(ShelfError::Unauthorized("expected a bearer token".into()))
        })?;

        let claims = decode_token(&state.auth, token)?;
        Ok(AuthUser {
            email: claims.email,
        })
    }
}

/// A request bearing a valid token whose user holds the admin role.
///
/// The role is looked up in the store per request, so a demoted admin loses
/// access as soon as the document changes.
pub struct AdminUser {
    pub email: String,
}

impl FromRequestParts<AppState> for AdminUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // authentication always runs before the role check
        let auth = AuthUser::from_request_parts(parts, state).await?;

        let user = state
            .users
            .find_one(Filter::field("email", auth.email.clone()))
            .await?;

        match user {
            Some(user) if user.is_admin() => Ok(AdminUser { email: auth.email }),
            _ => Err(ApiError(ShelfError::Forbidden("admin role required".into()))),
        }
    }
}
