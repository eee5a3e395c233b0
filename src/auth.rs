use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{config::AppConfig, error::ApiError, models::User, policy::Actor};

/// Header carrying the signed token. The client presents the raw token here,
/// without a "Bearer" prefix; this is the established wire contract.
pub const AUTH_HEADER: &str = "x-auth-token";

/// Token lifetime: 24 hours.
const TOKEN_TTL_SECS: u64 = 60 * 60 * 24;

/// Claims
///
/// The payload structure signed into every issued token. The admin flag lives
/// inside the signed payload so privileged requests re-verify it from the
/// credential itself on every call, never from client-held state.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user's id.
    pub sub: Uuid,
    /// Whether the subject held the admin flag at issuance time.
    pub is_admin: bool,
    /// Issued At timestamp.
    pub iat: usize,
    /// Expiration timestamp. Tokens past this instant are rejected.
    pub exp: usize,
}

/// issue_token
///
/// Signs a fresh token for the given user with the configured secret.
pub fn issue_token(user: &User, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now().timestamp() as usize;
    let claims = Claims {
        sub: user.id,
        is_admin: user.is_admin,
        iat: now,
        exp: now + TOKEN_TTL_SECS as usize,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

/// decode_token
///
/// Verifies signature and expiry and returns the embedded claims. Any failure
/// mode (expired, malformed, bad signature) collapses into one rejection so
/// callers cannot distinguish why a credential was refused.
pub fn decode_token(token: &str, secret: &str) -> Result<Claims, ApiError> {
    let mut validation = Validation::default();
    validation.validate_exp = true;

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|_| ApiError::Unauthenticated("Token is not valid"))
}

/// hash_password
///
/// Salted bcrypt hash of a raw password. The raw value is dropped after this
/// call and never persisted or logged.
pub fn hash_password(raw: &str) -> Result<String, ApiError> {
    bcrypt::hash(raw, bcrypt::DEFAULT_COST).map_err(|e| {
        tracing::error!("bcrypt hashing failed: {:?}", e);
        ApiError::Internal
    })
}

/// verify_password
///
/// Constant answer shape: any internal bcrypt failure reads as a mismatch.
pub fn verify_password(raw: &str, hash: &str) -> bool {
    bcrypt::verify(raw, hash).unwrap_or(false)
}

/// AuthUser
///
/// The resolved identity of an authenticated request, produced by the
/// extractor below. Handlers receive the user's id and admin flag and feed
/// them into the policy layer for every ownership or privilege decision.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub id: Uuid,
    pub is_admin: bool,
}

impl AuthUser {
    /// The policy-layer view of this identity.
    pub fn actor(&self) -> Actor {
        Actor::User {
            id: self.id,
            is_admin: self.is_admin,
        }
    }
}

/// AuthUser Extractor Implementation
///
/// Implements Axum's FromRequestParts trait, making AuthUser usable as a
/// function argument in any authenticated handler. This cleanly separates
/// credential validation (extractor) from business logic (the handler).
///
/// An absent header and an invalid token both reject with 401: a mutating
/// request without a valid credential is never downgraded to an anonymous one.
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    AppConfig: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let config = AppConfig::from_ref(state);

        let token = parts
            .headers
            .get(AUTH_HEADER)
            .and_then(|value| value.to_str().ok())
            .ok_or(ApiError::Unauthenticated("No token, authorization denied"))?;

        let claims = decode_token(token, &config.jwt_secret)?;

        Ok(AuthUser {
            id: claims.sub,
            is_admin: claims.is_admin,
        })
    }
}
