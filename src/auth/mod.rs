//! Caller identity
//!
//! Provides:
//! - Session token verification (JWT, HS256)
//! - `RequireUser` / `MaybeUser` extractors for handlers

pub mod jwt;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::SharedState;
use crate::error::ApiError;

pub use jwt::{extract_token_from_header, Claims, JwtValidator};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("Unauthorized")]
    MissingToken,

    #[error("Token expired")]
    Expired,

    #[error("{0}")]
    InvalidToken(String),

    #[error("Failed to generate token: {0}")]
    Encode(String),

    #[error("Auth configuration error: {0}")]
    Config(String),
}

/// An authenticated caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: String,
    pub name: Option<String>,
}

impl SessionUser {
    /// Name shown in the UI, falling back to a generic label
    pub fn display_name(&self) -> &str {
        self.name.as_deref().filter(|n| !n.is_empty()).unwrap_or("User")
    }
}

impl From<Claims> for SessionUser {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.sub,
            name: claims.name,
        }
    }
}

/// Resolve the caller from request headers.
///
/// No header means anonymous; a header that fails verification is an error,
/// which `MaybeUser` downgrades to anonymous.
fn caller_from_parts(
    parts: &Parts,
    state: &SharedState,
) -> Result<Option<SessionUser>, AuthError> {
    let header = parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    match header {
        None => Ok(None),
        Some(value) => {
            let token = extract_token_from_header(Some(value))
                .ok_or_else(|| AuthError::InvalidToken("Malformed Authorization header".into()))?;
            let claims = state.jwt.verify_token(token)?;
            Ok(Some(claims.into()))
        }
    }
}

/// Extractor for routes that need a signed-in caller (401 otherwise)
#[derive(Debug, Clone)]
pub struct RequireUser(pub SessionUser);

/// Extractor for routes that accept anonymous callers. A token that does not
/// verify (expired, garbage) counts as no token at all.
#[derive(Debug, Clone)]
pub struct MaybeUser(pub Option<SessionUser>);

#[async_trait]
impl FromRequestParts<SharedState> for RequireUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &SharedState,
    ) -> Result<Self, Self::Rejection> {
        match caller_from_parts(parts, state)? {
            Some(user) => Ok(RequireUser(user)),
            None => Err(AuthError::MissingToken.into()),
        }
    }
}

#[async_trait]
impl FromRequestParts<SharedState> for MaybeUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &SharedState,
    ) -> Result<Self, Self::Rejection> {
        match caller_from_parts(parts, state) {
            Ok(user) => Ok(MaybeUser(user)),
            Err(e) => {
                debug!(error = %e, "Unusable session token, treating caller as anonymous");
                Ok(MaybeUser(None))
            }
        }
    }
}
