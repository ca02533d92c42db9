//! Session token extractor.
//!
//! Reads `Authorization: Bearer <token>`. The token is only carried here;
//! verification happens in the gateway's authentication stage, so a missing
//! header is not rejected at this layer.

use axum::extract::FromRequestParts;
use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use keeper_types::session::SessionToken;

use crate::http::error::AppError;

/// The bearer token presented with a request, if any.
pub struct Bearer(pub Option<SessionToken>);

impl<S: Send + Sync> FromRequestParts<S> for Bearer {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        bearer_token(&parts.headers).map(Bearer)
    }
}

/// Extract the bearer token from request headers.
///
/// Absent header is `Ok(None)`. A header that is present but not a bearer
/// credential is rejected.
pub fn bearer_token(headers: &HeaderMap) -> Result<Option<SessionToken>, AppError> {
    let Some(value) = headers.get(AUTHORIZATION) else {
        return Ok(None);
    };

    let value = value.to_str().map_err(|_| {
        AppError::Unauthorized("Invalid Authorization header encoding".to_string())
    })?;
    let token = value
        .strip_prefix("Bearer ")
        .or_else(|| value.strip_prefix("bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| {
            AppError::Unauthorized(
                "Expected 'Authorization: Bearer <token>' header".to_string(),
            )
        })?;

    Ok(Some(SessionToken::new(token)))
}
