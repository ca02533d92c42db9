//! JSON body extractor that reports malformed input in the API envelope.
//!
//! Plain `axum::Json` answers a bad body with a text/plain rejection. Handlers
//! take `ApiJson<T>` instead so the client always sees `{data, meta, errors}`.

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::Json;

use keeper_types::error::VaultError;

use crate::http::error::AppError;

/// A JSON request body whose rejection is an [`AppError`].
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await.map_err(|rejection| {
            tracing::debug!(status = %rejection.status(), "rejected request body");
            AppError::Vault(VaultError::InvalidArgument(rejection.body_text()))
        })?;
        Ok(Self(value))
    }
}
