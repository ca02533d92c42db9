//! Application error type mapping to HTTP status codes and envelope format.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use keeper_types::error::VaultError;

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Any tagged outcome from the gateway.
    Vault(VaultError),
    /// Unusable `Authorization` header.
    Unauthorized(String),
}

impl From<VaultError> for AppError {
    fn from(e: VaultError) -> Self {
        AppError::Vault(e)
    }
}

/// HTTP status for a vault outcome.
pub fn status_for(e: &VaultError) -> StatusCode {
    match e {
        VaultError::Unauthenticated(_) | VaultError::Expired | VaultError::InvalidCredentials => {
            StatusCode::UNAUTHORIZED
        }
        VaultError::NotFound(_) => StatusCode::NOT_FOUND,
        VaultError::AlreadyExists(_) => StatusCode::CONFLICT,
        VaultError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
        VaultError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        VaultError::IntegrityError | VaultError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Vault(e) => {
                if matches!(e, VaultError::IntegrityError | VaultError::Internal(_)) {
                    tracing::error!(code = e.code(), error = %e, "request failed");
                }
                (status_for(e), e.code(), e.to_string())
            }
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHENTICATED", msg.clone()),
        };

        let body = json!({
            "data": null,
            "meta": {
                "request_id": uuid::Uuid::now_v7().to_string(),
                "timestamp": chrono::Utc::now().to_rfc3339(),
                "response_time_ms": 0
            },
            "errors": [{
                "code": code,
                "message": message,
            }]
        });

        (
            status,
            [(axum::http::header::CONTENT_TYPE, "application/json")],
            body.to_string(),
        )
            .into_response()
    }
}
