//! HTTP request handlers for the REST API.
//!
//! Each handler decodes its input into a `VaultRequest`, dispatches it through
//! the gateway and wraps the result in the response envelope.

pub mod auth;
pub mod vault;

use keeper_core::gateway::envelope::{Envelope, VaultRequest, VaultResponse};
use keeper_types::error::VaultError;
use keeper_types::session::SessionToken;

use crate::http::error::AppError;
use crate::state::AppState;

async fn dispatch(
    state: &AppState,
    token: Option<SessionToken>,
    request: VaultRequest,
) -> Result<VaultResponse, AppError> {
    let envelope = Envelope { token, request };
    Ok(state.gateway.dispatch(envelope).await?)
}

fn unexpected(resp: &VaultResponse) -> AppError {
    AppError::Vault(VaultError::Internal(format!(
        "unexpected gateway response {}",
        response_kind(resp)
    )))
}

fn response_kind(resp: &VaultResponse) -> &'static str {
    match resp {
        VaultResponse::Session(_) => "session",
        VaultResponse::Stored => "stored",
        VaultResponse::Credential(_) => "credential",
        VaultResponse::Card(_) => "card",
        VaultResponse::Text(_) => "text",
        VaultResponse::Snapshot(_) => "snapshot",
    }
}
