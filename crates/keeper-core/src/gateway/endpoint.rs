//! Pipeline endpoints that hand calls to the services.

use std::sync::Arc;

use futures_util::future::BoxFuture;

use keeper_types::error::VaultError;

use crate::gateway::envelope::{VaultRequest, VaultResponse};
use crate::pipeline::{Call, CallResult, Endpoint};
use crate::repository::store::VaultStore;
use crate::service::cipher::FieldCipher;
use crate::service::session::SessionAuthenticator;
use crate::service::token::TokenCodec;
use crate::service::vault::VaultService;

/// Serves Register and Login.
pub struct SessionEndpoint<S: VaultStore, C: FieldCipher, T: TokenCodec> {
    authenticator: Arc<SessionAuthenticator<S, C, T>>,
}

impl<S: VaultStore, C: FieldCipher, T: TokenCodec> SessionEndpoint<S, C, T> {
    pub fn new(authenticator: Arc<SessionAuthenticator<S, C, T>>) -> Self {
        Self { authenticator }
    }
}

impl<S, C, T> Endpoint for SessionEndpoint<S, C, T>
where
    S: VaultStore + 'static,
    C: FieldCipher + 'static,
    T: TokenCodec + 'static,
{
    fn serve(&self, call: Call) -> BoxFuture<'_, CallResult> {
        Box::pin(async move {
            let token = match call.request {
                VaultRequest::Register { login, password } => {
                    self.authenticator.register(&login, &password).await?
                }
                VaultRequest::Login { login, password } => {
                    self.authenticator.login(&login, &password).await?
                }
                _ => return Err(misrouted(call.method)),
            };
            Ok(VaultResponse::Session(token))
        })
    }
}

/// Serves every session-protected operation.
///
/// Only reachable behind the authentication stage; a call that arrives
/// without verified claims is refused before the service runs.
pub struct VaultEndpoint<S: VaultStore, C: FieldCipher> {
    service: Arc<VaultService<S, C>>,
}

impl<S: VaultStore, C: FieldCipher> VaultEndpoint<S, C> {
    pub fn new(service: Arc<VaultService<S, C>>) -> Self {
        Self { service }
    }
}

impl<S, C> Endpoint for VaultEndpoint<S, C>
where
    S: VaultStore + 'static,
    C: FieldCipher + 'static,
{
    fn serve(&self, call: Call) -> BoxFuture<'_, CallResult> {
        Box::pin(async move {
            let method = call.method;
            let req = call.into_authenticated()?;
            let owner = &req.identity;

            let response = match req.payload {
                VaultRequest::SendCredential(credential) => {
                    self.service.send_credential(owner, credential).await?;
                    VaultResponse::Stored
                }
                VaultRequest::GetCredential { name } => {
                    VaultResponse::Credential(self.service.get_credential(owner, &name).await?)
                }
                VaultRequest::SendCard(card) => {
                    self.service.send_card(owner, card).await?;
                    VaultResponse::Stored
                }
                VaultRequest::GetCard { name } => {
                    VaultResponse::Card(self.service.get_card(owner, &name).await?)
                }
                VaultRequest::SendText(text) => {
                    self.service.send_text(owner, text).await?;
                    VaultResponse::Stored
                }
                VaultRequest::GetText { name } => {
                    VaultResponse::Text(self.service.get_text(owner, &name).await?)
                }
                VaultRequest::Synchronize => {
                    VaultResponse::Snapshot(self.service.synchronize(owner).await?)
                }
                VaultRequest::Register { .. } | VaultRequest::Login { .. } => {
                    return Err(misrouted(method));
                }
            };
            Ok(response)
        })
    }
}

fn misrouted(method: &str) -> VaultError {
    VaultError::Internal(format!("{method} routed to the wrong endpoint"))
}
