use std::sync::Arc;

use futures_util::future::BoxFuture;

use keeper_types::error::VaultError;

use crate::repository::store::VaultStore;
use crate::service::cipher::FieldCipher;
use crate::service::session::SessionAuthenticator;
use crate::service::token::TokenCodec;

use super::{Call, CallResult, Next, Stage};

/// Rejects any call without a valid session and attaches the verified claims
/// to the ones that have one.
///
/// Order of checks: token present, signature and expiry, then the identity
/// still being registered. A bad token never reaches the store, and on any
/// failure the rest of the pipeline does not run.
pub struct AuthenticationStage<S: VaultStore, C: FieldCipher, T: TokenCodec> {
    authenticator: Arc<SessionAuthenticator<S, C, T>>,
}

impl<S: VaultStore, C: FieldCipher, T: TokenCodec> AuthenticationStage<S, C, T> {
    pub fn new(authenticator: Arc<SessionAuthenticator<S, C, T>>) -> Self {
        Self { authenticator }
    }
}

impl<S, C, T> Stage for AuthenticationStage<S, C, T>
where
    S: VaultStore + 'static,
    C: FieldCipher + 'static,
    T: TokenCodec + 'static,
{
    fn name(&self) -> &'static str {
        "authentication"
    }

    fn handle<'a>(&'a self, mut call: Call, next: Next<'a>) -> BoxFuture<'a, CallResult> {
        Box::pin(async move {
            let claims = {
                let token = call.token.as_ref().ok_or_else(|| {
                    VaultError::Unauthenticated("missing session token".to_string())
                })?;
                self.authenticator.validate_session(token.as_str())?
            };

            if !self.authenticator.identity_exists(&claims.identity).await? {
                tracing::debug!(method = call.method, "token for unknown identity");
                return Err(VaultError::Unauthenticated("unknown identity".to_string()));
            }

            call.claims = Some(claims);
            next.run(call).await
        })
    }
}
