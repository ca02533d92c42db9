//! Entry point for decoded operations.
//!
//! `Gateway` owns two pipelines built once at startup:
//! - public: `[logging] -> SessionEndpoint` for Register and Login
//! - protected: `[logging, authentication, deadline?] -> VaultEndpoint`
//!
//! The wire layer only ever calls [`Gateway::dispatch`].

pub mod endpoint;
pub mod envelope;

use std::sync::Arc;
use std::time::Duration;

use crate::pipeline::{AuthenticationStage, Call, CallResult, DeadlineStage, LoggingStage, Pipeline};
use crate::repository::store::VaultStore;
use crate::service::cipher::FieldCipher;
use crate::service::session::SessionAuthenticator;
use crate::service::token::TokenCodec;
use crate::service::vault::VaultService;

use endpoint::{SessionEndpoint, VaultEndpoint};
use envelope::Envelope;

#[derive(Debug)]
pub struct Gateway {
    public: Pipeline,
    protected: Pipeline,
}

impl Gateway {
    /// Wire services and pipelines over one store, cipher and token codec.
    pub fn new<S, C, T>(store: Arc<S>, cipher: Arc<C>, codec: Arc<T>) -> Self
    where
        S: VaultStore + 'static,
        C: FieldCipher + 'static,
        T: TokenCodec + 'static,
    {
        let authenticator = Arc::new(SessionAuthenticator::new(
            store.clone(),
            cipher.clone(),
            codec,
        ));
        let vault = Arc::new(VaultService::new(store, cipher));
        let logging = Arc::new(LoggingStage::new());

        let public = Pipeline::new(Arc::new(SessionEndpoint::new(authenticator.clone())))
            .with_stage(logging.clone());
        let protected = Pipeline::new(Arc::new(VaultEndpoint::new(vault)))
            .with_stage(logging)
            .with_stage(Arc::new(AuthenticationStage::new(authenticator)));

        Self { public, protected }
    }

    /// Bound every protected call by `limit`. Sits inside authentication.
    pub fn with_deadline(mut self, limit: Duration) -> Self {
        self.protected = self
            .protected
            .with_stage(Arc::new(DeadlineStage::new(limit)));
        self
    }

    pub async fn dispatch(&self, envelope: Envelope) -> CallResult {
        let pipeline = if envelope.request.requires_session() {
            &self.protected
        } else {
            &self.public
        };
        pipeline.execute(Call::new(envelope)).await
    }

    /// Stage names of (public, protected), outermost first.
    pub fn stage_names(&self) -> (Vec<&'static str>, Vec<&'static str>) {
        (self.public.stage_names(), self.protected.stage_names())
    }
}
