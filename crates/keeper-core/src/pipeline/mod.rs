//! Interceptor pipeline.
//!
//! A [`Pipeline`] is an ordered list of [`Stage`]s in front of an
//! [`Endpoint`]. Each stage receives the [`Call`] and a [`Next`] handle and
//! decides whether to pass the call on. Stage order is fixed at construction:
//! the first stage added is the outermost.
//!
//! Identity is never looked up from an untyped context. The authentication
//! stage fills in [`Call::claims`], and an endpoint turns the call into an
//! [`AuthenticatedRequest`] before touching any handler.

pub mod auth;
pub mod deadline;
pub mod logging;

pub use auth::AuthenticationStage;
pub use deadline::DeadlineStage;
pub use logging::LoggingStage;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures_util::future::BoxFuture;

use keeper_types::error::VaultError;
use keeper_types::identity::Identity;
use keeper_types::session::{SessionClaims, SessionToken};

use crate::gateway::envelope::{Envelope, VaultRequest, VaultResponse};

pub type CallResult = Result<VaultResponse, VaultError>;

/// One operation as it moves through the pipeline.
#[derive(Debug)]
pub struct Call {
    pub method: &'static str,
    pub token: Option<SessionToken>,
    /// Set by the authentication stage once the token has been verified.
    pub claims: Option<SessionClaims>,
    pub request: VaultRequest,
}

impl Call {
    pub fn new(envelope: Envelope) -> Self {
        Self {
            method: envelope.request.method(),
            token: envelope.token,
            claims: None,
            request: envelope.request,
        }
    }

    /// Unwrap into the handler-facing form. Fails closed when no stage
    /// resolved an identity.
    pub fn into_authenticated(self) -> Result<AuthenticatedRequest<VaultRequest>, VaultError> {
        let claims = self.claims.ok_or_else(|| {
            VaultError::Unauthenticated("no authenticated identity".to_string())
        })?;
        Ok(AuthenticatedRequest {
            identity: claims.identity,
            expires_at: claims.expires_at,
            payload: self.request,
        })
    }
}

/// A request paired with the identity that was verified for it.
#[derive(Debug, Clone)]
pub struct AuthenticatedRequest<P> {
    pub identity: Identity,
    pub expires_at: DateTime<Utc>,
    pub payload: P,
}

/// A single interceptor.
pub trait Stage: Send + Sync {
    fn name(&self) -> &'static str;

    /// Handle the call, passing it on through `next` or short-circuiting.
    fn handle<'a>(&'a self, call: Call, next: Next<'a>) -> BoxFuture<'a, CallResult>;
}

/// The handler at the end of a pipeline.
pub trait Endpoint: Send + Sync {
    fn serve(&self, call: Call) -> BoxFuture<'_, CallResult>;
}

/// The remainder of the pipeline after the current stage.
#[derive(Clone, Copy)]
pub struct Next<'a> {
    stages: &'a [Arc<dyn Stage>],
    endpoint: &'a dyn Endpoint,
}

impl<'a> Next<'a> {
    pub fn run(self, call: Call) -> BoxFuture<'a, CallResult> {
        match self.stages.split_first() {
            Some((stage, rest)) => stage.handle(
                call,
                Next {
                    stages: rest,
                    endpoint: self.endpoint,
                },
            ),
            None => self.endpoint.serve(call),
        }
    }
}

pub struct Pipeline {
    stages: Vec<Arc<dyn Stage>>,
    endpoint: Arc<dyn Endpoint>,
}

impl Pipeline {
    pub fn new(endpoint: Arc<dyn Endpoint>) -> Self {
        Self {
            stages: Vec::new(),
            endpoint,
        }
    }

    /// Append a stage inside every stage already added.
    pub fn with_stage(mut self, stage: Arc<dyn Stage>) -> Self {
        self.stages.push(stage);
        self
    }

    /// Stage names, outermost first.
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    pub async fn execute(&self, call: Call) -> CallResult {
        Next {
            stages: &self.stages,
            endpoint: self.endpoint.as_ref(),
        }
        .run(call)
        .await
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("stages", &self.stage_names())
            .finish()
    }
}
