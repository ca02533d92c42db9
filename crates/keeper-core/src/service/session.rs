//! Session authentication service.
//!
//! Registers users (encrypting their secret before it reaches the store),
//! logs them in, and validates the stateless session tokens minted by both.
//! No session state is persisted: a token that verifies and has not expired
//! is the whole proof of identity.

use std::sync::Arc;

use chrono::Utc;
use subtle::ConstantTimeEq;

use keeper_types::error::{SessionError, VaultError};
use keeper_types::identity::Identity;
use keeper_types::session::{SessionClaims, SessionToken};

use crate::repository::store::VaultStore;
use crate::service::cipher::FieldCipher;
use crate::service::token::TokenCodec;

/// Issues and validates session tokens against the users held by a store.
///
/// Generic over the store, cipher and token ports so keeper-core never
/// depends on keeper-infra.
pub struct SessionAuthenticator<S: VaultStore, C: FieldCipher, T: TokenCodec> {
    store: Arc<S>,
    cipher: Arc<C>,
    codec: Arc<T>,
}

impl<S: VaultStore, C: FieldCipher, T: TokenCodec> SessionAuthenticator<S, C, T> {
    pub fn new(store: Arc<S>, cipher: Arc<C>, codec: Arc<T>) -> Self {
        Self {
            store,
            cipher,
            codec,
        }
    }

    /// Create a user and return a fresh token.
    ///
    /// Fails `AlreadyExists` when the login is taken. The store's uniqueness
    /// check decides; there is no pre-check here.
    pub async fn register(&self, login: &str, secret: &str) -> Result<SessionToken, VaultError> {
        let identity = Identity::new(login)?;
        if secret.is_empty() {
            return Err(VaultError::InvalidArgument("password must not be empty".to_string()));
        }

        let sealed = self.cipher.encrypt(secret.as_bytes())?;
        self.store
            .create_user(&identity, sealed)
            .await
            .map_err(|e| e.into_vault_error(format!("user '{identity}'")))?;

        tracing::info!(login = %identity, "registered user");
        self.mint(&identity)
    }

    /// Check a login/secret pair and return a fresh token.
    ///
    /// Fails `NotFound` for an unknown login and `InvalidCredentials` when the
    /// secret does not match the stored one.
    pub async fn login(&self, login: &str, secret: &str) -> Result<SessionToken, VaultError> {
        let identity = Identity::new(login)?;

        let sealed = self
            .store
            .get_user_secret(&identity)
            .await
            .map_err(|e| e.into_vault_error(format!("user '{identity}'")))?;
        let stored = self.cipher.decrypt(&sealed)?;

        if !bool::from(stored.as_slice().ct_eq(secret.as_bytes())) {
            tracing::debug!(login = %identity, "password mismatch");
            return Err(VaultError::InvalidCredentials);
        }

        self.mint(&identity)
    }

    /// Verify a presented token. Signature first, then expiry.
    pub fn validate_session(&self, token: &str) -> Result<SessionClaims, SessionError> {
        self.codec.verify(token, Utc::now())
    }

    /// Whether the identity named by a verified token is still registered.
    pub async fn identity_exists(&self, identity: &Identity) -> Result<bool, VaultError> {
        self.store
            .user_exists(identity)
            .await
            .map_err(|e| e.into_vault_error(format!("user '{identity}'")))
    }

    fn mint(&self, identity: &Identity) -> Result<SessionToken, VaultError> {
        Ok(self.codec.issue(identity, Utc::now())?)
    }
}
