//! Application state wiring the gateway to concrete infrastructure.
//!
//! The core gateway is generic over store, cipher and token codec. AppState
//! pins it to the configured backend (boxed behind `BoxVaultStore`), the
//! AES-GCM field cipher and the HMAC token codec.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;

use keeper_core::gateway::Gateway;
use keeper_core::repository::store::BoxVaultStore;
use keeper_infra::crypto::cipher::AesGcmFieldCipher;
use keeper_infra::crypto::token::HmacTokenCodec;
use keeper_infra::memory::MemoryVaultStore;
use keeper_infra::sqlite::{DatabasePool, SqliteVaultStore};
use keeper_types::config::{Backend, KeeperConfig};

/// Shared application state handed to every REST handler.
#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<Gateway>,
    pub backend: &'static str,
    /// Open only for the relational backend; closed on shutdown.
    pub db_pool: Option<DatabasePool>,
}

impl AppState {
    /// Open the configured store and wire the gateway.
    pub async fn init(config: &KeeperConfig) -> anyhow::Result<Self> {
        let (store, db_pool) = match config.backend {
            Backend::Memory => (BoxVaultStore::new(MemoryVaultStore::new(), "memory"), None),
            Backend::Relational => {
                let pool = DatabasePool::new(&config.connection)
                    .await
                    .context("failed to open relational store")?;
                (
                    BoxVaultStore::new(SqliteVaultStore::new(pool.clone()), "relational"),
                    Some(pool),
                )
            }
        };
        let backend = store.backend();

        let cipher = AesGcmFieldCipher::new(&config.cipher_key_bytes()?);
        let ttl = i64::try_from(config.token_ttl_secs)
            .ok()
            .and_then(chrono::Duration::try_seconds)
            .context("token_ttl_secs is out of range")?;
        let codec = HmacTokenCodec::new(&config.signing_key_bytes()?, ttl);

        let mut gateway = Gateway::new(Arc::new(store), Arc::new(cipher), Arc::new(codec));
        if let Some(secs) = config.request_timeout_secs {
            gateway = gateway.with_deadline(Duration::from_secs(secs));
        }

        let (public, protected) = gateway.stage_names();
        tracing::info!(backend, ?public, ?protected, "gateway ready");

        Ok(Self {
            gateway: Arc::new(gateway),
            backend,
            db_pool,
        })
    }

    /// Release backend resources.
    pub async fn close(&self) {
        if let Some(pool) = &self.db_pool {
            pool.close().await;
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use keeper_infra::config::parse_config;

    const KEY_A: &str = "000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f";
    const KEY_B: &str = "1f1e1d1c1b1a191817161514131211100f0e0d0c0b0a09080706050403020100";

    pub(crate) async fn memory_state() -> AppState {
        let config = parse_config(&format!(
            "backend = \"memory\"\nsigning_key = \"{KEY_A}\"\ncipher_key = \"{KEY_B}\"\n"
        ))
        .unwrap();
        AppState::init(&config).await.unwrap()
    }

    #[tokio::test]
    async fn test_memory_backend() {
        let state = memory_state().await;
        assert_eq!(state.backend, "memory");
        assert!(state.db_pool.is_none());

        let (public, protected) = state.gateway.stage_names();
        assert_eq!(public, vec!["logging"]);
        assert_eq!(protected, vec!["logging", "authentication"]);
    }

    #[tokio::test]
    async fn test_relational_backend_with_deadline() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}?mode=rwc", dir.path().join("vault.db").display());
        let config = parse_config(&format!(
            "backend = \"relational\"\nconnection = \"{url}\"\nsigning_key = \"{KEY_A}\"\ncipher_key = \"{KEY_B}\"\nrequest_timeout_secs = 5\n"
        ))
        .unwrap();

        let state = AppState::init(&config).await.unwrap();
        assert_eq!(state.backend, "relational");
        assert!(state.db_pool.is_some());
        assert_eq!(
            state.gateway.stage_names().1,
            vec!["logging", "authentication", "deadline"]
        );
        state.close().await;
    }

    #[tokio::test]
    async fn test_unreachable_database_fails_init() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!(
            "sqlite://{}?mode=rw",
            dir.path().join("missing").join("vault.db").display()
        );
        let config = parse_config(&format!(
            "backend = \"relational\"\nconnection = \"{url}\"\nsigning_key = \"{KEY_A}\"\ncipher_key = \"{KEY_B}\"\n"
        ))
        .unwrap();

        assert!(AppState::init(&config).await.is_err());
    }
}
