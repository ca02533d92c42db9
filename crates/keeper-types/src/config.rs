//! Server configuration types for Keeper.
//!
//! `KeeperConfig` represents the top-level `keeper.toml` supplied by the
//! bootstrap collaborator: backend selection, connection string, the session
//! signing key and the field cipher key. Keys are hex strings held in
//! `SecretString` until decoded into raw 32-byte arrays.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer};

use std::fmt;

use crate::error::ConfigError;
use crate::session::DEFAULT_TOKEN_TTL_SECS;

/// Length of both the signing key and the cipher key, in bytes.
pub const KEY_LEN: usize = 32;

/// Storage backend selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Process-local tables, nothing survives a restart.
    Memory,
    /// SQLite database at `connection`.
    Relational,
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Backend::Memory => write!(f, "memory"),
            Backend::Relational => write!(f, "relational"),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Top-level configuration for the vault server.
#[derive(Debug, Deserialize)]
pub struct KeeperConfig {
    pub backend: Backend,

    /// Database URL for the relational backend. Ignored for `memory`.
    #[serde(default = "default_connection")]
    pub connection: String,

    /// Hex-encoded 32-byte HMAC key for session tokens.
    #[serde(deserialize_with = "secret_string")]
    pub signing_key: SecretString,

    /// Hex-encoded 32-byte AES-256-GCM key for item fields.
    #[serde(deserialize_with = "secret_string")]
    pub cipher_key: SecretString,

    /// Address the HTTP listener binds to.
    #[serde(default = "default_listen")]
    pub listen: String,

    /// Session lifetime from mint time.
    #[serde(default = "default_token_ttl_secs")]
    pub token_ttl_secs: u64,

    /// Upper bound on a single authenticated operation. Unbounded when absent.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,

    #[serde(default)]
    pub log_format: LogFormat,
}

fn default_connection() -> String {
    "sqlite://keeper.db?mode=rwc".to_string()
}

fn default_listen() -> String {
    "127.0.0.1:8080".to_string()
}

fn default_token_ttl_secs() -> u64 {
    DEFAULT_TOKEN_TTL_SECS
}

fn secret_string<'de, D>(deserializer: D) -> Result<SecretString, D::Error>
where
    D: Deserializer<'de>,
{
    String::deserialize(deserializer).map(SecretString::from)
}

impl KeeperConfig {
    /// Decode the session signing key.
    pub fn signing_key_bytes(&self) -> Result<[u8; KEY_LEN], ConfigError> {
        decode_key("signing_key", &self.signing_key)
    }

    /// Decode the field cipher key.
    pub fn cipher_key_bytes(&self) -> Result<[u8; KEY_LEN], ConfigError> {
        decode_key("cipher_key", &self.cipher_key)
    }
}

/// Decode a hex-encoded 32-byte key.
pub fn decode_key(field: &'static str, hex: &SecretString) -> Result<[u8; KEY_LEN], ConfigError> {
    let s = hex.expose_secret().trim();
    if s.len() != KEY_LEN * 2 {
        return Err(ConfigError::InvalidKey {
            field,
            reason: format!("expected {} hex characters", KEY_LEN * 2),
        });
    }
    if !s.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(ConfigError::InvalidKey {
            field,
            reason: "not a hex string".to_string(),
        });
    }
    let mut key = [0u8; KEY_LEN];
    for (i, byte) in key.iter_mut().enumerate() {
        *byte = u8::from_str_radix(&s[i * 2..i * 2 + 2], 16).map_err(|_| ConfigError::InvalidKey {
            field,
            reason: "not a hex string".to_string(),
        })?;
    }
    Ok(key)
}
