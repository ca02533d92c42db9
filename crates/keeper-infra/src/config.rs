//! Configuration loader for Keeper.
//!
//! Reads `keeper.toml` (or the file named by `KEEPER_CONFIG`) and
//! deserializes it into [`KeeperConfig`]. Unlike most settings files there is
//! no fallback: without keys the server cannot run, so a missing or malformed
//! file is an error.

use std::path::{Path, PathBuf};

use keeper_types::config::KeeperConfig;
use keeper_types::error::ConfigError;

/// Environment variable naming the configuration file.
pub const CONFIG_ENV: &str = "KEEPER_CONFIG";

const DEFAULT_CONFIG_FILE: &str = "keeper.toml";

/// Longest accepted session lifetime (one year).
pub const MAX_TOKEN_TTL_SECS: u64 = 365 * 24 * 60 * 60;

/// `$KEEPER_CONFIG` if set, otherwise `./keeper.toml`.
pub fn default_config_path() -> PathBuf {
    std::env::var_os(CONFIG_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
}

/// Load and check the configuration at `path`.
///
/// Both keys are decoded here so a bad key fails at startup rather than on
/// the first request.
pub async fn load_config(path: &Path) -> Result<KeeperConfig, ConfigError> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

    let config = parse_config(&content)?;
    tracing::debug!(path = %path.display(), backend = %config.backend, "loaded config");
    Ok(config)
}

pub fn parse_config(content: &str) -> Result<KeeperConfig, ConfigError> {
    let config: KeeperConfig =
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;

    config.signing_key_bytes()?;
    config.cipher_key_bytes()?;
    if config.token_ttl_secs == 0 {
        return Err(ConfigError::Parse("token_ttl_secs must be positive".to_string()));
    }
    if config.token_ttl_secs > MAX_TOKEN_TTL_SECS {
        return Err(ConfigError::Parse(format!(
            "token_ttl_secs must be at most {MAX_TOKEN_TTL_SECS}"
        )));
    }
    if config.request_timeout_secs == Some(0) {
        return Err(ConfigError::Parse(
            "request_timeout_secs must be positive".to_string(),
        ));
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use keeper_types::config::Backend;
    use tempfile::TempDir;

    const KEY_HEX: &str = "000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f";

    fn valid() -> String {
        format!(
            r#"
backend = "relational"
connection = "sqlite://keeper.db?mode=rwc"
signing_key = "{KEY_HEX}"
cipher_key = "{KEY_HEX}"
request_timeout_secs = 30
"#
        )
    }

    #[tokio::test]
    async fn load_config_valid_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("keeper.toml");
        tokio::fs::write(&path, valid()).await.unwrap();

        let config = load_config(&path).await.unwrap();
        assert_eq!(config.backend, Backend::Relational);
        assert_eq!(config.request_timeout_secs, Some(30));
        assert_eq!(config.cipher_key_bytes().unwrap()[1], 0x01);
    }

    #[tokio::test]
    async fn load_config_missing_file_is_error() {
        let tmp = TempDir::new().unwrap();
        let err = load_config(&tmp.path().join("absent.toml")).await.unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[tokio::test]
    async fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("keeper.toml");
        tokio::fs::write(&path, "this is not { valid toml !!!")
            .await
            .unwrap();

        let err = load_config(&path).await.unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn parse_config_rejects_short_key() {
        let content = valid().replace(
            &format!("cipher_key = \"{KEY_HEX}\""),
            "cipher_key = \"abcd\"",
        );
        let err = parse_config(&content).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidKey { field: "cipher_key", .. }));
        assert!(!err.to_string().contains("abcd"));
    }

    #[test]
    fn parse_config_rejects_zero_ttl() {
        let content = format!("{}\ntoken_ttl_secs = 0\n", valid());
        assert!(matches!(parse_config(&content), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn parse_config_bounds_ttl() {
        let year = format!("{}\ntoken_ttl_secs = {MAX_TOKEN_TTL_SECS}\n", valid());
        assert_eq!(parse_config(&year).unwrap().token_ttl_secs, MAX_TOKEN_TTL_SECS);

        for ttl in [MAX_TOKEN_TTL_SECS + 1, 10_000_000_000_000] {
            let content = format!("{}\ntoken_ttl_secs = {ttl}\n", valid());
            assert!(matches!(parse_config(&content), Err(ConfigError::Parse(_))), "ttl {ttl}");
        }
    }

    #[test]
    fn parse_config_requires_keys() {
        let err = parse_config("backend = \"memory\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
