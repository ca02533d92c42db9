use thiserror::Error;

/// Tagged outcome returned to callers of every vault operation.
///
/// Messages never include ciphertext, key material, or another user's data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VaultError {
    #[error("unauthenticated: {0}")]
    Unauthenticated(String),

    #[error("session expired")]
    Expired,

    #[error("invalid login or password")]
    InvalidCredentials,

    #[error("{0} not found")]
    NotFound(String),

    #[error("{0} already exists")]
    AlreadyExists(String),

    #[error("stored data failed integrity check")]
    IntegrityError,

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("storage unavailable: {0}")]
    Unavailable(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl VaultError {
    /// Stable machine-readable outcome code.
    pub fn code(&self) -> &'static str {
        match self {
            VaultError::Unauthenticated(_) => "UNAUTHENTICATED",
            VaultError::Expired => "EXPIRED",
            VaultError::InvalidCredentials => "INVALID_CREDENTIALS",
            VaultError::NotFound(_) => "NOT_FOUND",
            VaultError::AlreadyExists(_) => "ALREADY_EXISTS",
            VaultError::IntegrityError => "INTEGRITY_ERROR",
            VaultError::InvalidArgument(_) => "INVALID_ARGUMENT",
            VaultError::Unavailable(_) => "UNAVAILABLE",
            VaultError::Internal(_) => "INTERNAL",
        }
    }
}

/// Errors from vault store operations (used by the `VaultStore` port in keeper-core).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("entity not found")]
    NotFound,

    #[error("entity already exists")]
    AlreadyExists,

    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("store error: {0}")]
    Internal(String),
}

impl StoreError {
    /// Convert into a caller-facing error naming the affected entity.
    pub fn into_vault_error(self, subject: impl std::fmt::Display) -> VaultError {
        match self {
            StoreError::NotFound => VaultError::NotFound(subject.to_string()),
            StoreError::AlreadyExists => VaultError::AlreadyExists(subject.to_string()),
            StoreError::Unavailable(msg) => VaultError::Unavailable(msg),
            StoreError::Internal(msg) => VaultError::Internal(msg),
        }
    }
}

impl From<StoreError> for VaultError {
    fn from(e: StoreError) -> Self {
        e.into_vault_error("entity")
    }
}

/// Errors from field encryption.
///
/// IMPORTANT: These errors never include plaintext, key material, or ciphertext
/// in their Display/Debug output to prevent accidental logging of secrets.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CipherError {
    #[error("encryption failed")]
    EncryptionFailed,

    #[error("decryption failed")]
    DecryptionFailed,

    #[error("invalid ciphertext: too short")]
    CiphertextTooShort,
}

impl From<CipherError> for VaultError {
    fn from(e: CipherError) -> Self {
        match e {
            CipherError::EncryptionFailed => VaultError::Internal(e.to_string()),
            CipherError::DecryptionFailed | CipherError::CiphertextTooShort => {
                VaultError::IntegrityError
            }
        }
    }
}

/// Errors from session token issuance and validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("invalid token")]
    InvalidToken,

    #[error("token expired")]
    Expired,

    #[error("token signing failed: {0}")]
    Signing(String),
}

impl From<SessionError> for VaultError {
    fn from(e: SessionError) -> Self {
        match e {
            SessionError::InvalidToken => VaultError::Unauthenticated("invalid token".to_string()),
            SessionError::Expired => VaultError::Expired,
            SessionError::Signing(msg) => VaultError::Internal(msg),
        }
    }
}

/// Errors from loading or decoding configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {reason}")]
    Read { path: String, reason: String },

    #[error("failed to parse config: {0}")]
    Parse(String),

    #[error("invalid {field}: {reason}")]
    InvalidKey { field: &'static str, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vault_error_codes_are_stable() {
        assert_eq!(VaultError::Expired.code(), "EXPIRED");
        assert_eq!(VaultError::IntegrityError.code(), "INTEGRITY_ERROR");
        assert_eq!(
            VaultError::AlreadyExists("card 'visa'".into()).code(),
            "ALREADY_EXISTS"
        );
    }

    #[test]
    fn test_store_error_carries_subject() {
        let err = StoreError::NotFound.into_vault_error("credential 'email'");
        assert_eq!(err.to_string(), "credential 'email' not found");
    }

    #[test]
    fn test_cipher_decrypt_failure_is_integrity_error() {
        assert_eq!(
            VaultError::from(CipherError::DecryptionFailed),
            VaultError::IntegrityError
        );
        assert_eq!(
            VaultError::from(CipherError::CiphertextTooShort),
            VaultError::IntegrityError
        );
        assert!(matches!(
            VaultError::from(CipherError::EncryptionFailed),
            VaultError::Internal(_)
        ));
    }

    #[test]
    fn test_session_errors_map_to_auth_outcomes() {
        assert_eq!(
            VaultError::from(SessionError::InvalidToken).code(),
            "UNAUTHENTICATED"
        );
        assert_eq!(VaultError::from(SessionError::Expired), VaultError::Expired);
    }
}
