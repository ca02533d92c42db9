use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

use crate::error::VaultError;

/// Maximum length of a login, matching the `users.login` column width.
pub const MAX_LOGIN_LEN: usize = 50;

/// A registered login uniquely naming a vault owner.
///
/// Always non-empty and at most [`MAX_LOGIN_LEN`] characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Identity(String);

impl Identity {
    /// Validate and wrap a login string.
    pub fn new(login: impl Into<String>) -> Result<Self, VaultError> {
        let login = login.into();
        let trimmed = login.trim();
        if trimmed.is_empty() {
            return Err(VaultError::InvalidArgument("login must not be empty".to_string()));
        }
        if trimmed.chars().count() > MAX_LOGIN_LEN {
            return Err(VaultError::InvalidArgument(format!(
                "login must be at most {MAX_LOGIN_LEN} characters"
            )));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Identity {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for Identity {
    type Err = VaultError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Identity {
    type Error = VaultError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<Identity> for String {
    fn from(id: Identity) -> Self {
        id.0
    }
}
