//! Vault items and their sealed (at-rest) form.
//!
//! Plaintext items (`Credential`, `Card`, `Text`) only exist between the
//! caller and the vault service. Everything that reaches a store is a
//! `SealedItem` whose sensitive fields are `Ciphertext`. Item names are the
//! lookup key and are never encrypted.

use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

/// Maximum length of an item name.
pub const MAX_NAME_LEN: usize = 50;

/// The three kinds of vault items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Credential,
    Card,
    Text,
}

impl ItemKind {
    pub const ALL: [ItemKind; 3] = [ItemKind::Credential, ItemKind::Card, ItemKind::Text];

    pub fn as_str(&self) -> &'static str {
        match self {
            ItemKind::Credential => "credential",
            ItemKind::Card => "card",
            ItemKind::Text => "text",
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ItemKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "credential" => Ok(ItemKind::Credential),
            "card" => Ok(ItemKind::Card),
            "text" => Ok(ItemKind::Text),
            other => Err(format!("invalid item kind: '{other}'")),
        }
    }
}

/// A stored login/password pair.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    pub name: String,
    pub login: String,
    pub secret: String,
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("name", &self.name)
            .field("login", &"***")
            .field("secret", &"***")
            .finish()
    }
}

/// A stored payment card.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub name: String,
    pub number: String,
    pub holder: String,
    /// Expiration date in `MM/YY` form.
    pub expiry: String,
    pub cvv: u16,
}

impl fmt::Debug for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Card")
            .field("name", &self.name)
            .field("number", &"***")
            .field("holder", &"***")
            .field("expiry", &"***")
            .field("cvv", &"***")
            .finish()
    }
}

/// A stored free-text note.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Text {
    pub name: String,
    pub body: String,
}

impl fmt::Debug for Text {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Text")
            .field("name", &self.name)
            .field("body", &"***")
            .finish()
    }
}

/// Opaque output of the field cipher.
#[derive(Clone, PartialEq, Eq)]
pub struct Ciphertext(Vec<u8>);

impl Ciphertext {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

impl fmt::Debug for Ciphertext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ciphertext({} bytes)", self.0.len())
    }
}

impl From<Vec<u8>> for Ciphertext {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

/// At-rest form of a vault item: every sensitive field is ciphertext.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SealedItem {
    Credential {
        name: String,
        login: Ciphertext,
        secret: Ciphertext,
    },
    Card {
        name: String,
        number: Ciphertext,
        holder: Ciphertext,
        expiry: Ciphertext,
        cvv: Ciphertext,
    },
    Text {
        name: String,
        body: Ciphertext,
    },
}

impl SealedItem {
    pub fn kind(&self) -> ItemKind {
        match self {
            SealedItem::Credential { .. } => ItemKind::Credential,
            SealedItem::Card { .. } => ItemKind::Card,
            SealedItem::Text { .. } => ItemKind::Text,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            SealedItem::Credential { name, .. }
            | SealedItem::Card { name, .. }
            | SealedItem::Text { name, .. } => name,
        }
    }
}

/// Names of every item an owner holds, grouped by kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncSnapshot {
    pub credentials: Vec<String>,
    pub cards: Vec<String>,
    pub texts: Vec<String>,
}
