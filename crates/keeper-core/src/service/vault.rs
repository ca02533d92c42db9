//! Vault orchestration: field encryption bound to store operations.
//!
//! `VaultService` owns no state. Writes seal every sensitive field on its own
//! and hand the sealed item to the store; reads fetch and open each field.
//! Duplicate detection is left entirely to the store.

use std::sync::Arc;

use futures_util::future::try_join3;

use keeper_types::error::VaultError;
use keeper_types::identity::Identity;
use keeper_types::item::{Card, Ciphertext, Credential, ItemKind, SealedItem, SyncSnapshot, Text};

use crate::repository::store::VaultStore;
use crate::service::checks;
use crate::service::cipher::FieldCipher;

pub struct VaultService<S: VaultStore, C: FieldCipher> {
    store: Arc<S>,
    cipher: Arc<C>,
}

impl<S: VaultStore, C: FieldCipher> VaultService<S, C> {
    pub fn new(store: Arc<S>, cipher: Arc<C>) -> Self {
        Self { store, cipher }
    }

    pub async fn send_credential(&self, owner: &Identity, credential: Credential) -> Result<(), VaultError> {
        checks::validate_name(&credential.name)?;

        let sealed = SealedItem::Credential {
            login: self.seal(&credential.login)?,
            secret: self.seal(&credential.secret)?,
            name: credential.name,
        };
        self.create(owner, sealed).await
    }

    pub async fn get_credential(&self, owner: &Identity, name: &str) -> Result<Credential, VaultError> {
        match self.fetch(owner, ItemKind::Credential, name).await? {
            SealedItem::Credential {
                name,
                login,
                secret,
            } => Ok(Credential {
                name,
                login: self.open(&login)?,
                secret: self.open(&secret)?,
            }),
            other => Err(kind_mismatch(ItemKind::Credential, &other)),
        }
    }

    /// Validates number, expiry and CVV before anything is encrypted.
    pub async fn send_card(&self, owner: &Identity, card: Card) -> Result<(), VaultError> {
        checks::validate_card(&card)?;

        let sealed = SealedItem::Card {
            number: self.seal(&card.number)?,
            holder: self.seal(&card.holder)?,
            expiry: self.seal(&card.expiry)?,
            cvv: self.seal(&card.cvv.to_string())?,
            name: card.name,
        };
        self.create(owner, sealed).await
    }

    pub async fn get_card(&self, owner: &Identity, name: &str) -> Result<Card, VaultError> {
        match self.fetch(owner, ItemKind::Card, name).await? {
            SealedItem::Card {
                name,
                number,
                holder,
                expiry,
                cvv,
            } => {
                let cvv = self
                    .open(&cvv)?
                    .parse::<u16>()
                    .map_err(|_| VaultError::IntegrityError)?;
                Ok(Card {
                    name,
                    number: self.open(&number)?,
                    holder: self.open(&holder)?,
                    expiry: self.open(&expiry)?,
                    cvv,
                })
            }
            other => Err(kind_mismatch(ItemKind::Card, &other)),
        }
    }

    pub async fn send_text(&self, owner: &Identity, text: Text) -> Result<(), VaultError> {
        checks::validate_name(&text.name)?;

        let sealed = SealedItem::Text {
            body: self.seal(&text.body)?,
            name: text.name,
        };
        self.create(owner, sealed).await
    }

    pub async fn get_text(&self, owner: &Identity, name: &str) -> Result<Text, VaultError> {
        match self.fetch(owner, ItemKind::Text, name).await? {
            SealedItem::Text { name, body } => Ok(Text {
                name,
                body: self.open(&body)?,
            }),
            other => Err(kind_mismatch(ItemKind::Text, &other)),
        }
    }

    /// Names of every item the owner holds, sorted per kind.
    ///
    /// All three listings must succeed; the first failure is returned and no
    /// partial snapshot is produced.
    pub async fn synchronize(&self, owner: &Identity) -> Result<SyncSnapshot, VaultError> {
        let (mut credentials, mut cards, mut texts) = try_join3(
            self.store.list(owner, ItemKind::Credential),
            self.store.list(owner, ItemKind::Card),
            self.store.list(owner, ItemKind::Text),
        )
        .await?;

        credentials.sort();
        cards.sort();
        texts.sort();

        Ok(SyncSnapshot {
            credentials,
            cards,
            texts,
        })
    }

    async fn create(&self, owner: &Identity, item: SealedItem) -> Result<(), VaultError> {
        let subject = format!("{} '{}'", item.kind(), item.name());
        self.store
            .create(owner, item)
            .await
            .map_err(|e| e.into_vault_error(subject))?;
        tracing::debug!(owner = %owner, "stored vault item");
        Ok(())
    }

    async fn fetch(&self, owner: &Identity, kind: ItemKind, name: &str) -> Result<SealedItem, VaultError> {
        self.store
            .get(owner, kind, name)
            .await
            .map_err(|e| e.into_vault_error(format!("{kind} '{name}'")))
    }

    fn seal(&self, value: &str) -> Result<Ciphertext, VaultError> {
        Ok(self.cipher.encrypt(value.as_bytes())?)
    }

    /// Decrypt a field read back from the store. Anything that fails to
    /// decrypt or is not UTF-8 was not written by us.
    fn open(&self, value: &Ciphertext) -> Result<String, VaultError> {
        let bytes = self.cipher.decrypt(value)?;
        String::from_utf8(bytes).map_err(|_| VaultError::IntegrityError)
    }
}

fn kind_mismatch(expected: ItemKind, got: &SealedItem) -> VaultError {
    VaultError::Internal(format!(
        "store returned a {} for a {expected} lookup",
        got.kind()
    ))
}
