//! AES-256-GCM field cipher.
//!
//! Encrypted format: `nonce (12 bytes) || ciphertext+tag`
//!
//! SECURITY: Errors never contain plaintext, key material or ciphertext.

use aes_gcm::aead::{Aead, KeyInit, OsRng};
use aes_gcm::{AeadCore, Aes256Gcm, Nonce};

use keeper_core::service::cipher::FieldCipher;
use keeper_types::config::KEY_LEN;
use keeper_types::error::CipherError;
use keeper_types::item::Ciphertext;

/// Nonce size for AES-256-GCM (96 bits / 12 bytes).
const NONCE_SIZE: usize = 12;

/// AES-256-GCM encryption of individual field values.
///
/// Each call generates a random 12-byte nonce, prepended to the ciphertext,
/// so encrypting the same plaintext twice produces different output.
pub struct AesGcmFieldCipher {
    cipher: Aes256Gcm,
}

impl AesGcmFieldCipher {
    pub fn new(key: &[u8; KEY_LEN]) -> Self {
        Self {
            cipher: Aes256Gcm::new(key.into()),
        }
    }
}

impl FieldCipher for AesGcmFieldCipher {
    fn encrypt(&self, plaintext: &[u8]) -> Result<Ciphertext, CipherError> {
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
        let sealed = self
            .cipher
            .encrypt(&nonce, plaintext)
            .map_err(|_| CipherError::EncryptionFailed)?;

        let mut out = Vec::with_capacity(NONCE_SIZE + sealed.len());
        out.extend_from_slice(&nonce);
        out.extend_from_slice(&sealed);
        Ok(Ciphertext::new(out))
    }

    fn decrypt(&self, ciphertext: &Ciphertext) -> Result<Vec<u8>, CipherError> {
        let data = ciphertext.as_bytes();
        if data.len() < NONCE_SIZE {
            return Err(CipherError::CiphertextTooShort);
        }

        let (nonce_bytes, sealed) = data.split_at(NONCE_SIZE);
        self.cipher
            .decrypt(Nonce::from_slice(nonce_bytes), sealed)
            .map_err(|_| CipherError::DecryptionFailed)
    }
}
