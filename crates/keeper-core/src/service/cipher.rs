//! FieldCipher trait for per-field symmetric encryption.
//!
//! Defined in keeper-core so services can seal item fields without coupling
//! to a specific cipher. The `AesGcmFieldCipher` adapter lives in keeper-infra.

use keeper_types::error::CipherError;
use keeper_types::item::Ciphertext;

/// Abstraction over authenticated symmetric encryption of a single field value.
///
/// Implementations must be randomized (encrypting the same plaintext twice
/// yields different ciphertexts) and must fail rather than return partial
/// plaintext when the input was tampered with or sealed under another key.
pub trait FieldCipher: Send + Sync {
    fn encrypt(&self, plaintext: &[u8]) -> Result<Ciphertext, CipherError>;

    fn decrypt(&self, ciphertext: &Ciphertext) -> Result<Vec<u8>, CipherError>;
}
