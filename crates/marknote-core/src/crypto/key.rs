//! Key derivation using PBKDF2-HMAC-SHA256.
//!
//! Every encrypted blob carries its own random salt, so the same password
//! yields a different key per blob.

use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;
use zeroize::ZeroizeOnDrop;

use crate::error::{MarkNoteError, Result};

/// PBKDF2 iteration count used for all newly written blobs.
pub const DEFAULT_ITERATIONS: u32 = 100_000;

/// Length of derived key in bytes (AES-256).
pub const KEY_LENGTH: usize = 32;

/// Shortest salt accepted by [`derive_key`].
const MIN_SALT_LENGTH: usize = 16;

/// A cryptographic key derived from a password.
///
/// Key material is zeroized from memory when dropped.
#[derive(Clone, ZeroizeOnDrop)]
pub struct DerivedKey {
    key: [u8; KEY_LENGTH],
}

impl DerivedKey {
    /// Raw key bytes. Use only for immediate cipher construction.
    pub fn as_bytes(&self) -> &[u8; KEY_LENGTH] {
        &self.key
    }
}

impl std::fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DerivedKey")
            .field("key", &"[REDACTED]")
            .finish()
    }
}

/// Derive a 32-byte key from a password and salt.
///
/// Deterministic: the same password, salt and iteration count always give the
/// same key. Empty passwords are accepted here; password policy lives in
/// [`crate::crypto::validate_password`].
///
/// # Examples
///
/// ```
/// use marknote_core::crypto::derive_key;
///
/// let salt = [7u8; 16];
/// let key = derive_key("correct-horse", &salt, 1_000).unwrap();
/// assert_eq!(key.as_bytes().len(), 32);
/// ```
pub fn derive_key(password: &str, salt: &[u8], iterations: u32) -> Result<DerivedKey> {
    if iterations == 0 {
        return Err(MarkNoteError::InvalidInput(
            "Iteration count must be positive".to_string(),
        ));
    }

    if salt.len() < MIN_SALT_LENGTH {
        return Err(MarkNoteError::InvalidInput(format!(
            "Salt must be at least {} bytes",
            MIN_SALT_LENGTH
        )));
    }

    let mut key = [0u8; KEY_LENGTH];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, iterations, &mut key);

    Ok(DerivedKey { key })
}
