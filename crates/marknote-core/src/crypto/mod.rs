//! Cryptographic operations for MarkNote.
//!
//! Note bodies are sealed with password-based authenticated encryption:
//! - **PBKDF2-HMAC-SHA256** turns a password plus a per-blob random salt into a key
//! - **AES-256-GCM** encrypts and authenticates the JSON payload
//!
//! ## Security Model
//!
//! - Fresh salt and nonce for every encryption, including password changes
//! - The format marker is bound as associated data, so header tampering fails the tag check
//! - Derived keys are zeroized from memory on drop
//! - Passwords and keys are never persisted
//!
//! ## Threat Model
//!
//! We defend against:
//! - Theft of an encrypted note file
//! - Silent modification of ciphertext
//!
//! We do NOT defend against:
//! - Compromised OS / keylogger
//! - Metadata leakage through the note's plaintext frontmatter

pub mod codec;
pub mod key;
pub mod password;

pub use codec::{
    change_password, decrypt_content, encrypt_content, is_encrypted, EncryptedPayload, MARKER,
    NONCE_LEN, SALT_LEN, TAG_LEN,
};
pub use key::{derive_key, DerivedKey, DEFAULT_ITERATIONS};
pub use password::validate_password;
