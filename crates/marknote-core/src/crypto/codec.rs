//! Encrypted-content codec.
//!
//! Wire format (base64, standard alphabet, padded):
//! `[21 bytes: "MARKNOTE_ENCRYPTED_V1"][16 bytes: salt][12 bytes: nonce][N bytes: ciphertext + 16-byte tag]`
//!
//! The plaintext is the JSON object `{"content": .., "metadata": ..}`. The
//! marker is also passed as AES-GCM associated data.

use aes_gcm::aead::{Aead, KeyInit, Payload};
use aes_gcm::{Aes256Gcm, Nonce};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use super::key::{derive_key, DEFAULT_ITERATIONS};
use crate::error::{MarkNoteError, Result};
use crate::notes::Metadata;

/// Format marker prefixed to every blob.
pub const MARKER: &[u8] = b"MARKNOTE_ENCRYPTED_V1";

/// Salt length in bytes.
pub const SALT_LEN: usize = 16;

/// AES-GCM nonce length in bytes.
pub const NONCE_LEN: usize = 12;

/// AES-GCM authentication tag length in bytes.
pub const TAG_LEN: usize = 16;

const HEADER_LEN: usize = MARKER.len() + SALT_LEN + NONCE_LEN;

/// Decrypted note body plus the metadata sealed alongside it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncryptedPayload {
    pub content: String,
    pub metadata: Metadata,
}

fn random_bytes<const N: usize>() -> Result<[u8; N]> {
    let mut buf = [0u8; N];
    getrandom::getrandom(&mut buf)
        .map_err(|e| MarkNoteError::Encryption(format!("Random number generator failed: {}", e)))?;
    Ok(buf)
}

fn cipher_for(password: &str, salt: &[u8]) -> Result<Aes256Gcm> {
    let key = derive_key(password, salt, DEFAULT_ITERATIONS)?;
    Aes256Gcm::new_from_slice(key.as_bytes())
        .map_err(|e| MarkNoteError::Encryption(format!("Invalid key: {}", e)))
}

/// Encrypt a note body and its metadata under `password`.
///
/// A fresh salt and nonce are drawn for every call, so encrypting the same
/// input twice yields different blobs.
pub fn encrypt_content(content: &str, password: &str, metadata: &Metadata) -> Result<String> {
    let salt: [u8; SALT_LEN] = random_bytes()?;
    let nonce: [u8; NONCE_LEN] = random_bytes()?;

    let payload = EncryptedPayload {
        content: content.to_string(),
        metadata: metadata.clone(),
    };
    let plaintext = Zeroizing::new(
        serde_json::to_vec(&payload)
            .map_err(|e| MarkNoteError::Encryption(format!("Failed to serialize payload: {}", e)))?,
    );

    let cipher = cipher_for(password, &salt).map_err(|e| match e {
        MarkNoteError::Encryption(_) => e,
        other => MarkNoteError::Encryption(other.to_string()),
    })?;
    let ciphertext = cipher
        .encrypt(
            Nonce::from_slice(&nonce),
            Payload {
                msg: plaintext.as_slice(),
                aad: MARKER,
            },
        )
        .map_err(|e| MarkNoteError::Encryption(format!("Cipher failure: {}", e)))?;

    let mut blob = Vec::with_capacity(HEADER_LEN + ciphertext.len());
    blob.extend_from_slice(MARKER);
    blob.extend_from_slice(&salt);
    blob.extend_from_slice(&nonce);
    blob.extend_from_slice(&ciphertext);

    tracing::debug!(bytes = blob.len(), "encrypted note content");
    Ok(STANDARD.encode(blob))
}

/// Decode the base64 text and check the frame, without touching the cipher.
fn decode_frame(text: &str) -> Result<Vec<u8>> {
    let raw = STANDARD
        .decode(text.trim())
        .map_err(|_| MarkNoteError::MalformedCiphertext("not valid base64".to_string()))?;

    if !raw.starts_with(MARKER) {
        return Err(MarkNoteError::MalformedCiphertext(
            "missing MarkNote encryption marker".to_string(),
        ));
    }

    if raw.len() < HEADER_LEN + TAG_LEN {
        return Err(MarkNoteError::MalformedCiphertext(format!(
            "truncated payload ({} bytes)",
            raw.len()
        )));
    }

    Ok(raw)
}

/// Decrypt a blob produced by [`encrypt_content`].
///
/// # Errors
///
/// - [`MarkNoteError::MalformedCiphertext`] when the text is not base64, lacks
///   the marker, is truncated, or decrypts to something other than a payload
/// - [`MarkNoteError::IncorrectPassword`] when the authentication tag does not verify
pub fn decrypt_content(blob: &str, password: &str) -> Result<EncryptedPayload> {
    let raw = decode_frame(blob)?;

    let salt = &raw[MARKER.len()..MARKER.len() + SALT_LEN];
    let nonce = &raw[MARKER.len() + SALT_LEN..HEADER_LEN];
    let ciphertext = &raw[HEADER_LEN..];

    let cipher = cipher_for(password, salt)?;
    let plaintext = Zeroizing::new(
        cipher
            .decrypt(
                Nonce::from_slice(nonce),
                Payload {
                    msg: ciphertext,
                    aad: MARKER,
                },
            )
            .map_err(|_| MarkNoteError::IncorrectPassword)?,
    );

    serde_json::from_slice(plaintext.as_slice()).map_err(|e| {
        MarkNoteError::MalformedCiphertext(format!("decrypted payload is not valid: {}", e))
    })
}

/// Whether `text` looks like a MarkNote encrypted blob.
///
/// Structural check only (base64 plus marker prefix); never errors.
pub fn is_encrypted(text: &str) -> bool {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return false;
    }
    STANDARD
        .decode(trimmed)
        .map(|raw| raw.starts_with(MARKER))
        .unwrap_or(false)
}

/// Re-encrypt a blob under a new password, keeping content and metadata.
///
/// The new blob has a fresh salt and nonce. Nothing is persisted here.
pub fn change_password(blob: &str, old_password: &str, new_password: &str) -> Result<String> {
    let payload = decrypt_content(blob, old_password)?;
    encrypt_content(&payload.content, new_password, &payload.metadata)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn metadata() -> Metadata {
        let mut m = Metadata::new();
        m.insert("title".to_string(), json!("Secret"));
        m
    }

    #[test]
    fn test_round_trip() {
        let blob = encrypt_content("hello", "correct-horse", &metadata()).unwrap();
        let payload = decrypt_content(&blob, "correct-horse").unwrap();
        assert_eq!(payload.content, "hello");
        assert_eq!(payload.metadata, metadata());
    }

    #[test]
    fn test_blob_layout() {
        let blob = encrypt_content("hello", "pw", &Metadata::new()).unwrap();
        let raw = STANDARD.decode(&blob).unwrap();
        assert!(raw.starts_with(MARKER));

        let plaintext_len = serde_json::to_vec(&EncryptedPayload {
            content: "hello".to_string(),
            metadata: Metadata::new(),
        })
        .unwrap()
        .len();
        assert_eq!(raw.len(), HEADER_LEN + plaintext_len + TAG_LEN);
    }

    #[test]
    fn test_trailing_newline_tolerated() {
        let blob = encrypt_content("body", "pw", &Metadata::new()).unwrap();
        let payload = decrypt_content(&format!("{}\n", blob), "pw").unwrap();
        assert_eq!(payload.content, "body");
        assert!(is_encrypted(&format!("{}\n", blob)));
    }

    #[test]
    fn test_wrong_password() {
        let blob = encrypt_content("hello", "correct-horse", &metadata()).unwrap();
        let err = decrypt_content(&blob, "wrong-password").unwrap_err();
        assert!(matches!(err, MarkNoteError::IncorrectPassword));
    }

    #[test]
    fn test_not_base64_is_malformed() {
        let err = decrypt_content("this is *not* base64!", "pw").unwrap_err();
        assert!(matches!(err, MarkNoteError::MalformedCiphertext(_)));
    }

    #[test]
    fn test_missing_marker_is_malformed() {
        let text = STANDARD.encode(b"SOMETHING_ELSE_ENTIRELY_AND_LONG_ENOUGH_TO_PASS_LENGTH_CHECKS");
        let err = decrypt_content(&text, "pw").unwrap_err();
        assert!(matches!(err, MarkNoteError::MalformedCiphertext(_)));
    }

    #[test]
    fn test_truncated_frame_is_malformed() {
        let mut raw = MARKER.to_vec();
        raw.extend_from_slice(&[0u8; SALT_LEN + NONCE_LEN + TAG_LEN - 1]);
        let err = decrypt_content(&STANDARD.encode(raw), "pw").unwrap_err();
        assert!(matches!(err, MarkNoteError::MalformedCiphertext(_)));
    }

    #[test]
    fn test_non_json_plaintext_is_malformed() {
        let salt = [1u8; SALT_LEN];
        let nonce = [2u8; NONCE_LEN];
        let cipher = cipher_for("pw", &salt).unwrap();
        let ciphertext = cipher
            .encrypt(
                Nonce::from_slice(&nonce),
                Payload {
                    msg: b"plain text, not json",
                    aad: MARKER,
                },
            )
            .unwrap();
        let mut raw = MARKER.to_vec();
        raw.extend_from_slice(&salt);
        raw.extend_from_slice(&nonce);
        raw.extend_from_slice(&ciphertext);

        let err = decrypt_content(&STANDARD.encode(raw), "pw").unwrap_err();
        assert!(matches!(err, MarkNoteError::MalformedCiphertext(_)));
    }

    #[test]
    fn test_is_encrypted_never_errors() {
        assert!(!is_encrypted(""));
        assert!(!is_encrypted("   "));
        assert!(!is_encrypted("# Heading\n\nplain markdown"));
        assert!(!is_encrypted(&STANDARD.encode("ordinary text")));
    }

    #[test]
    fn test_change_password_rotates() {
        let blob = encrypt_content("hello", "old-password", &metadata()).unwrap();
        let rotated = change_password(&blob, "old-password", "new-password").unwrap();

        assert_ne!(blob, rotated);
        assert!(matches!(
            decrypt_content(&rotated, "old-password").unwrap_err(),
            MarkNoteError::IncorrectPassword
        ));
        let payload = decrypt_content(&rotated, "new-password").unwrap();
        assert_eq!(payload.content, "hello");
        assert_eq!(payload.metadata, metadata());
    }

    #[test]
    fn test_change_password_wrong_old() {
        let blob = encrypt_content("hello", "old-password", &metadata()).unwrap();
        let err = change_password(&blob, "not-it", "new-password").unwrap_err();
        assert!(matches!(err, MarkNoteError::IncorrectPassword));
    }
}
