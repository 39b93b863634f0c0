//! Password policy for newly chosen note passwords.
//!
//! Only applied when a password is set or rotated. Existing blobs are always
//! decryptable with whatever password sealed them.

use crate::error::{MarkNoteError, Result};

/// Minimum password length in characters.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Validate that a new password is non-blank and at least 8 characters.
///
/// ```
/// use marknote_core::crypto::validate_password;
///
/// assert!(validate_password("correct-horse").is_ok());
/// assert!(validate_password("short").is_err());
/// ```
pub fn validate_password(password: &str) -> Result<()> {
    if password.trim().is_empty() {
        return Err(MarkNoteError::InvalidInput(
            "Password cannot be empty".to_string(),
        ));
    }

    let length = password.chars().count();
    if length < MIN_PASSWORD_LENGTH {
        return Err(MarkNoteError::InvalidInput(format!(
            "Password must be at least {} characters (got {})",
            MIN_PASSWORD_LENGTH, length
        )));
    }

    Ok(())
}
