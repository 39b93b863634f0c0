//! CLI error types for structured error handling.
//!
//! Core errors are mapped to a `CliError` at the top level so every failure
//! class gets a distinct message, hint and exit code.

use std::fmt;

use marknote_core::{ErrorKind, MarkNoteError};

/// CLI-specific errors with associated exit codes.
#[derive(Debug)]
pub enum CliError {
    /// Note, version, or history not found
    NotFound {
        message: String,
        hint: Option<String>,
    },

    /// Wrong password
    AuthFailed {
        message: String,
        hint: Option<String>,
    },

    /// Encrypted content could not be parsed
    Corrupted {
        message: String,
        hint: Option<String>,
    },

    /// Invalid user input or conflicting state
    InvalidInput {
        message: String,
        hint: Option<String>,
    },

    /// Filesystem or encryption failure
    OperationFailed {
        message: String,
        hint: Option<String>,
    },
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for CliError {}

impl CliError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        CliError::InvalidInput {
            message: message.into(),
            hint: None,
        }
    }

    /// Map a core error to a CLI error with a user-facing message.
    pub fn from_core(err: &MarkNoteError) -> Self {
        let message = err.to_string();
        match err.kind() {
            ErrorKind::NotFound => {
                let hint = match err {
                    MarkNoteError::NoteNotFound(_) => {
                        "Run `marknote list --all` to see note titles."
                    }
                    _ => "Run `marknote versions list <TITLE>` to see version ids.",
                };
                CliError::NotFound {
                    message,
                    hint: Some(hint.to_string()),
                }
            }
            ErrorKind::Password => CliError::AuthFailed {
                message: "Incorrect password (or the note was modified)".to_string(),
                hint: Some("Check the password, or set MARKNOTE_PASSWORD.".to_string()),
            },
            ErrorKind::Malformed => CliError::Corrupted {
                message,
                hint: Some(
                    "The note body is not a valid MarkNote encrypted payload. Restore it from version history if available."
                        .to_string(),
                ),
            },
            ErrorKind::Conflict => {
                let hint = match err {
                    MarkNoteError::NotEncrypted(_) => Some("Nothing to decrypt."),
                    MarkNoteError::AlreadyEncrypted(_) | MarkNoteError::UnsealedVersion(_) => {
                        Some("Decrypt the note first with `marknote decrypt <TITLE>`.")
                    }
                    _ => None,
                };
                CliError::InvalidInput {
                    message,
                    hint: hint.map(str::to_string),
                }
            }
            ErrorKind::InvalidInput => CliError::InvalidInput {
                message,
                hint: None,
            },
            ErrorKind::Io => CliError::OperationFailed {
                message,
                hint: Some("Check that the notes and versions directories are writable.".to_string()),
            },
            ErrorKind::Encryption => CliError::OperationFailed {
                message,
                hint: None,
            },
        }
    }

    pub fn message(&self) -> &str {
        match self {
            CliError::NotFound { message, .. }
            | CliError::AuthFailed { message, .. }
            | CliError::Corrupted { message, .. }
            | CliError::InvalidInput { message, .. }
            | CliError::OperationFailed { message, .. } => message,
        }
    }

    pub fn hint(&self) -> Option<&str> {
        match self {
            CliError::NotFound { hint, .. }
            | CliError::AuthFailed { hint, .. }
            | CliError::Corrupted { hint, .. }
            | CliError::InvalidInput { hint, .. }
            | CliError::OperationFailed { hint, .. } => hint.as_deref(),
        }
    }

    /// Get the exit code for this error.
    pub fn exit_code(&self) -> i32 {
        use super::constants::exit_codes;
        match self {
            CliError::NotFound { .. } => exit_codes::NOT_FOUND,
            CliError::AuthFailed { .. } => exit_codes::AUTH_FAILED,
            CliError::Corrupted { .. } => exit_codes::CORRUPTED,
            CliError::InvalidInput { .. } => exit_codes::INVALID_INPUT,
            CliError::OperationFailed { .. } => exit_codes::OPERATION_FAILED,
        }
    }
}
