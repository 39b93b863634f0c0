//! Error types for MarkNote core operations.
//!
//! Errors are descriptive at the core level; the CLI layer maps them to
//! user-facing messages and exit codes. Callers that only need to branch on
//! the failure class should match on [`MarkNoteError::kind`].

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for MarkNote operations.
pub type Result<T> = std::result::Result<T, MarkNoteError>;

/// Coarse failure classes, for callers that pattern-match instead of
/// inspecting individual variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Failure on the encrypt path
    Encryption,
    /// Encrypted payload is not in the expected format
    Malformed,
    /// Authentication tag did not verify (wrong password or tampering)
    Password,
    /// Note, version, or history is missing
    NotFound,
    /// The requested operation conflicts with the current state
    Conflict,
    /// Invalid arguments supplied by the caller
    InvalidInput,
    /// Filesystem failure
    Io,
}

/// Core error type for MarkNote operations.
#[derive(Debug, Error)]
pub enum MarkNoteError {
    /// Encryption failed (RNG, cipher, or serialization fault)
    #[error("Encryption error: {0}")]
    Encryption(String),

    /// Payload is not a MarkNote encrypted blob, or decrypts to garbage
    #[error("Corrupted encrypted data: {0}")]
    MalformedCiphertext(String),

    /// AEAD tag verification failed
    #[error("Incorrect password or tampered data")]
    IncorrectPassword,

    /// Note could not be located
    #[error("Note not found: {0}")]
    NoteNotFound(String),

    /// A note already exists at the target path
    #[error("A note already exists at {}", .0.display())]
    NoteExists(PathBuf),

    /// Note body is already encrypted
    #[error("Note is already encrypted: {0}")]
    AlreadyEncrypted(String),

    /// Note body is not encrypted
    #[error("Note is not encrypted: {0}")]
    NotEncrypted(String),

    /// Version id is absent from the history, or its content is missing
    #[error("Version {version_id} not found (available: {})", format_available(.available))]
    VersionNotFound {
        version_id: String,
        available: Vec<String>,
    },

    /// Snapshot is stored in plaintext while the live note is encrypted
    #[error("Version {0} is stored unencrypted while the note is encrypted")]
    UnsealedVersion(String),

    /// Note has no saved versions
    #[error("No versions available for note {0}")]
    EmptyHistory(String),

    /// Writing restored content failed; the live file was rolled back
    #[error("Failed to restore {}: {source}", .path.display())]
    RestoreFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid user input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// I/O error
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// JSON serialization/deserialization error
    #[error("JSON error: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },

    /// YAML frontmatter serialization error
    #[error("Frontmatter error: {source}")]
    Yaml {
        #[from]
        source: serde_yaml::Error,
    },
}

impl MarkNoteError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            MarkNoteError::Encryption(_) => ErrorKind::Encryption,
            MarkNoteError::MalformedCiphertext(_) => ErrorKind::Malformed,
            MarkNoteError::IncorrectPassword => ErrorKind::Password,
            MarkNoteError::NoteNotFound(_)
            | MarkNoteError::VersionNotFound { .. }
            | MarkNoteError::EmptyHistory(_) => ErrorKind::NotFound,
            MarkNoteError::NoteExists(_)
            | MarkNoteError::AlreadyEncrypted(_)
            | MarkNoteError::NotEncrypted(_)
            | MarkNoteError::UnsealedVersion(_) => ErrorKind::Conflict,
            MarkNoteError::InvalidInput(_) => ErrorKind::InvalidInput,
            MarkNoteError::RestoreFailed { .. } | MarkNoteError::Io { .. } => ErrorKind::Io,
            MarkNoteError::Json { .. } | MarkNoteError::Yaml { .. } => ErrorKind::Malformed,
        }
    }

    /// Whether this is any kind of decryption failure (malformed or wrong password).
    pub fn is_decryption_failure(&self) -> bool {
        matches!(self.kind(), ErrorKind::Malformed | ErrorKind::Password)
    }
}

fn format_available(available: &[String]) -> String {
    if available.is_empty() {
        "none".to_string()
    } else {
        available.join(", ")
    }
}
