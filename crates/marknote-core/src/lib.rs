//! # MarkNote Core
//!
//! Core library for MarkNote - a local, CLI-first Markdown note manager with
//! password-based note encryption and per-note version history.
//!
//! This crate provides the domain logic independent of the CLI interface.
//!
//! ## Architecture
//!
//! - **crypto**: Key derivation, the encrypted-content codec, password rotation
//! - **versioning**: Append-only version store, line diffs, restore with rollback
//! - **notes**: Note model, YAML frontmatter, and the filesystem note manager
//! - **fs**: Atomic write/rename helpers and transient backup guards

pub mod crypto;
pub mod error;
pub mod fs;
pub mod notes;
pub mod versioning;

pub use error::{ErrorKind, MarkNoteError, Result};
pub use notes::{Metadata, Note, NoteManager, NotesSettings};
pub use versioning::{FileVersionStore, VersionStore};

/// Core version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
