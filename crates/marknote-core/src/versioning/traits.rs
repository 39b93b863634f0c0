//! Version store trait definition.
//!
//! The `VersionStore` trait is the seam between the note manager and the
//! place snapshots live. The default methods build diff, latest and restore
//! on top of the required primitives, so a backend only has to implement
//! storage.

use std::path::Path;

use super::diff::{diff_lines, DiffLine};
use super::restore::restore_file;
use super::types::VersionRecord;
use crate::error::{MarkNoteError, Result};

/// Append-only per-note snapshot storage.
///
/// Implementations must ensure:
/// - Version ids are unique within a note and sort in creation order
/// - Timestamps within a history never decrease
/// - A history is created lazily on first save
/// - Rewriting a snapshot's content leaves its record untouched
pub trait VersionStore {
    /// Record a new snapshot of `content` and return its version id.
    ///
    /// `author` defaults to `"Unknown"` and `message` to `"Update note"`.
    ///
    /// # Errors
    ///
    /// Returns `MarkNoteError::Io` if the snapshot or index cannot be written.
    fn save_version(
        &self,
        note_id: &str,
        content: &str,
        title: &str,
        author: Option<&str>,
        message: Option<&str>,
    ) -> Result<String>;

    /// All snapshots of a note, oldest first. Empty when none were saved.
    fn get_version_history(&self, note_id: &str) -> Result<Vec<VersionRecord>>;

    /// Content and record of one snapshot.
    ///
    /// # Errors
    ///
    /// Returns `MarkNoteError::VersionNotFound` if the id is not in the
    /// history or its content is missing.
    fn get_version_content(&self, note_id: &str, version_id: &str)
        -> Result<(String, VersionRecord)>;

    /// Overwrite the stored content of an existing snapshot.
    ///
    /// Used when a note is encrypted, decrypted or re-keyed so its history
    /// carries the same protection as the live file.
    ///
    /// # Errors
    ///
    /// Returns `MarkNoteError::VersionNotFound` if the id is not in the history.
    fn replace_version_content(&self, note_id: &str, version_id: &str, content: &str)
        -> Result<()>;

    /// Delete every snapshot of a note. Returns how many were removed.
    fn purge_history(&self, note_id: &str) -> Result<usize>;

    /// Most recent snapshot, if any.
    fn get_latest_version(&self, note_id: &str) -> Result<Option<VersionRecord>> {
        Ok(self.get_version_history(note_id)?.pop())
    }

    /// Line diff from `old_version` to `new_version` (latest when `None`).
    ///
    /// # Errors
    ///
    /// Returns `MarkNoteError::EmptyHistory` when `new_version` is `None` and
    /// the note has no snapshots, or `VersionNotFound` for unknown ids.
    fn compare_versions(
        &self,
        note_id: &str,
        old_version: &str,
        new_version: Option<&str>,
    ) -> Result<Vec<DiffLine>> {
        let new_id = match new_version {
            Some(id) => id.to_string(),
            None => self
                .get_latest_version(note_id)?
                .map(|v| v.version_id)
                .ok_or_else(|| MarkNoteError::EmptyHistory(note_id.to_string()))?,
        };

        let (old_content, _) = self.get_version_content(note_id, old_version)?;
        let (new_content, _) = self.get_version_content(note_id, &new_id)?;

        Ok(diff_lines(&old_content, &new_content))
    }

    /// Overwrite `note_path` with the content of `version_id`.
    ///
    /// A missing version fails before the live file is touched. A failed
    /// write leaves the live file as it was.
    fn restore_version(&self, note_id: &str, version_id: &str, note_path: &Path) -> Result<()> {
        let (content, _) = self.get_version_content(note_id, version_id)?;
        restore_file(note_path, &content)?;
        tracing::debug!(note_id, version_id, path = %note_path.display(), "restored version");
        Ok(())
    }
}
