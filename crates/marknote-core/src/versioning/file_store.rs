//! Directory-backed version store.
//!
//! Layout under the base directory:
//!
//! ```text
//! <base>/<note_id>/index.json          VersionHistory, rewritten atomically
//! <base>/<note_id>/<version_id>.md     one file per snapshot
//! ```
//!
//! Snapshot content is written before the index, so a crash between the two
//! leaves an orphan file but never an index entry without content.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::Utc;

use super::traits::VersionStore;
use super::types::{VersionHistory, VersionRecord, DEFAULT_AUTHOR, DEFAULT_MESSAGE};
use crate::error::{MarkNoteError, Result};
use crate::fs::write_atomic;

const INDEX_FILE: &str = "index.json";

/// Stable id for a note, derived from its path and title.
///
/// BLAKE3 of `"{path}:{title}"`, truncated to 32 hex characters.
pub fn generate_note_id(note_path: &Path, title: &str) -> String {
    let input = format!("{}:{}", note_path.display(), title);
    let hash = blake3::hash(input.as_bytes());
    hash.to_hex().as_str()[..32].to_string()
}

/// Version store keeping each note's history in its own directory.
#[derive(Debug, Clone)]
pub struct FileVersionStore {
    base_dir: PathBuf,
}

impl FileVersionStore {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn note_dir(&self, note_id: &str) -> Result<PathBuf> {
        let valid = !note_id.is_empty()
            && note_id != "."
            && note_id != ".."
            && !note_id.contains(['/', '\\']);
        if !valid {
            return Err(MarkNoteError::InvalidInput(format!(
                "Invalid note id: {:?}",
                note_id
            )));
        }
        Ok(self.base_dir.join(note_id))
    }

    fn load_history(&self, note_id: &str) -> Result<Option<VersionHistory>> {
        let index = self.note_dir(note_id)?.join(INDEX_FILE);
        let bytes = match fs::read(&index) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_slice(&bytes)?))
    }

    fn write_history(&self, history: &VersionHistory) -> Result<()> {
        let index = self.note_dir(&history.note_id)?.join(INDEX_FILE);
        let json = serde_json::to_vec_pretty(history)?;
        write_atomic(&index, &json)?;
        Ok(())
    }
}

impl VersionStore for FileVersionStore {
    fn save_version(
        &self,
        note_id: &str,
        content: &str,
        title: &str,
        author: Option<&str>,
        message: Option<&str>,
    ) -> Result<String> {
        let dir = self.note_dir(note_id)?;
        let mut history = self
            .load_history(note_id)?
            .unwrap_or_else(|| VersionHistory::new(note_id, title));

        let mut timestamp = Utc::now();
        if let Some(previous) = history.latest() {
            if timestamp < previous.timestamp {
                timestamp = previous.timestamp;
            }
        }

        let version_id = format!(
            "v{:06}_{}",
            history.versions.len() + 1,
            timestamp.format("%Y%m%dT%H%M%S%.6fZ")
        );
        let content_ref = format!("{}.md", version_id);

        write_atomic(&dir.join(&content_ref), content.as_bytes())?;

        history.title = title.to_string();
        history.versions.push(VersionRecord {
            version_id: version_id.clone(),
            timestamp,
            author: author.unwrap_or(DEFAULT_AUTHOR).to_string(),
            message: message.unwrap_or(DEFAULT_MESSAGE).to_string(),
            content_ref,
        });
        self.write_history(&history)?;

        tracing::debug!(note_id, %version_id, "saved version");
        Ok(version_id)
    }

    fn get_version_history(&self, note_id: &str) -> Result<Vec<VersionRecord>> {
        Ok(self
            .load_history(note_id)?
            .map(|h| h.versions)
            .unwrap_or_default())
    }

    fn get_version_content(
        &self,
        note_id: &str,
        version_id: &str,
    ) -> Result<(String, VersionRecord)> {
        let history = self
            .load_history(note_id)?
            .unwrap_or_else(|| VersionHistory::new(note_id, ""));

        let not_found = || MarkNoteError::VersionNotFound {
            version_id: version_id.to_string(),
            available: history.version_ids(),
        };

        let record = history.find(version_id).cloned().ok_or_else(not_found)?;
        let path = self.note_dir(note_id)?.join(&record.content_ref);
        match fs::read_to_string(&path) {
            Ok(content) => Ok((content, record)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(not_found()),
            Err(e) => Err(e.into()),
        }
    }

    fn replace_version_content(
        &self,
        note_id: &str,
        version_id: &str,
        content: &str,
    ) -> Result<()> {
        let history = self
            .load_history(note_id)?
            .unwrap_or_else(|| VersionHistory::new(note_id, ""));
        let record = history
            .find(version_id)
            .ok_or_else(|| MarkNoteError::VersionNotFound {
                version_id: version_id.to_string(),
                available: history.version_ids(),
            })?;

        let path = self.note_dir(note_id)?.join(&record.content_ref);
        write_atomic(&path, content.as_bytes())?;
        tracing::debug!(note_id, version_id, "rewrote version content");
        Ok(())
    }

    fn purge_history(&self, note_id: &str) -> Result<usize> {
        let dir = self.note_dir(note_id)?;
        if !dir.exists() {
            return Ok(0);
        }
        let removed = self
            .load_history(note_id)?
            .map(|h| h.versions.len())
            .unwrap_or(0);
        fs::remove_dir_all(&dir)?;
        tracing::debug!(note_id, removed, "purged version history");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_note_id_is_stable() {
        let a = generate_note_id(Path::new("/notes/work/plan.md"), "Plan");
        let b = generate_note_id(Path::new("/notes/work/plan.md"), "Plan");
        let c = generate_note_id(Path::new("/notes/work/plan.md"), "Other");

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.len(), 32);
        assert!(a.chars().all(|ch| ch.is_ascii_hexdigit()));
    }

    #[test]
    fn test_first_save_creates_history() {
        let dir = tempdir().unwrap();
        let store = FileVersionStore::new(dir.path());

        assert!(store.get_version_history("n1").unwrap().is_empty());
        let id = store.save_version("n1", "hello", "Title", None, None).unwrap();

        assert!(id.starts_with("v000001_"));
        let history = store.get_version_history("n1").unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].author, DEFAULT_AUTHOR);
        assert_eq!(history[0].message, DEFAULT_MESSAGE);
        assert!(dir.path().join("n1").join(INDEX_FILE).exists());
    }

    #[test]
    fn test_ids_sort_in_creation_order() {
        let dir = tempdir().unwrap();
        let store = FileVersionStore::new(dir.path());

        let ids: Vec<String> = (0..12)
            .map(|i| {
                store
                    .save_version("n1", &format!("rev {}", i), "T", None, None)
                    .unwrap()
            })
            .collect();

        let mut sorted = ids.clone();
        sorted.sort();
        assert_eq!(ids, sorted);

        let history = store.get_version_history("n1").unwrap();
        assert!(history
            .windows(2)
            .all(|w| w[0].timestamp <= w[1].timestamp));
    }

    #[test]
    fn test_missing_content_file_is_not_found() {
        let dir = tempdir().unwrap();
        let store = FileVersionStore::new(dir.path());
        let id = store.save_version("n1", "hello", "T", None, None).unwrap();

        fs::remove_file(dir.path().join("n1").join(format!("{}.md", id))).unwrap();

        let err = store.get_version_content("n1", &id).unwrap_err();
        assert!(matches!(err, MarkNoteError::VersionNotFound { .. }));
    }

    #[test]
    fn test_invalid_note_id_rejected() {
        let dir = tempdir().unwrap();
        let store = FileVersionStore::new(dir.path());

        for id in ["", "..", "a/b", "a\\b"] {
            let err = store.save_version(id, "x", "T", None, None).unwrap_err();
            assert!(matches!(err, MarkNoteError::InvalidInput(_)), "{id}");
        }
    }

    #[test]
    fn test_replace_version_content() {
        let dir = tempdir().unwrap();
        let store = FileVersionStore::new(dir.path());
        let first = store.save_version("n1", "plain", "T", None, Some("one")).unwrap();
        store.save_version("n1", "later", "T", None, None).unwrap();

        store.replace_version_content("n1", &first, "sealed").unwrap();

        let (content, record) = store.get_version_content("n1", &first).unwrap();
        assert_eq!(content, "sealed");
        assert_eq!(record.message, "one");
        assert_eq!(store.get_version_history("n1").unwrap().len(), 2);

        let err = store
            .replace_version_content("n1", "v999999_x", "x")
            .unwrap_err();
        assert!(matches!(err, MarkNoteError::VersionNotFound { .. }));
    }

    #[test]
    fn test_purge_history() {
        let dir = tempdir().unwrap();
        let store = FileVersionStore::new(dir.path());
        store.save_version("n1", "a", "T", None, None).unwrap();
        store.save_version("n1", "b", "T", None, None).unwrap();

        assert_eq!(store.purge_history("n1").unwrap(), 2);
        assert!(store.get_version_history("n1").unwrap().is_empty());
        assert_eq!(store.purge_history("n1").unwrap(), 0);
    }
}
