//! Version history records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Author recorded when the caller does not supply one.
pub const DEFAULT_AUTHOR: &str = "Unknown";

/// Message recorded when the caller does not supply one.
pub const DEFAULT_MESSAGE: &str = "Update note";

/// One saved snapshot of a note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionRecord {
    /// Sequence-prefixed id, e.g. `v000003_20240101T120000.000000Z`
    pub version_id: String,

    /// When the snapshot was taken (non-decreasing within a history)
    pub timestamp: DateTime<Utc>,

    pub author: String,
    pub message: String,

    /// File name of the snapshot, relative to the note's history directory
    pub content_ref: String,
}

/// Append-only list of snapshots for a single note, oldest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionHistory {
    pub note_id: String,
    pub title: String,
    pub versions: Vec<VersionRecord>,
}

impl VersionHistory {
    /// Empty history for a note that has never been saved.
    pub fn new(note_id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            note_id: note_id.into(),
            title: title.into(),
            versions: Vec::new(),
        }
    }

    pub fn find(&self, version_id: &str) -> Option<&VersionRecord> {
        self.versions.iter().find(|v| v.version_id == version_id)
    }

    pub fn latest(&self) -> Option<&VersionRecord> {
        self.versions.last()
    }

    /// Ids of every recorded version, oldest first.
    pub fn version_ids(&self) -> Vec<String> {
        self.versions.iter().map(|v| v.version_id.clone()).collect()
    }
}
