//! Per-note version history.
//!
//! Snapshots are append-only. Each note's history is created lazily on the
//! first save and keyed by a stable note id (see [`generate_note_id`]).

pub mod diff;
pub mod file_store;
pub mod restore;
pub mod traits;
pub mod types;

pub use diff::{diff_lines, DiffLine, DiffSummary};
pub use file_store::{generate_note_id, FileVersionStore};
pub use restore::{restore_file, restore_file_with};
pub use traits::VersionStore;
pub use types::{VersionHistory, VersionRecord, DEFAULT_AUTHOR, DEFAULT_MESSAGE};
