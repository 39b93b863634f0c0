//! JSON output formatting.

use marknote_core::versioning::{DiffLine, DiffSummary, VersionRecord};
use marknote_core::Note;

/// Convert a note to JSON. The body is included only when `with_content`.
pub fn note_json(note: &Note, with_content: bool) -> serde_json::Value {
    let mut value = serde_json::json!({
        "title": note.title,
        "path": note.path,
        "category": note.category,
        "tags": note.tags,
        "created_at": note.created_at,
        "updated_at": note.updated_at,
        "linked_notes": note.linked_notes,
        "is_archived": note.is_archived(),
        "is_encrypted": note.encryption.is_some(),
    });
    if let Some(map) = value.as_object_mut() {
        if let Some(archive) = &note.archive {
            map.insert("archived_at".into(), serde_json::json!(archive.archived_at));
            map.insert("archive_reason".into(), serde_json::json!(archive.reason));
        }
        if let Some(encryption) = &note.encryption {
            map.insert("encrypted_at".into(), serde_json::json!(encryption.encrypted_at));
            map.insert(
                "encryption_version".into(),
                serde_json::json!(encryption.version),
            );
        }
        if with_content {
            map.insert("content".into(), serde_json::json!(note.content));
        }
    }
    value
}

pub fn notes_json(notes: &[Note]) -> Vec<serde_json::Value> {
    notes.iter().map(|note| note_json(note, false)).collect()
}

pub fn version_json(record: &VersionRecord) -> serde_json::Value {
    serde_json::json!({
        "version_id": record.version_id,
        "timestamp": record.timestamp,
        "author": record.author,
        "message": record.message,
    })
}

pub fn versions_json(records: &[VersionRecord]) -> Vec<serde_json::Value> {
    records.iter().map(version_json).collect()
}

pub fn diff_json(from: &str, to: &str, lines: &[DiffLine]) -> serde_json::Value {
    serde_json::json!({
        "from": from,
        "to": to,
        "summary": DiffSummary::from_lines(lines),
        "lines": lines,
    })
}
