//! Note model.
//!
//! A note is a Markdown file whose YAML frontmatter carries the fields below.
//! Archive and encryption state are optional blocks on the same record.

use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Serialize;
use serde_json::Value;

/// Open-ended frontmatter map. Key order is preserved.
pub type Metadata = serde_json::Map<String, Value>;

/// Current value written to `encryption_version`.
pub const ENCRYPTION_FORMAT_VERSION: u32 = 1;

mod keys {
    pub const TITLE: &str = "title";
    pub const CREATED_AT: &str = "created_at";
    pub const UPDATED_AT: &str = "updated_at";
    pub const TAGS: &str = "tags";
    pub const CATEGORY: &str = "category";
    pub const LINKED_NOTES: &str = "linked_notes";
    pub const IS_ARCHIVED: &str = "is_archived";
    pub const ARCHIVED_AT: &str = "archived_at";
    pub const ARCHIVE_REASON: &str = "archive_reason";
    pub const IS_ENCRYPTED: &str = "is_encrypted";
    pub const ENCRYPTED_AT: &str = "encrypted_at";
    pub const ENCRYPTION_VERSION: &str = "encryption_version";

    pub const ALL: [&str; 12] = [
        TITLE,
        CREATED_AT,
        UPDATED_AT,
        TAGS,
        CATEGORY,
        LINKED_NOTES,
        IS_ARCHIVED,
        ARCHIVED_AT,
        ARCHIVE_REASON,
        IS_ENCRYPTED,
        ENCRYPTED_AT,
        ENCRYPTION_VERSION,
    ];
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArchiveInfo {
    pub archived_at: DateTime<Utc>,
    pub reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EncryptionInfo {
    pub encrypted_at: DateTime<Utc>,
    pub version: u32,
}

/// A Markdown note loaded from (or destined for) the notes directory.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Note {
    pub title: String,

    /// Markdown body, or the base64 blob when encrypted
    pub content: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub tags: Vec<String>,
    pub category: Option<String>,
    pub linked_notes: Vec<String>,

    /// Frontmatter keys MarkNote does not interpret
    pub extra: Metadata,

    pub path: PathBuf,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub archive: Option<ArchiveInfo>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub encryption: Option<EncryptionInfo>,
}

impl Note {
    /// Fresh note with both timestamps set to now.
    pub fn new(title: impl Into<String>, content: impl Into<String>, path: PathBuf) -> Self {
        let now = Utc::now();
        Self {
            title: title.into(),
            content: content.into(),
            created_at: now,
            updated_at: now,
            tags: Vec::new(),
            category: None,
            linked_notes: Vec::new(),
            extra: Metadata::new(),
            path,
            archive: None,
            encryption: None,
        }
    }

    /// Build a note from parsed frontmatter and body.
    ///
    /// Missing titles fall back to the file stem and missing timestamps to
    /// `fallback_time`. Unknown keys are kept in [`Note::extra`].
    pub fn from_parts(
        path: &Path,
        mut metadata: Metadata,
        body: String,
        fallback_category: Option<String>,
        fallback_time: DateTime<Utc>,
    ) -> Self {
        let title = metadata
            .get(keys::TITLE)
            .and_then(value_as_string)
            .unwrap_or_else(|| {
                path.file_stem()
                    .map(|s| s.to_string_lossy().to_string())
                    .unwrap_or_default()
            });
        let created_at = metadata
            .get(keys::CREATED_AT)
            .and_then(value_as_datetime)
            .unwrap_or(fallback_time);
        let updated_at = metadata
            .get(keys::UPDATED_AT)
            .and_then(value_as_datetime)
            .unwrap_or(created_at);
        let tags = metadata
            .get(keys::TAGS)
            .map(value_as_string_list)
            .unwrap_or_default();
        let category = metadata
            .get(keys::CATEGORY)
            .and_then(value_as_string)
            .filter(|c| !c.is_empty())
            .or(fallback_category);
        let linked_notes = metadata
            .get(keys::LINKED_NOTES)
            .map(value_as_string_list)
            .unwrap_or_default();

        let archive = match metadata.get(keys::IS_ARCHIVED) {
            Some(Value::Bool(true)) => Some(ArchiveInfo {
                archived_at: metadata
                    .get(keys::ARCHIVED_AT)
                    .and_then(value_as_datetime)
                    .unwrap_or(updated_at),
                reason: metadata.get(keys::ARCHIVE_REASON).and_then(value_as_string),
            }),
            _ => None,
        };

        let encryption = match metadata.get(keys::IS_ENCRYPTED) {
            Some(Value::Bool(true)) => Some(EncryptionInfo {
                encrypted_at: metadata
                    .get(keys::ENCRYPTED_AT)
                    .and_then(value_as_datetime)
                    .unwrap_or(updated_at),
                version: metadata
                    .get(keys::ENCRYPTION_VERSION)
                    .and_then(Value::as_u64)
                    .and_then(|v| u32::try_from(v).ok())
                    .unwrap_or(ENCRYPTION_FORMAT_VERSION),
            }),
            _ => None,
        };

        for key in keys::ALL {
            metadata.remove(key);
        }

        Self {
            title,
            content: body,
            created_at,
            updated_at,
            tags,
            category,
            linked_notes,
            extra: metadata,
            path: path.to_path_buf(),
            archive,
            encryption,
        }
    }

    /// Frontmatter for this note: known fields first, then [`Note::extra`].
    pub fn to_metadata(&self) -> Metadata {
        let mut m = Metadata::new();
        m.insert(keys::TITLE.into(), Value::String(self.title.clone()));
        m.insert(keys::CREATED_AT.into(), Value::String(self.created_at.to_rfc3339()));
        m.insert(keys::UPDATED_AT.into(), Value::String(self.updated_at.to_rfc3339()));
        m.insert(keys::TAGS.into(), string_list(&self.tags));
        if let Some(category) = &self.category {
            m.insert(keys::CATEGORY.into(), Value::String(category.clone()));
        }
        if !self.linked_notes.is_empty() {
            m.insert(keys::LINKED_NOTES.into(), string_list(&self.linked_notes));
        }
        if let Some(archive) = &self.archive {
            m.insert(keys::IS_ARCHIVED.into(), Value::Bool(true));
            m.insert(
                keys::ARCHIVED_AT.into(),
                Value::String(archive.archived_at.to_rfc3339()),
            );
            if let Some(reason) = &archive.reason {
                m.insert(keys::ARCHIVE_REASON.into(), Value::String(reason.clone()));
            }
        }
        if let Some(encryption) = &self.encryption {
            m.insert(keys::IS_ENCRYPTED.into(), Value::Bool(true));
            m.insert(
                keys::ENCRYPTED_AT.into(),
                Value::String(encryption.encrypted_at.to_rfc3339()),
            );
            m.insert(
                keys::ENCRYPTION_VERSION.into(),
                Value::from(encryption.version),
            );
        }
        for (key, value) in &self.extra {
            if !m.contains_key(key) {
                m.insert(key.clone(), value.clone());
            }
        }
        m
    }

    /// Metadata sealed inside the encrypted payload alongside the body.
    pub fn payload_metadata(&self) -> Metadata {
        let mut m = Metadata::new();
        m.insert(keys::TITLE.into(), Value::String(self.title.clone()));
        m.insert(keys::TAGS.into(), string_list(&self.tags));
        m.insert(
            keys::CATEGORY.into(),
            self.category.clone().map(Value::String).unwrap_or(Value::Null),
        );
        m.insert(keys::CREATED_AT.into(), Value::String(self.created_at.to_rfc3339()));
        m.insert(keys::UPDATED_AT.into(), Value::String(self.updated_at.to_rfc3339()));
        m.insert(keys::LINKED_NOTES.into(), string_list(&self.linked_notes));
        m
    }

    pub fn is_archived(&self) -> bool {
        self.archive.is_some()
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    pub fn word_count(&self) -> usize {
        self.content.split_whitespace().count()
    }
}

fn string_list(items: &[String]) -> Value {
    Value::Array(items.iter().cloned().map(Value::String).collect())
}

fn value_as_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn value_as_string_list(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items.iter().filter_map(value_as_string).collect(),
        Value::String(s) => s
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

/// Accepts RFC 3339 and naive ISO 8601 timestamps (read as UTC).
fn value_as_datetime(value: &Value) -> Option<DateTime<Utc>> {
    let text = value.as_str()?;
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

/// Turn a title into a file-name slug.
///
/// Lowercases, keeps alphanumerics, and collapses every other run of
/// characters into a single `-`.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_dash = false;
    for ch in title.chars() {
        if ch.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.extend(ch.to_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug
}
