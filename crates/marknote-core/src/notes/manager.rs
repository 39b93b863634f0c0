//! Filesystem note manager.
//!
//! Notes live at `<notes_dir>/<category>/<slug>.md` (or directly under
//! `<notes_dir>` when uncategorized). Every write goes through a staged file
//! and a rename, so a note is never left half written.
//!
//! Version history follows the note's protection: encrypting, decrypting or
//! re-keying a note rewrites every stored snapshot the same way, so the
//! history never holds a readable copy of an encrypted note.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use super::frontmatter::{merge_metadata, parse_frontmatter, render_frontmatter};
use super::types::{slugify, ArchiveInfo, EncryptionInfo, Metadata, Note, ENCRYPTION_FORMAT_VERSION};
use crate::crypto::{change_password, decrypt_content, encrypt_content, is_encrypted};
use crate::error::{MarkNoteError, Result};
use crate::fs::write_atomic;
use crate::versioning::{generate_note_id, DiffLine, FileVersionStore, VersionRecord, VersionStore};

/// Author recorded on versions created by a restore.
const RESTORE_AUTHOR: &str = "System";

/// Settings a [`NoteManager`] is constructed from.
#[derive(Debug, Clone)]
pub struct NotesSettings {
    pub notes_dir: PathBuf,
    pub default_tags: Vec<String>,
    pub default_category: Option<String>,

    /// Extra frontmatter merged under every new note
    pub default_frontmatter: Metadata,

    pub versioning_enabled: bool,

    /// Author recorded on versions (falls back to the store default)
    pub author: Option<String>,
}

impl NotesSettings {
    pub fn new(notes_dir: impl Into<PathBuf>) -> Self {
        Self {
            notes_dir: notes_dir.into(),
            default_tags: Vec::new(),
            default_category: None,
            default_frontmatter: Metadata::new(),
            versioning_enabled: true,
            author: None,
        }
    }
}

/// Outcome of one note in a batch operation.
#[derive(Debug)]
pub struct BatchOutcome {
    pub title: String,
    pub result: Result<Note>,
}

/// Notes a note links to, split into resolved notes and dangling titles.
#[derive(Debug, Default)]
pub struct LinkReport {
    pub linked: Vec<Note>,
    pub missing: Vec<String>,
}

/// How snapshot bodies change when a note's protection changes.
#[derive(Clone, Copy)]
enum Reseal<'a> {
    Encrypt(&'a str),
    Decrypt(&'a str),
    Rekey { old: &'a str, new: &'a str },
}

impl Reseal<'_> {
    /// Apply to one note. Returns whether the note changed.
    fn apply(self, note: &mut Note) -> Result<bool> {
        let sealed = is_encrypted(&note.content);
        match self {
            Reseal::Encrypt(password) => {
                if sealed {
                    return Ok(false);
                }
                note.content = encrypt_content(&note.content, password, &note.payload_metadata())?;
                note.encryption = Some(encryption_info());
            }
            Reseal::Decrypt(password) => {
                if !sealed {
                    return Ok(false);
                }
                note.content = decrypt_content(&note.content, password)?.content;
                note.encryption = None;
            }
            Reseal::Rekey { old, new } => {
                if !sealed {
                    return Ok(false);
                }
                note.content = change_password(&note.content, old, new)?;
                note.encryption = Some(encryption_info());
            }
        }
        Ok(true)
    }
}

/// Note operations over a notes directory and a version store.
#[derive(Debug)]
pub struct NoteManager<S: VersionStore = FileVersionStore> {
    settings: NotesSettings,
    store: S,
}

impl<S: VersionStore> NoteManager<S> {
    pub fn new(settings: NotesSettings, store: S) -> Self {
        Self { settings, store }
    }

    pub fn settings(&self) -> &NotesSettings {
        &self.settings
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    // --- Notes ---

    /// Create a note and record its first version.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` for a blank title or a category containing path separators
    /// - `NoteExists` if a note with the same slug is already in the category
    pub fn create_note(
        &self,
        title: &str,
        body: Option<&str>,
        tags: &[String],
        category: Option<&str>,
    ) -> Result<Note> {
        let title = title.trim();
        let slug = slugify(title);
        if slug.is_empty() {
            return Err(MarkNoteError::InvalidInput(
                "Title must contain at least one letter or digit".to_string(),
            ));
        }

        let category = category
            .map(str::to_string)
            .or_else(|| self.settings.default_category.clone());
        let dir = self.category_dir(category.as_deref())?;
        let path = dir.join(format!("{}.md", slug));
        if path.exists() {
            return Err(MarkNoteError::NoteExists(path));
        }

        let mut all_tags = self.settings.default_tags.clone();
        for tag in tags {
            if !all_tags.contains(tag) {
                all_tags.push(tag.clone());
            }
        }

        let body = body
            .map(str::to_string)
            .unwrap_or_else(|| format!("# {}\n", title));

        let mut note = Note::new(title, body, path);
        note.tags = all_tags;
        note.category = category;

        let metadata = merge_metadata(&self.settings.default_frontmatter, &note.to_metadata());
        let note = Note::from_parts(
            &note.path,
            metadata,
            note.content,
            None,
            note.created_at,
        );

        self.commit(&note, "Initial version")?;
        tracing::debug!(path = %note.path.display(), "created note");
        Ok(note)
    }

    /// Locate a note file by title.
    ///
    /// Looks in the category directory first, then the notes root, then (when
    /// no category is given) every non-hidden first-level subdirectory.
    pub fn find_note_path(&self, title: &str, category: Option<&str>) -> Option<PathBuf> {
        let file_name = format!("{}.md", slugify(title));
        let root = &self.settings.notes_dir;

        let mut candidates = Vec::new();
        if let Some(category) = category {
            candidates.push(root.join(category).join(&file_name));
        }
        candidates.push(root.join(&file_name));
        if category.is_none() {
            candidates.extend(
                self.subdirectories()
                    .into_iter()
                    .map(|dir| dir.join(&file_name)),
            );
        }

        candidates.into_iter().find(|path| path.is_file())
    }

    /// Load a note by title.
    pub fn get_note(&self, title: &str, category: Option<&str>) -> Result<Note> {
        let path = self.require_path(title, category)?;
        self.read_note(&path)
    }

    /// List notes, newest `updated_at` first.
    ///
    /// Files that cannot be read or decoded are skipped with a warning.
    pub fn list_notes(
        &self,
        tag: Option<&str>,
        category: Option<&str>,
        include_archived: bool,
    ) -> Result<Vec<Note>> {
        let root = &self.settings.notes_dir;
        let dirs = match category {
            Some(category) => vec![root.join(category)],
            None => {
                let mut dirs = vec![root.clone()];
                dirs.extend(self.subdirectories());
                dirs
            }
        };

        let mut notes = Vec::new();
        for dir in dirs.iter().filter(|d| d.is_dir()) {
            for entry in fs::read_dir(dir)? {
                let path = entry?.path();
                if !is_note_file(&path) {
                    continue;
                }
                let note = match self.read_note(&path) {
                    Ok(note) => note,
                    Err(e) => {
                        tracing::warn!(path = %path.display(), error = %e, "skipping unreadable note");
                        continue;
                    }
                };
                if tag.is_some_and(|t| !note.has_tag(t)) {
                    continue;
                }
                if !include_archived && note.is_archived() {
                    continue;
                }
                notes.push(note);
            }
        }

        notes.sort_by(|a, b| {
            b.updated_at
                .cmp(&a.updated_at)
                .then_with(|| a.title.cmp(&b.title))
        });
        Ok(notes)
    }

    /// Replace a note's body and/or tags and record a version.
    ///
    /// # Errors
    ///
    /// `AlreadyEncrypted` when a new body is supplied for an encrypted note.
    pub fn update_note(
        &self,
        title: &str,
        category: Option<&str>,
        body: Option<&str>,
        tags: Option<Vec<String>>,
        message: Option<&str>,
    ) -> Result<Note> {
        let mut note = self.get_note(title, category)?;
        if body.is_some() && is_encrypted(&note.content) {
            return Err(MarkNoteError::AlreadyEncrypted(note.title));
        }

        if let Some(body) = body {
            note.content = body.to_string();
        }
        if let Some(tags) = tags {
            note.tags = tags;
        }
        note.updated_at = Utc::now();

        let default_message = format!("Update note: {}", note.title);
        self.commit(&note, message.unwrap_or(&default_message))?;
        Ok(note)
    }

    /// Delete a note file together with its version history.
    pub fn delete_note(&self, title: &str, category: Option<&str>) -> Result<Note> {
        let note = self.get_note(title, category)?;
        fs::remove_file(&note.path)?;
        if self.settings.versioning_enabled {
            let removed = self.store.purge_history(&note_id(&note))?;
            tracing::debug!(path = %note.path.display(), removed, "deleted note and history");
        }
        Ok(note)
    }

    /// Delete several notes, collecting per-note results.
    pub fn batch_delete(&self, titles: &[String], category: Option<&str>) -> Vec<BatchOutcome> {
        run_batch(titles, |title| self.delete_note(title, category))
    }

    /// Flag a note as archived. Archived notes are hidden from listings by default.
    pub fn archive_note(
        &self,
        title: &str,
        category: Option<&str>,
        reason: Option<&str>,
    ) -> Result<Note> {
        let mut note = self.get_note(title, category)?;
        note.archive = Some(ArchiveInfo {
            archived_at: Utc::now(),
            reason: reason.map(str::to_string),
        });
        self.write_note(&note)?;
        Ok(note)
    }

    pub fn batch_archive(
        &self,
        titles: &[String],
        category: Option<&str>,
        reason: Option<&str>,
    ) -> Vec<BatchOutcome> {
        run_batch(titles, |title| self.archive_note(title, category, reason))
    }

    pub fn unarchive_note(&self, title: &str, category: Option<&str>) -> Result<Note> {
        let mut note = self.get_note(title, category)?;
        note.archive = None;
        self.write_note(&note)?;
        Ok(note)
    }

    // --- Queries ---

    /// Case-insensitive search over titles, tags and bodies.
    ///
    /// Encrypted bodies are not searched; their titles and tags still are.
    pub fn search_notes(&self, query: &str, include_archived: bool) -> Result<Vec<Note>> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return Err(MarkNoteError::InvalidInput(
                "Search query cannot be empty".to_string(),
            ));
        }

        let mut notes = self.list_notes(None, None, include_archived)?;
        notes.retain(|note| {
            note.title.to_lowercase().contains(&query)
                || note.tags.iter().any(|t| t.to_lowercase().contains(&query))
                || (!is_encrypted(&note.content) && note.content.to_lowercase().contains(&query))
        });
        Ok(notes)
    }

    /// Notes carrying any of `tags`, or all of them when `match_all` is set.
    pub fn notes_with_tags(
        &self,
        tags: &[String],
        match_all: bool,
        category: Option<&str>,
    ) -> Result<Vec<Note>> {
        let mut notes = self.list_notes(None, category, true)?;
        notes.retain(|note| {
            if match_all {
                tags.iter().all(|t| note.has_tag(t))
            } else {
                tags.iter().any(|t| note.has_tag(t))
            }
        });
        Ok(notes)
    }

    /// Tag usage across notes, most used first.
    pub fn tag_counts(&self, include_archived: bool) -> Result<Vec<(String, usize)>> {
        let mut counts: BTreeMap<String, usize> = BTreeMap::new();
        for note in self.list_notes(None, None, include_archived)? {
            for tag in note.tags {
                *counts.entry(tag).or_default() += 1;
            }
        }
        Ok(by_count(counts))
    }

    /// Note count per category, most populated first. `None` is uncategorized.
    pub fn category_counts(&self, include_archived: bool) -> Result<Vec<(Option<String>, usize)>> {
        let mut counts: BTreeMap<Option<String>, usize> = BTreeMap::new();
        for note in self.list_notes(None, None, include_archived)? {
            *counts.entry(note.category).or_default() += 1;
        }
        Ok(by_count(counts))
    }

    // --- Links ---

    /// Link `source` to `target` (and back, when `bidirectional`).
    ///
    /// Links are stored by title in the `linked_notes` frontmatter field.
    /// Linking twice is a no-op.
    pub fn add_link(
        &self,
        source: &str,
        target: &str,
        bidirectional: bool,
        category: Option<&str>,
        target_category: Option<&str>,
    ) -> Result<Note> {
        let mut source_note = self.get_note(source, category)?;
        let mut target_note = self.get_note(target, target_category)?;
        if source_note.path == target_note.path {
            return Err(MarkNoteError::InvalidInput(
                "Cannot link a note to itself".to_string(),
            ));
        }

        if link_index(&source_note, &target_note.title).is_none() {
            source_note.linked_notes.push(target_note.title.clone());
            let message = format!("Link added: {}", target_note.title);
            self.commit(&source_note, &message)?;
        }
        if bidirectional && link_index(&target_note, &source_note.title).is_none() {
            target_note.linked_notes.push(source_note.title.clone());
            let message = format!("Link added: {}", source_note.title);
            self.commit(&target_note, &message)?;
        }
        Ok(source_note)
    }

    /// Remove the link from `source` to `target` (and back, when
    /// `bidirectional` and the target still exists).
    ///
    /// # Errors
    ///
    /// `InvalidInput` if `source` does not link to `target`.
    pub fn remove_link(
        &self,
        source: &str,
        target: &str,
        bidirectional: bool,
        category: Option<&str>,
        target_category: Option<&str>,
    ) -> Result<Note> {
        let mut source_note = self.get_note(source, category)?;
        let index = link_index(&source_note, target).ok_or_else(|| {
            MarkNoteError::InvalidInput(format!(
                "No link from '{}' to '{}'",
                source_note.title, target
            ))
        })?;
        let removed = source_note.linked_notes.remove(index);
        self.commit(&source_note, &format!("Link removed: {}", removed))?;

        if bidirectional {
            if let Ok(mut target_note) = self.get_note(target, target_category) {
                if let Some(index) = link_index(&target_note, &source_note.title) {
                    target_note.linked_notes.remove(index);
                    let message = format!("Link removed: {}", source_note.title);
                    self.commit(&target_note, &message)?;
                }
            }
        }
        Ok(source_note)
    }

    /// Notes that `title` links to. Titles with no matching note are
    /// reported in [`LinkReport::missing`].
    pub fn linked_notes(&self, title: &str, category: Option<&str>) -> Result<LinkReport> {
        let note = self.get_note(title, category)?;
        let mut report = LinkReport::default();
        for link in &note.linked_notes {
            match self.find_note_path(link, None) {
                Some(path) => report.linked.push(self.read_note(&path)?),
                None => report.missing.push(link.clone()),
            }
        }
        Ok(report)
    }

    /// Notes that link to `title`.
    pub fn backlinks(&self, title: &str, category: Option<&str>) -> Result<Vec<Note>> {
        let note = self.get_note(title, category)?;
        let mut notes = self.list_notes(None, None, true)?;
        notes.retain(|other| other.path != note.path && link_index(other, &note.title).is_some());
        Ok(notes)
    }

    // --- Encryption ---

    /// Encrypt a note body in place, along with every snapshot in its history.
    ///
    /// The frontmatter stays readable and gains `is_encrypted`,
    /// `encrypted_at` and `encryption_version`.
    pub fn encrypt_note(&self, title: &str, category: Option<&str>, password: &str) -> Result<Note> {
        let mut note = self.get_note(title, category)?;
        if is_encrypted(&note.content) {
            return Err(MarkNoteError::AlreadyEncrypted(note.title));
        }

        let reseal = Reseal::Encrypt(password);
        reseal.apply(&mut note)?;
        let sealed = self.reseal_history(&note, reseal)?;
        self.commit(&note, "Encrypted note")?;

        tracing::debug!(path = %note.path.display(), sealed, "encrypted note");
        Ok(note)
    }

    /// Decrypt a note body in place, drop the encryption flags, and decrypt
    /// its history.
    pub fn decrypt_note(&self, title: &str, category: Option<&str>, password: &str) -> Result<Note> {
        let mut note = self.get_note(title, category)?;
        if !is_encrypted(&note.content) {
            return Err(MarkNoteError::NotEncrypted(note.title));
        }

        let reseal = Reseal::Decrypt(password);
        reseal.apply(&mut note)?;
        self.commit(&note, "Decrypted note")?;
        let unsealed = self.reseal_history(&note, reseal)?;

        tracing::debug!(path = %note.path.display(), unsealed, "decrypted note");
        Ok(note)
    }

    /// Decrypted view of an encrypted note. Nothing is written.
    pub fn read_decrypted(
        &self,
        title: &str,
        category: Option<&str>,
        password: &str,
    ) -> Result<Note> {
        let mut note = self.get_note(title, category)?;
        if !is_encrypted(&note.content) {
            return Err(MarkNoteError::NotEncrypted(note.title));
        }
        let payload = decrypt_content(&note.content, password)?;
        note.content = payload.content;
        Ok(note)
    }

    /// Re-encrypt a note, and every sealed snapshot of it, under a new password.
    ///
    /// The old password is checked against the live note before anything is
    /// written. The new blob is staged next to the note and renamed over it.
    pub fn change_note_password(
        &self,
        title: &str,
        category: Option<&str>,
        old_password: &str,
        new_password: &str,
    ) -> Result<Note> {
        let mut note = self.get_note(title, category)?;
        if !is_encrypted(&note.content) {
            return Err(MarkNoteError::NotEncrypted(note.title));
        }

        let reseal = Reseal::Rekey {
            old: old_password,
            new: new_password,
        };
        reseal.apply(&mut note)?;
        let rekeyed = self.reseal_history(&note, reseal)?;
        self.commit(&note, "Changed password")?;

        tracing::debug!(path = %note.path.display(), rekeyed, "rotated note password");
        Ok(note)
    }

    pub fn is_note_encrypted(&self, title: &str, category: Option<&str>) -> Result<bool> {
        Ok(is_encrypted(&self.get_note(title, category)?.content))
    }

    /// Encrypt several notes with one password, collecting per-note results.
    pub fn batch_encrypt(
        &self,
        titles: &[String],
        category: Option<&str>,
        password: &str,
    ) -> Vec<BatchOutcome> {
        run_batch(titles, |title| self.encrypt_note(title, category, password))
    }

    /// Decrypt several notes with one password, collecting per-note results.
    pub fn batch_decrypt(
        &self,
        titles: &[String],
        category: Option<&str>,
        password: &str,
    ) -> Vec<BatchOutcome> {
        run_batch(titles, |title| self.decrypt_note(title, category, password))
    }

    // --- Versions ---

    /// Snapshot the note file as it is on disk now.
    pub fn create_version(
        &self,
        title: &str,
        category: Option<&str>,
        message: Option<&str>,
    ) -> Result<String> {
        self.ensure_versioning()?;
        let (note, id) = self.versioned_note(title, category)?;
        let text = fs::read_to_string(&note.path)?;
        let default_message = format!("Manual version created for: {}", note.title);
        self.store.save_version(
            &id,
            &text,
            &note.title,
            self.settings.author.as_deref(),
            Some(message.unwrap_or(&default_message)),
        )
    }

    pub fn version_history(&self, title: &str, category: Option<&str>) -> Result<Vec<VersionRecord>> {
        self.ensure_versioning()?;
        let (_, id) = self.versioned_note(title, category)?;
        self.store.get_version_history(&id)
    }

    /// Stored text of one version.
    ///
    /// # Errors
    ///
    /// `UnsealedVersion` if the note is encrypted but the snapshot is not.
    pub fn version_content(
        &self,
        title: &str,
        category: Option<&str>,
        version_id: &str,
    ) -> Result<(String, VersionRecord)> {
        self.ensure_versioning()?;
        let (note, id) = self.versioned_note(title, category)?;
        let (text, record) = self.store.get_version_content(&id, version_id)?;
        check_sealed(&note, version_id, &text)?;
        Ok((text, record))
    }

    /// Diff two versions; `new_version` defaults to the latest.
    pub fn diff_versions(
        &self,
        title: &str,
        category: Option<&str>,
        old_version: &str,
        new_version: Option<&str>,
    ) -> Result<Vec<DiffLine>> {
        self.ensure_versioning()?;
        let (_, id) = self.versioned_note(title, category)?;
        self.store.compare_versions(&id, old_version, new_version)
    }

    /// Restore a version over the live note and record the restore as a new
    /// version. Returns the new version id.
    ///
    /// # Errors
    ///
    /// `UnsealedVersion` if the note is encrypted but the snapshot is not.
    /// The live note is left untouched.
    pub fn restore_note_version(
        &self,
        title: &str,
        category: Option<&str>,
        version_id: &str,
    ) -> Result<String> {
        self.ensure_versioning()?;
        let (note, id) = self.versioned_note(title, category)?;
        let (text, _) = self.store.get_version_content(&id, version_id)?;
        check_sealed(&note, version_id, &text)?;

        self.store.restore_version(&id, version_id, &note.path)?;

        let text = fs::read_to_string(&note.path)?;
        self.store.save_version(
            &id,
            &text,
            &note.title,
            Some(RESTORE_AUTHOR),
            Some(&format!("Restored from version {}", version_id)),
        )
    }

    /// Delete a note's whole history. Returns how many versions were removed.
    pub fn purge_versions(&self, title: &str, category: Option<&str>) -> Result<usize> {
        self.ensure_versioning()?;
        let (_, id) = self.versioned_note(title, category)?;
        self.store.purge_history(&id)
    }

    // --- Helpers ---

    fn ensure_versioning(&self) -> Result<()> {
        if self.settings.versioning_enabled {
            Ok(())
        } else {
            Err(MarkNoteError::InvalidInput(
                "Version control is disabled".to_string(),
            ))
        }
    }

    fn versioned_note(&self, title: &str, category: Option<&str>) -> Result<(Note, String)> {
        let note = self.get_note(title, category)?;
        let id = note_id(&note);
        Ok((note, id))
    }

    fn require_path(&self, title: &str, category: Option<&str>) -> Result<PathBuf> {
        self.find_note_path(title, category)
            .ok_or_else(|| MarkNoteError::NoteNotFound(title.to_string()))
    }

    /// Rewrite every snapshot of `note` with `reseal`. Returns how many changed.
    ///
    /// All new contents are computed before any is written. Snapshots sealed
    /// under a different password are left as they are.
    fn reseal_history(&self, note: &Note, reseal: Reseal<'_>) -> Result<usize> {
        if !self.settings.versioning_enabled {
            return Ok(0);
        }
        let id = note_id(note);

        let mut rewrites = Vec::new();
        for record in self.store.get_version_history(&id)? {
            let text = match self.store.get_version_content(&id, &record.version_id) {
                Ok((text, _)) => text,
                Err(MarkNoteError::VersionNotFound { .. }) => continue,
                Err(e) => return Err(e),
            };
            let (metadata, body) = parse_frontmatter(&text);
            let mut snapshot = Note::from_parts(
                &note.path,
                metadata,
                body,
                note.category.clone(),
                record.timestamp,
            );
            match reseal.apply(&mut snapshot) {
                Ok(true) => {
                    let text = render_frontmatter(&snapshot.to_metadata(), &snapshot.content)?;
                    rewrites.push((record.version_id, text));
                }
                Ok(false) => {}
                Err(e) if e.is_decryption_failure() => {
                    tracing::warn!(
                        version_id = %record.version_id,
                        error = %e,
                        "leaving version sealed under another password"
                    );
                }
                Err(e) => return Err(e),
            }
        }

        for (version_id, text) in &rewrites {
            self.store.replace_version_content(&id, version_id, text)?;
        }
        Ok(rewrites.len())
    }

    fn category_dir(&self, category: Option<&str>) -> Result<PathBuf> {
        match category {
            None => Ok(self.settings.notes_dir.clone()),
            Some(category) => {
                let valid = !category.trim().is_empty()
                    && !category.starts_with('.')
                    && !category.contains(['/', '\\']);
                if !valid {
                    return Err(MarkNoteError::InvalidInput(format!(
                        "Invalid category: {:?}",
                        category
                    )));
                }
                Ok(self.settings.notes_dir.join(category))
            }
        }
    }

    fn subdirectories(&self) -> Vec<PathBuf> {
        let Ok(entries) = fs::read_dir(&self.settings.notes_dir) else {
            return Vec::new();
        };
        let mut dirs: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_dir() && !is_hidden(path))
            .collect();
        dirs.sort();
        dirs
    }

    fn read_note(&self, path: &Path) -> Result<Note> {
        let text = fs::read_to_string(path)?;
        let (metadata, body) = parse_frontmatter(&text);
        let fallback_time: DateTime<Utc> = fs::metadata(path)
            .and_then(|m| m.modified())
            .map(DateTime::from)
            .unwrap_or_else(|_| Utc::now());
        Ok(Note::from_parts(
            path,
            metadata,
            body,
            self.category_from_path(path),
            fallback_time,
        ))
    }

    fn category_from_path(&self, path: &Path) -> Option<String> {
        let parent = path.parent()?;
        if parent == self.settings.notes_dir {
            return None;
        }
        parent.file_name().map(|n| n.to_string_lossy().to_string())
    }

    /// Render and write a note, returning the full file text.
    fn write_note(&self, note: &Note) -> Result<String> {
        let text = render_frontmatter(&note.to_metadata(), &note.content)?;
        write_atomic(&note.path, text.as_bytes())?;
        Ok(text)
    }

    /// Write a note and, when versioning is on, snapshot it.
    fn commit(&self, note: &Note, message: &str) -> Result<()> {
        let text = self.write_note(note)?;
        if self.settings.versioning_enabled {
            self.store.save_version(
                &note_id(note),
                &text,
                &note.title,
                self.settings.author.as_deref(),
                Some(message),
            )?;
        }
        Ok(())
    }
}

fn note_id(note: &Note) -> String {
    generate_note_id(&note.path, &note.title)
}

fn run_batch<F>(titles: &[String], op: F) -> Vec<BatchOutcome>
where
    F: Fn(&str) -> Result<Note>,
{
    titles
        .iter()
        .map(|title| BatchOutcome {
            title: title.clone(),
            result: op(title.as_str()),
        })
        .collect()
}

fn encryption_info() -> EncryptionInfo {
    EncryptionInfo {
        encrypted_at: Utc::now(),
        version: ENCRYPTION_FORMAT_VERSION,
    }
}

/// Refuse plaintext snapshot text while the live note is encrypted.
fn check_sealed(live: &Note, version_id: &str, text: &str) -> Result<()> {
    let (_, body) = parse_frontmatter(text);
    if is_encrypted(&live.content) && !is_encrypted(&body) {
        return Err(MarkNoteError::UnsealedVersion(version_id.to_string()));
    }
    Ok(())
}

/// Position of the link in `note` that points at `title`, compared by slug.
fn link_index(note: &Note, title: &str) -> Option<usize> {
    let slug = slugify(title);
    note.linked_notes
        .iter()
        .position(|link| slugify(link) == slug)
}

fn by_count<K: Ord>(counts: BTreeMap<K, usize>) -> Vec<(K, usize)> {
    let mut counts: Vec<(K, usize)> = counts.into_iter().collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    counts
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .map(|n| n.to_string_lossy().starts_with('.'))
        .unwrap_or(false)
}

fn is_note_file(path: &Path) -> bool {
    path.is_file() && !is_hidden(path) && path.extension().is_some_and(|ext| ext == "md")
}
