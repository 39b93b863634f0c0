use std::fs;

use tempfile::{tempdir, TempDir};

use marknote_core::crypto::is_encrypted;
use marknote_core::versioning::DiffLine;
use marknote_core::{FileVersionStore, MarkNoteError, NoteManager, NotesSettings};

fn manager() -> (TempDir, NoteManager) {
    let dir = tempdir().unwrap();
    let mut settings = NotesSettings::new(dir.path().join("notes"));
    settings.author = Some("tester".to_string());
    let store = FileVersionStore::new(dir.path().join("versions"));
    (dir, NoteManager::new(settings, store))
}

#[test]
fn test_encrypt_decrypt_note_on_disk() {
    let (_dir, mgr) = manager();
    let note = mgr
        .create_note("Secret", Some("# Secret\n\nTop secret."), &["private".into()], None)
        .unwrap();

    mgr.encrypt_note("Secret", None, "correct-horse").unwrap();

    let raw = fs::read_to_string(&note.path).unwrap();
    assert!(raw.contains("is_encrypted: true"));
    assert!(raw.contains("encryption_version: 1"));
    assert!(!raw.contains("Top secret."));
    assert!(mgr.is_note_encrypted("Secret", None).unwrap());

    let err = mgr.encrypt_note("Secret", None, "correct-horse").unwrap_err();
    assert!(matches!(err, MarkNoteError::AlreadyEncrypted(_)));

    let err = mgr.decrypt_note("Secret", None, "wrong-password").unwrap_err();
    assert!(matches!(err, MarkNoteError::IncorrectPassword));
    assert!(mgr.is_note_encrypted("Secret", None).unwrap());

    let plain = mgr.decrypt_note("Secret", None, "correct-horse").unwrap();
    assert_eq!(plain.content, "# Secret\n\nTop secret.");
    assert!(plain.encryption.is_none());
    assert_eq!(plain.tags, vec!["private"]);

    let raw = fs::read_to_string(&note.path).unwrap();
    assert!(!raw.contains("is_encrypted"));

    let err = mgr.decrypt_note("Secret", None, "correct-horse").unwrap_err();
    assert!(matches!(err, MarkNoteError::NotEncrypted(_)));
}

#[test]
fn test_change_note_password() {
    let (dir, mgr) = manager();
    mgr.create_note("Vault", Some("contents"), &[], Some("private")).unwrap();
    mgr.encrypt_note("Vault", Some("private"), "old-password").unwrap();

    let err = mgr
        .change_note_password("Vault", Some("private"), "nope-nope", "new-password")
        .unwrap_err();
    assert!(matches!(err, MarkNoteError::IncorrectPassword));

    let rotated = mgr
        .change_note_password("Vault", Some("private"), "old-password", "new-password")
        .unwrap();
    assert!(is_encrypted(&rotated.content));

    let view = mgr.read_decrypted("Vault", None, "new-password").unwrap();
    assert_eq!(view.content, "contents");
    assert!(matches!(
        mgr.read_decrypted("Vault", None, "old-password"),
        Err(MarkNoteError::IncorrectPassword)
    ));

    let staged: Vec<_> = fs::read_dir(dir.path().join("notes").join("private"))
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .filter(|n| n.starts_with('.'))
        .collect();
    assert!(staged.is_empty(), "staging files left behind: {staged:?}");
}

#[test]
fn test_batch_encrypt_reports_per_note() {
    let (_dir, mgr) = manager();
    mgr.create_note("One", None, &[], None).unwrap();
    mgr.create_note("Two", None, &[], None).unwrap();

    let outcomes = mgr.batch_encrypt(
        &["One".to_string(), "Missing".to_string(), "Two".to_string()],
        None,
        "batch-password",
    );

    assert_eq!(outcomes.len(), 3);
    assert!(outcomes[0].result.is_ok());
    assert!(matches!(outcomes[1].result, Err(MarkNoteError::NoteNotFound(_))));
    assert!(outcomes[2].result.is_ok());

    let decrypted = mgr.batch_decrypt(&["One".to_string(), "Two".to_string()], None, "batch-password");
    assert!(decrypted.iter().all(|o| o.result.is_ok()));
}

#[test]
fn test_restore_note_version_records_new_version() {
    let (_dir, mgr) = manager();
    mgr.create_note("Draft", Some("first draft"), &[], None).unwrap();
    mgr.update_note("Draft", None, Some("second draft"), None, None).unwrap();

    let history = mgr.version_history("Draft", None).unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].author, "tester");

    let diff = mgr
        .diff_versions("Draft", None, &history[0].version_id, None)
        .unwrap();
    assert!(diff.contains(&DiffLine::Removed("first draft".to_string())));
    assert!(diff.contains(&DiffLine::Added("second draft".to_string())));

    mgr.restore_note_version("Draft", None, &history[0].version_id)
        .unwrap();
    assert_eq!(mgr.get_note("Draft", None).unwrap().content, "first draft");

    let history = mgr.version_history("Draft", None).unwrap();
    assert_eq!(history.len(), 3);
    assert_eq!(
        history[2].message,
        format!("Restored from version {}", history[0].version_id)
    );

    let (content, _) = mgr
        .version_content("Draft", None, &history[2].version_id)
        .unwrap();
    assert!(content.contains("first draft"));

    assert_eq!(mgr.purge_versions("Draft", None).unwrap(), 3);
    assert!(mgr.version_history("Draft", None).unwrap().is_empty());
}

#[test]
fn test_manual_version_and_missing_note() {
    let (_dir, mgr) = manager();
    mgr.create_note("Manual", None, &[], None).unwrap();

    let id = mgr.create_version("Manual", None, Some("checkpoint")).unwrap();
    assert!(id.starts_with("v000002_"));

    let err = mgr.create_version("Nope", None, None).unwrap_err();
    assert!(matches!(err, MarkNoteError::NoteNotFound(_)));
}

#[test]
fn test_encrypting_seals_version_history() {
    let (_dir, mgr) = manager();
    mgr.create_note("Secret", Some("TOP SECRET BODY"), &[], None).unwrap();
    mgr.update_note("Secret", None, Some("TOP SECRET BODY v2"), None, None)
        .unwrap();

    mgr.encrypt_note("Secret", None, "correct-horse").unwrap();

    let history = mgr.version_history("Secret", None).unwrap();
    assert_eq!(history.len(), 3);
    assert_eq!(history[2].message, "Encrypted note");
    for record in &history {
        let (text, _) = mgr
            .version_content("Secret", None, &record.version_id)
            .unwrap();
        assert!(!text.contains("TOP SECRET"), "{} leaks plaintext", record.version_id);
        assert!(text.contains("is_encrypted: true"));
    }

    mgr.restore_note_version("Secret", None, &history[0].version_id)
        .unwrap();
    assert!(mgr.is_note_encrypted("Secret", None).unwrap());
    let view = mgr.read_decrypted("Secret", None, "correct-horse").unwrap();
    assert_eq!(view.content, "TOP SECRET BODY");
}

#[test]
fn test_password_change_rekeys_history() {
    let (_dir, mgr) = manager();
    mgr.create_note("Vault", Some("old body"), &[], None).unwrap();
    mgr.encrypt_note("Vault", None, "old-password").unwrap();
    mgr.change_note_password("Vault", None, "old-password", "new-password")
        .unwrap();

    let first = mgr.version_history("Vault", None).unwrap()[0].version_id.clone();
    mgr.restore_note_version("Vault", None, &first).unwrap();

    let view = mgr.read_decrypted("Vault", None, "new-password").unwrap();
    assert_eq!(view.content, "old body");
    assert!(matches!(
        mgr.read_decrypted("Vault", None, "old-password"),
        Err(MarkNoteError::IncorrectPassword)
    ));
}

#[test]
fn test_decrypting_unseals_version_history() {
    let (_dir, mgr) = manager();
    mgr.create_note("Diary", Some("dear diary"), &[], None).unwrap();
    mgr.encrypt_note("Diary", None, "diary-password").unwrap();
    mgr.decrypt_note("Diary", None, "diary-password").unwrap();

    let history = mgr.version_history("Diary", None).unwrap();
    let (text, _) = mgr
        .version_content("Diary", None, &history[0].version_id)
        .unwrap();
    assert!(text.contains("dear diary"));
    assert!(!text.contains("is_encrypted"));
}

#[test]
fn test_plaintext_snapshot_refused_while_encrypted() {
    let (dir, mgr) = manager();
    let note = mgr.create_note("Legacy", Some("old plaintext"), &[], None).unwrap();
    let first = mgr.version_history("Legacy", None).unwrap()[0].version_id.clone();
    mgr.encrypt_note("Legacy", None, "legacy-password").unwrap();

    // Snapshot written unencrypted by an older build.
    let note_id = marknote_core::versioning::generate_note_id(&note.path, &note.title);
    let snapshot = dir.path().join("versions").join(note_id).join(format!("{}.md", first));
    fs::write(&snapshot, "---\ntitle: Legacy\n---\nold plaintext\n").unwrap();

    let err = mgr.version_content("Legacy", None, &first).unwrap_err();
    assert!(matches!(err, MarkNoteError::UnsealedVersion(_)));

    let before = fs::read_to_string(&note.path).unwrap();
    let err = mgr.restore_note_version("Legacy", None, &first).unwrap_err();
    assert!(matches!(err, MarkNoteError::UnsealedVersion(_)));
    assert_eq!(fs::read_to_string(&note.path).unwrap(), before);
}

#[test]
fn test_list_skips_unreadable_files() {
    let (dir, mgr) = manager();
    mgr.create_note("Good", Some("fine"), &[], None).unwrap();
    fs::write(dir.path().join("notes").join("bad.md"), [0xff, 0xfe, 0x00]).unwrap();

    let notes = mgr.list_notes(None, None, false).unwrap();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].title, "Good");
}

#[test]
fn test_delete_removes_file_and_history() {
    let (dir, mgr) = manager();
    let note = mgr.create_note("Scratch", Some("temp"), &[], None).unwrap();
    let note_id = marknote_core::versioning::generate_note_id(&note.path, &note.title);

    mgr.delete_note("Scratch", None).unwrap();

    assert!(!note.path.exists());
    assert!(!dir.path().join("versions").join(note_id).exists());
    assert!(matches!(
        mgr.delete_note("Scratch", None),
        Err(MarkNoteError::NoteNotFound(_))
    ));
}

#[test]
fn test_batch_delete_and_tag_selection() {
    let (_dir, mgr) = manager();
    mgr.create_note("A", None, &["x".into(), "y".into()], None).unwrap();
    mgr.create_note("B", None, &["x".into()], None).unwrap();
    mgr.create_note("C", None, &["z".into()], None).unwrap();

    let any: Vec<String> = mgr
        .notes_with_tags(&["x".into(), "z".into()], false, None)
        .unwrap()
        .into_iter()
        .map(|n| n.title)
        .collect();
    assert_eq!(any.len(), 3);

    let all = mgr
        .notes_with_tags(&["x".into(), "y".into()], true, None)
        .unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].title, "A");

    let outcomes = mgr.batch_delete(&["A".to_string(), "Nope".to_string()], None);
    assert!(outcomes[0].result.is_ok());
    assert!(matches!(outcomes[1].result, Err(MarkNoteError::NoteNotFound(_))));
    assert_eq!(mgr.list_notes(None, None, true).unwrap().len(), 2);
}

#[test]
fn test_search_matches_title_tags_and_body() {
    let (_dir, mgr) = manager();
    mgr.create_note("Rust Tips", Some("borrow checker"), &[], None).unwrap();
    mgr.create_note("Groceries", Some("milk"), &["errands".into()], None).unwrap();
    mgr.create_note("Hidden", Some("milk secret"), &[], None).unwrap();
    mgr.encrypt_note("Hidden", None, "hidden-password").unwrap();

    let titles = |query: &str| -> Vec<String> {
        mgr.search_notes(query, false)
            .unwrap()
            .into_iter()
            .map(|n| n.title)
            .collect()
    };
    assert_eq!(titles("RUST"), vec!["Rust Tips"]);
    assert_eq!(titles("errand"), vec!["Groceries"]);
    assert_eq!(titles("milk"), vec!["Groceries"]);
    assert!(matches!(
        mgr.search_notes("  ", false),
        Err(MarkNoteError::InvalidInput(_))
    ));
}

#[test]
fn test_links_and_backlinks() {
    let (_dir, mgr) = manager();
    mgr.create_note("Hub", None, &[], None).unwrap();
    mgr.create_note("Spoke", None, &[], Some("refs")).unwrap();

    let hub = mgr.add_link("Hub", "Spoke", true, None, None).unwrap();
    assert_eq!(hub.linked_notes, vec!["Spoke"]);
    mgr.add_link("Hub", "Spoke", false, None, None).unwrap();
    assert_eq!(mgr.get_note("Hub", None).unwrap().linked_notes, vec!["Spoke"]);

    let report = mgr.linked_notes("Hub", None).unwrap();
    assert_eq!(report.linked.len(), 1);
    assert!(report.missing.is_empty());
    let backlinks = mgr.backlinks("Hub", None).unwrap();
    assert_eq!(backlinks[0].title, "Spoke");

    assert!(matches!(
        mgr.add_link("Hub", "Hub", false, None, None),
        Err(MarkNoteError::InvalidInput(_))
    ));

    mgr.remove_link("Hub", "spoke", true, None, None).unwrap();
    assert!(mgr.get_note("Hub", None).unwrap().linked_notes.is_empty());
    assert!(mgr.get_note("Spoke", None).unwrap().linked_notes.is_empty());
    assert!(matches!(
        mgr.remove_link("Hub", "Spoke", false, None, None),
        Err(MarkNoteError::InvalidInput(_))
    ));
}

#[test]
fn test_dangling_link_reported_missing() {
    let (_dir, mgr) = manager();
    mgr.create_note("Index", None, &[], None).unwrap();
    mgr.create_note("Gone", None, &[], None).unwrap();
    mgr.add_link("Index", "Gone", false, None, None).unwrap();
    mgr.delete_note("Gone", None).unwrap();

    let report = mgr.linked_notes("Index", None).unwrap();
    assert!(report.linked.is_empty());
    assert_eq!(report.missing, vec!["Gone"]);
}

#[test]
fn test_tag_and_category_counts() {
    let (_dir, mgr) = manager();
    mgr.create_note("One", None, &["a".into(), "b".into()], Some("work")).unwrap();
    mgr.create_note("Two", None, &["a".into()], Some("work")).unwrap();
    mgr.create_note("Three", None, &[], None).unwrap();

    let tags = mgr.tag_counts(false).unwrap();
    assert_eq!(tags, vec![("a".to_string(), 2), ("b".to_string(), 1)]);

    let categories = mgr.category_counts(false).unwrap();
    assert_eq!(categories, vec![(Some("work".to_string()), 2), (None, 1)]);
}
