use serde_json::{json, Value};

use marknote_core::crypto::{change_password, decrypt_content, encrypt_content, is_encrypted};
use marknote_core::{ErrorKind, MarkNoteError, Metadata};

fn metadata(value: Value) -> Metadata {
    match value {
        Value::Object(map) => map,
        other => panic!("expected object, got {other}"),
    }
}

#[test]
fn test_round_trip_preserves_content_and_metadata() {
    let cases = [
        ("", metadata(json!({}))),
        ("plain line", metadata(json!({"title": "A"}))),
        (
            "# Heading\n\nUnicode: héllo 世界 🚀\n",
            metadata(json!({"title": "B", "tags": ["x", "y"], "nested": {"k": 1}})),
        ),
    ];

    for (content, meta) in cases {
        let blob = encrypt_content(content, "round-trip-pw", &meta).expect("encrypt");
        let payload = decrypt_content(&blob, "round-trip-pw").expect("decrypt");
        assert_eq!(payload.content, content);
        assert_eq!(payload.metadata, meta);
    }
}

#[test]
fn test_wrong_password_fails_closed() {
    let blob = encrypt_content("secret", "first-password", &Metadata::new()).expect("encrypt");

    for wrong in ["second-password", "", "first-password "] {
        let err = decrypt_content(&blob, wrong).expect_err("wrong password must fail");
        assert!(matches!(err, MarkNoteError::IncorrectPassword));
        assert_eq!(err.kind(), ErrorKind::Password);
    }
}

#[test]
fn test_ciphertext_differs_per_call() {
    let meta = metadata(json!({"title": "Same"}));
    let a = encrypt_content("same content", "pw-12345", &meta).expect("encrypt");
    let b = encrypt_content("same content", "pw-12345", &meta).expect("encrypt");

    assert_ne!(a, b);
    assert_eq!(decrypt_content(&a, "pw-12345").unwrap().content, "same content");
    assert_eq!(decrypt_content(&b, "pw-12345").unwrap().content, "same content");
}

#[test]
fn test_detection_precision() {
    let blob = encrypt_content("anything", "pw-12345", &Metadata::new()).expect("encrypt");
    assert!(is_encrypted(&blob));

    assert!(!is_encrypted(""));
    assert!(!is_encrypted("# Title\n\nSome *markdown* with `code`."));
    assert!(!is_encrypted("---\ntitle: x\n---\n\nbody"));
    assert!(!is_encrypted("QUJDRA=="));
}

#[test]
fn test_tampered_blob_is_rejected() {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;

    let blob = encrypt_content("integrity", "pw-12345", &Metadata::new()).expect("encrypt");
    let mut raw = STANDARD.decode(&blob).unwrap();
    let last = raw.len() - 1;
    raw[last] ^= 0x01;

    let err = decrypt_content(&STANDARD.encode(raw), "pw-12345").expect_err("tampered");
    assert!(err.is_decryption_failure());
}

#[test]
fn test_password_rotation() {
    let meta = metadata(json!({"title": "Rotate"}));
    let b1 = encrypt_content("rotating content", "old-password", &meta).expect("encrypt");
    let b2 = change_password(&b1, "old-password", "new-password").expect("rotate");

    let payload = decrypt_content(&b2, "new-password").expect("new password works");
    assert_eq!(payload.content, "rotating content");
    assert_eq!(payload.metadata, meta);

    assert!(matches!(
        decrypt_content(&b2, "old-password"),
        Err(MarkNoteError::IncorrectPassword)
    ));
    assert_eq!(
        decrypt_content(&b1, "old-password").unwrap().content,
        "rotating content"
    );
}

#[test]
fn test_secret_note_scenario() {
    let meta = metadata(json!({"title": "Secret"}));
    let blob = encrypt_content("# Secret\n\nTop secret.", "correct-horse", &meta).expect("encrypt");

    assert!(is_encrypted(&blob));

    let payload = decrypt_content(&blob, "correct-horse").expect("decrypt");
    assert_eq!(payload.content, "# Secret\n\nTop secret.");
    assert_eq!(payload.metadata["title"], json!("Secret"));

    let err = decrypt_content(&blob, "wrong-password").expect_err("wrong password");
    assert_eq!(err.kind(), ErrorKind::Password);
}

#[test]
fn test_malformed_and_wrong_password_are_distinguishable() {
    let malformed = decrypt_content("not an encrypted note", "pw").expect_err("malformed");
    assert_eq!(malformed.kind(), ErrorKind::Malformed);
    assert!(malformed.is_decryption_failure());

    let blob = encrypt_content("x", "pw-12345", &Metadata::new()).unwrap();
    let wrong = decrypt_content(&blob, "other-pw").expect_err("wrong");
    assert_ne!(malformed.kind(), wrong.kind());
}
