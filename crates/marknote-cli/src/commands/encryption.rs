//! Handlers for encrypting, decrypting and re-keying notes.

use marknote_core::crypto::is_encrypted;
use marknote_core::MarkNoteError;

use crate::app::AppContext;
use crate::cli::{CryptArgs, PasswdArgs, StatusArgs};
use crate::constants::env;
use crate::helpers::{prompt_new_password, prompt_password};
use crate::ui::{self, receipt, Column};

use super::report_batch;

pub fn handle_encrypt(ctx: &AppContext, args: &CryptArgs) -> anyhow::Result<()> {
    let manager = ctx.manager()?;
    let ui_ctx = ctx.ui_context(false, None);
    let interactive = !args.no_input && ui_ctx.is_interactive();

    let password = prompt_new_password(env::PASSWORD, interactive)?;
    let outcomes = manager.batch_encrypt(&args.titles, args.category.as_deref(), &password);
    report_batch(ctx, &ui_ctx, "Encrypted", outcomes)
}

pub fn handle_decrypt(ctx: &AppContext, args: &CryptArgs) -> anyhow::Result<()> {
    let manager = ctx.manager()?;
    let ui_ctx = ctx.ui_context(false, None);
    let interactive = !args.no_input && ui_ctx.is_interactive();

    let password = prompt_password("Password", interactive)?;
    let outcomes = manager.batch_decrypt(&args.titles, args.category.as_deref(), &password);
    report_batch(ctx, &ui_ctx, "Decrypted", outcomes)
}

pub fn handle_passwd(ctx: &AppContext, args: &PasswdArgs) -> anyhow::Result<()> {
    let manager = ctx.manager()?;
    let ui_ctx = ctx.ui_context(false, None);
    let interactive = !args.no_input && ui_ctx.is_interactive();
    let category = args.note.category.as_deref();

    // Fail before prompting when the note is missing or not encrypted.
    if !manager.is_note_encrypted(&args.note.title, category)? {
        return Err(MarkNoteError::NotEncrypted(args.note.title.clone()).into());
    }

    let old_password = prompt_password("Current password", interactive)?;
    let new_password = prompt_new_password(env::NEW_PASSWORD, interactive)?;
    let note =
        manager.change_note_password(&args.note.title, category, &old_password, &new_password)?;

    if !ctx.quiet() {
        println!(
            "{}",
            receipt(&ui_ctx, "Password changed", &[("Title", note.title.as_str())])
        );
    }
    Ok(())
}

pub fn handle_status(ctx: &AppContext, args: &StatusArgs) -> anyhow::Result<()> {
    let manager = ctx.manager()?;
    let ui_ctx = ctx.ui_context(args.json, None);
    let category = args.category.as_deref();

    let notes = match &args.title {
        Some(title) => vec![manager.get_note(title, category)?],
        None => manager.list_notes(None, category, true)?,
    };

    if ui_ctx.mode.is_json() {
        let rows: Vec<serde_json::Value> = notes
            .iter()
            .map(|note| {
                serde_json::json!({
                    "title": note.title,
                    "category": note.category,
                    "is_encrypted": is_encrypted(&note.content),
                    "encrypted_at": note.encryption.as_ref().map(|e| e.encrypted_at),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    let pretty = ui_ctx.mode.is_pretty();
    let columns = [Column::new("Title"), Column::new("Status"), Column::new("Since")];
    let rows: Vec<Vec<String>> = notes
        .iter()
        .map(|note| {
            let (status, since) = if is_encrypted(&note.content) {
                let since = note
                    .encryption
                    .as_ref()
                    .map(|info| ui::format_datetime(&info.encrypted_at, pretty))
                    .unwrap_or_else(|| "-".to_string());
                ("encrypted", since)
            } else {
                ("plain", "-".to_string())
            };
            vec![note.title.clone(), status.to_string(), since]
        })
        .collect();
    println!("{}", ui::simple_table(&ui_ctx, &columns, &rows));
    Ok(())
}
