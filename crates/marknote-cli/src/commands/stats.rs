//! Handlers for note statistics: tag usage, categories, counts and word counts.

use marknote_core::crypto::is_encrypted;

use crate::app::AppContext;
use crate::cli::{CountArgs, StatsArgs, WordcountArgs};
use crate::helpers::{prompt_password, read_password_stdin};
use crate::ui::{self, badge, Badge, Column};

/// Label for notes with no category.
const UNCATEGORIZED: &str = "(none)";

pub fn handle_tags(ctx: &AppContext, args: &StatsArgs) -> anyhow::Result<()> {
    let counts = ctx.manager()?.tag_counts(args.all)?;
    let ui_ctx = ctx.ui_context(args.json, None);

    if ui_ctx.mode.is_json() {
        let rows: Vec<serde_json::Value> = counts
            .iter()
            .map(|(tag, count)| serde_json::json!({"tag": tag, "count": count}))
            .collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }
    if counts.is_empty() {
        if !ctx.quiet() {
            println!("{}", badge(&ui_ctx, Badge::Info, "No tags in use"));
        }
        return Ok(());
    }

    let rows: Vec<Vec<String>> = counts
        .into_iter()
        .map(|(tag, count)| vec![tag, count.to_string()])
        .collect();
    let columns = [Column::new("Tag"), Column::new("Notes")];
    println!("{}", ui::simple_table(&ui_ctx, &columns, &rows));
    Ok(())
}

pub fn handle_categories(ctx: &AppContext, args: &StatsArgs) -> anyhow::Result<()> {
    let counts = ctx.manager()?.category_counts(args.all)?;
    let ui_ctx = ctx.ui_context(args.json, None);

    if ui_ctx.mode.is_json() {
        let rows: Vec<serde_json::Value> = counts
            .iter()
            .map(|(category, count)| serde_json::json!({"category": category, "count": count}))
            .collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    let rows: Vec<Vec<String>> = counts
        .into_iter()
        .map(|(category, count)| {
            vec![
                category.unwrap_or_else(|| UNCATEGORIZED.to_string()),
                count.to_string(),
            ]
        })
        .collect();
    let columns = [Column::new("Category"), Column::new("Notes")];
    println!("{}", ui::simple_table(&ui_ctx, &columns, &rows));
    Ok(())
}

pub fn handle_count(ctx: &AppContext, args: &CountArgs) -> anyhow::Result<()> {
    let notes =
        ctx.manager()?
            .list_notes(args.tag.as_deref(), args.category.as_deref(), args.all)?;
    let encrypted = notes.iter().filter(|n| is_encrypted(&n.content)).count();
    let archived = notes.iter().filter(|n| n.is_archived()).count();

    if args.json {
        let value = serde_json::json!({
            "total": notes.len(),
            "encrypted": encrypted,
            "archived": archived,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    let ui_ctx = ctx.ui_context(false, None);
    if ctx.quiet() || !ui_ctx.mode.is_pretty() {
        println!("{}", notes.len());
        return Ok(());
    }
    println!("{}", ui::kv(&ui_ctx, "Notes", &notes.len().to_string()));
    println!("{}", ui::kv(&ui_ctx, "Encrypted", &encrypted.to_string()));
    if args.all {
        println!("{}", ui::kv(&ui_ctx, "Archived", &archived.to_string()));
    }
    Ok(())
}

pub fn handle_wordcount(ctx: &AppContext, args: &WordcountArgs) -> anyhow::Result<()> {
    let manager = ctx.manager()?;
    let category = args.note.category.as_deref();
    let ui_ctx = ctx.ui_context(args.json, None);

    let mut note = manager.get_note(&args.note.title, category)?;
    if is_encrypted(&note.content) {
        let password = if args.password_stdin {
            read_password_stdin()?
        } else {
            prompt_password("Password", ui_ctx.is_interactive())?
        };
        note = manager.read_decrypted(&args.note.title, category, &password)?;
    }
    let words = note.word_count();

    if ui_ctx.mode.is_json() {
        let value = serde_json::json!({"title": note.title, "words": words});
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }
    if ctx.quiet() || !ui_ctx.mode.is_pretty() {
        println!("{}", words);
    } else {
        println!("{}", ui::kv(&ui_ctx, &note.title, &format!("{} words", words)));
    }
    Ok(())
}
