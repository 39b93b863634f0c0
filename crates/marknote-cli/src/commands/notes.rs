//! Handlers for creating, reading, listing, searching, editing, archiving
//! and deleting notes.

use chrono::Utc;

use marknote_core::crypto::is_encrypted;
use marknote_core::MarkNoteError;

use crate::app::AppContext;
use crate::cli::{
    ArchiveArgs, BulkDeleteArgs, BulkDeleteSubcommand, DeleteArgs, EditArgs, ListArgs, NewArgs,
    NoteArgs, SearchArgs, ShowArgs,
};
use crate::errors::CliError;
use crate::helpers::{
    confirm, parse_duration, parse_tags, prompt_password, read_note_body, read_password_stdin,
};
use crate::output::{note_json, notes_json, print_note, print_note_list};
use crate::ui::{badge, receipt, Badge};

use super::report_batch;

pub fn handle_new(ctx: &AppContext, args: &NewArgs) -> anyhow::Result<()> {
    let manager = ctx.manager()?;
    let body = read_note_body(args.no_input, args.body.clone(), ctx.editor()?, None)?;
    let tags = parse_tags(&args.tag);

    let note = manager.create_note(&args.title, body.as_deref(), &tags, args.category.as_deref())?;

    if !ctx.quiet() {
        let ui_ctx = ctx.ui_context(false, None);
        let path = note.path.display().to_string();
        let items = [("Title", note.title.as_str()), ("Path", path.as_str())];
        println!("{}", receipt(&ui_ctx, "Created", &items));
    }
    Ok(())
}

pub fn handle_show(ctx: &AppContext, args: &ShowArgs) -> anyhow::Result<()> {
    let manager = ctx.manager()?;
    let category = args.category.as_deref();
    let ui_ctx = ctx.ui_context(args.json, None);

    let mut note = manager.get_note(&args.title, category)?;
    if is_encrypted(&note.content) {
        let password = if args.password_stdin {
            read_password_stdin()?
        } else {
            prompt_password("Password", ui_ctx.is_interactive())?
        };
        note = manager.read_decrypted(&args.title, category, &password)?;
    }

    if ui_ctx.mode.is_json() {
        println!("{}", serde_json::to_string_pretty(&note_json(&note, true))?);
        return Ok(());
    }
    print_note(&ui_ctx, &note);
    Ok(())
}

pub fn handle_list(ctx: &AppContext, args: &ListArgs) -> anyhow::Result<()> {
    let manager = ctx.manager()?;
    let include_archived = args.all || args.archived;
    let mut notes =
        manager.list_notes(args.tag.as_deref(), args.category.as_deref(), include_archived)?;
    if args.archived {
        notes.retain(|note| note.is_archived());
    }

    if let Some(window) = &args.last {
        let since = Utc::now() - parse_duration(window)?;
        notes.retain(|note| note.updated_at >= since);
    }
    if let Some(limit) = args.limit {
        notes.truncate(limit);
    }

    let ui_ctx = ctx.ui_context(args.json, args.format.as_deref());
    if ui_ctx.mode.is_json() {
        println!("{}", serde_json::to_string_pretty(&notes_json(&notes))?);
        return Ok(());
    }
    if notes.is_empty() {
        if !ctx.quiet() {
            println!("{}", badge(&ui_ctx, Badge::Info, "No notes found"));
        }
        return Ok(());
    }
    print_note_list(&ui_ctx, &notes);
    Ok(())
}

pub fn handle_edit(ctx: &AppContext, args: &EditArgs) -> anyhow::Result<()> {
    let manager = ctx.manager()?;
    let category = args.category.as_deref();
    let current = manager.get_note(&args.title, category)?;

    let tags = if args.tag.is_empty() {
        None
    } else {
        Some(parse_tags(&args.tag))
    };
    let encrypted = is_encrypted(&current.content);
    if encrypted && args.body.is_none() && tags.is_none() {
        return Err(MarkNoteError::AlreadyEncrypted(current.title).into());
    }
    let body = if args.body.is_none() && (tags.is_some() || encrypted) {
        None
    } else {
        read_note_body(
            args.no_input,
            args.body.clone(),
            ctx.editor()?,
            Some(&current.content),
        )?
    };
    if body.is_none() && tags.is_none() {
        return Err(CliError::invalid_input(
            "Nothing to change: pass --body or --tag, or pipe content on stdin",
        )
        .into());
    }

    let note = manager.update_note(
        &args.title,
        category,
        body.as_deref(),
        tags,
        args.message.as_deref(),
    )?;

    if !ctx.quiet() {
        let ui_ctx = ctx.ui_context(false, None);
        println!("{}", receipt(&ui_ctx, "Updated", &[("Title", note.title.as_str())]));
    }
    Ok(())
}

pub fn handle_archive(ctx: &AppContext, args: &ArchiveArgs) -> anyhow::Result<()> {
    let ui_ctx = ctx.ui_context(false, None);
    let outcomes = ctx.manager()?.batch_archive(
        &args.titles,
        args.category.as_deref(),
        args.reason.as_deref(),
    );
    report_batch(ctx, &ui_ctx, "Archived", outcomes)
}

pub fn handle_unarchive(ctx: &AppContext, args: &NoteArgs) -> anyhow::Result<()> {
    let note = ctx
        .manager()?
        .unarchive_note(&args.title, args.category.as_deref())?;
    if !ctx.quiet() {
        let ui_ctx = ctx.ui_context(false, None);
        println!("{}", receipt(&ui_ctx, "Unarchived", &[("Title", note.title.as_str())]));
    }
    Ok(())
}

pub fn handle_search(ctx: &AppContext, args: &SearchArgs) -> anyhow::Result<()> {
    let notes = ctx.manager()?.search_notes(&args.query, args.all)?;

    let ui_ctx = ctx.ui_context(args.json, args.format.as_deref());
    if ui_ctx.mode.is_json() {
        println!("{}", serde_json::to_string_pretty(&notes_json(&notes))?);
        return Ok(());
    }
    if notes.is_empty() {
        if !ctx.quiet() {
            let message = format!("No notes match \"{}\"", args.query);
            println!("{}", badge(&ui_ctx, Badge::Info, &message));
        }
        return Ok(());
    }
    print_note_list(&ui_ctx, &notes);
    Ok(())
}

pub fn handle_delete(ctx: &AppContext, args: &DeleteArgs) -> anyhow::Result<()> {
    let manager = ctx.manager()?;
    let category = args.note.category.as_deref();
    let ui_ctx = ctx.ui_context(false, None);

    // Resolve the note first so a bad title fails before the prompt.
    let note = manager.get_note(&args.note.title, category)?;

    if !args.yes {
        let prompt = format!("Delete \"{}\" and its version history?", note.title);
        if !confirm(&prompt, ui_ctx.is_interactive())? {
            if !ctx.quiet() {
                println!("{}", badge(&ui_ctx, Badge::Info, "Deletion cancelled"));
            }
            return Ok(());
        }
    }

    let note = manager.delete_note(&args.note.title, category)?;
    tracing::info!(path = %note.path.display(), "deleted note");
    if !ctx.quiet() {
        let path = note.path.display().to_string();
        let items = [("Title", note.title.as_str()), ("Path", path.as_str())];
        println!("{}", receipt(&ui_ctx, "Deleted", &items));
    }
    Ok(())
}

pub fn handle_bulk_delete(ctx: &AppContext, args: &BulkDeleteArgs) -> anyhow::Result<()> {
    let manager = ctx.manager()?;
    let ui_ctx = ctx.ui_context(false, None);

    let (titles, category, yes) = match &args.command {
        BulkDeleteSubcommand::Titles(args) => {
            (args.titles.clone(), args.category.as_deref(), args.yes)
        }
        BulkDeleteSubcommand::Tags(args) => {
            let tags = parse_tags(&args.tags);
            let matched = manager.notes_with_tags(&tags, args.all_tags, args.category.as_deref())?;
            let titles: Vec<String> = matched.into_iter().map(|note| note.title).collect();
            (titles, args.category.as_deref(), args.yes)
        }
    };

    if titles.is_empty() {
        if !ctx.quiet() {
            println!("{}", badge(&ui_ctx, Badge::Info, "No matching notes"));
        }
        return Ok(());
    }

    if !yes {
        if ui_ctx.is_interactive() {
            eprintln!("About to delete {} notes:", titles.len());
            for title in &titles {
                eprintln!("  - {}", title);
            }
        }
        if !confirm("Delete these notes and their version history?", ui_ctx.is_interactive())? {
            if !ctx.quiet() {
                println!("{}", badge(&ui_ctx, Badge::Info, "Deletion cancelled"));
            }
            return Ok(());
        }
    }

    let outcomes = manager.batch_delete(&titles, category);
    report_batch(ctx, &ui_ctx, "Deleted", outcomes)
}
