//! Handlers for the `link` command group.

use crate::app::AppContext;
use crate::cli::{LinkArgs, LinkChangeArgs, LinkListArgs, LinkSubcommand};
use crate::output::{notes_json, print_note_list};
use crate::ui::{badge, hint, receipt, Badge};

pub fn handle_link(ctx: &AppContext, args: &LinkArgs) -> anyhow::Result<()> {
    match &args.command {
        LinkSubcommand::Add(args) => handle_add(ctx, args),
        LinkSubcommand::Remove(args) => handle_remove(ctx, args),
        LinkSubcommand::List(args) => handle_list(ctx, args),
    }
}

fn handle_add(ctx: &AppContext, args: &LinkChangeArgs) -> anyhow::Result<()> {
    let note = ctx.manager()?.add_link(
        &args.source,
        &args.target,
        args.bidirectional,
        args.category.as_deref(),
        args.target_category.as_deref(),
    )?;
    if !ctx.quiet() {
        let ui_ctx = ctx.ui_context(false, None);
        let direction = if args.bidirectional { "<->" } else { "->" };
        let link = format!("{} {} {}", note.title, direction, args.target);
        println!("{}", receipt(&ui_ctx, "Linked", &[("Link", link.as_str())]));
    }
    Ok(())
}

fn handle_remove(ctx: &AppContext, args: &LinkChangeArgs) -> anyhow::Result<()> {
    let note = ctx.manager()?.remove_link(
        &args.source,
        &args.target,
        args.bidirectional,
        args.category.as_deref(),
        args.target_category.as_deref(),
    )?;
    if !ctx.quiet() {
        let ui_ctx = ctx.ui_context(false, None);
        let link = format!("{} -> {}", note.title, args.target);
        println!("{}", receipt(&ui_ctx, "Unlinked", &[("Link", link.as_str())]));
    }
    Ok(())
}

fn handle_list(ctx: &AppContext, args: &LinkListArgs) -> anyhow::Result<()> {
    let manager = ctx.manager()?;
    let category = args.note.category.as_deref();
    let ui_ctx = ctx.ui_context(args.json, None);

    let (notes, missing) = if args.backlinks {
        (manager.backlinks(&args.note.title, category)?, Vec::new())
    } else {
        let report = manager.linked_notes(&args.note.title, category)?;
        (report.linked, report.missing)
    };

    if ui_ctx.mode.is_json() {
        let value = serde_json::json!({
            "title": args.note.title,
            "notes": notes_json(&notes),
            "missing": missing,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    if notes.is_empty() {
        if !ctx.quiet() {
            let message = if args.backlinks {
                "No notes link here"
            } else {
                "No linked notes"
            };
            println!("{}", badge(&ui_ctx, Badge::Info, message));
        }
    } else {
        print_note_list(&ui_ctx, &notes);
    }
    if !missing.is_empty() {
        let text = format!("Linked notes not found: {}", missing.join(", "));
        eprintln!("{}", hint(&ui_ctx, &text));
    }
    Ok(())
}
