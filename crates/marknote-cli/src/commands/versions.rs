//! Handlers for the `versions` command group.

use crate::app::AppContext;
use crate::cli::{
    VersionCreateArgs, VersionDiffArgs, VersionListArgs, VersionPurgeArgs, VersionRestoreArgs,
    VersionShowArgs, VersionsArgs, VersionsSubcommand,
};
use crate::helpers::confirm;
use crate::output::{diff_json, print_diff, print_version_list, version_json, versions_json};
use crate::ui::{badge, hint, kv, receipt, Badge};

pub fn handle_versions(ctx: &AppContext, args: &VersionsArgs) -> anyhow::Result<()> {
    match &args.command {
        VersionsSubcommand::List(args) => handle_list(ctx, args),
        VersionsSubcommand::Show(args) => handle_show(ctx, args),
        VersionsSubcommand::Diff(args) => handle_diff(ctx, args),
        VersionsSubcommand::Restore(args) => handle_restore(ctx, args),
        VersionsSubcommand::Create(args) => handle_create(ctx, args),
        VersionsSubcommand::Purge(args) => handle_purge(ctx, args),
    }
}

fn handle_list(ctx: &AppContext, args: &VersionListArgs) -> anyhow::Result<()> {
    let manager = ctx.manager()?;
    let versions = manager.version_history(&args.note.title, args.note.category.as_deref())?;
    let ui_ctx = ctx.ui_context(args.json, None);

    if ui_ctx.mode.is_json() {
        println!("{}", serde_json::to_string_pretty(&versions_json(&versions))?);
        return Ok(());
    }
    if versions.is_empty() {
        if !ctx.quiet() {
            println!("{}", badge(&ui_ctx, Badge::Info, "No versions recorded"));
        }
        return Ok(());
    }
    print_version_list(&ui_ctx, &args.note.title, &versions);
    Ok(())
}

fn handle_show(ctx: &AppContext, args: &VersionShowArgs) -> anyhow::Result<()> {
    let manager = ctx.manager()?;
    let (content, record) = manager.version_content(
        &args.note.title,
        args.note.category.as_deref(),
        &args.version_id,
    )?;
    let ui_ctx = ctx.ui_context(args.json, None);

    if ui_ctx.mode.is_json() {
        let mut value = version_json(&record);
        if let Some(map) = value.as_object_mut() {
            map.insert("content".into(), serde_json::json!(content));
        }
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    if ui_ctx.mode.is_pretty() {
        println!("{}", kv(&ui_ctx, "Version", &record.version_id));
        println!("{}", kv(&ui_ctx, "Author", &record.author));
        println!("{}", kv(&ui_ctx, "Message", &record.message));
        println!();
    }
    print!("{}", content);
    if !content.ends_with('\n') {
        println!();
    }
    Ok(())
}

fn handle_diff(ctx: &AppContext, args: &VersionDiffArgs) -> anyhow::Result<()> {
    let manager = ctx.manager()?;
    let category = args.note.category.as_deref();
    let lines =
        manager.diff_versions(&args.note.title, category, &args.from, args.to.as_deref())?;

    let to = match &args.to {
        Some(to) => to.clone(),
        None => manager
            .version_history(&args.note.title, category)?
            .last()
            .map(|v| v.version_id.clone())
            .unwrap_or_default(),
    };

    let ui_ctx = ctx.ui_context(args.json, None);
    if ui_ctx.mode.is_json() {
        let value = diff_json(&args.from, &to, &lines);
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }
    print_diff(&ui_ctx, &args.from, &to, &lines);
    Ok(())
}

fn handle_restore(ctx: &AppContext, args: &VersionRestoreArgs) -> anyhow::Result<()> {
    let manager = ctx.manager()?;
    let category = args.note.category.as_deref();
    let ui_ctx = ctx.ui_context(false, None);

    // Resolve the version first so a bad id fails before the prompt.
    manager.version_content(&args.note.title, category, &args.version_id)?;

    if !args.yes {
        let prompt = format!(
            "Restore \"{}\" to version {}? The current content stays in history.",
            args.note.title, args.version_id
        );
        if !confirm(&prompt, ui_ctx.is_interactive())? {
            if !ctx.quiet() {
                println!("{}", badge(&ui_ctx, Badge::Info, "Restore cancelled"));
            }
            return Ok(());
        }
    }

    let new_version =
        manager.restore_note_version(&args.note.title, category, &args.version_id)?;
    tracing::info!(
        title = %args.note.title,
        from = %args.version_id,
        recorded = %new_version,
        "restored note"
    );

    if !ctx.quiet() {
        let items = [
            ("Title", args.note.title.as_str()),
            ("Restored", args.version_id.as_str()),
            ("Recorded As", new_version.as_str()),
        ];
        println!("{}", receipt(&ui_ctx, "Restored", &items));
    }
    Ok(())
}

fn handle_create(ctx: &AppContext, args: &VersionCreateArgs) -> anyhow::Result<()> {
    let manager = ctx.manager()?;
    let version_id = manager.create_version(
        &args.note.title,
        args.note.category.as_deref(),
        args.message.as_deref(),
    )?;

    if ctx.quiet() {
        println!("{}", version_id);
    } else {
        let ui_ctx = ctx.ui_context(false, None);
        let items = [
            ("Title", args.note.title.as_str()),
            ("Version", version_id.as_str()),
        ];
        println!("{}", receipt(&ui_ctx, "Version saved", &items));
    }
    Ok(())
}

fn handle_purge(ctx: &AppContext, args: &VersionPurgeArgs) -> anyhow::Result<()> {
    let manager = ctx.manager()?;
    let category = args.note.category.as_deref();
    let ui_ctx = ctx.ui_context(false, None);

    if !args.yes {
        let prompt = format!("Delete every saved version of \"{}\"?", args.note.title);
        if !confirm(&prompt, ui_ctx.is_interactive())? {
            if !ctx.quiet() {
                println!("{}", badge(&ui_ctx, Badge::Info, "Purge cancelled"));
            }
            return Ok(());
        }
    }

    let removed = manager.purge_versions(&args.note.title, category)?;
    if !ctx.quiet() {
        let count = removed.to_string();
        let items = [("Title", args.note.title.as_str()), ("Removed", count.as_str())];
        println!("{}", receipt(&ui_ctx, "Purged", &items));
        if removed == 0 && ui_ctx.mode.is_pretty() {
            println!("{}", hint(&ui_ctx, "The note had no saved versions."));
        }
    }
    Ok(())
}
