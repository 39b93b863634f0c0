//! Text and table output formatting.

use marknote_core::versioning::{DiffLine, DiffSummary, VersionRecord};
use marknote_core::Note;

use crate::ui::{self, format_datetime, single_line, truncate, Badge, Column, UiContext};

/// Print a single note with its frontmatter summary and body.
pub fn print_note(ctx: &UiContext, note: &Note) {
    let pretty = ctx.mode.is_pretty();
    println!("{}", ui::header(ctx, "show", Some(&note.title)));
    println!("{}", ui::kv(ctx, "Path", &note.path.display().to_string()));
    if let Some(category) = &note.category {
        println!("{}", ui::kv(ctx, "Category", category));
    }
    if !note.tags.is_empty() {
        println!("{}", ui::kv(ctx, "Tags", &note.tags.join(", ")));
    }
    println!(
        "{}",
        ui::kv(ctx, "Updated", &format_datetime(&note.updated_at, pretty))
    );
    if let Some(archive) = &note.archive {
        let mut status = format!("archived {}", format_datetime(&archive.archived_at, pretty));
        if let Some(reason) = &archive.reason {
            status.push_str(&format!(" ({})", reason));
        }
        println!("{}", ui::kv(ctx, "Status", &status));
    }
    println!();
    println!("{}", note.content);
}

/// Print notes as a table (pretty) or tab-separated rows (plain).
pub fn print_note_list(ctx: &UiContext, notes: &[Note]) {
    let pretty = ctx.mode.is_pretty();
    let columns = [
        Column::new("Title"),
        Column::new("Category"),
        Column::new("Tags"),
        Column::new("Updated"),
        Column::new(""),
    ];
    let rows: Vec<Vec<String>> = notes
        .iter()
        .map(|note| {
            let mut flags = Vec::new();
            if note.encryption.is_some() {
                flags.push(ui::badge(ctx, Badge::Locked, ""));
            }
            if note.is_archived() {
                flags.push("archived".to_string());
            }
            vec![
                truncate(&single_line(&note.title), 40),
                note.category.clone().unwrap_or_else(|| "-".to_string()),
                if note.tags.is_empty() {
                    "-".to_string()
                } else {
                    note.tags.join(",")
                },
                format_datetime(&note.updated_at, pretty),
                flags.join(" "),
            ]
        })
        .collect();

    println!("{}", ui::simple_table(ctx, &columns, &rows));
}

/// Print a note's version history, oldest first.
pub fn print_version_list(ctx: &UiContext, title: &str, versions: &[VersionRecord]) {
    let pretty = ctx.mode.is_pretty();
    if pretty {
        println!("{}", ui::header(ctx, "versions", Some(title)));
    }
    let columns = [
        Column::new("Version"),
        Column::new("Saved"),
        Column::new("Author"),
        Column::new("Message"),
    ];
    let rows: Vec<Vec<String>> = versions
        .iter()
        .map(|v| {
            vec![
                v.version_id.clone(),
                format_datetime(&v.timestamp, pretty),
                v.author.clone(),
                truncate(&single_line(&v.message), 60),
            ]
        })
        .collect();
    println!("{}", ui::simple_table(ctx, &columns, &rows));
}

/// Print a diff with a one-line summary.
pub fn print_diff(ctx: &UiContext, from: &str, to: &str, lines: &[DiffLine]) {
    let summary = DiffSummary::from_lines(lines);
    if ctx.mode.is_pretty() {
        println!("{}", ui::header(ctx, "diff", Some(&format!("{} -> {}", from, to))));
    }
    if summary.is_identical() {
        println!("{}", ui::badge(ctx, Badge::Info, "No differences"));
        return;
    }
    for line in lines {
        println!("{}", ui::diff_line(ctx, line));
    }
    if ctx.mode.is_pretty() {
        println!();
        println!(
            "{}",
            ui::kv(
                ctx,
                "Changes",
                &format!("+{} -{}", summary.added, summary.removed)
            )
        );
    }
}
