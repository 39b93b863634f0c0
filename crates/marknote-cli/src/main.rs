//! MarkNote CLI - Markdown notes with per-note encryption and version history
//!
//! This is the command-line interface for MarkNote. It wires the core note
//! manager to subcommands, prompts and terminal output.

mod app;
mod cli;
mod commands;
mod config;
mod constants;
mod errors;
mod helpers;
mod output;
mod ui;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use marknote_core::MarkNoteError;

use crate::app::AppContext;
use crate::cli::{Cli, Commands};
use crate::commands::{encryption, init, links, misc, notes, stats, versions};
use crate::constants::env;
use crate::errors::CliError;
use crate::ui::{print_error, UiContext};

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let ctx = AppContext::new(&cli);

    if let Err(e) = run(&ctx, &cli) {
        let ui_ctx = ctx.ui_context(false, None);

        if let Some(err) = e.downcast_ref::<CliError>() {
            exit_with(&ui_ctx, err);
        }
        if let Some(err) = e.downcast_ref::<MarkNoteError>() {
            exit_with(&ui_ctx, &CliError::from_core(err));
        }

        let (message, hint) = split_hint(&format!("{:#}", e));
        print_error(&ui_ctx, &message, hint.as_deref());
        std::process::exit(1);
    }
}

fn exit_with(ui_ctx: &UiContext, err: &CliError) -> ! {
    print_error(ui_ctx, err.message(), err.hint());
    std::process::exit(err.exit_code());
}

/// Logs go to stderr. `MARKNOTE_LOG` takes an `EnvFilter` directive;
/// otherwise `--verbose` selects debug and the default is warn.
fn init_tracing(verbose: bool) {
    let default = if verbose {
        "marknote=debug,marknote_core=debug"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_env(env::LOG).unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Split an "...\nHint: ..." error message into message and hint.
fn split_hint(error: &str) -> (String, Option<String>) {
    match error.find("\nHint:") {
        Some(idx) => (
            error[..idx].to_string(),
            Some(error[idx + "\nHint:".len()..].trim().to_string()),
        ),
        None => (error.to_string(), None),
    }
}

fn run(ctx: &AppContext, cli: &Cli) -> anyhow::Result<()> {
    match &cli.command {
        Some(Commands::Init(args)) => init::handle_init(ctx, args),
        Some(Commands::New(args)) => notes::handle_new(ctx, args),
        Some(Commands::Show(args)) => notes::handle_show(ctx, args),
        Some(Commands::List(args)) => notes::handle_list(ctx, args),
        Some(Commands::Edit(args)) => notes::handle_edit(ctx, args),
        Some(Commands::Delete(args)) => notes::handle_delete(ctx, args),
        Some(Commands::BulkDelete(args)) => notes::handle_bulk_delete(ctx, args),
        Some(Commands::Search(args)) => notes::handle_search(ctx, args),
        Some(Commands::Archive(args)) => notes::handle_archive(ctx, args),
        Some(Commands::Unarchive(args)) => notes::handle_unarchive(ctx, args),
        Some(Commands::Link(args)) => links::handle_link(ctx, args),
        Some(Commands::Tags(args)) => stats::handle_tags(ctx, args),
        Some(Commands::Categories(args)) => stats::handle_categories(ctx, args),
        Some(Commands::Count(args)) => stats::handle_count(ctx, args),
        Some(Commands::Wordcount(args)) => stats::handle_wordcount(ctx, args),
        Some(Commands::Encrypt(args)) => encryption::handle_encrypt(ctx, args),
        Some(Commands::Decrypt(args)) => encryption::handle_decrypt(ctx, args),
        Some(Commands::Passwd(args)) => encryption::handle_passwd(ctx, args),
        Some(Commands::Status(args)) => encryption::handle_status(ctx, args),
        Some(Commands::Versions(args)) => versions::handle_versions(ctx, args),
        Some(Commands::Completions(args)) => misc::handle_completions(args.shell),
        None => {
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
            Ok(())
        }
    }
}
