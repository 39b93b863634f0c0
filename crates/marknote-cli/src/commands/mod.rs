//! Command handlers, one module per command family.

use marknote_core::notes::BatchOutcome;

use crate::app::AppContext;
use crate::ui::{badge, Badge, UiContext};

pub mod encryption;
pub mod init;
pub mod links;
pub mod misc;
pub mod notes;
pub mod stats;
pub mod versions;

/// Print one line per note. The first failure becomes the command's error
/// so the exit code reflects it.
pub(crate) fn report_batch(
    ctx: &AppContext,
    ui_ctx: &UiContext,
    verb: &str,
    outcomes: Vec<BatchOutcome>,
) -> anyhow::Result<()> {
    let total = outcomes.len();
    let mut first_error = None;
    let mut failed = 0;

    for outcome in outcomes {
        match outcome.result {
            Ok(note) => {
                if !ctx.quiet() {
                    let message = format!("{} {}", verb, note.title);
                    println!("{}", badge(ui_ctx, Badge::Ok, &message));
                }
            }
            Err(err) => {
                failed += 1;
                tracing::debug!(title = %outcome.title, error = %err, "batch item failed");
                if total > 1 {
                    eprintln!(
                        "{}",
                        badge(ui_ctx, Badge::Err, &format!("{}: {}", outcome.title, err))
                    );
                }
                if first_error.is_none() {
                    first_error = Some(err);
                }
            }
        }
    }

    match first_error {
        Some(err) => {
            if total > 1 && !ctx.quiet() {
                eprintln!("{} of {} notes failed", failed, total);
            }
            Err(err.into())
        }
        None => Ok(()),
    }
}
