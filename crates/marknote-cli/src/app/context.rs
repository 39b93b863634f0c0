//! Application context for the MarkNote CLI.
//!
//! Bundles the parsed CLI arguments with the config file and the note
//! manager, both loaded on first use.

use once_cell::unsync::OnceCell;

use marknote_core::{FileVersionStore, NoteManager};

use crate::cli::Cli;
use crate::config::MarkNoteConfig;
use crate::ui::UiContext;

use super::resolver::load_config;

pub struct AppContext<'a> {
    cli: &'a Cli,
    config: OnceCell<MarkNoteConfig>,
    manager: OnceCell<NoteManager>,
}

impl<'a> AppContext<'a> {
    pub fn new(cli: &'a Cli) -> Self {
        Self {
            cli,
            config: OnceCell::new(),
            manager: OnceCell::new(),
        }
    }

    pub fn cli(&self) -> &Cli {
        self.cli
    }

    pub fn quiet(&self) -> bool {
        self.cli.quiet
    }

    /// Get the configuration, loading it lazily if needed.
    pub fn config(&self) -> anyhow::Result<&MarkNoteConfig> {
        self.config.get_or_try_init(load_config)
    }

    /// Get the configured editor override, if any.
    pub fn editor(&self) -> anyhow::Result<Option<&str>> {
        Ok(self.config()?.ui.editor.as_deref())
    }

    /// The note manager for the resolved notes and versions directories.
    pub fn manager(&self) -> anyhow::Result<&NoteManager> {
        self.manager.get_or_try_init(|| {
            let config = self.config()?;
            let settings = config.to_settings(self.cli.notes_dir.as_deref())?;
            let versions_dir = config.versions_dir()?;
            tracing::debug!(
                notes_dir = %settings.notes_dir.display(),
                versions_dir = %versions_dir.display(),
                "opening notes"
            );
            Ok(NoteManager::new(settings, FileVersionStore::new(versions_dir)))
        })
    }

    /// UI context for a command's output flags.
    pub fn ui_context(&self, json: bool, format: Option<&str>) -> UiContext {
        UiContext::from_env(json, format, self.cli.no_color)
    }
}
