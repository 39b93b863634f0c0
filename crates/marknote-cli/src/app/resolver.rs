//! Path resolution for the config file.

use std::path::PathBuf;

use crate::config::{default_config_path, read_config, MarkNoteConfig};
use crate::constants::env;

/// Resolve the config file path, checking MARKNOTE_CONFIG first.
pub fn resolve_config_path() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var(env::CONFIG) {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value));
        }
    }
    default_config_path()
}

/// Load the config file, or the built-in defaults when there is none.
pub fn load_config() -> anyhow::Result<MarkNoteConfig> {
    let path = resolve_config_path()?;
    if path.exists() {
        tracing::debug!(path = %path.display(), "loading config");
        read_config(&path)
    } else {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        MarkNoteConfig::builtin()
    }
}
