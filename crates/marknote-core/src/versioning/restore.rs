//! Overwrite a live note file with snapshot content, rolling back on failure.

use std::fs;
use std::io;
use std::path::Path;

use crate::error::{MarkNoteError, Result};
use crate::fs::TransientBackup;

/// Write `content` to `path`, restoring the previous file if the write fails.
///
/// The transient backup is removed on every exit path.
pub fn restore_file(path: &Path, content: &str) -> Result<()> {
    restore_file_with(path, content, |target, text| fs::write(target, text))
}

/// [`restore_file`] with a caller-supplied writer.
pub fn restore_file_with<W>(path: &Path, content: &str, write: W) -> Result<()>
where
    W: FnOnce(&Path, &str) -> io::Result<()>,
{
    let backup = if path.exists() {
        Some(TransientBackup::create(path)?)
    } else {
        None
    };

    if let Err(source) = write(path, content) {
        tracing::warn!(path = %path.display(), %source, "restore write failed, rolling back");
        let rollback = match &backup {
            Some(backup) => backup.restore(),
            None => match fs::remove_file(path) {
                Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
                _ => Ok(()),
            },
        };
        if let Err(err) = rollback {
            tracing::warn!(path = %path.display(), %err, "rollback after failed restore also failed");
        }
        return Err(MarkNoteError::RestoreFailed {
            path: path.to_path_buf(),
            source,
        });
    }

    Ok(())
}
