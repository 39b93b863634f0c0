//! Filesystem utilities for staged writes and transient backups.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use uuid::Uuid;

/// Atomically rename a file, with fallback for platforms where rename fails if target exists.
///
/// On some platforms (notably Windows), `fs::rename` fails if the destination already exists.
/// This function handles that case by removing the destination first and retrying.
///
/// If the rename ultimately fails, the staged file is cleaned up.
pub fn rename_with_fallback(staged: &Path, destination: &Path) -> io::Result<()> {
    if let Err(initial_err) = fs::rename(staged, destination) {
        let _ = fs::remove_file(destination);
        fs::rename(staged, destination).map_err(|retry_err| {
            let _ = fs::remove_file(staged);
            io::Error::new(
                retry_err.kind(),
                format!(
                    "Atomic rename failed (initial: {}, retry: {})",
                    initial_err, retry_err
                ),
            )
        })?;
    }
    Ok(())
}

/// Path of a hidden sibling file used for staging or backups.
fn sibling_path(path: &Path, suffix: &str) -> io::Result<PathBuf> {
    let file_name = path
        .file_name()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "path has no file name"))?;
    let name = format!(
        ".{}.{}.{}",
        file_name.to_string_lossy(),
        Uuid::new_v4().simple(),
        suffix
    );
    Ok(match path.parent() {
        Some(parent) => parent.join(name),
        None => PathBuf::from(name),
    })
}

/// Write `contents` to `path` by staging a sibling file and renaming it into place.
///
/// Readers observe either the previous contents or the new contents, never a
/// partially written file. Parent directories are created as needed.
pub fn write_atomic(path: &Path, contents: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let staged = sibling_path(path, "tmp")?;
    let result = fs::File::create(&staged).and_then(|mut file| {
        file.write_all(contents)?;
        file.sync_all()
    });
    if let Err(err) = result {
        let _ = fs::remove_file(&staged);
        return Err(err);
    }
    rename_with_fallback(&staged, path)
}

/// Copy of a live file that is deleted when the guard goes out of scope.
///
/// Used around in-place overwrites: take a backup, overwrite, and on failure
/// call [`TransientBackup::restore`]. The backup never outlives the guard.
#[derive(Debug)]
pub struct TransientBackup {
    original: PathBuf,
    backup: PathBuf,
}

impl TransientBackup {
    /// Copy `original` to a hidden sibling backup file.
    pub fn create(original: &Path) -> io::Result<Self> {
        let backup = sibling_path(original, "backup")?;
        fs::copy(original, &backup)?;
        Ok(Self {
            original: original.to_path_buf(),
            backup,
        })
    }

    /// Path of the backup copy.
    pub fn path(&self) -> &Path {
        &self.backup
    }

    /// Copy the backup back over the original file.
    pub fn restore(&self) -> io::Result<()> {
        fs::copy(&self.backup, &self.original).map(|_| ())
    }
}

impl Drop for TransientBackup {
    fn drop(&mut self) {
        if let Err(err) = fs::remove_file(&self.backup) {
            if err.kind() != io::ErrorKind::NotFound {
                tracing::warn!(backup = %self.backup.display(), %err, "failed to remove transient backup");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::tempdir;

    fn leftover_files(dir: &Path) -> Vec<String> {
        fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .filter(|name| name.starts_with('.'))
            .collect()
    }

    #[test]
    fn test_rename_new_file() {
        let dir = tempdir().unwrap();
        let staged = dir.path().join("staged.txt");
        let dest = dir.path().join("dest.txt");

        File::create(&staged).unwrap().write_all(b"test").unwrap();

        rename_with_fallback(&staged, &dest).unwrap();

        assert!(!staged.exists());
        assert_eq!(fs::read_to_string(&dest).unwrap(), "test");
    }

    #[test]
    fn test_write_atomic_replaces_contents() {
        let dir = tempdir().unwrap();
        let dest = dir.path().join("note.md");
        fs::write(&dest, "old").unwrap();

        write_atomic(&dest, b"new").unwrap();

        assert_eq!(fs::read_to_string(&dest).unwrap(), "new");
        assert!(leftover_files(dir.path()).is_empty());
    }

    #[test]
    fn test_write_atomic_creates_parent_dirs() {
        let dir = tempdir().unwrap();
        let dest = dir.path().join("work").join("ideas").join("note.md");

        write_atomic(&dest, b"hello").unwrap();

        assert_eq!(fs::read_to_string(&dest).unwrap(), "hello");
    }

    #[test]
    fn test_backup_removed_on_drop() {
        let dir = tempdir().unwrap();
        let original = dir.path().join("note.md");
        fs::write(&original, "keep me").unwrap();

        let backup_path = {
            let backup = TransientBackup::create(&original).unwrap();
            assert!(backup.path().exists());
            backup.path().to_path_buf()
        };

        assert!(!backup_path.exists());
        assert!(leftover_files(dir.path()).is_empty());
    }

    #[test]
    fn test_backup_restore_recovers_original() {
        let dir = tempdir().unwrap();
        let original = dir.path().join("note.md");
        fs::write(&original, "before").unwrap();

        let backup = TransientBackup::create(&original).unwrap();
        fs::write(&original, "half-writ").unwrap();
        backup.restore().unwrap();
        drop(backup);

        assert_eq!(fs::read_to_string(&original).unwrap(), "before");
        assert!(leftover_files(dir.path()).is_empty());
    }
}
