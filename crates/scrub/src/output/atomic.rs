//! Write-then-rename so a failed write never leaves a partial file behind.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, ScrubError};

/// Sibling path used while a file is being written.
fn partial_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{}.partial", name))
}

/// Create the parent directory of `path` if needed.
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(|e| ScrubError::io(parent, e))?;
        }
    }
    Ok(())
}

/// Run `write` against a temporary sibling of `path`, then move it into place.
///
/// On failure the temporary file is removed and `path` is left untouched.
pub fn write_atomically<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&Path) -> Result<()>,
{
    ensure_parent_dir(path)?;
    let partial = partial_path(path);

    if let Err(e) = write(&partial) {
        let _ = fs::remove_file(&partial);
        return Err(e);
    }

    fs::rename(&partial, path).map_err(|e| {
        let _ = fs::remove_file(&partial);
        ScrubError::io(path, e)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writes_and_renames() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("nested").join("out.txt");

        write_atomically(&target, |tmp| {
            fs::write(tmp, "hello").map_err(|e| ScrubError::io(tmp, e))
        })
        .unwrap();

        assert_eq!(fs::read_to_string(&target).unwrap(), "hello");
        assert!(!partial_path(&target).exists());
    }

    #[test]
    fn test_failure_leaves_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("out.txt");

        let result = write_atomically(&target, |tmp| {
            fs::write(tmp, "half").map_err(|e| ScrubError::io(tmp, e))?;
            Err(ScrubError::EmptyData("boom".to_string()))
        });

        assert!(result.is_err());
        assert!(!target.exists());
        assert!(!partial_path(&target).exists());
    }
}
