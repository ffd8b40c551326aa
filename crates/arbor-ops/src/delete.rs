//! Recursive deletion.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::progress::{OperationComplete, OperationProgress, OperationType};

/// Delete `path` and everything below it.
///
/// Children are removed before their directory. A failure on one child does
/// not stop the walk: every removable entry is still removed and the
/// completion reports what could not be. Symlinks are removed, never followed.
pub fn delete_recursive(path: &Path) -> OperationComplete {
    debug!(path = %path.display(), "deleting");
    let mut progress = OperationProgress::new(OperationType::Delete);

    // (path, children already queued)
    let mut stack: Vec<(PathBuf, bool)> = vec![(path.to_path_buf(), false)];

    while let Some((current, expanded)) = stack.pop() {
        progress.set_current_file(Some(current.clone()));

        if expanded {
            match fs::remove_dir(&current) {
                Ok(()) => progress.complete_file(0),
                Err(e) => progress.add_error(&current, format!("Failed to remove directory: {e}")),
            }
            continue;
        }

        let metadata = match fs::symlink_metadata(&current) {
            Ok(m) => m,
            Err(e) => {
                progress.add_error(&current, format!("Failed to read metadata: {e}"));
                continue;
            }
        };

        if !metadata.is_dir() {
            match remove_leaf(&current) {
                Ok(()) => progress.complete_file(metadata.len()),
                Err(e) => progress.add_error(&current, format!("Failed to remove: {e}")),
            }
            continue;
        }

        let entries = match fs::read_dir(&current) {
            Ok(entries) => entries,
            Err(e) => {
                progress.add_error(&current, format!("Failed to read directory: {e}"));
                continue;
            }
        };

        stack.push((current.clone(), true));
        for entry in entries {
            match entry {
                Ok(entry) => stack.push((entry.path(), false)),
                Err(e) => progress.add_error(&current, format!("Failed to read entry: {e}")),
            }
        }
    }

    progress.set_current_file(None);
    progress.finish()
}

#[cfg(not(windows))]
fn remove_leaf(path: &Path) -> std::io::Result<()> {
    fs::remove_file(path)
}

/// Directory symlinks and junctions need `remove_dir` on Windows.
#[cfg(windows)]
fn remove_leaf(path: &Path) -> std::io::Result<()> {
    fs::remove_file(path).or_else(|_| fs::remove_dir(path))
}
