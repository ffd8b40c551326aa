//! Recursive copy.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::progress::{OperationComplete, OperationProgress, OperationType};

/// What to do with one entry of the source tree.
enum CopyStep {
    File,
    Symlink,
}

/// Copy `source` to `dest`.
///
/// Directories are copied in two passes: the whole directory structure is
/// created first, then file contents are copied, overwriting any file that
/// already exists at a destination leaf. Failures are recorded and the walk
/// continues with the remaining entries.
pub fn copy_entry(source: &Path, dest: &Path) -> OperationComplete {
    debug!(from = %source.display(), to = %dest.display(), "copying");
    let mut progress = OperationProgress::new(OperationType::Copy);

    let (directories, leaves) = plan_copy(source, dest, &mut progress);

    for dir in &directories {
        progress.set_current_file(Some(dir.clone()));
        match fs::create_dir_all(dir) {
            Ok(()) => progress.complete_file(0),
            Err(e) => progress.add_error(dir, format!("Failed to create directory: {e}")),
        }
    }

    for (from, to, step) in leaves {
        progress.set_current_file(Some(from.clone()));
        let result = match step {
            CopyStep::Symlink => copy_symlink(&from, &to),
            CopyStep::File => fs::copy(&from, &to),
        };
        match result {
            Ok(bytes) => progress.complete_file(bytes),
            Err(e) => progress.add_error(&from, format!("Failed to copy: {e}")),
        }
    }

    progress.set_current_file(None);
    progress.finish()
}

/// Walk the source tree with an explicit stack and collect the directories to
/// create (parents before children) and the leaves to copy.
fn plan_copy(
    source: &Path,
    dest: &Path,
    progress: &mut OperationProgress,
) -> (Vec<PathBuf>, Vec<(PathBuf, PathBuf, CopyStep)>) {
    let mut directories = Vec::new();
    let mut leaves = Vec::new();
    let mut stack = vec![(source.to_path_buf(), dest.to_path_buf())];

    while let Some((from, to)) = stack.pop() {
        let file_type = match fs::symlink_metadata(&from) {
            Ok(m) => m.file_type(),
            Err(e) => {
                progress.add_error(&from, format!("Failed to read metadata: {e}"));
                continue;
            }
        };

        if file_type.is_symlink() {
            leaves.push((from, to, CopyStep::Symlink));
        } else if file_type.is_file() {
            leaves.push((from, to, CopyStep::File));
        } else if file_type.is_dir() {
            let entries = match fs::read_dir(&from) {
                Ok(entries) => entries,
                Err(e) => {
                    progress.add_error(&from, format!("Failed to read directory: {e}"));
                    continue;
                }
            };
            directories.push(to.clone());
            for entry in entries {
                match entry {
                    Ok(entry) => stack.push((entry.path(), to.join(entry.file_name()))),
                    Err(e) => progress.add_error(&from, format!("Failed to read entry: {e}")),
                }
            }
        } else {
            progress.add_error(&from, "Unsupported file type");
        }
    }

    (directories, leaves)
}

/// Recreate a symlink at `to`, replacing whatever is there.
#[cfg(unix)]
fn copy_symlink(from: &Path, to: &Path) -> std::io::Result<u64> {
    let target = fs::read_link(from)?;
    if fs::symlink_metadata(to).is_ok() {
        fs::remove_file(to)?;
    }
    std::os::unix::fs::symlink(target, to)?;
    Ok(0)
}

#[cfg(not(unix))]
fn copy_symlink(from: &Path, to: &Path) -> std::io::Result<u64> {
    fs::copy(from, to)
}
