//! Move with overwrite.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use tracing::debug;

use arbor_core::{OpsError, OpsResult};

use crate::conflict::{entry_exists, resolve_location, same_location};
use crate::copy::copy_entry;
use crate::delete::delete_recursive;

/// Move `source` to `dest`.
///
/// A directory moved onto an existing directory is merged into it: only
/// entries that collide by name are replaced, everything else already in
/// `dest` stays. Any other existing `dest` is replaced outright.
///
/// Tries a rename first and falls back to copy-then-delete when the rename
/// crosses filesystems.
pub fn move_entry(source: &Path, dest: &Path) -> OpsResult<()> {
    fs::symlink_metadata(source).map_err(|e| OpsError::io(source, e))?;

    if same_location(source, dest) {
        debug!(path = %source.display(), "source and destination are the same entry");
        return Ok(());
    }
    if !entry_exists(dest) {
        return rename_or_copy(source, dest);
    }
    if resolve_location(source).starts_with(resolve_location(dest)) {
        // Replacing the destination would remove the source with it.
        return Err(OpsError::AlreadyExists {
            path: dest.to_path_buf(),
        });
    }

    if is_real_dir(source) && is_real_dir(dest) {
        merge_into(source, dest)
    } else {
        replace(source, dest)
    }
}

/// Directory that is not reached through a symlink.
fn is_real_dir(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok_and(|m| m.is_dir())
}

/// Move every child of `source` into `dest`, descending where both sides hold
/// a directory of the same name, then remove the emptied source directories.
fn merge_into(source: &Path, dest: &Path) -> OpsResult<()> {
    debug!(from = %source.display(), to = %dest.display(), "merging into existing directory");
    let mut emptied = Vec::new();
    let mut stack = vec![(source.to_path_buf(), dest.to_path_buf())];

    while let Some((from, to)) = stack.pop() {
        for entry in fs::read_dir(&from).map_err(|e| OpsError::io(&from, e))? {
            let entry = entry.map_err(|e| OpsError::io(&from, e))?;
            let (child_from, child_to) = (entry.path(), to.join(entry.file_name()));
            if is_real_dir(&child_from) && is_real_dir(&child_to) {
                stack.push((child_from, child_to));
            } else {
                replace(&child_from, &child_to)?;
            }
        }
        emptied.push(from);
    }

    // Children were pushed after their parents.
    for dir in emptied.iter().rev() {
        fs::remove_dir(dir).map_err(|e| OpsError::io(dir, e))?;
    }
    Ok(())
}

/// Remove whatever occupies `dest`, then move `source` there.
fn replace(source: &Path, dest: &Path) -> OpsResult<()> {
    if entry_exists(dest) {
        debug!(path = %dest.display(), "replacing existing destination");
        delete_recursive(dest).into_result(dest)?;
    }
    rename_or_copy(source, dest)
}

fn rename_or_copy(source: &Path, dest: &Path) -> OpsResult<()> {
    debug!(from = %source.display(), to = %dest.display(), "moving");
    match fs::rename(source, dest) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::CrossesDevices => {
            debug!(from = %source.display(), "rename crosses devices, copying instead");
            copy_entry(source, dest).into_result(dest)?;
            delete_recursive(source).into_result(source)?;
            Ok(())
        }
        Err(e) => Err(OpsError::io(source, e)),
    }
}
