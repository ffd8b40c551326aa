//! Paste: the clipboard entry goes in, whatever remains of it comes back out.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use arbor_core::{Clipboard, ClipboardEntry, ClipboardMode, OpsError, OpsResult};

use crate::conflict::{entry_exists, is_within, unique_name};
use crate::copy::copy_entry;
use crate::move_op::move_entry;

/// Result of a paste together with the clipboard entry to keep.
#[derive(Debug)]
pub struct PasteOutcome {
    /// What the clipboard should hold afterwards.
    pub remaining: Option<ClipboardEntry>,
    /// Path of the pasted entry.
    pub result: OpsResult<PathBuf>,
}

impl PasteOutcome {
    fn new(remaining: Option<ClipboardEntry>, result: OpsResult<PathBuf>) -> Self {
        Self { remaining, result }
    }
}

/// Paste `entry` into `target_dir`.
///
/// - Cut moves the source in under its own name, replacing an entry of the
///   same name. A successful cut consumes the entry.
/// - Copy copies the source under a collision-free name built with
///   `copy_label`. The entry is kept so it can be pasted again.
///
/// On failure the entry is handed back unchanged.
pub fn paste(entry: Option<ClipboardEntry>, target_dir: &Path, copy_label: &str) -> PasteOutcome {
    let Some(entry) = entry else {
        return PasteOutcome::new(None, Err(OpsError::NothingToPaste));
    };

    match paste_entry(&entry, target_dir, copy_label) {
        Ok(dest) if entry.mode == ClipboardMode::Cut => PasteOutcome::new(None, Ok(dest)),
        result => PasteOutcome::new(Some(entry), result),
    }
}

/// Paste the clipboard's entry into `target_dir`, updating the clipboard in place.
pub fn paste_into(clipboard: &mut Clipboard, target_dir: &Path, copy_label: &str) -> OpsResult<PathBuf> {
    let outcome = paste(clipboard.take(), target_dir, copy_label);
    clipboard.restore(outcome.remaining);
    outcome.result
}

fn paste_entry(entry: &ClipboardEntry, target_dir: &Path, copy_label: &str) -> OpsResult<PathBuf> {
    if !target_dir.is_dir() {
        return Err(OpsError::NotADirectory {
            path: target_dir.to_path_buf(),
        });
    }

    let source = &entry.source;
    if !entry_exists(source) {
        return Err(OpsError::NotFound {
            path: source.clone(),
        });
    }
    let name = source.file_name().ok_or_else(|| {
        OpsError::invalid_name(source.display().to_string(), "A filesystem root cannot be pasted")
    })?;

    // A symlink moves or copies as the link itself, never as its target.
    let source_is_dir = fs::symlink_metadata(source).is_ok_and(|m| m.is_dir());
    if source_is_dir && is_within(target_dir, source) {
        return Err(OpsError::SourceIsAncestor {
            path: source.clone(),
            destination: target_dir.join(name),
        });
    }

    debug!(source = %source.display(), target = %target_dir.display(), mode = %entry.mode, "pasting");
    match entry.mode {
        ClipboardMode::Cut => {
            let dest = target_dir.join(name);
            move_entry(source, &dest)?;
            Ok(dest)
        }
        ClipboardMode::Copy => {
            let dest = if entry_exists(&target_dir.join(name)) {
                target_dir.join(unique_name(target_dir, &name.to_string_lossy(), copy_label))
            } else {
                target_dir.join(name)
            };
            copy_entry(source, &dest).into_result(&dest)?;
            Ok(dest)
        }
    }
}
