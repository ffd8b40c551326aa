//! Single-slot clipboard value.
//!
//! The clipboard is a plain value owned by whoever drives the explorer. It is
//! handed to the paste operation and handed back afterwards, so there is no
//! process-wide state.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Whether a paste duplicates or relocates the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClipboardMode {
    Copy,
    Cut,
}

impl fmt::Display for ClipboardMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Copy => write!(f, "Copy"),
            Self::Cut => write!(f, "Cut"),
        }
    }
}

/// The remembered source path and its mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClipboardEntry {
    /// The entry that will be pasted.
    pub source: PathBuf,
    /// Copy or cut.
    pub mode: ClipboardMode,
}

impl ClipboardEntry {
    /// Create a new clipboard entry.
    pub fn new(source: impl Into<PathBuf>, mode: ClipboardMode) -> Self {
        Self {
            source: source.into(),
            mode,
        }
    }

    /// Directory the source lives in, which changes after a cut-paste.
    pub fn source_parent(&self) -> Option<&Path> {
        self.source.parent()
    }

    /// Check if this entry relocates its source when pasted.
    pub fn is_cut(&self) -> bool {
        self.mode == ClipboardMode::Cut
    }
}

/// Holder for at most one clipboard entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Clipboard {
    entry: Option<ClipboardEntry>,
}

impl Clipboard {
    /// Create an empty clipboard.
    pub fn new() -> Self {
        Self::default()
    }

    /// Remember `path` with the given mode, replacing any previous entry.
    pub fn mark(&mut self, path: impl Into<PathBuf>, mode: ClipboardMode) {
        self.entry = Some(ClipboardEntry::new(path, mode));
    }

    /// Remember `path` for copying.
    pub fn copy(&mut self, path: impl Into<PathBuf>) {
        self.mark(path, ClipboardMode::Copy);
    }

    /// Remember `path` for moving.
    pub fn cut(&mut self, path: impl Into<PathBuf>) {
        self.mark(path, ClipboardMode::Cut);
    }

    /// The current entry, if any.
    pub fn entry(&self) -> Option<&ClipboardEntry> {
        self.entry.as_ref()
    }

    /// Check if there is nothing to paste.
    pub fn is_empty(&self) -> bool {
        self.entry.is_none()
    }

    /// Remove and return the current entry.
    pub fn take(&mut self) -> Option<ClipboardEntry> {
        self.entry.take()
    }

    /// Put back whatever a paste operation returned.
    pub fn restore(&mut self, entry: Option<ClipboardEntry>) {
        self.entry = entry;
    }

    /// Forget the current entry.
    pub fn clear(&mut self) {
        self.entry = None;
    }
}

impl From<ClipboardEntry> for Clipboard {
    fn from(entry: ClipboardEntry) -> Self {
        Self { entry: Some(entry) }
    }
}
