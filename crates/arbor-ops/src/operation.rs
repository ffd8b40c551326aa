//! File operation types.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use arbor_core::ClipboardMode;

use crate::progress::OperationType;

/// A file operation submitted to the executor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FileOperation {
    /// Create a directory inside `parent`.
    CreateDirectory { parent: PathBuf, name: String },
    /// Delete a file or directory tree.
    Delete { path: PathBuf },
    /// Rename an entry within its parent.
    Rename { source: PathBuf, new_name: String },
    /// Paste the clipboard source into a directory.
    Paste {
        source: PathBuf,
        mode: ClipboardMode,
        target: PathBuf,
    },
    /// Compute the recursive size of an entry.
    ComputeSize { path: PathBuf },
    /// Gather the metadata record of an entry.
    Describe { path: PathBuf },
    /// List the immediate children of a directory.
    List { dir: PathBuf },
}

impl FileOperation {
    /// Create a directory creation operation.
    pub fn create_directory(parent: PathBuf, name: impl Into<String>) -> Self {
        Self::CreateDirectory {
            parent,
            name: name.into(),
        }
    }

    /// Create a rename operation.
    pub fn rename(source: PathBuf, new_name: impl Into<String>) -> Self {
        Self::Rename {
            source,
            new_name: new_name.into(),
        }
    }

    /// The kind of operation, as reported in progress events.
    pub fn operation_type(&self) -> OperationType {
        match self {
            Self::CreateDirectory { .. } => OperationType::CreateDirectory,
            Self::Delete { .. } => OperationType::Delete,
            Self::Rename { .. } => OperationType::Rename,
            Self::Paste {
                mode: ClipboardMode::Copy,
                ..
            } => OperationType::Copy,
            Self::Paste {
                mode: ClipboardMode::Cut,
                ..
            } => OperationType::Move,
            Self::ComputeSize { .. } => OperationType::ComputeSize,
            Self::Describe { .. } => OperationType::Describe,
            Self::List { .. } => OperationType::List,
        }
    }

    /// The path the operation acts on.
    pub fn path(&self) -> &Path {
        match self {
            Self::CreateDirectory { parent, .. } => parent,
            Self::Delete { path } | Self::ComputeSize { path } | Self::Describe { path } => path,
            Self::Rename { source, .. } | Self::Paste { source, .. } => source,
            Self::List { dir } => dir,
        }
    }
}

/// An error that occurred on one path during a file operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationError {
    /// The path that caused the error.
    pub path: PathBuf,
    /// A human-readable error message.
    pub message: String,
}

impl OperationError {
    /// Create a new operation error.
    pub fn new(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for OperationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path.display(), self.message)
    }
}
