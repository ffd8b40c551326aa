//! Error types for file operations.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while operating on the filesystem.
#[derive(Debug, Error)]
pub enum OpsError {
    /// A name supplied to create or rename was rejected before touching the filesystem.
    #[error("Invalid name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    /// Permission denied for a path.
    #[error("Permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    /// Path not found.
    #[error("Path not found: {path}")]
    NotFound { path: PathBuf },

    /// An entry already occupies the destination.
    #[error("Already exists: {path}")]
    AlreadyExists { path: PathBuf },

    /// A directory was required.
    #[error("Not a directory: {path}")]
    NotADirectory { path: PathBuf },

    /// A directory cannot be copied into its own subtree.
    #[error("Cannot copy {path} into its own subtree at {destination}")]
    SourceIsAncestor { path: PathBuf, destination: PathBuf },

    /// Generic I/O error.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A recursive operation processed what it could but some children failed.
    #[error("Operation on {path} incomplete: {failed} item(s) failed")]
    Incomplete { path: PathBuf, failed: usize },

    /// Paste was requested with an empty clipboard.
    #[error("Nothing to paste")]
    NothingToPaste,

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// A background worker did not return a result.
    #[error("Background task failed: {message}")]
    TaskFailed { message: String },
}

impl OpsError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            std::io::ErrorKind::NotFound => Self::NotFound { path },
            std::io::ErrorKind::AlreadyExists => Self::AlreadyExists { path },
            _ => Self::Io { path, source },
        }
    }

    /// Create an invalid name error.
    pub fn invalid_name(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidName {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Whether the error was raised before any filesystem call.
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidName { .. } | Self::NothingToPaste)
    }
}

/// Convenience alias for results of file operations.
pub type OpsResult<T> = Result<T, OpsError>;
