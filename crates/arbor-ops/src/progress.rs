//! Progress and completion reporting for file operations.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

use arbor_core::{OpsError, OpsResult};

use crate::OperationError;

/// The type of operation being performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OperationType {
    CreateDirectory,
    Delete,
    Rename,
    Copy,
    Move,
    ComputeSize,
    Describe,
    List,
}

impl std::fmt::Display for OperationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CreateDirectory => write!(f, "Create directory"),
            Self::Delete => write!(f, "Delete"),
            Self::Rename => write!(f, "Rename"),
            Self::Copy => write!(f, "Copy"),
            Self::Move => write!(f, "Move"),
            Self::ComputeSize => write!(f, "Compute size"),
            Self::Describe => write!(f, "Describe"),
            Self::List => write!(f, "List"),
        }
    }
}

/// Running tally of a multi-entry operation.
#[derive(Debug, Clone)]
pub struct OperationProgress {
    /// The type of operation.
    pub operation_type: OperationType,
    /// Number of entries completed.
    pub files_completed: usize,
    /// Number of bytes processed so far.
    pub bytes_processed: u64,
    /// The entry currently being processed.
    pub current_file: Option<PathBuf>,
    /// Errors encountered so far.
    pub errors: Vec<OperationError>,
}

impl OperationProgress {
    /// Create a new progress tracker for an operation.
    pub fn new(operation_type: OperationType) -> Self {
        Self {
            operation_type,
            files_completed: 0,
            bytes_processed: 0,
            current_file: None,
            errors: Vec::new(),
        }
    }

    /// Record a failure on one path and keep going.
    pub fn add_error(&mut self, path: &Path, message: impl Into<String>) {
        let error = OperationError::new(path, message);
        warn!(operation = %self.operation_type, path = %error.path.display(), "{}", error.message);
        self.errors.push(error);
    }

    /// Update the current entry being processed.
    pub fn set_current_file(&mut self, path: Option<PathBuf>) {
        self.current_file = path;
    }

    /// Increment the completed count and add bytes.
    pub fn complete_file(&mut self, bytes: u64) {
        self.files_completed += 1;
        self.bytes_processed += bytes;
    }

    /// Close the tally.
    pub fn finish(self) -> OperationComplete {
        OperationComplete {
            operation_type: self.operation_type,
            succeeded: self.files_completed,
            failed: self.errors.len(),
            bytes_processed: self.bytes_processed,
            errors: self.errors,
        }
    }
}

/// Result of a completed operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationComplete {
    /// The type of operation.
    pub operation_type: OperationType,
    /// Number of items successfully processed.
    pub succeeded: usize,
    /// Number of items that failed.
    pub failed: usize,
    /// Total bytes processed.
    pub bytes_processed: u64,
    /// Errors that occurred.
    pub errors: Vec<OperationError>,
}

impl OperationComplete {
    /// Summarize a single-step operation.
    pub fn from_result<T>(operation_type: OperationType, path: &Path, result: &OpsResult<T>) -> Self {
        match result {
            Ok(_) => Self {
                operation_type,
                succeeded: 1,
                failed: 0,
                bytes_processed: 0,
                errors: vec![],
            },
            Err(e) => Self {
                operation_type,
                succeeded: 0,
                failed: 1,
                bytes_processed: 0,
                errors: vec![OperationError::new(path, e.to_string())],
            },
        }
    }

    /// Check if the operation was fully successful.
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }

    /// Turn a partial failure into [`OpsError::Incomplete`].
    pub fn into_result(self, path: &Path) -> OpsResult<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(OpsError::Incomplete {
                path: path.to_path_buf(),
                failed: self.failed,
            })
        }
    }

    /// Get a human-readable summary of the operation.
    pub fn summary(&self) -> String {
        let action = match self.operation_type {
            OperationType::CreateDirectory => "Created",
            OperationType::Delete => "Deleted",
            OperationType::Rename => "Renamed",
            OperationType::Copy => "Copied",
            OperationType::Move => "Moved",
            OperationType::ComputeSize => "Measured",
            OperationType::Describe => "Described",
            OperationType::List => "Listed",
        };

        if self.failed == 0 {
            format!("{} {} items", action, self.succeeded)
        } else {
            format!("{} {} items, {} failed", action, self.succeeded, self.failed)
        }
    }
}
