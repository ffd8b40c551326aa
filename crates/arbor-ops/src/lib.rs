//! File operations engine for arbor.
//!
//! This crate provides the operations behind the explorer's context menu
//! (create folder, delete, rename, copy/cut and paste, info) together with
//! recursive sizing and directory listing. Each operation is a plain
//! blocking function; [`OperationExecutor`] runs them on a bounded
//! background pool and broadcasts progress events.
//!
//! Recursive delete and copy are best-effort: every reachable child is
//! processed, failures are collected in an [`OperationComplete`], and
//! nothing already done is rolled back.

mod conflict;
mod copy;
mod create;
mod delete;
mod describe;
mod executor;
mod listing;
mod move_op;
mod operation;
mod paste;
mod progress;
mod rename;
mod size;

pub use conflict::{is_within, split_name, unique_name};
pub use copy::copy_entry;
pub use create::create_directory;
pub use delete::delete_recursive;
pub use describe::{EntryProbe, HostProbe, describe, describe_with};
pub use executor::{OperationEvent, OperationExecutor};
pub use listing::{host_roots, is_hidden, list_children, summarize};
pub use move_op::move_entry;
pub use operation::{FileOperation, OperationError};
pub use paste::{PasteOutcome, paste, paste_into};
pub use progress::{OperationComplete, OperationProgress, OperationType};
pub use rename::{rename, validate_filename};
pub use size::compute_size;

/// Capacity of the executor's event channel.
pub const OPERATION_CHANNEL_SIZE: usize = 100;
