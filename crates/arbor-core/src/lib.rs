//! Core types and traits for arbor.
//!
//! This crate provides the data structures shared by the operations layer
//! and the explorer front end: entry metadata, the clipboard value, the
//! lazily loaded tree, context-menu rules, errors and configuration.

mod actions;
mod clipboard;
mod config;
mod entry;
mod error;
mod tree;

pub use actions::{Action, ActionTarget, available_actions};
pub use clipboard::{Clipboard, ClipboardEntry, ClipboardMode};
pub use config::{DEFAULT_COPY_LABEL, DEFAULT_DATE_FORMAT, ExplorerConfig, ExplorerConfigBuilder};
pub use entry::{
    Attributes, EntryInfo, EntryKind, EntrySummary, EntryType, Permissions, UNAVAILABLE,
    extension_of, listing_order, sort_summaries,
};
pub use error::{OpsError, OpsResult};
pub use tree::{ExplorerTree, TreeNode, TreeRow, TreeStats};
