//! Context-menu actions and when they apply.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, IntoEnumIterator};

use crate::clipboard::Clipboard;

/// An action offered on an entry in the explorer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, Serialize, Deserialize)]
pub enum Action {
    #[strum(to_string = "Create folder")]
    CreateFolder,
    Delete,
    Rename,
    Copy,
    Cut,
    Paste,
    Info,
}

/// What the explorer knows about the entry an action targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionTarget {
    /// The entry is a directory.
    pub is_dir: bool,
    /// The entry is a filesystem root (drive).
    pub is_root: bool,
}

impl ActionTarget {
    /// Create a new action target.
    pub fn new(is_dir: bool, is_root: bool) -> Self {
        Self { is_dir, is_root }
    }
}

impl Action {
    /// Check whether this action can run against `target` with the given clipboard.
    pub fn is_enabled(self, target: ActionTarget, clipboard: &Clipboard) -> bool {
        match self {
            Self::CreateFolder => target.is_dir && !target.is_root,
            Self::Paste => target.is_dir && !clipboard.is_empty(),
            Self::Delete | Self::Rename | Self::Copy | Self::Cut | Self::Info => !target.is_root,
        }
    }
}

/// All actions enabled for `target`, in menu order.
pub fn available_actions(target: ActionTarget, clipboard: &Clipboard) -> Vec<Action> {
    Action::iter()
        .filter(|action| action.is_enabled(target, clipboard))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_only_allows_paste() {
        let mut clipboard = Clipboard::new();
        let root = ActionTarget::new(true, true);
        assert!(available_actions(root, &clipboard).is_empty());

        clipboard.copy("/tmp/a");
        assert_eq!(available_actions(root, &clipboard), vec![Action::Paste]);
    }

    #[test]
    fn test_paste_requires_directory_and_clipboard() {
        let mut clipboard = Clipboard::new();
        let dir = ActionTarget::new(true, false);
        let file = ActionTarget::new(false, false);

        assert!(!Action::Paste.is_enabled(dir, &clipboard));
        clipboard.cut("/tmp/a");
        assert!(Action::Paste.is_enabled(dir, &clipboard));
        assert!(!Action::Paste.is_enabled(file, &clipboard));
    }

    #[test]
    fn test_file_actions() {
        let clipboard = Clipboard::new();
        let file = ActionTarget::new(false, false);
        assert_eq!(
            available_actions(file, &clipboard),
            vec![
                Action::Delete,
                Action::Rename,
                Action::Copy,
                Action::Cut,
                Action::Info
            ]
        );
        assert_eq!(Action::CreateFolder.to_string(), "Create folder");
    }
}
