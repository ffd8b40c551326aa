//! Lazily loaded explorer tree.
//!
//! Directory nodes start unloaded and only receive children once a listing
//! has been delivered for them, which is how the explorer expands a node
//! without scanning the whole filesystem up front.

use std::path::{Path, PathBuf};

use compact_str::CompactString;
use serde::{Deserialize, Serialize};

use crate::entry::{EntryKind, EntrySummary, listing_order};

/// A single node of the explorer tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeNode {
    /// Full path of the entry.
    pub path: PathBuf,
    /// Display name.
    pub name: CompactString,
    /// Entry type.
    pub kind: EntryKind,
    /// Size in bytes as listed (not recursive).
    pub size: u64,
    /// Loaded children; `None` until the directory has been listed.
    children: Option<Vec<TreeNode>>,
}

impl TreeNode {
    /// Create a root node for a drive or mount point.
    pub fn root(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            name: path.display().to_string().into(),
            path,
            kind: EntryKind::Directory,
            size: 0,
            children: None,
        }
    }

    /// Check if this node is a directory.
    pub fn is_dir(&self) -> bool {
        self.kind.is_dir()
    }

    /// Check if the directory's children have been loaded.
    pub fn is_loaded(&self) -> bool {
        self.children.is_some()
    }

    /// Loaded children (empty when not loaded).
    pub fn children(&self) -> &[TreeNode] {
        self.children.as_deref().unwrap_or(&[])
    }
}

impl From<EntrySummary> for TreeNode {
    fn from(entry: EntrySummary) -> Self {
        Self {
            path: entry.path,
            name: entry.name,
            kind: entry.kind,
            size: entry.size,
            children: None,
        }
    }
}

/// A visible row of the tree, in depth-first display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeRow {
    pub depth: usize,
    pub path: PathBuf,
    pub name: CompactString,
    pub is_dir: bool,
    pub is_loaded: bool,
}

/// Counts over the loaded part of the tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeStats {
    /// Directories seen (roots included).
    pub dirs: u64,
    /// Non-directory entries seen.
    pub files: u64,
    /// Directories whose children are loaded.
    pub loaded_dirs: u64,
}

/// The explorer's view of the filesystem.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExplorerTree {
    roots: Vec<TreeNode>,
    dirs_first: bool,
}

impl ExplorerTree {
    /// Create a tree over the given roots.
    pub fn new(roots: impl IntoIterator<Item = PathBuf>) -> Self {
        Self {
            roots: roots.into_iter().map(TreeNode::root).collect(),
            dirs_first: true,
        }
    }

    /// Set whether directories sort before files.
    pub fn with_dirs_first(mut self, dirs_first: bool) -> Self {
        self.dirs_first = dirs_first;
        self
    }

    /// Root nodes.
    pub fn roots(&self) -> &[TreeNode] {
        &self.roots
    }

    /// Check if a path is one of the roots.
    pub fn is_root(&self, path: &Path) -> bool {
        self.roots.iter().any(|root| root.path == path)
    }

    /// Find a node by path.
    pub fn find(&self, path: &Path) -> Option<&TreeNode> {
        let mut current = self.roots.iter().find(|n| path.starts_with(&n.path))?;
        loop {
            if current.path == path {
                return Some(current);
            }
            current = current
                .children
                .as_ref()?
                .iter()
                .find(|c| path.starts_with(&c.path))?;
        }
    }

    fn find_mut(&mut self, path: &Path) -> Option<&mut TreeNode> {
        let mut current = self.roots.iter_mut().find(|n| path.starts_with(&n.path))?;
        loop {
            if current.path == path {
                return Some(current);
            }
            current = current
                .children
                .as_mut()?
                .iter_mut()
                .find(|c| path.starts_with(&c.path))?;
        }
    }

    /// Check if a directory is present but has not been listed yet.
    pub fn needs_load(&self, path: &Path) -> bool {
        self.find(path)
            .is_some_and(|node| node.is_dir() && !node.is_loaded())
    }

    /// Replace the children of `dir` with a fresh listing.
    ///
    /// Returns `false` if `dir` is not in the tree.
    pub fn set_children(&mut self, dir: &Path, entries: Vec<EntrySummary>) -> bool {
        let dirs_first = self.dirs_first;
        let Some(node) = self.find_mut(dir) else {
            return false;
        };
        let mut children: Vec<TreeNode> = entries.into_iter().map(TreeNode::from).collect();
        sort_nodes(&mut children, dirs_first);
        node.children = Some(children);
        true
    }

    /// Add one child to a loaded directory (e.g. after creating a folder).
    ///
    /// Unloaded directories are left alone; the child shows up on expansion.
    pub fn insert_child(&mut self, dir: &Path, entry: EntrySummary) -> bool {
        let dirs_first = self.dirs_first;
        let Some(children) = self.find_mut(dir).and_then(|n| n.children.as_mut()) else {
            return false;
        };
        children.retain(|c| c.path != entry.path);
        children.push(TreeNode::from(entry));
        sort_nodes(children, dirs_first);
        true
    }

    /// Remove a node (e.g. after deleting it). Roots cannot be removed.
    pub fn remove(&mut self, path: &Path) -> Option<TreeNode> {
        let parent = path.parent()?;
        let children = self.find_mut(parent)?.children.as_mut()?;
        let idx = children.iter().position(|c| c.path == path)?;
        Some(children.remove(idx))
    }

    /// Re-key a node and its loaded subtree after a rename.
    pub fn rename(&mut self, old: &Path, new_path: &Path) -> bool {
        let dirs_first = self.dirs_first;
        let old = old.to_path_buf();
        let Some(node) = self.find_mut(&old) else {
            return false;
        };

        node.path = new_path.to_path_buf();
        node.name = new_path
            .file_name()
            .map(|n| CompactString::new(n.to_string_lossy()))
            .unwrap_or_else(|| CompactString::new(new_path.display().to_string()));

        let mut stack: Vec<&mut TreeNode> = node.children.iter_mut().flatten().collect();
        while let Some(child) = stack.pop() {
            let updated = child
                .path
                .strip_prefix(&old)
                .ok()
                .map(|rest| new_path.join(rest));
            if let Some(path) = updated {
                child.path = path;
            }
            if let Some(grandchildren) = child.children.as_mut() {
                stack.extend(grandchildren.iter_mut());
            }
        }

        if let Some(siblings) = new_path
            .parent()
            .and_then(|parent| self.find_mut(parent))
            .and_then(|n| n.children.as_mut())
        {
            sort_nodes(siblings, dirs_first);
        }
        true
    }

    /// Forget the children of `dir` so that the next expansion reloads them.
    pub fn invalidate(&mut self, dir: &Path) -> bool {
        match self.find_mut(dir) {
            Some(node) if node.is_dir() => {
                node.children = None;
                true
            }
            _ => false,
        }
    }

    /// Depth-first rows of every node reachable through loaded directories.
    pub fn visible_rows(&self) -> Vec<TreeRow> {
        let mut rows = Vec::new();
        let mut stack: Vec<(usize, &TreeNode)> =
            self.roots.iter().rev().map(|node| (0, node)).collect();

        while let Some((depth, node)) = stack.pop() {
            rows.push(TreeRow {
                depth,
                path: node.path.clone(),
                name: node.name.clone(),
                is_dir: node.is_dir(),
                is_loaded: node.is_loaded(),
            });
            stack.extend(node.children().iter().rev().map(|c| (depth + 1, c)));
        }

        rows
    }

    /// Count loaded nodes.
    pub fn stats(&self) -> TreeStats {
        let mut stats = TreeStats::default();
        let mut stack: Vec<&TreeNode> = self.roots.iter().collect();

        while let Some(node) = stack.pop() {
            if node.is_dir() {
                stats.dirs += 1;
                if node.is_loaded() {
                    stats.loaded_dirs += 1;
                }
            } else {
                stats.files += 1;
            }
            stack.extend(node.children());
        }

        stats
    }
}

fn sort_nodes(nodes: &mut [TreeNode], dirs_first: bool) {
    nodes.sort_by(|a, b| listing_order((a.is_dir(), a.name.as_str()), (b.is_dir(), b.name.as_str()), dirs_first));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(path: &str, kind: EntryKind) -> EntrySummary {
        let path = PathBuf::from(path);
        EntrySummary {
            name: CompactString::new(path.file_name().unwrap().to_string_lossy()),
            path,
            kind,
            size: 0,
        }
    }

    fn sample_tree() -> ExplorerTree {
        let mut tree = ExplorerTree::new([PathBuf::from("/")]);
        tree.set_children(
            Path::new("/"),
            vec![
                summary("/tmp", EntryKind::Directory),
                summary("/etc", EntryKind::Directory),
                summary("/notes.txt", EntryKind::File),
            ],
        );
        tree
    }

    #[test]
    fn test_roots_start_unloaded() {
        let tree = ExplorerTree::new([PathBuf::from("/")]);
        assert!(tree.is_root(Path::new("/")));
        assert!(tree.needs_load(Path::new("/")));
        assert!(!tree.needs_load(Path::new("/missing")));
    }

    #[test]
    fn test_set_children_sorts_and_loads() {
        let tree = sample_tree();
        let root = tree.find(Path::new("/")).unwrap();
        assert!(root.is_loaded());

        let names: Vec<&str> = root.children().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["etc", "tmp", "notes.txt"]);
        assert!(tree.needs_load(Path::new("/tmp")));
        assert!(!tree.needs_load(Path::new("/notes.txt")));
    }

    #[test]
    fn test_insert_and_remove() {
        let mut tree = sample_tree();

        assert!(tree.insert_child(Path::new("/"), summary("/alpha", EntryKind::Directory)));
        assert!(tree.find(Path::new("/alpha")).is_some());

        // Unloaded directories do not receive children.
        assert!(!tree.insert_child(Path::new("/tmp"), summary("/tmp/x", EntryKind::File)));

        let removed = tree.remove(Path::new("/alpha")).unwrap();
        assert_eq!(removed.name, "alpha");
        assert!(tree.find(Path::new("/alpha")).is_none());
        assert!(tree.remove(Path::new("/")).is_none());
    }

    #[test]
    fn test_rename_rekeys_subtree() {
        let mut tree = sample_tree();
        tree.set_children(
            Path::new("/tmp"),
            vec![summary("/tmp/inner", EntryKind::Directory)],
        );
        tree.set_children(
            Path::new("/tmp/inner"),
            vec![summary("/tmp/inner/file.rs", EntryKind::File)],
        );

        assert!(tree.rename(Path::new("/tmp"), Path::new("/scratch")));
        assert!(tree.find(Path::new("/tmp")).is_none());
        assert!(tree.find(Path::new("/scratch/inner/file.rs")).is_some());

        let node = tree.find(Path::new("/scratch")).unwrap();
        assert_eq!(node.name, "scratch");
    }

    #[test]
    fn test_invalidate_forces_reload() {
        let mut tree = sample_tree();
        assert!(!tree.needs_load(Path::new("/")));
        assert!(tree.invalidate(Path::new("/")));
        assert!(tree.needs_load(Path::new("/")));
        assert!(!tree.invalidate(Path::new("/notes.txt")));
    }

    #[test]
    fn test_visible_rows_and_stats() {
        let tree = sample_tree();
        let rows = tree.visible_rows();
        let paths: Vec<&Path> = rows.iter().map(|r| r.path.as_path()).collect();
        assert_eq!(
            paths,
            vec![
                Path::new("/"),
                Path::new("/etc"),
                Path::new("/tmp"),
                Path::new("/notes.txt")
            ]
        );
        assert_eq!(rows[1].depth, 1);

        let stats = tree.stats();
        assert_eq!(stats.dirs, 3);
        assert_eq!(stats.files, 1);
        assert_eq!(stats.loaded_dirs, 1);
    }
}
