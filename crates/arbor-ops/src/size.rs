//! Recursive size computation.

use std::fs;
use std::path::Path;

use tracing::trace;

/// Total size in bytes of the files below `path` (a file's own size for a file).
///
/// Unreadable directories and entries that vanish mid-walk contribute
/// nothing. A symlink to a file counts as its target's size; a symlink to a
/// directory is not descended into.
pub fn compute_size(path: &Path) -> u64 {
    let Ok(metadata) = fs::symlink_metadata(path) else {
        return 0;
    };
    if !metadata.is_dir() {
        return leaf_size(path, &metadata);
    }

    let mut total = 0u64;
    let mut stack = vec![path.to_path_buf()];

    while let Some(dir) = stack.pop() {
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) => {
                trace!(path = %dir.display(), error = %e, "skipping unreadable directory");
                continue;
            }
        };

        for entry in entries.flatten() {
            let entry_path = entry.path();
            let Ok(metadata) = fs::symlink_metadata(&entry_path) else {
                continue;
            };
            if metadata.is_dir() {
                stack.push(entry_path);
            } else {
                total += leaf_size(&entry_path, &metadata);
            }
        }
    }

    total
}

fn leaf_size(path: &Path, metadata: &fs::Metadata) -> u64 {
    if metadata.file_type().is_symlink() {
        match fs::metadata(path) {
            Ok(target) if target.is_file() => target.len(),
            _ => 0,
        }
    } else if metadata.is_file() {
        metadata.len()
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_of_tree() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("a/b")).unwrap();
        fs::write(dir.path().join("ten"), vec![0u8; 10]).unwrap();
        fs::write(dir.path().join("a/twenty"), vec![0u8; 20]).unwrap();
        fs::write(dir.path().join("a/b/thirty"), vec![0u8; 30]).unwrap();

        assert_eq!(compute_size(dir.path()), 60);
        assert_eq!(compute_size(&dir.path().join("a")), 50);
        assert_eq!(compute_size(&dir.path().join("ten")), 10);
    }

    #[test]
    fn test_size_of_missing_path_is_zero() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(compute_size(&dir.path().join("ghost")), 0);
    }

    #[test]
    fn test_size_of_empty_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(compute_size(dir.path()), 0);
    }

    #[cfg(unix)]
    #[test]
    fn test_size_symlinks() {
        let dir = tempfile::tempdir().unwrap();
        let data = dir.path().join("data");
        fs::create_dir(&data).unwrap();
        fs::write(data.join("file"), vec![0u8; 7]).unwrap();

        let root = dir.path().join("root");
        fs::create_dir(&root).unwrap();
        std::os::unix::fs::symlink(data.join("file"), root.join("file-link")).unwrap();
        std::os::unix::fs::symlink(&data, root.join("dir-link")).unwrap();

        assert_eq!(compute_size(&root), 7);
    }
}
