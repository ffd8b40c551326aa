//! Directory listing and host roots.

use std::fs;
use std::path::{Path, PathBuf};

use compact_str::CompactString;
use tracing::debug;

use arbor_core::{EntryKind, EntrySummary, ExplorerConfig, OpsError, OpsResult, sort_summaries};

/// Immediate children of `dir` in display order.
///
/// Hidden entries are left out unless the config asks for them. Children
/// that vanish or cannot be inspected while listing are skipped.
pub fn list_children(dir: &Path, config: &ExplorerConfig) -> OpsResult<Vec<EntrySummary>> {
    let metadata = fs::metadata(dir).map_err(|e| OpsError::io(dir, e))?;
    if !metadata.is_dir() {
        return Err(OpsError::NotADirectory {
            path: dir.to_path_buf(),
        });
    }

    let mut entries = Vec::new();
    for entry in fs::read_dir(dir).map_err(|e| OpsError::io(dir, e))? {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                debug!(dir = %dir.display(), error = %e, "skipping unreadable entry");
                continue;
            }
        };
        let path = entry.path();
        if config.should_skip_hidden(is_hidden(&path)) {
            continue;
        }
        match summarize(&path) {
            Ok(summary) => entries.push(summary),
            Err(e) => debug!(path = %path.display(), error = %e, "skipping entry"),
        }
    }

    sort_summaries(&mut entries, config.dirs_first);
    Ok(entries)
}

/// Summary of a single entry, without following symlinks.
pub fn summarize(path: &Path) -> OpsResult<EntrySummary> {
    let metadata = fs::symlink_metadata(path).map_err(|e| OpsError::io(path, e))?;
    let name = match path.file_name() {
        Some(name) => CompactString::new(name.to_string_lossy()),
        None => CompactString::new(path.display().to_string()),
    };
    let kind = entry_kind(path, &metadata);
    let size = if kind.is_file() { metadata.len() } else { 0 };

    Ok(EntrySummary {
        path: path.to_path_buf(),
        name,
        kind,
        size,
    })
}

fn entry_kind(path: &Path, metadata: &fs::Metadata) -> EntryKind {
    let file_type = metadata.file_type();
    if file_type.is_symlink() {
        let target = fs::read_link(path)
            .map(|t| CompactString::new(t.to_string_lossy()))
            .unwrap_or_default();
        EntryKind::Symlink {
            target,
            broken: fs::metadata(path).is_err(),
        }
    } else if file_type.is_dir() {
        EntryKind::Directory
    } else if file_type.is_file() {
        EntryKind::File
    } else {
        EntryKind::Other
    }
}

/// Whether the host considers the entry hidden.
#[cfg(not(windows))]
pub fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .is_some_and(|name| name.to_string_lossy().starts_with('.'))
}

/// Whether the host considers the entry hidden.
#[cfg(windows)]
pub fn is_hidden(path: &Path) -> bool {
    use std::os::windows::fs::MetadataExt;

    const FILE_ATTRIBUTE_HIDDEN: u32 = 0x2;
    fs::symlink_metadata(path).is_ok_and(|m| m.file_attributes() & FILE_ATTRIBUTE_HIDDEN != 0)
}

/// Top-level entries of the host: the filesystem root, or every drive.
#[cfg(not(windows))]
pub fn host_roots() -> Vec<PathBuf> {
    vec![PathBuf::from("/")]
}

/// Top-level entries of the host: the filesystem root, or every drive.
#[cfg(windows)]
pub fn host_roots() -> Vec<PathBuf> {
    (b'A'..=b'Z')
        .map(|letter| PathBuf::from(format!("{}:\\", letter as char)))
        .filter(|root| root.exists())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(entries: &[EntrySummary]) -> Vec<&str> {
        entries.iter().map(|e| e.name.as_str()).collect()
    }

    #[test]
    fn test_list_children_order() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.txt"), b"bb").unwrap();
        fs::write(dir.path().join("A.txt"), b"a").unwrap();
        fs::create_dir(dir.path().join("zdir")).unwrap();
        fs::create_dir(dir.path().join("Mdir")).unwrap();

        let entries = list_children(dir.path(), &ExplorerConfig::default()).unwrap();
        assert_eq!(names(&entries), vec!["Mdir", "zdir", "A.txt", "b.txt"]);
        assert_eq!(entries[3].size, 2);
        assert_eq!(entries[0].size, 0);
        assert!(entries[0].is_dir());
    }

    #[cfg(unix)]
    #[test]
    fn test_hidden_entries_filtered() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(".secret"), b"").unwrap();
        fs::write(dir.path().join("visible"), b"").unwrap();

        let entries = list_children(dir.path(), &ExplorerConfig::default()).unwrap();
        assert_eq!(names(&entries), vec!["visible"]);

        let config = ExplorerConfig::builder().show_hidden(true).build().unwrap();
        let entries = list_children(dir.path(), &config).unwrap();
        assert_eq!(names(&entries), vec![".secret", "visible"]);
    }

    #[test]
    fn test_list_children_of_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("f");
        fs::write(&file, b"").unwrap();

        let err = list_children(&file, &ExplorerConfig::default()).unwrap_err();
        assert!(matches!(err, OpsError::NotADirectory { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_summarize_broken_symlink() {
        let dir = tempfile::tempdir().unwrap();
        let link = dir.path().join("dangling");
        std::os::unix::fs::symlink("nowhere", &link).unwrap();

        let summary = summarize(&link).unwrap();
        assert_eq!(
            summary.kind,
            EntryKind::Symlink {
                target: "nowhere".into(),
                broken: true
            }
        );
    }

    #[test]
    fn test_host_roots_exist() {
        let roots = host_roots();
        assert!(!roots.is_empty());
        assert!(roots.iter().all(|r| r.is_dir()));
    }
}
