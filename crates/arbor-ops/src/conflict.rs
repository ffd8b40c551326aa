//! Destination conflicts: collision-avoidance naming and self-containment checks.

use std::fs;
use std::path::{Path, PathBuf};

#[cfg(unix)]
use std::os::unix::fs::MetadataExt;

/// Check whether anything (including a dangling symlink) occupies `path`.
pub fn entry_exists(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}

/// Split a name into base and extension at the last dot.
///
/// The extension keeps its dot. A leading dot (".bashrc") or no dot at all
/// leaves the whole name as the base.
pub fn split_name(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(idx) if idx > 0 => name.split_at(idx),
        _ => (name, ""),
    }
}

/// Pick a name that does not collide with any entry in `target_dir`.
///
/// Returns `original` when it is free, otherwise the first free candidate of
/// `"{base} - {label} (n){ext}"` for n = 1, 2, 3, ...
pub fn unique_name(target_dir: &Path, original: &str, label: &str) -> String {
    if !entry_exists(&target_dir.join(original)) {
        return original.to_string();
    }

    let (base, extension) = split_name(original);
    (1u64..)
        .map(|n| format!("{base} - {label} ({n}){extension}"))
        .find(|candidate| !entry_exists(&target_dir.join(candidate)))
        .unwrap_or_else(|| original.to_string())
}

/// Check whether `path` is `ancestor` itself or lies inside it.
///
/// Both sides are canonicalized when possible so that `..` and symlinked
/// parents do not hide the relationship.
pub fn is_within(path: &Path, ancestor: &Path) -> bool {
    let resolve = |p: &Path| -> PathBuf { p.canonicalize().unwrap_or_else(|_| p.to_path_buf()) };
    resolve(path).starts_with(resolve(ancestor))
}

/// Absolute form of `path` with its parent resolved and its final component
/// left as written, so a symlink names itself rather than its target.
pub fn resolve_location(path: &Path) -> PathBuf {
    let (Some(parent), Some(name)) = (path.parent(), path.file_name()) else {
        return path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
    };
    let parent = if parent.as_os_str().is_empty() { Path::new(".") } else { parent };
    match parent.canonicalize() {
        Ok(parent) => parent.join(name),
        Err(_) => path.to_path_buf(),
    }
}

/// Check whether `a` and `b` name the same directory entry, however spelled.
///
/// Catches `..` segments and symlinked parents through [`resolve_location`],
/// and case variants on case-insensitive filesystems through the file identity.
pub fn same_location(a: &Path, b: &Path) -> bool {
    resolve_location(a) == resolve_location(b) || same_file_id(a, b)
}

#[cfg(unix)]
fn same_file_id(a: &Path, b: &Path) -> bool {
    match (fs::symlink_metadata(a), fs::symlink_metadata(b)) {
        (Ok(a), Ok(b)) => a.dev() == b.dev() && a.ino() == b.ino(),
        _ => false,
    }
}

#[cfg(not(unix))]
fn same_file_id(a: &Path, b: &Path) -> bool {
    let is_link = |p: &Path| fs::symlink_metadata(p).is_ok_and(|m| m.file_type().is_symlink());
    if is_link(a) || is_link(b) {
        return false;
    }
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_name() {
        assert_eq!(split_name("report.txt"), ("report", ".txt"));
        assert_eq!(split_name("archive.tar.gz"), ("archive.tar", ".gz"));
        assert_eq!(split_name(".bashrc"), (".bashrc", ""));
        assert_eq!(split_name("Makefile"), ("Makefile", ""));
        assert_eq!(split_name("trailing."), ("trailing", "."));
    }

    #[test]
    fn test_unique_name_free() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(unique_name(dir.path(), "a.txt", "Copy"), "a.txt");
    }

    #[test]
    fn test_unique_name_is_stable_until_created() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), b"x").unwrap();

        let first = unique_name(dir.path(), "a.txt", "Copy");
        let again = unique_name(dir.path(), "a.txt", "Copy");
        assert_eq!(first, "a - Copy (1).txt");
        assert_eq!(first, again);

        fs::write(dir.path().join(&first), b"x").unwrap();
        assert_eq!(unique_name(dir.path(), "a.txt", "Copy"), "a - Copy (2).txt");
    }

    #[test]
    fn test_unique_name_fills_gaps() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::create_dir(dir.path().join("sub - Copy (1)")).unwrap();
        fs::create_dir(dir.path().join("sub - Copy (3)")).unwrap();

        assert_eq!(unique_name(dir.path(), "sub", "Copy"), "sub - Copy (2)");
    }

    #[test]
    fn test_unique_name_hidden_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(".env"), b"x").unwrap();
        assert_eq!(unique_name(dir.path(), ".env", "Kopie"), ".env - Kopie (1)");
    }

    #[test]
    fn test_is_within() {
        let dir = tempfile::tempdir().unwrap();
        let child = dir.path().join("a").join("b");
        fs::create_dir_all(&child).unwrap();

        assert!(is_within(&child, &dir.path().join("a")));
        assert!(is_within(&dir.path().join("a"), &dir.path().join("a")));
        assert!(!is_within(&dir.path().join("a"), &child));
        assert!(!is_within(&dir.path().join("ab"), &dir.path().join("a")));
    }

    #[test]
    fn test_same_location_sees_through_dotdot() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("x").join("a")).unwrap();
        fs::create_dir(dir.path().join("y")).unwrap();

        let plain = dir.path().join("x").join("a");
        let dotted = dir.path().join("y").join("..").join("x").join("a");
        assert!(same_location(&plain, &dotted));
        assert!(!same_location(&plain, &dir.path().join("x")));
        // A missing destination is still compared by its resolved spelling.
        assert!(same_location(
            &dir.path().join("x").join("ghost"),
            &dir.path().join("y").join("..").join("x").join("ghost"),
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_same_location_symlinks() {
        let dir = tempfile::tempdir().unwrap();
        let real = dir.path().join("x");
        fs::create_dir_all(real.join("a")).unwrap();
        std::os::unix::fs::symlink(&real, dir.path().join("alias")).unwrap();

        // Through a symlinked parent: same entry.
        assert!(same_location(&real.join("a"), &dir.path().join("alias").join("a")));
        // The link itself is a different entry from its target.
        assert!(!same_location(&real, &dir.path().join("alias")));
    }
}
