//! Rename operation and name validation.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use arbor_core::{OpsError, OpsResult};

use crate::conflict::entry_exists;

/// Rename an entry within its parent directory.
///
/// Returns the new path. Refuses blank or path-like names before touching the
/// filesystem and refuses to replace a different existing entry.
pub fn rename(path: &Path, new_name: &str) -> OpsResult<PathBuf> {
    validate_filename(new_name)?;

    let parent = path.parent().ok_or_else(|| {
        OpsError::invalid_name(path.display().to_string(), "A filesystem root cannot be renamed")
    })?;
    fs::symlink_metadata(path).map_err(|e| OpsError::io(path, e))?;

    let new_path = parent.join(new_name);
    if new_path == path {
        return Ok(new_path);
    }
    if entry_exists(&new_path) && !same_entry(path, &new_path) {
        return Err(OpsError::AlreadyExists { path: new_path });
    }

    debug!(from = %path.display(), to = %new_path.display(), "renaming");
    fs::rename(path, &new_path).map_err(|e| OpsError::io(path, e))?;
    Ok(new_path)
}

/// Case-only renames on case-insensitive filesystems see the target as existing.
fn same_entry(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Validate a single path component supplied by the user.
pub fn validate_filename(name: &str) -> OpsResult<()> {
    let reject = |reason: &str| Err(OpsError::invalid_name(name, reason));

    if name.trim().is_empty() {
        return reject("Name cannot be blank");
    }

    if name.len() > 255 {
        return reject("Name is too long (max 255 bytes)");
    }

    for c in ['/', '\0'] {
        if name.contains(c) {
            return reject(&format!("Name cannot contain {c:?}"));
        }
    }

    #[cfg(target_os = "windows")]
    {
        for c in ['\\', ':', '*', '?', '"', '<', '>', '|'] {
            if name.contains(c) {
                return reject(&format!("Name cannot contain {c:?}"));
            }
        }

        let reserved = [
            "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7",
            "COM8", "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
        ];
        let upper_name = name.to_uppercase();
        let base_name = upper_name.split('.').next().unwrap_or("");
        if reserved.contains(&base_name) {
            return reject("Reserved filename");
        }
    }

    if name == "." || name == ".." {
        return reject("'.' and '..' are reserved names");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_filename_valid() {
        assert!(validate_filename("test.txt").is_ok());
        assert!(validate_filename("my-file").is_ok());
        assert!(validate_filename(".hidden").is_ok());
        assert!(validate_filename("file with spaces").is_ok());
        assert!(validate_filename(" padded ").is_ok());
    }

    #[test]
    fn test_validate_filename_invalid() {
        assert!(validate_filename("").is_err());
        assert!(validate_filename("   ").is_err());
        assert!(validate_filename("\t").is_err());
        assert!(validate_filename("test/file").is_err());
        assert!(validate_filename(".").is_err());
        assert!(validate_filename("..").is_err());
        assert!(validate_filename(&"x".repeat(256)).is_err());
    }

    #[test]
    fn test_rename_file() {
        let dir = tempfile::tempdir().unwrap();
        let old = dir.path().join("old.txt");
        fs::write(&old, b"data").unwrap();

        let renamed = rename(&old, "new.txt").unwrap();
        assert_eq!(renamed, dir.path().join("new.txt"));
        assert!(!old.exists());
        assert_eq!(fs::read(&renamed).unwrap(), b"data");
    }

    #[test]
    fn test_rename_rejects_blank_without_touching_disk() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("keep.txt");
        fs::write(&file, b"").unwrap();

        let err = rename(&file, "  ").unwrap_err();
        assert!(matches!(err, OpsError::InvalidName { .. }));
        assert!(file.exists());
    }

    #[test]
    fn test_rename_refuses_collision() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a");
        let b = dir.path().join("b");
        fs::write(&a, b"a").unwrap();
        fs::write(&b, b"b").unwrap();

        let err = rename(&a, "b").unwrap_err();
        assert!(matches!(err, OpsError::AlreadyExists { .. }));
        assert_eq!(fs::read(&b).unwrap(), b"b");
    }

    #[test]
    fn test_rename_missing_source() {
        let dir = tempfile::tempdir().unwrap();
        let err = rename(&dir.path().join("ghost"), "real").unwrap_err();
        assert!(matches!(err, OpsError::NotFound { .. }));
    }

    #[test]
    fn test_rename_to_same_name() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a");
        fs::create_dir(&a).unwrap();
        assert_eq!(rename(&a, "a").unwrap(), a);
    }
}
