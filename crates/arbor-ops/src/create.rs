//! Directory creation.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use arbor_core::{OpsError, OpsResult};

use crate::rename::validate_filename;

/// Create the directory `name` inside `parent` and return its path.
///
/// Blank names are rejected before any filesystem call. The host refuses
/// existing entries and missing parents; no intermediate directories are made.
pub fn create_directory(parent: &Path, name: &str) -> OpsResult<PathBuf> {
    validate_filename(name)?;

    let path = parent.join(name);
    debug!(path = %path.display(), "creating directory");
    fs::create_dir(&path).map_err(|e| OpsError::io(&path, e))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_directory() {
        let dir = tempfile::tempdir().unwrap();
        let created = create_directory(dir.path(), "sub").unwrap();

        assert_eq!(created, dir.path().join("sub"));
        assert!(created.is_dir());
        assert_eq!(fs::read_dir(&created).unwrap().count(), 0);
    }

    #[test]
    fn test_create_directory_blank_name() {
        let dir = tempfile::tempdir().unwrap();

        for name in ["", " ", "\t\n"] {
            let err = create_directory(dir.path(), name).unwrap_err();
            assert!(err.is_invalid_input());
        }
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_create_directory_existing() {
        let dir = tempfile::tempdir().unwrap();
        create_directory(dir.path(), "sub").unwrap();

        let err = create_directory(dir.path(), "sub").unwrap_err();
        assert!(matches!(err, OpsError::AlreadyExists { .. }));
    }

    #[test]
    fn test_create_directory_missing_parent() {
        let dir = tempfile::tempdir().unwrap();
        let err = create_directory(&dir.path().join("missing"), "sub").unwrap_err();
        assert!(matches!(err, OpsError::NotFound { .. }));
    }
}
