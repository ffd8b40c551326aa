//! The metadata record of a single entry.

use std::fs::{self, Metadata};
use std::path::Path;

use chrono::{DateTime, Local};
use compact_str::CompactString;
use tracing::debug;

use arbor_core::{Attributes, EntryInfo, EntryType, OpsError, OpsResult, Permissions, extension_of};

use crate::size::compute_size;

/// Host queries behind the fields of [`EntryInfo`] that may be unavailable.
///
/// Every method degrades on its own: a `None` marks the field unavailable
/// without affecting the rest of the record.
pub trait EntryProbe: Send + Sync {
    /// Creation time, where the filesystem records one.
    fn created(&self, path: &Path, metadata: &Metadata) -> Option<DateTime<Local>>;

    /// Last modification time.
    fn modified(&self, path: &Path, metadata: &Metadata) -> Option<DateTime<Local>>;

    /// Name of the owning user.
    fn owner(&self, path: &Path, metadata: &Metadata) -> Option<String>;

    /// Access rights of the current process.
    fn permissions(&self, path: &Path, metadata: &Metadata) -> Permissions;

    /// Platform attribute flags.
    fn attributes(&self, path: &Path, metadata: &Metadata) -> Attributes;
}

/// [`EntryProbe`] backed by the running host.
#[derive(Debug, Clone, Copy, Default)]
pub struct HostProbe;

impl EntryProbe for HostProbe {
    fn created(&self, _path: &Path, metadata: &Metadata) -> Option<DateTime<Local>> {
        metadata.created().ok().map(DateTime::<Local>::from)
    }

    fn modified(&self, _path: &Path, metadata: &Metadata) -> Option<DateTime<Local>> {
        metadata.modified().ok().map(DateTime::<Local>::from)
    }

    #[cfg(unix)]
    fn owner(&self, _path: &Path, metadata: &Metadata) -> Option<String> {
        use nix::unistd::{Uid, User};
        use std::os::unix::fs::MetadataExt;

        let uid = metadata.uid();
        match User::from_uid(Uid::from_raw(uid)) {
            Ok(Some(user)) => Some(user.name),
            // No passwd entry: the numeric id is all there is.
            Ok(None) => Some(uid.to_string()),
            Err(e) => {
                debug!(uid, error = %e, "owner lookup failed");
                None
            }
        }
    }

    #[cfg(not(unix))]
    fn owner(&self, _path: &Path, _metadata: &Metadata) -> Option<String> {
        None
    }

    #[cfg(unix)]
    fn permissions(&self, path: &Path, _metadata: &Metadata) -> Permissions {
        use nix::unistd::{AccessFlags, access};

        Permissions {
            read: access(path, AccessFlags::R_OK).is_ok(),
            write: access(path, AccessFlags::W_OK).is_ok(),
            execute: access(path, AccessFlags::X_OK).is_ok(),
        }
    }

    #[cfg(not(unix))]
    fn permissions(&self, path: &Path, metadata: &Metadata) -> Permissions {
        let extension = path
            .extension()
            .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();
        Permissions {
            read: true,
            write: !metadata.permissions().readonly(),
            execute: metadata.is_dir() || matches!(extension.as_str(), "exe" | "bat" | "cmd" | "com"),
        }
    }

    #[cfg(windows)]
    fn attributes(&self, _path: &Path, metadata: &Metadata) -> Attributes {
        use std::os::windows::fs::MetadataExt;

        const FILE_ATTRIBUTE_HIDDEN: u32 = 0x2;
        const FILE_ATTRIBUTE_SYSTEM: u32 = 0x4;
        const FILE_ATTRIBUTE_ARCHIVE: u32 = 0x20;

        let bits = metadata.file_attributes();
        Attributes {
            hidden: bits & FILE_ATTRIBUTE_HIDDEN != 0,
            read_only: metadata.permissions().readonly(),
            archive: Some(bits & FILE_ATTRIBUTE_ARCHIVE != 0),
            system: Some(bits & FILE_ATTRIBUTE_SYSTEM != 0),
        }
    }

    #[cfg(not(windows))]
    fn attributes(&self, path: &Path, metadata: &Metadata) -> Attributes {
        Attributes {
            hidden: path
                .file_name()
                .is_some_and(|name| name.to_string_lossy().starts_with('.')),
            read_only: metadata.permissions().readonly(),
            archive: None,
            system: None,
        }
    }
}

/// Describe `path` using the host.
pub fn describe(path: &Path) -> OpsResult<EntryInfo> {
    describe_with(path, &HostProbe)
}

/// Describe `path`, taking the optional fields from `probe`.
///
/// Fails only when the entry itself cannot be found; any single field the
/// probe cannot provide is left unavailable.
pub fn describe_with(path: &Path, probe: &dyn EntryProbe) -> OpsResult<EntryInfo> {
    let metadata = fs::metadata(path)
        .or_else(|_| fs::symlink_metadata(path))
        .map_err(|e| OpsError::io(path, e))?;
    let absolute = std::path::absolute(path).map_err(|e| OpsError::io(path, e))?;

    let name = match absolute.file_name() {
        Some(name) => CompactString::new(name.to_string_lossy()),
        None => CompactString::new(absolute.display().to_string()),
    };
    let is_dir = metadata.is_dir();
    let extension: CompactString = if is_dir {
        CompactString::default()
    } else {
        extension_of(&name).into()
    };
    let size = if is_dir {
        compute_size(&absolute)
    } else {
        metadata.len()
    };

    let permissions = probe.permissions(&absolute, &metadata);
    let mut attributes = probe.attributes(&absolute, &metadata);
    attributes.read_only |= !permissions.write;

    debug!(path = %absolute.display(), size, "described");
    Ok(EntryInfo {
        entry_type: EntryType::classify(is_dir, &extension),
        created: probe.created(&absolute, &metadata),
        modified: probe.modified(&absolute, &metadata),
        owner: probe.owner(&absolute, &metadata),
        name,
        extension,
        path: absolute,
        size,
        permissions,
        attributes,
    })
}
