//! Entry kinds and the descriptive metadata record.

use std::cmp::Ordering;
use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, Local};
use compact_str::CompactString;
use serde::{Deserialize, Serialize};

use crate::config::DEFAULT_DATE_FORMAT;

/// Placeholder rendered for fields the host could not provide.
pub const UNAVAILABLE: &str = "unavailable";

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Type of file system entry, as reported without following links.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryKind {
    /// Regular file.
    File,
    /// Directory.
    Directory,
    /// Symbolic link.
    Symlink {
        /// Link target path.
        target: CompactString,
        /// Whether the link target exists.
        broken: bool,
    },
    /// Other file types (sockets, devices, etc.).
    Other,
}

impl EntryKind {
    /// Check if this is a directory.
    pub fn is_dir(&self) -> bool {
        matches!(self, EntryKind::Directory)
    }

    /// Check if this is a regular file.
    pub fn is_file(&self) -> bool {
        matches!(self, EntryKind::File)
    }

    /// Check if this is a symlink.
    pub fn is_symlink(&self) -> bool {
        matches!(self, EntryKind::Symlink { .. })
    }
}

/// Coarse classification shown in the metadata block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntryType {
    Folder,
    Text,
    Image,
    Audio,
    Executable,
    Archive,
    File,
}

impl EntryType {
    /// Classify an entry from its directory flag and extension.
    pub fn classify(is_dir: bool, extension: &str) -> Self {
        if is_dir {
            return Self::Folder;
        }
        match extension.to_ascii_lowercase().as_str() {
            "txt" => Self::Text,
            "jpg" | "jpeg" | "png" | "gif" => Self::Image,
            "mp3" | "wav" => Self::Audio,
            "exe" => Self::Executable,
            "zip" | "rar" => Self::Archive,
            _ => Self::File,
        }
    }
}

impl fmt::Display for EntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Folder => write!(f, "Folder"),
            Self::Text => write!(f, "Text file"),
            Self::Image => write!(f, "Image"),
            Self::Audio => write!(f, "Audio file"),
            Self::Executable => write!(f, "Executable"),
            Self::Archive => write!(f, "Archive"),
            Self::File => write!(f, "File"),
        }
    }
}

/// Extension of a file name: the text after the last dot, provided the dot is
/// neither the first nor the last character.
pub fn extension_of(name: &str) -> &str {
    match name.rfind('.') {
        Some(idx) if idx > 0 && idx < name.len() - 1 => &name[idx + 1..],
        _ => "",
    }
}

/// Access rights of the current process on an entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permissions {
    pub read: bool,
    pub write: bool,
    pub execute: bool,
}

impl fmt::Display for Permissions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let words: Vec<&str> = [
            (self.read, "Read"),
            (self.write, "Write"),
            (self.execute, "Execute"),
        ]
        .into_iter()
        .filter_map(|(set, word)| set.then_some(word))
        .collect();
        write!(f, "{}", words.join(" "))
    }
}

/// Platform attribute flags.
///
/// `archive` and `system` only exist on DOS-style filesystems and are `None`
/// wherever the host does not expose them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attributes {
    pub hidden: bool,
    pub read_only: bool,
    pub archive: Option<bool>,
    pub system: Option<bool>,
}

impl Attributes {
    /// Names of the attributes that are set.
    pub fn labels(&self) -> Vec<&'static str> {
        let mut labels = Vec::new();
        if self.hidden {
            labels.push("Hidden");
        }
        if self.read_only {
            labels.push("Read-only");
        }
        if self.archive == Some(true) {
            labels.push("Archive");
        }
        if self.system == Some(true) {
            labels.push("System");
        }
        labels
    }
}

/// Snapshot of descriptive metadata for one entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryInfo {
    /// File/directory name (not full path).
    pub name: CompactString,
    /// Extension without the dot; empty for directories and extensionless names.
    pub extension: CompactString,
    /// Absolute path.
    pub path: PathBuf,
    /// Size in bytes (recursive for directories).
    pub size: u64,
    /// Coarse type classification.
    pub entry_type: EntryType,
    /// Creation time, if the host records one.
    pub created: Option<DateTime<Local>>,
    /// Last modification time.
    pub modified: Option<DateTime<Local>>,
    /// Access rights of the current process.
    pub permissions: Permissions,
    /// Owner name.
    pub owner: Option<String>,
    /// Platform attribute flags.
    pub attributes: Attributes,
}

impl EntryInfo {
    /// Size in megabytes (1 MB = 1024 * 1024 bytes).
    pub fn size_mb(&self) -> f64 {
        self.size as f64 / BYTES_PER_MB
    }

    /// Render the ten-line metadata block.
    pub fn render(&self, date_format: &str) -> String {
        let format_time = |time: &Option<DateTime<Local>>| match time {
            Some(t) => t.format(date_format).to_string(),
            None => UNAVAILABLE.to_string(),
        };
        let extension = if self.extension.is_empty() {
            "none"
        } else {
            self.extension.as_str()
        };

        let mut out = String::new();
        out.push_str(&format!("1. Name: {}\n", self.name));
        out.push_str(&format!("2. Extension: {extension}\n"));
        out.push_str(&format!("3. Path: {}\n", self.path.display()));
        out.push_str(&format!(
            "4. Size: {} bytes ({:.2} MB)\n",
            self.size,
            self.size_mb()
        ));
        out.push_str(&format!("5. Type: {}\n", self.entry_type));
        out.push_str(&format!("6. Created: {}\n", format_time(&self.created)));
        out.push_str(&format!("7. Modified: {}\n", format_time(&self.modified)));
        out.push_str(&format!("8. Permissions: {}\n", self.permissions));
        out.push_str(&format!(
            "9. Owner: {}\n",
            self.owner.as_deref().unwrap_or(UNAVAILABLE)
        ));
        out.push_str(&format!(
            "10. Attributes: {}\n",
            self.attributes.labels().join(", ")
        ));
        out
    }
}

impl fmt::Display for EntryInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(DEFAULT_DATE_FORMAT))
    }
}

/// One immediate child of a directory, as produced by a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntrySummary {
    /// Full path of the entry.
    pub path: PathBuf,
    /// File/directory name.
    pub name: CompactString,
    /// Entry type.
    pub kind: EntryKind,
    /// Size in bytes (not recursive; 0 for directories).
    pub size: u64,
}

impl EntrySummary {
    /// Whether the entry can be expanded in a tree view.
    pub fn is_dir(&self) -> bool {
        self.kind.is_dir()
    }
}

/// Display order of two entries: optionally directories first, then
/// case-insensitive name, then exact name.
pub fn listing_order(
    (a_dir, a_name): (bool, &str),
    (b_dir, b_name): (bool, &str),
    dirs_first: bool,
) -> Ordering {
    let by_kind = if dirs_first {
        b_dir.cmp(&a_dir)
    } else {
        Ordering::Equal
    };
    by_kind
        .then_with(|| a_name.to_lowercase().cmp(&b_name.to_lowercase()))
        .then_with(|| a_name.cmp(b_name))
}

/// Sort a listing in display order.
pub fn sort_summaries(entries: &mut [EntrySummary], dirs_first: bool) {
    entries.sort_by(|a, b| {
        listing_order((a.is_dir(), a.name.as_str()), (b.is_dir(), b.name.as_str()), dirs_first)
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample() -> EntryInfo {
        EntryInfo {
            name: "report.txt".into(),
            extension: "txt".into(),
            path: PathBuf::from("/tmp/report.txt"),
            size: 3 * 1024 * 1024,
            entry_type: EntryType::Text,
            created: None,
            modified: Some(Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap()),
            permissions: Permissions {
                read: true,
                write: true,
                execute: false,
            },
            owner: None,
            attributes: Attributes {
                hidden: false,
                read_only: false,
                archive: None,
                system: None,
            },
        }
    }

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of("photo.JPG"), "JPG");
        assert_eq!(extension_of("archive.tar.gz"), "gz");
        assert_eq!(extension_of(".bashrc"), "");
        assert_eq!(extension_of("trailing."), "");
        assert_eq!(extension_of("plain"), "");
    }

    #[test]
    fn test_classify() {
        assert_eq!(EntryType::classify(true, "txt"), EntryType::Folder);
        assert_eq!(EntryType::classify(false, "TXT"), EntryType::Text);
        assert_eq!(EntryType::classify(false, "jpeg"), EntryType::Image);
        assert_eq!(EntryType::classify(false, "wav"), EntryType::Audio);
        assert_eq!(EntryType::classify(false, "exe"), EntryType::Executable);
        assert_eq!(EntryType::classify(false, "rar"), EntryType::Archive);
        assert_eq!(EntryType::classify(false, "rs"), EntryType::File);
        assert_eq!(EntryType::classify(false, ""), EntryType::File);
    }

    #[test]
    fn test_render_marks_unavailable_fields() {
        let text = sample().render(DEFAULT_DATE_FORMAT);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 10);
        assert_eq!(lines[0], "1. Name: report.txt");
        assert_eq!(lines[3], "4. Size: 3145728 bytes (3.00 MB)");
        assert_eq!(lines[4], "5. Type: Text file");
        assert_eq!(lines[5], "6. Created: unavailable");
        assert_eq!(lines[6], "7. Modified: 09.03.2024 14:05:07");
        assert_eq!(lines[7], "8. Permissions: Read Write");
        assert_eq!(lines[8], "9. Owner: unavailable");
        assert_eq!(lines[9], "10. Attributes: ");
    }

    #[test]
    fn test_render_empty_extension() {
        let mut info = sample();
        info.extension = CompactString::default();
        assert!(info.render(DEFAULT_DATE_FORMAT).contains("2. Extension: none"));
    }

    #[test]
    fn test_sort_summaries_dirs_first() {
        let entry = |name: &str, kind: EntryKind| EntrySummary {
            path: PathBuf::from("/x").join(name),
            name: name.into(),
            kind,
            size: 0,
        };
        let mut entries = vec![
            entry("b.txt", EntryKind::File),
            entry("Zeta", EntryKind::Directory),
            entry("a.txt", EntryKind::File),
            entry("alpha", EntryKind::Directory),
        ];

        sort_summaries(&mut entries, true);
        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["alpha", "Zeta", "a.txt", "b.txt"]);

        sort_summaries(&mut entries, false);
        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["a.txt", "alpha", "b.txt", "Zeta"]);
    }

    #[test]
    fn test_attribute_labels() {
        let attrs = Attributes {
            hidden: true,
            read_only: true,
            archive: Some(true),
            system: Some(false),
        };
        assert_eq!(attrs.labels(), vec!["Hidden", "Read-only", "Archive"]);
    }
}
