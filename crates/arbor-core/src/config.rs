//! Explorer configuration types.

use std::path::{Path, PathBuf};

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use crate::error::OpsError;

/// Default strftime pattern for timestamps in the metadata block.
pub const DEFAULT_DATE_FORMAT: &str = "%d.%m.%Y %H:%M:%S";

/// Default word used by collision-avoidance naming.
pub const DEFAULT_COPY_LABEL: &str = "Copy";

/// Configuration shared by the operations layer and its consumers.
#[derive(Debug, Clone, PartialEq, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
#[serde(default)]
pub struct ExplorerConfig {
    /// Show hidden entries when listing directory children.
    #[builder(default = "false")]
    pub show_hidden: bool,

    /// Word inserted into generated copy names ("{base} - {label} (n){ext}").
    #[builder(default = "DEFAULT_COPY_LABEL.to_string()")]
    pub copy_label: String,

    /// strftime pattern used when rendering timestamps.
    #[builder(default = "DEFAULT_DATE_FORMAT.to_string()")]
    pub date_format: String,

    /// Maximum number of operations running on background workers at once.
    #[builder(default = "4")]
    pub max_concurrent_ops: usize,

    /// List directories before files.
    #[builder(default = "true")]
    pub dirs_first: bool,
}

impl ExplorerConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        if let Some(ref label) = self.copy_label {
            if label.trim().is_empty() {
                return Err("Copy label cannot be blank".to_string());
            }
        }
        if let Some(0) = self.max_concurrent_ops {
            return Err("max_concurrent_ops must be at least 1".to_string());
        }
        Ok(())
    }
}

impl ExplorerConfig {
    /// Create a new config builder.
    pub fn builder() -> ExplorerConfigBuilder {
        ExplorerConfigBuilder::default()
    }

    /// Default location of the config file (`<config_dir>/arbor/config.toml`).
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("arbor").join("config.toml"))
    }

    /// Parse a config from TOML text.
    pub fn from_toml(text: &str) -> Result<Self, OpsError> {
        let config: Self = toml::from_str(text).map_err(|e| OpsError::InvalidConfig {
            message: e.to_string(),
        })?;
        config.check()?;
        Ok(config)
    }

    /// Load a config file.
    pub fn load(path: &Path) -> Result<Self, OpsError> {
        let text = std::fs::read_to_string(path).map_err(|e| OpsError::io(path, e))?;
        Self::from_toml(&text)
    }

    /// Load the config at `path`, falling back to defaults when the file does not exist.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, OpsError> {
        match path {
            Some(path) if path.exists() => Self::load(path),
            _ => Ok(Self::default()),
        }
    }

    fn check(&self) -> Result<(), OpsError> {
        if self.copy_label.trim().is_empty() {
            return Err(OpsError::InvalidConfig {
                message: "copy_label cannot be blank".to_string(),
            });
        }
        if self.max_concurrent_ops == 0 {
            return Err(OpsError::InvalidConfig {
                message: "max_concurrent_ops must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Check if an entry name is hidden from listings.
    pub fn should_skip_hidden(&self, hidden: bool) -> bool {
        !self.show_hidden && hidden
    }
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            show_hidden: false,
            copy_label: DEFAULT_COPY_LABEL.to_string(),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            max_concurrent_ops: 4,
            dirs_first: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = ExplorerConfig::builder()
            .show_hidden(true)
            .copy_label("Kopie")
            .max_concurrent_ops(2usize)
            .build()
            .unwrap();

        assert!(config.show_hidden);
        assert_eq!(config.copy_label, "Kopie");
        assert_eq!(config.max_concurrent_ops, 2);
        assert_eq!(config.date_format, DEFAULT_DATE_FORMAT);
    }

    #[test]
    fn test_builder_rejects_blank_label() {
        assert!(ExplorerConfig::builder().copy_label("  ").build().is_err());
        assert!(
            ExplorerConfig::builder()
                .max_concurrent_ops(0usize)
                .build()
                .is_err()
        );
    }

    #[test]
    fn test_from_toml_partial() {
        let config = ExplorerConfig::from_toml("show_hidden = true\n").unwrap();
        assert!(config.show_hidden);
        assert_eq!(config.copy_label, DEFAULT_COPY_LABEL);
        assert_eq!(config.max_concurrent_ops, 4);
    }

    #[test]
    fn test_from_toml_invalid() {
        let err = ExplorerConfig::from_toml("max_concurrent_ops = 0\n").unwrap_err();
        assert!(matches!(err, OpsError::InvalidConfig { .. }));

        let err = ExplorerConfig::from_toml("show_hidden = \"yes\"\n").unwrap_err();
        assert!(matches!(err, OpsError::InvalidConfig { .. }));
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        let config = ExplorerConfig::load_or_default(Some(&missing)).unwrap();
        assert_eq!(config, ExplorerConfig::default());
    }

    #[test]
    fn test_should_skip_hidden() {
        let mut config = ExplorerConfig::default();
        assert!(config.should_skip_hidden(true));
        assert!(!config.should_skip_hidden(false));

        config.show_hidden = true;
        assert!(!config.should_skip_hidden(true));
    }
}
