//! Layout configuration for explode and implode.
//!
//! Settings come from three places, highest precedence first:
//!
//! 1. Command-line flags
//! 2. The INI config file (`~/.config/schemasplit/config.ini` by default)
//! 3. Built-in defaults
//!
//! ```ini
//! [layout]
//! encoding = yaml
//! split_descriptions = true
//! description_threshold = 400
//! ```

use std::path::{Path, PathBuf};

use ini::Ini;
use thiserror::Error;

use crate::description::{DescriptionSplitter, DEFAULT_DESCRIPTION_THRESHOLD};
use crate::encoding::Encoding;

/// Section of the config file holding layout settings.
pub const LAYOUT_SECTION: &str = "layout";

/// Errors raised while loading or saving the config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read or parsed as INI.
    #[error("failed to load config {}: {reason}", .path.display())]
    Load { path: PathBuf, reason: String },

    /// The file could not be written.
    #[error("failed to save config {}: {source}", .path.display())]
    Save {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A key holds a value of the wrong shape.
    #[error("invalid value '{value}' for layout.{key}: {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },
}

/// How documents are laid out on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitConfig {
    /// Encoding used for every file written by explode.
    pub encoding: Encoding,

    /// Whether long descriptions move to `.md` sidecars.
    pub split_descriptions: bool,

    /// Descriptions longer than this many characters are split.
    pub description_threshold: usize,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            encoding: Encoding::default(),
            split_descriptions: true,
            description_threshold: DEFAULT_DESCRIPTION_THRESHOLD,
        }
    }
}

impl SplitConfig {
    pub fn new(encoding: Encoding) -> Self {
        Self {
            encoding,
            ..Default::default()
        }
    }

    /// Set the output encoding.
    pub fn with_encoding(mut self, encoding: Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Enable or disable description sidecars.
    pub fn with_split_descriptions(mut self, enabled: bool) -> Self {
        self.split_descriptions = enabled;
        self
    }

    /// Set the sidecar length threshold.
    pub fn with_description_threshold(mut self, threshold: usize) -> Self {
        self.description_threshold = threshold;
        self
    }

    /// Splitter for this configuration, or `None` when splitting is off.
    pub fn splitter(&self) -> Option<DescriptionSplitter> {
        self.split_descriptions
            .then(|| DescriptionSplitter::new(self.description_threshold))
    }

    /// Load settings from an INI file, falling back to defaults per key.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let ini = Ini::load_from_file(path).map_err(|e| ConfigError::Load {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Self::from_ini(&ini)
    }

    /// Load the default config file if it exists, otherwise use defaults.
    pub fn load_default() -> Result<Self, ConfigError> {
        match config_file_path() {
            Some(path) if path.is_file() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    fn from_ini(ini: &Ini) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let Some(section) = ini.section(Some(LAYOUT_SECTION)) else {
            return Ok(config);
        };

        if let Some(value) = section.get("encoding") {
            config.encoding = value.parse().map_err(|reason| ConfigError::InvalidValue {
                key: "encoding".to_string(),
                value: value.to_string(),
                reason,
            })?;
        }

        if let Some(value) = section.get("split_descriptions") {
            config.split_descriptions = parse_bool(value).ok_or_else(|| {
                ConfigError::InvalidValue {
                    key: "split_descriptions".to_string(),
                    value: value.to_string(),
                    reason: "expected true or false".to_string(),
                }
            })?;
        }

        if let Some(value) = section.get("description_threshold") {
            config.description_threshold =
                value
                    .trim()
                    .parse()
                    .map_err(|e: std::num::ParseIntError| ConfigError::InvalidValue {
                        key: "description_threshold".to_string(),
                        value: value.to_string(),
                        reason: e.to_string(),
                    })?;
        }

        Ok(config)
    }

    /// Write these settings to an INI file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let mut ini = Ini::new();
        ini.with_section(Some(LAYOUT_SECTION))
            .set("encoding", self.encoding.extension())
            .set("split_descriptions", self.split_descriptions.to_string())
            .set(
                "description_threshold",
                self.description_threshold.to_string(),
            );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| ConfigError::Save {
                path: path.to_path_buf(),
                source,
            })?;
        }
        ini.write_to_file(path).map_err(|source| ConfigError::Save {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Location of the default config file, if the platform has a config dir.
pub fn config_file_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("schemasplit").join("config.ini"))
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}
