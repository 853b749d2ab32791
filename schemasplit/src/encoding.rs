//! Text encodings for exploded files.
//!
//! Every file of an exploded tree is either JSON or YAML. The choice is made
//! once per explode through [`Encoding`] and carried explicitly; implode
//! accepts either, deciding per file from its extension.

use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use crate::error::{SplitError, SplitResult};

/// A structured-text encoding for document files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Encoding {
    Json,
    /// The default: easier to edit and review by hand.
    #[default]
    Yaml,
}

impl Encoding {
    /// Both encodings, JSON first.
    pub const ALL: [Encoding; 2] = [Encoding::Json, Encoding::Yaml];

    /// Extension used when writing files.
    pub fn extension(&self) -> &'static str {
        match self {
            Encoding::Json => "json",
            Encoding::Yaml => "yaml",
        }
    }

    /// Every extension recognised when reading.
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            Encoding::Json => &["json"],
            Encoding::Yaml => &["yaml", "yml"],
        }
    }

    /// Match a file extension (without the dot), case-insensitively.
    pub fn from_extension(extension: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|encoding| {
            encoding
                .extensions()
                .iter()
                .any(|ext| ext.eq_ignore_ascii_case(extension))
        })
    }

    /// Determine the encoding of a `/`-separated relative path.
    ///
    /// # Errors
    ///
    /// Returns [`SplitError::UnknownEncoding`] when the extension is missing
    /// or unsupported.
    pub fn from_path(path: &str) -> SplitResult<Self> {
        let file_name = path.rsplit('/').next().unwrap_or(path);
        file_name
            .rsplit_once('.')
            .and_then(|(_, extension)| Self::from_extension(extension))
            .ok_or_else(|| SplitError::UnknownEncoding {
                path: path.to_string(),
            })
    }

    /// Serialize a tree. Output always ends with a newline.
    pub fn encode(&self, value: &Value) -> Result<String, String> {
        match self {
            Encoding::Json => serde_json::to_string_pretty(value)
                .map(|mut text| {
                    text.push('\n');
                    text
                })
                .map_err(|e| e.to_string()),
            Encoding::Yaml => serde_yaml::to_string(value).map_err(|e| e.to_string()),
        }
    }

    /// Parse text into a tree.
    pub fn decode(&self, text: &str) -> Result<Value, String> {
        match self {
            Encoding::Json => serde_json::from_str(text).map_err(|e| e.to_string()),
            Encoding::Yaml => serde_yaml::from_str(text).map_err(|e| e.to_string()),
        }
    }

    /// Encode `value` for the file at `path`.
    pub fn encode_file(&self, path: &str, value: &Value) -> SplitResult<String> {
        self.encode(value).map_err(|reason| SplitError::Encode {
            path: path.to_string(),
            reason,
        })
    }

    /// Decode the contents of the file at `path`.
    pub fn decode_file(&self, path: &str, text: &str) -> SplitResult<Value> {
        self.decode(text).map_err(|reason| SplitError::Parse {
            path: path.to_string(),
            reason,
        })
    }

    /// Pass a tree through encode and decode.
    ///
    /// The result is what a perfect round trip through this encoding can
    /// reproduce, and is the reference the round-trip verifier compares to.
    pub fn normalize(&self, value: &Value) -> SplitResult<Value> {
        let text = self.encode_file("<document>", value)?;
        self.decode_file("<document>", &text)
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for Encoding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_extension(s.trim())
            .ok_or_else(|| format!("unknown encoding '{}' (expected json or yaml)", s))
    }
}
