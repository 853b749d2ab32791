//! Common types and utilities shared across CLI commands.

use std::fs;
use std::path::Path;

use clap::ValueEnum;
use schemasplit::{
    Encoding, FsStore, Imploder, SchemaValidator, SplitConfig, SplitError, Validator,
};
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::CliError;

/// File encoding selection for CLI arguments.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum FormatArg {
    /// Pretty-printed JSON
    Json,
    /// YAML
    Yaml,
}

impl From<FormatArg> for Encoding {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Json => Encoding::Json,
            FormatArg::Yaml => Encoding::Yaml,
        }
    }
}

/// Load layout settings from `--config`, or the default location.
///
/// An explicit path must exist; the default file is optional.
pub fn load_config(path: Option<&Path>) -> Result<SplitConfig, CliError> {
    let config = match path {
        Some(path) => SplitConfig::load(path)?,
        None => SplitConfig::load_default()?,
    };
    debug!(?config, "Loaded layout settings");
    Ok(config)
}

/// Apply a `--format` flag over the loaded settings.
pub fn resolve_encoding(cli_format: Option<FormatArg>, config: SplitConfig) -> SplitConfig {
    // CLI takes precedence, then config
    match cli_format {
        Some(format) => config.with_encoding(format.into()),
        None => config,
    }
}

/// Read a single document file, decoding by its extension.
pub fn read_document(path: &Path) -> Result<Value, CliError> {
    let name = path.to_string_lossy();
    let encoding = Encoding::from_path(&name)?;
    let text = fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(encoding.decode_file(&name, &text)?)
}

/// Implode the tree rooted at `dir`.
pub fn implode_dir(dir: &Path) -> Result<Value, CliError> {
    if !dir.is_dir() {
        return Err(CliError::Split(SplitError::ReadFailed {
            path: dir.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not a directory"),
        }));
    }
    Ok(Imploder::new().implode(&FsStore::new(dir))?)
}

/// Run the validator as an advisory check.
///
/// Violations are logged as warnings. With `strict` they fail the command.
pub fn guard(document: &Value, strict: bool) -> Result<(), CliError> {
    let violations = SchemaValidator::new().validate(document);
    for violation in &violations {
        warn!(path = %violation.path, "{}", violation.message);
    }

    if strict && !violations.is_empty() {
        return Err(CliError::Validation(violations.len()));
    }
    Ok(())
}
