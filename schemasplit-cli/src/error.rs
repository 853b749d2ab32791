//! Error type for CLI commands.

use std::fmt;
use std::io;
use std::path::PathBuf;

use schemasplit::{ConfigError, SplitError};

/// Everything a command can fail with. Any variant exits with status 1.
#[derive(Debug)]
pub enum CliError {
    /// Config file could not be loaded or a setting is invalid.
    Config(String),
    /// Explode, implode or encoding failure from the library.
    Split(SplitError),
    /// Reading input or writing output failed.
    Io { path: PathBuf, source: io::Error },
    /// The document has validation violations.
    Validation(usize),
    /// The round trip did not reproduce the document.
    Divergence(usize),
    /// Command output could not be produced.
    Output(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::Split(e) => write!(f, "{}", e),
            CliError::Io { path, source } => write!(f, "{}: {}", path.display(), source),
            CliError::Validation(count) => {
                write!(f, "Document has {} validation violation(s)", count)
            }
            CliError::Divergence(count) => {
                write!(f, "Round trip diverged with {} change(s)", count)
            }
            CliError::Output(msg) => write!(f, "Failed to write output: {}", msg),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Split(e) => Some(e),
            CliError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<SplitError> for CliError {
    fn from(e: SplitError) -> Self {
        CliError::Split(e)
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        CliError::Config(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_error_passes_message_through() {
        let err = CliError::from(SplitError::MissingBaseFile);
        assert_eq!(err.to_string(), SplitError::MissingBaseFile.to_string());
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_counts_in_messages() {
        assert_eq!(
            CliError::Validation(2).to_string(),
            "Document has 2 validation violation(s)"
        );
        assert_eq!(
            CliError::Divergence(1).to_string(),
            "Round trip diverged with 1 change(s)"
        );
    }
}
