//! Test command - check that a document survives explode + implode.

use std::path::{Path, PathBuf};

use schemasplit::verify_round_trip;

use super::common::{load_config, read_document, resolve_encoding, FormatArg};
use crate::error::CliError;

/// Arguments for `schemasplit test`.
#[derive(Debug, Clone, clap::Args)]
pub struct TestArgs {
    /// Schema document to check (.json, .yaml or .yml)
    pub input: PathBuf,

    /// Encoding to round-trip through [default: from config, else yaml]
    #[arg(long, value_enum)]
    pub format: Option<FormatArg>,

    /// Only report through the exit status
    #[arg(short, long)]
    pub quiet: bool,
}

/// Run the round-trip check. Nothing is written to disk.
pub fn run(args: TestArgs, config_path: Option<&Path>) -> Result<(), CliError> {
    let config = resolve_encoding(args.format, load_config(config_path)?);
    let document = read_document(&args.input)?;

    let report = verify_round_trip(&document, &config)?;
    if !args.quiet {
        println!("{}", report.summary);
        println!("{}", report);
    }

    if report.is_clean() {
        Ok(())
    } else {
        Err(CliError::Divergence(report.changes.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_clean_document_passes() {
        let temp = TempDir::new().unwrap();
        let input = temp.path().join("schema.yaml");
        fs::write(
            &input,
            "name: pkg\nresources:\n  'pkg:storage/bucket:Bucket':\n    description: A bucket\nconfig: {}\n",
        )
        .unwrap();
        let config = temp.path().join("config.ini");
        fs::write(&config, "[layout]\nencoding = json\n").unwrap();

        let args = TestArgs {
            input,
            format: None,
            quiet: true,
        };
        run(args, Some(&config)).unwrap();
    }

    #[test]
    fn test_malformed_token_is_fatal() {
        let temp = TempDir::new().unwrap();
        let input = temp.path().join("schema.json");
        fs::write(&input, r#"{"functions": {"nope": {}}}"#).unwrap();
        let config = temp.path().join("config.ini");
        fs::write(&config, "").unwrap();

        let args = TestArgs {
            input,
            format: Some(FormatArg::Yaml),
            quiet: true,
        };
        assert!(matches!(
            run(args, Some(&config)),
            Err(CliError::Split(schemasplit::SplitError::MalformedToken { .. }))
        ));
    }
}
