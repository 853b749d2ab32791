//! Validate command - report shape problems in a document or tree.

use std::path::PathBuf;

use schemasplit::{SchemaValidator, Validator, Violation};

use super::common::{implode_dir, read_document};
use crate::error::CliError;

/// Arguments for `schemasplit validate`.
#[derive(Debug, Clone, clap::Args)]
pub struct ValidateArgs {
    /// Schema document, or a directory holding an exploded tree
    pub path: PathBuf,

    /// Print violations as a JSON array
    #[arg(long)]
    pub json: bool,
}

/// Run the validate command.
pub fn run(args: ValidateArgs) -> Result<(), CliError> {
    let document = if args.path.is_dir() {
        implode_dir(&args.path)?
    } else {
        read_document(&args.path)?
    };

    let violations = SchemaValidator::new().validate(&document);
    if args.json {
        println!("{}", render_json(&violations)?);
    } else if violations.is_empty() {
        println!("{}: ok", args.path.display());
    } else {
        for violation in &violations {
            println!("{}: {}", violation.path, violation.message);
        }
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(CliError::Validation(violations.len()))
    }
}

fn render_json(violations: &[Violation]) -> Result<String, CliError> {
    serde_json::to_string_pretty(violations).map_err(|e| CliError::Output(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use schemasplit::ViolationKind;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_render_json() {
        let violations = [Violation {
            path: "$.name".to_string(),
            message: "$.name is required".to_string(),
            kind: ViolationKind::Missing,
        }];
        let rendered: serde_json::Value =
            serde_json::from_str(&render_json(&violations).unwrap()).unwrap();
        assert_eq!(rendered[0]["kind"], "missing");
    }

    #[test]
    fn test_validates_file_and_directory() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("schema.json");
        fs::write(&file, r#"{"name": "pkg"}"#).unwrap();
        run(ValidateArgs {
            path: file,
            json: false,
        })
        .unwrap();

        let tree = temp.path().join("tree");
        fs::create_dir(&tree).unwrap();
        fs::write(tree.join("base.yaml"), "version: 1.0.0\n").unwrap();
        assert!(matches!(
            run(ValidateArgs {
                path: tree,
                json: true,
            }),
            Err(CliError::Validation(1))
        ));
    }
}
