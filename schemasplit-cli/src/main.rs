//! schemasplit CLI - Command-line interface
//!
//! Splits package schema documents into reviewable file trees and
//! reassembles them.

mod commands;
mod error;

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

use commands::explode::ExplodeArgs;
use commands::implode::ImplodeArgs;
use commands::roundtrip::TestArgs;
use commands::validate::ValidateArgs;
use error::CliError;

#[derive(Debug, Parser)]
#[command(name = "schemasplit")]
#[command(version = schemasplit::VERSION)]
#[command(about = "Explode package schemas into file trees and implode them back", long_about = None)]
struct Cli {
    /// Layout settings file [default: <config dir>/schemasplit/config.ini]
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Split a schema document into one file per entity
    Explode(ExplodeArgs),

    /// Reassemble a schema document from an exploded tree
    Implode(ImplodeArgs),

    /// Check that a document survives explode + implode unchanged
    Test(TestArgs),

    /// Report shape problems in a document or exploded tree
    Validate(ValidateArgs),
}

fn main() {
    let cli = Cli::parse();
    schemasplit::logging::init(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let config = cli.config.as_deref();
    match cli.command {
        Commands::Explode(args) => commands::explode::run(args, config),
        Commands::Implode(args) => commands::implode::run(args, config),
        Commands::Test(args) => commands::roundtrip::run(args, config),
        Commands::Validate(args) => commands::validate::run(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use commands::common::FormatArg;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_explode() {
        let cli = Cli::try_parse_from([
            "schemasplit",
            "-vv",
            "explode",
            "schema.json",
            "out",
            "--format",
            "json",
            "--no-split-descriptions",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 2);
        let Commands::Explode(args) = cli.command else {
            panic!("expected explode");
        };
        assert_eq!(args.input, PathBuf::from("schema.json"));
        assert_eq!(args.output, PathBuf::from("out"));
        assert_eq!(args.format, Some(FormatArg::Json));
        assert!(args.no_split_descriptions);
        assert!(!args.strict);
    }

    #[test]
    fn test_parse_implode_defaults_to_stdout() {
        let cli = Cli::try_parse_from(["schemasplit", "implode", "tree"]).unwrap();
        let Commands::Implode(args) = cli.command else {
            panic!("expected implode");
        };
        assert_eq!(args.output, None);
        assert_eq!(args.format, None);
    }

    #[test]
    fn test_implode_format_conflicts_with_output() {
        let result = Cli::try_parse_from([
            "schemasplit",
            "implode",
            "tree",
            "-o",
            "schema.json",
            "--format",
            "yaml",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_global_config_after_subcommand() {
        let cli = Cli::try_parse_from([
            "schemasplit",
            "test",
            "schema.yaml",
            "--config",
            "layout.ini",
            "-q",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("layout.ini")));
        let Commands::Test(args) = cli.command else {
            panic!("expected test");
        };
        assert!(args.quiet);
    }

    #[test]
    fn test_parse_validate_json() {
        let cli = Cli::try_parse_from(["schemasplit", "validate", "tree", "--json"]).unwrap();
        assert!(matches!(cli.command, Commands::Validate(ValidateArgs { json: true, .. })));
    }

    #[test]
    fn test_unknown_format_rejected() {
        assert!(Cli::try_parse_from(["schemasplit", "test", "a.json", "--format", "toml"]).is_err());
    }
}
