//! Explode command - split a schema document into a file tree.

use std::path::{Path, PathBuf};

use schemasplit::{Exploder, FsStore};
use tracing::{info, warn};

use super::common::{guard, load_config, read_document, resolve_encoding, FormatArg};
use crate::error::CliError;

/// Arguments for `schemasplit explode`.
#[derive(Debug, Clone, clap::Args)]
pub struct ExplodeArgs {
    /// Schema document to split (.json, .yaml or .yml)
    pub input: PathBuf,

    /// Directory to write the file tree into
    pub output: PathBuf,

    /// Encoding for the written files [default: from config, else yaml]
    #[arg(long, value_enum)]
    pub format: Option<FormatArg>,

    /// Keep long descriptions inline instead of writing .md sidecars
    #[arg(long)]
    pub no_split_descriptions: bool,

    /// Descriptions longer than this many characters get a sidecar
    #[arg(long, value_name = "CHARS")]
    pub description_threshold: Option<usize>,

    /// Fail if the document has validation violations
    #[arg(long)]
    pub strict: bool,
}

/// Run the explode command.
pub fn run(args: ExplodeArgs, config_path: Option<&Path>) -> Result<(), CliError> {
    let mut config = resolve_encoding(args.format, load_config(config_path)?);
    if args.no_split_descriptions {
        config = config.with_split_descriptions(false);
    }
    if let Some(threshold) = args.description_threshold {
        config = config.with_description_threshold(threshold);
    }

    let document = read_document(&args.input)?;
    guard(&document, args.strict)?;

    let mut store = FsStore::new(&args.output);
    if store.is_populated() {
        warn!(
            dir = %args.output.display(),
            "Output directory is not empty; stale files may be picked up by implode"
        );
    }

    info!(input = %args.input.display(), output = %args.output.display(), "Exploding");
    let summary = Exploder::new(config).explode(&document, &mut store)?;

    println!("{}", summary);
    println!("Output: {}", args.output.display());
    Ok(())
}
