//! Implode command - reassemble a schema document from a file tree.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use schemasplit::Encoding;
use tracing::info;

use super::common::{guard, implode_dir, load_config, resolve_encoding, FormatArg};
use crate::error::CliError;

/// Arguments for `schemasplit implode`.
#[derive(Debug, Clone, clap::Args)]
pub struct ImplodeArgs {
    /// Directory holding an exploded tree
    pub dir: PathBuf,

    /// Write the document here instead of stdout; encoding follows the extension
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Encoding for stdout [default: from config, else yaml]
    #[arg(long, value_enum, conflicts_with = "output")]
    pub format: Option<FormatArg>,

    /// Fail if the document has validation violations
    #[arg(long)]
    pub strict: bool,
}

/// Run the implode command.
pub fn run(args: ImplodeArgs, config_path: Option<&Path>) -> Result<(), CliError> {
    let document = implode_dir(&args.dir)?;
    guard(&document, args.strict)?;

    match &args.output {
        Some(path) => {
            let name = path.to_string_lossy();
            let encoding = Encoding::from_path(&name)?;
            let text = encoding.encode_file(&name, &document)?;
            fs::write(path, text).map_err(|source| CliError::Io {
                path: path.clone(),
                source,
            })?;
            info!(output = %path.display(), encoding = %encoding, "Wrote document");
        }
        None => {
            let config = resolve_encoding(args.format, load_config(config_path)?);
            let text = config.encoding.encode_file("<stdout>", &document)?;
            io::stdout()
                .write_all(text.as_bytes())
                .map_err(|e| CliError::Output(e.to_string()))?;
        }
    }

    Ok(())
}
