/// Implementation of `ticket json`.
use std::io::Write;

use anyhow::{Context, Result, bail};
use ticket_decoder::DecoderConfig;
use ticket_export::{ExportConfig, to_json};

use crate::{JsonArgs, decode_path, open_output};

/// Run the `ticket json` command.
///
/// # Errors
///
/// Returns an error if the file does not decode or the output cannot be
/// written.
pub fn run(args: &JsonArgs, decoder: &DecoderConfig) -> Result<()> {
    let ticket = decode_path(&args.file, decoder)
        .with_context(|| format!("failed to decode {}", args.file.display()))?;

    let config = ExportConfig {
        pretty_json: args.pretty,
        ..ExportConfig::default()
    };
    let Some(json) = to_json(&ticket, &config)? else {
        bail!("{} did not decode to a valid ticket", args.file.display());
    };

    let mut out = open_output(args.output.as_deref())?;
    writeln!(out, "{json}").context("cannot write JSON output")?;
    out.flush().context("cannot flush JSON output")?;
    Ok(())
}
