/// Implementation of `ticket csv`.
///
/// Decodes each file in argument order and writes one row per decoded
/// ticket under a single header line.
///
/// ```text
/// filename;version;signature_version;ticket_id;rics_id;issued_at;...
/// a.bin;5;2;T-0042;1155;2024-05-10 06:00:00;24.90;...
/// c.bin;3;1;LEGACY-ID-0001;55;2023-11-02 14:30:00;8.00;...
/// ```
///
/// Undecodable files are skipped with a `warn` log naming the failed
/// stage, so one bad record does not lose the rest of the table.
use std::io::Write;

use anyhow::{Context, Result, bail};
use ticket_decoder::DecoderConfig;
use ticket_export::{ExportConfig, csv_header, csv_row};
use tracing::{info, warn};

use crate::{CsvArgs, decode_path, open_output};

/// Run the `ticket csv` command.
///
/// # Errors
///
/// Returns an error if the output cannot be written, or if none of the
/// input files decoded.
pub fn run(args: &CsvArgs, decoder: &DecoderConfig) -> Result<()> {
    let config = ExportConfig {
        delimiter: args.delimiter,
        class_upgrade_slots: args.class_upgrade_slots,
        pass_slots: args.pass_slots,
        seat_reservation_slots: args.seat_slots,
        ..ExportConfig::default()
    };

    let mut out = open_output(args.output.as_deref())?;
    if !args.no_header {
        out.write_all(csv_header(&config).as_bytes())
            .context("cannot write CSV header")?;
    }

    let mut decoded = 0usize;
    for path in &args.files {
        match decode_path(path, decoder) {
            Ok(ticket) => {
                out.write_all(csv_row(&ticket, &config).as_bytes())
                    .context("cannot write CSV row")?;
                decoded += 1;
            }
            Err(err) => warn!(
                file = %path.display(),
                stage = %err.stage(),
                %err,
                "skipping undecodable ticket"
            ),
        }
    }
    out.flush().context("cannot flush CSV output")?;

    let failed = args.files.len() - decoded;
    info!(decoded, failed, "CSV export finished");
    if decoded == 0 {
        bail!("none of the {failed} input files could be decoded");
    }
    Ok(())
}
