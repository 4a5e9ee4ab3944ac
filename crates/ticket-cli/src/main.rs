/// Ticket record command-line tool: decode binary ticket records and export
/// them as CSV or JSON.
///
/// # Command overview
///
/// ```text
/// ticket <COMMAND> [OPTIONS]
///
/// Commands:
///   csv        Decode many records into one CSV table
///   json       Decode one record as JSON
///   validate   Report which decode stage a record passes or fails
///   inspect    Print a human-readable summary of one record
///   help       Print help information
///
/// Global options:
///   -v, --verbose                  Raise log level (-v info, -vv debug, -vvv trace)
///   --max-uncompressed-len BYTES   Decompression limit per record
///   --max-record-len BYTES         Encoded size limit per record file
///   -h, --help                     Print help
///   -V, --version                  Print version
/// ```
///
/// # Exit codes
///
/// | Code | Meaning                                         |
/// |------|-------------------------------------------------|
/// | 0    | Success                                         |
/// | 1    | Error (I/O failure, undecodable record, etc.)   |
///
/// Logs and error details go to stderr so stdout can be piped cleanly.
/// `RUST_LOG` takes precedence over `-v`.
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use ticket_decoder::config::{DEFAULT_MAX_RECORD_LEN, DEFAULT_MAX_UNCOMPRESSED_LEN};
use ticket_decoder::{DecodeError, DecoderConfig, TicketDecoder};
use ticket_types::Ticket;
use tracing_subscriber::EnvFilter;

mod cmd_csv;
mod cmd_inspect;
mod cmd_json;
mod cmd_validate;

// ── CLI root ──────────────────────────────────────────────────────────────────

/// Decode binary rail ticket records.
#[derive(Parser)]
#[command(name = "ticket", version, about = "Rail ticket record decoder")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Raise the log level; repeat for more detail.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Largest decompressed payload accepted per record, in bytes.
    #[arg(long, global = true, default_value_t = DEFAULT_MAX_UNCOMPRESSED_LEN)]
    max_uncompressed_len: usize,

    /// Largest encoded record read from a file, in bytes.
    #[arg(long, global = true, default_value_t = DEFAULT_MAX_RECORD_LEN)]
    max_record_len: usize,
}

// ── Sub-commands ──────────────────────────────────────────────────────────────

#[derive(Subcommand)]
enum Commands {
    /// Decode records into a fixed-width CSV table, one row per record.
    Csv(CsvArgs),
    /// Decode one record and print it as JSON.
    Json(JsonArgs),
    /// Check a record stage by stage.
    Validate(ValidateArgs),
    /// Print a human-readable summary of a record.
    Inspect(InspectArgs),
}

// ── Argument structs ──────────────────────────────────────────────────────────

/// Arguments for `ticket csv`.
///
/// Every file is decoded independently. A file that fails to decode is
/// logged at `warn` and skipped; the command only fails when no file
/// decoded at all.
///
/// ```text
/// ┌─────────────────────────┬──────────────────────────────────────────┐
/// │ Flag                    │ Effect                                   │
/// ├─────────────────────────┼──────────────────────────────────────────┤
/// │ -o / --output FILE      │ write to FILE instead of stdout          │
/// │ --no-header             │ omit the header line                     │
/// │ --delimiter C           │ field separator (default ';')            │
/// │ --class-upgrade-slots N │ class-upgrade column groups (default 1)  │
/// │ --pass-slots N          │ pass column groups (default 1)           │
/// │ --seat-slots N          │ seat-reservation column groups (def. 2)  │
/// └─────────────────────────┴──────────────────────────────────────────┘
/// ```
#[derive(clap::Args)]
pub struct CsvArgs {
    /// Ticket record files to decode.
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Write the table to this file instead of stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Do not write the header line.
    #[arg(long)]
    pub no_header: bool,

    /// Field separator.
    #[arg(long, default_value_t = ';')]
    pub delimiter: char,

    /// Number of class-upgrade column groups.
    #[arg(long, default_value_t = 1)]
    pub class_upgrade_slots: usize,

    /// Number of pass column groups.
    #[arg(long, default_value_t = 1)]
    pub pass_slots: usize,

    /// Number of seat-reservation column groups.
    #[arg(long, default_value_t = 2)]
    pub seat_slots: usize,
}

/// Arguments for `ticket json`.
#[derive(clap::Args)]
pub struct JsonArgs {
    /// Ticket record file to decode.
    pub file: PathBuf,

    /// Indent the output.
    #[arg(long)]
    pub pretty: bool,

    /// Write the JSON to this file instead of stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for `ticket validate`.
#[derive(clap::Args)]
pub struct ValidateArgs {
    /// Ticket record file to validate.
    pub file: PathBuf,
}

/// Arguments for `ticket inspect`.
#[derive(clap::Args)]
pub struct InspectArgs {
    /// Ticket record file to inspect.
    pub file: PathBuf,

    /// Also print the signature as hex.
    #[arg(long)]
    pub show_signature: bool,
}

// ── Shared helpers ────────────────────────────────────────────────────────────

/// Open `path` and decode it, naming the ticket after the path.
pub(crate) fn decode_path(path: &Path, config: &DecoderConfig) -> Result<Ticket, DecodeError> {
    let file = File::open(path).map_err(DecodeError::Source)?;
    let ticket = TicketDecoder::decode_reader(io::BufReader::new(file), config)?;
    Ok(ticket.with_filename(path.display().to_string()))
}

/// Buffered writer over `path`, or stdout when no path is given.
pub(crate) fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>> {
    Ok(match path {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("cannot create {}", path.display()))?,
        )),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    })
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let decoder = DecoderConfig::default()
        .with_max_uncompressed_len(cli.max_uncompressed_len)
        .with_max_record_len(cli.max_record_len);
    let result = match cli.command {
        Commands::Csv(args) => cmd_csv::run(&args, &decoder),
        Commands::Json(args) => cmd_json::run(&args, &decoder),
        Commands::Validate(args) => cmd_validate::run(&args, &decoder),
        Commands::Inspect(args) => cmd_inspect::run(&args, &decoder),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}
