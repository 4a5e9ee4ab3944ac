/// Implementation of `ticket validate`.
///
/// Runs a full decode and reports each pipeline stage with a `✓`, or the
/// failed stage with a `✗` followed by the stages it prevented from
/// running.
///
/// # Success output
///
/// ```text
/// ✓ source: 412 bytes
/// ✓ envelope: version 5, signature version 2, 196-byte gzip member
/// ✓ decompression: 318 bytes, matches gzip trailer
/// ✓ payload: person, trip, 0 class upgrades, 1 pass, 2 seat reservations
/// ```
///
/// # Failure output
///
/// ```text
/// ✓ source: 412 bytes
/// ✓ envelope
/// ✗ decompression: gzip trailer declares 319 bytes but the stream produced 318
/// - payload: not reached
/// ```
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use anyhow::{Result, anyhow};
use ticket_decoder::{DecodeError, DecoderConfig, Stage, TicketDecoder};
use ticket_types::Ticket;

use crate::ValidateArgs;

/// Run the `ticket validate` command.
///
/// # Errors
///
/// Returns an error if any stage fails; the report has already been
/// printed to stdout.
pub fn run(args: &ValidateArgs, decoder: &DecoderConfig) -> Result<()> {
    let bytes = match read_bounded(&args.file, decoder.max_record_len) {
        Ok(bytes) => bytes,
        Err(e) => return fail(Stage::Source, &format!("cannot read {}: {e}", args.file.display())),
    };
    if bytes.len() > decoder.max_record_len {
        let e = DecodeError::SourceTooLarge {
            limit: decoder.max_record_len,
        };
        return fail(Stage::Source, &e.to_string());
    }

    match TicketDecoder::decode_with_config(&bytes, decoder) {
        Ok(ticket) => {
            println!("✓ {}: {} bytes", Stage::Source, bytes.len());
            for stage in &Stage::ALL[1..] {
                println!("✓ {stage}: {}", stage_summary(*stage, &ticket));
            }
            Ok(())
        }
        Err(e) => {
            let failed = e.stage();
            if failed > Stage::Source {
                println!("✓ {}: {} bytes", Stage::Source, bytes.len());
            }
            fail(failed, &e.to_string())
        }
    }
}

/// Read at most one byte past `limit`, enough to tell an oversized file.
fn read_bounded(path: &Path, limit: usize) -> io::Result<Vec<u8>> {
    let mut bytes = Vec::new();
    File::open(path)?
        .take(u64::try_from(limit).unwrap_or(u64::MAX).saturating_add(1))
        .read_to_end(&mut bytes)?;
    Ok(bytes)
}

/// Print bare `✓` lines for the stages before `failed`, then the `✗`
/// line, then the stages that never ran.
fn fail(failed: Stage, message: &str) -> Result<()> {
    for stage in Stage::ALL.iter().filter(|stage| **stage > Stage::Source && **stage < failed) {
        println!("✓ {stage}");
    }
    println!("✗ {failed}: {message}");
    for stage in Stage::ALL.iter().filter(|stage| **stage > failed) {
        println!("- {stage}: not reached");
    }
    Err(anyhow!("validation failed at the {failed} stage"))
}

fn stage_summary(stage: Stage, ticket: &Ticket) -> String {
    let envelope = &ticket.envelope;
    let payload = &ticket.payload;
    match stage {
        Stage::Source => String::new(),
        Stage::Envelope => format!(
            "version {}, signature version {}, {}-byte gzip member",
            envelope.version,
            envelope.signature_version,
            envelope.compressed_payload.len()
        ),
        Stage::Decompression => format!(
            "{} bytes, matches gzip trailer",
            envelope.declared_uncompressed_len
        ),
        Stage::Payload => {
            let mut parts = Vec::new();
            if payload.person.is_some() {
                parts.push("person".to_owned());
            }
            if payload.trip.is_some() {
                parts.push("trip".to_owned());
            }
            parts.push(plural(payload.class_upgrades.len(), "class upgrade"));
            parts.push(plural(payload.passes.len(), "pass"));
            parts.push(plural(payload.seat_reservations.len(), "seat reservation"));
            parts.join(", ")
        }
    }
}

fn plural(count: usize, noun: &str) -> String {
    match (count, noun.ends_with('s')) {
        (1, _) => format!("1 {noun}"),
        (_, true) => format!("{count} {noun}es"),
        (_, false) => format!("{count} {noun}s"),
    }
}
