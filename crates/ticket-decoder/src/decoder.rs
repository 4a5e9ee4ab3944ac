use std::io::Read;

use ticket_types::{Envelope, Ticket};
use ticket_wire::Cursor;
use tracing::{debug, warn};

use crate::assembler;
use crate::config::DecoderConfig;
use crate::decompression;
use crate::error::DecodeError;
use crate::payload;

/// Synchronous ticket decoder: one complete record in, one [`Ticket`] out.
///
/// Decoding runs four stages, each failing fast with the matching
/// [`DecodeError`] variant:
///
///   1. **Envelope**: version, identifiers, opaque signature, and the
///      length-framed gzip member. The declared uncompressed length is the
///      member's ISIZE trailer. Bytes after the member are ignored.
///   2. **Decompression**: inflate exactly the declared length; any other
///      outcome is an error.
///   3. **Payload**: version-dispatched header, then the blocks the header's
///      flags and counts announce, then seat reservations to the end.
///   4. **Assembly**: for migrated versions the envelope's identifiers
///      replace the header's.
///
/// The decoder keeps no state between calls and never opens files; the
/// caller assigns a source name with [`Ticket::with_filename`].
///
/// # Example
///
/// ```rust,no_run
/// use ticket_decoder::TicketDecoder;
///
/// let bytes = std::fs::read("ticket.bin").unwrap();
/// let ticket = TicketDecoder::decode(&bytes).unwrap().with_filename("ticket.bin");
/// assert!(ticket.valid);
/// ```
pub struct TicketDecoder;

impl TicketDecoder {
    /// Decode a record with the default [`DecoderConfig`].
    ///
    /// # Errors
    ///
    /// See [`decode_with_config`](Self::decode_with_config).
    pub fn decode(input: &[u8]) -> Result<Ticket, DecodeError> {
        Self::decode_with_config(input, &DecoderConfig::default())
    }

    /// Decode a record.
    ///
    /// # Errors
    ///
    /// - [`DecodeError::EnvelopeMalformed`] for an unsupported version, a
    ///   truncated envelope, or a payload length that overruns the input.
    /// - [`DecodeError::DecompressionFailed`] if the payload has no readable
    ///   gzip header.
    /// - [`DecodeError::DecompressionBomb`] if the declared length exceeds
    ///   `config.max_uncompressed_len`.
    /// - [`DecodeError::LengthMismatch`] if the stream does not yield
    ///   exactly the declared length.
    /// - [`DecodeError::PayloadMalformed`] if the decompressed payload is
    ///   truncated or structurally invalid.
    pub fn decode_with_config(input: &[u8], config: &DecoderConfig) -> Result<Ticket, DecodeError> {
        let mut cursor = Cursor::new(input);
        let envelope = Envelope::read_from(&mut cursor).map_err(DecodeError::EnvelopeMalformed)?;
        debug!(
            version = envelope.version,
            signature_version = envelope.signature_version,
            signature_len = envelope.signature.len(),
            compressed_len = envelope.compressed_payload.len(),
            declared_len = envelope.declared_uncompressed_len,
            "decoded envelope"
        );
        if !cursor.is_empty() {
            warn!(
                trailing = cursor.remaining(),
                "ignoring bytes after the compressed payload"
            );
        }

        let decompressed = decompression::inflate_exact(
            &envelope.compressed_payload,
            envelope.declared_uncompressed_len,
            config.max_uncompressed_len,
        )?;
        debug!(len = decompressed.len(), "decompressed payload");

        let payload = payload::decode_payload(&decompressed, envelope.version)
            .map_err(DecodeError::PayloadMalformed)?;
        debug!(
            person = payload.person.is_some(),
            trip = payload.trip.is_some(),
            class_upgrades = payload.class_upgrades.len(),
            passes = payload.passes.len(),
            seat_reservations = payload.seat_reservations.len(),
            "decoded payload"
        );

        Ok(assembler::assemble(envelope, payload))
    }

    /// Read `source` to its end, then decode the bytes.
    ///
    /// At most `config.max_record_len` bytes are buffered.
    ///
    /// # Errors
    ///
    /// - [`DecodeError::Source`] if reading fails.
    /// - [`DecodeError::SourceTooLarge`] if `source` holds more than
    ///   `config.max_record_len` bytes.
    /// - Otherwise as [`decode_with_config`](Self::decode_with_config).
    pub fn decode_reader(source: impl Read, config: &DecoderConfig) -> Result<Ticket, DecodeError> {
        let limit = config.max_record_len;
        let mut input = Vec::new();
        source
            .take(u64::try_from(limit).unwrap_or(u64::MAX).saturating_add(1))
            .read_to_end(&mut input)
            .map_err(DecodeError::Source)?;
        if input.len() > limit {
            return Err(DecodeError::SourceTooLarge { limit });
        }
        Self::decode_with_config(&input, config)
    }
}
