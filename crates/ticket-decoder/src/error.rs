use std::fmt;

use ticket_types::TypeError;

/// Errors that can occur while decoding a ticket record.
///
/// Each variant names the pipeline stage that failed. Every stage fails
/// fast: a `DecodeError` never comes with a partially decoded ticket.
///
/// ```text
///   DecodeError
///   ├── Source(io::Error)              ← caller's reader failed
///   ├── SourceTooLarge                 ← reader ran past the record limit
///   ├── EnvelopeMalformed(TypeError)   ← version, framing, truncation
///   ├── DecompressionFailed(io::Error) ← gzip header unreadable
///   ├── DecompressionBomb              ← declared length over the limit
///   ├── LengthMismatch                 ← stream did not yield ISIZE bytes
///   └── PayloadMalformed(TypeError)    ← header or block decode failed
/// ```
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// Reading the caller-supplied source failed before decoding began.
    #[error("failed to read ticket source: {0}")]
    Source(std::io::Error),

    /// The caller-supplied source held more bytes than any record may.
    #[error("ticket source exceeds {limit} bytes")]
    SourceTooLarge { limit: usize },

    /// The envelope could not be decoded.
    ///
    /// The inner [`TypeError`] distinguishes an unsupported version, a
    /// compressed-payload length that overruns the input, a payload too
    /// short to be a gzip member, and plain truncation.
    #[error("malformed envelope: {0}")]
    EnvelopeMalformed(TypeError),

    /// The compressed payload is not a readable gzip member.
    ///
    /// Returned when the magic bytes are wrong or the gzip header does not
    /// parse. Failures after the header surface as
    /// [`LengthMismatch`](Self::LengthMismatch).
    #[error("gzip decompression failed: {0}")]
    DecompressionFailed(std::io::Error),

    /// The gzip trailer declares more output than the decoder will buffer.
    #[error("declared uncompressed length {declared} exceeds limit {limit}")]
    DecompressionBomb { declared: usize, limit: usize },

    /// The gzip stream produced a different number of bytes than its
    /// trailer declares, whether it ended cleanly or failed part way.
    #[error("gzip trailer declares {declared} bytes but the stream produced {produced}")]
    LengthMismatch { declared: usize, produced: usize },

    /// The decompressed payload could not be decoded.
    #[error("malformed payload: {0}")]
    PayloadMalformed(TypeError),
}

/// Pipeline stage a [`DecodeError`] originated in, in execution order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    Source,
    Envelope,
    Decompression,
    Payload,
}

impl Stage {
    pub const ALL: [Stage; 4] = [
        Stage::Source,
        Stage::Envelope,
        Stage::Decompression,
        Stage::Payload,
    ];
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Source => "source",
            Self::Envelope => "envelope",
            Self::Decompression => "decompression",
            Self::Payload => "payload",
        })
    }
}

impl DecodeError {
    /// The stage that failed.
    pub fn stage(&self) -> Stage {
        match self {
            Self::Source(_) | Self::SourceTooLarge { .. } => Stage::Source,
            Self::EnvelopeMalformed(_) => Stage::Envelope,
            Self::DecompressionFailed(_)
            | Self::DecompressionBomb { .. }
            | Self::LengthMismatch { .. } => Stage::Decompression,
            Self::PayloadMalformed(_) => Stage::Payload,
        }
    }

    /// Whether the root cause is a read past the end of a buffer.
    pub fn is_truncated(&self) -> bool {
        match self {
            Self::EnvelopeMalformed(inner) | Self::PayloadMalformed(inner) => inner.is_truncated(),
            _ => false,
        }
    }
}
