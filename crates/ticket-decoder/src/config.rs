/// Upper bound on a single ticket's decompressed payload (1 MiB).
///
/// Real records are a few hundred bytes; the limit only exists so a forged
/// gzip trailer cannot make the decoder reserve gigabytes.
pub const DEFAULT_MAX_UNCOMPRESSED_LEN: usize = 1 << 20;

/// Upper bound on the encoded record [`decode_reader`] will buffer (4 MiB).
///
/// [`decode_reader`]: crate::TicketDecoder::decode_reader
pub const DEFAULT_MAX_RECORD_LEN: usize = 4 << 20;

/// Knobs for [`TicketDecoder`](crate::TicketDecoder).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DecoderConfig {
    /// Largest `declared_uncompressed_len` accepted before decompression.
    pub max_uncompressed_len: usize,
    /// Most bytes read from a source before it is rejected as not a record.
    pub max_record_len: usize,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            max_uncompressed_len: DEFAULT_MAX_UNCOMPRESSED_LEN,
            max_record_len: DEFAULT_MAX_RECORD_LEN,
        }
    }
}

impl DecoderConfig {
    #[must_use]
    pub fn with_max_uncompressed_len(mut self, limit: usize) -> Self {
        self.max_uncompressed_len = limit;
        self
    }

    #[must_use]
    pub fn with_max_record_len(mut self, limit: usize) -> Self {
        self.max_record_len = limit;
        self
    }
}
