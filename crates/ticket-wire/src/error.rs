/// Errors raised by the byte cursor and the packed field decoders.
///
/// Every variant carries the offset that triggered it, so a failure deep
/// inside a ticket record can be traced back to the exact byte position in
/// the buffer being decoded.
#[derive(Debug, thiserror::Error)]
pub enum WireError {
    /// Fewer bytes remain than the requested field needs.
    ///
    /// The cursor does not advance when this is returned.
    #[error("truncated input at offset {offset}: needed {needed} bytes, {remaining} remaining")]
    TruncatedInput {
        offset: usize,
        needed: usize,
        remaining: usize,
    },

    /// A string field was not valid UTF-8.
    #[error("invalid UTF-8 in string field at offset {offset}")]
    InvalidUtf8 { offset: usize },
}

impl WireError {
    /// Whether this error is the `TruncatedInput` kind.
    pub fn is_truncated(&self) -> bool {
        matches!(self, Self::TruncatedInput { .. })
    }
}
