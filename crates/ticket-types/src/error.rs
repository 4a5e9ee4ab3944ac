use ticket_wire::WireError;

/// Structural errors found while decoding the envelope or payload layout.
///
/// These sit one level above [`WireError`]: the cursor reports *where* a
/// read failed, this type reports *which* layout rule was broken. The
/// decoder wraps a `TypeError` in the stage that produced it.
///
/// ```text
/// ┌──────────────────────────────────────────────────────┐
/// │ TypeError (this crate)                               │
/// │   ├── wraps WireError for cursor-level failures      │
/// │   ├── UnsupportedVersion for unknown layouts         │
/// │   ├── PayloadOverrun / PayloadTooShort for framing   │
/// │   └── DanglingRecord for a partial trailing record   │
/// └──────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, thiserror::Error)]
pub enum TypeError {
  /// The envelope version is outside `MIN_VERSION..=MAX_VERSION`.
  #[error("unsupported format version {version}")]
  UnsupportedVersion { version: u8 },

  /// The compressed payload's length prefix runs past the end of input.
  #[error("compressed payload declares {declared} bytes but only {remaining} remain")]
  PayloadOverrun { declared: usize, remaining: usize },

  /// The compressed payload is too short to carry a gzip header and trailer.
  #[error("compressed payload is {len} bytes, shorter than a minimal gzip member")]
  PayloadTooShort { len: usize },

  /// Bytes remain at the end of an implicit-count array, but fewer than one
  /// full record.
  #[error("{remaining} trailing bytes cannot hold a {block} record ({record_width} bytes)")]
  DanglingRecord {
    block: &'static str,
    remaining: usize,
    record_width: usize,
  },

  /// A cursor-level failure: truncation or bad UTF-8.
  #[error(transparent)]
  Wire(#[from] WireError),
}

impl TypeError {
  /// Whether the root cause is the cursor running out of bytes.
  pub fn is_truncated(&self) -> bool {
    matches!(self, Self::Wire(inner) if inner.is_truncated())
  }
}
