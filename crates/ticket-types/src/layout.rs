use serde::Serialize;

use crate::error::TypeError;

/// Oldest envelope version this crate can decode.
pub const MIN_VERSION: u8 = 1;

/// Newest version still using the legacy identifier layout.
pub const LAST_LEGACY_VERSION: u8 = 4;

/// First version whose identifiers are carried by the envelope.
pub const MIGRATED_VERSION: u8 = 5;

/// Newest envelope version this crate can decode.
pub const MAX_VERSION: u8 = 5;

/// Width of the fixed ticket id field in legacy envelopes and headers.
pub const LEGACY_TICKET_ID_WIDTH: usize = 18;

/// Width of the fixed RICS code field in legacy envelopes.
pub const LEGACY_RICS_CODE_WIDTH: usize = 4;

/// Field layout family selected by the envelope version.
///
/// The format migrated its identifiers at version 5: from then on the
/// envelope's ticket id and RICS code are authoritative, and both the
/// envelope and the payload header switch to length-prefixed identifiers.
///
/// ```text
/// ┌──────────┬──────────┬───────────────────────────────────────────┐
/// │ Layout   │ Versions │ Identifier encoding                       │
/// ├──────────┼──────────┼───────────────────────────────────────────┤
/// │ Legacy   │ 1..=4    │ fixed-width, NUL/space padded; u8 flags   │
/// │ Migrated │ 5        │ u8 length prefix; u16 flags               │
/// └──────────┴──────────┴───────────────────────────────────────────┘
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Layout {
  #[default]
  Legacy,
  Migrated,
}

impl Layout {
  /// Select the layout for an envelope version.
  ///
  /// # Errors
  ///
  /// [`TypeError::UnsupportedVersion`] outside `MIN_VERSION..=MAX_VERSION`.
  pub fn for_version(version: u8) -> Result<Self, TypeError> {
    match version {
      MIN_VERSION..=LAST_LEGACY_VERSION => Ok(Self::Legacy),
      MIGRATED_VERSION..=MAX_VERSION => Ok(Self::Migrated),
      other => Err(TypeError::UnsupportedVersion { version: other }),
    }
  }
}
