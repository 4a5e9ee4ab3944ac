use std::fmt;

use serde::Serialize;
use ticket_wire::{Cursor, WireError};

// ── Macro for tag-code boilerplate ────────────────────────────────────
//
// Tag codes are opaque 32-bit numbers whose human meaning lives in an
// external dictionary. Every tag type is the same newtype with the same
// conversions and the same fixed-width hex rendering; only the name and
// doc comment differ.

macro_rules! tag_code {
  (
    $(#[$meta:meta])*
    pub struct $name:ident;
  ) => {
    $(#[$meta])*
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
    #[serde(transparent)]
    pub struct $name(u32);

    impl $name {
      pub fn from_raw(raw: u32) -> Self {
        Self(raw)
      }

      pub fn raw(self) -> u32 {
        self.0
      }

      /// Read the tag as a big-endian `u32`.
      ///
      /// # Errors
      ///
      /// [`WireError::TruncatedInput`] if fewer than 4 bytes remain.
      pub fn read_from(cursor: &mut Cursor<'_>) -> Result<Self, WireError> {
        cursor.read_u32_be().map(Self)
      }
    }

    /// Renders as 8 lowercase hex digits, the form tag dictionaries key on.
    impl fmt::Display for $name {
      fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:08x}", self.0)
      }
    }
  };
}

tag_code! {
  /// Product code of a trip, class upgrade, pass, or seat reservation.
  pub struct TicketKind;
}

tag_code! {
  /// How the ticket was issued (paper, mobile, card, ...).
  pub struct TicketMedium;
}

tag_code! {
  /// Bitmask of applied discount codes.
  pub struct DiscountSet;
}

impl DiscountSet {
  /// Bit positions of the applied discounts, lowest first.
  pub fn applied(self) -> impl Iterator<Item = u32> {
    (0..u32::BITS).filter(move |bit| self.0 & (1 << bit) != 0)
  }
}
