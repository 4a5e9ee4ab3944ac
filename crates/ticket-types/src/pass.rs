use serde::Serialize;
use ticket_wire::{Cursor, Timestamp, ValidityInterval};

use crate::error::TypeError;
use crate::tags::{DiscountSet, TicketKind};

/// Encoded width of a [`PassBlock`].
pub const PASS_BLOCK_WIDTH: usize = 4 + 4 + 4 + 4 + 4 + 1;

/// A period pass (not bound to stations).
///
/// ```text
/// ┌─────────────────────┬─────────────────────┐
/// │ ticket_kind         │ u32 BE tag          │
/// │ applied_discounts_1 │ u32 BE tag bitmask  │
/// │ applied_discounts_2 │ u32 BE tag bitmask  │
/// │ valid_start_at      │ packed timestamp    │
/// │ valid_interval      │ u32 BE minutes      │
/// │ num_passengers      │ u8                  │
/// └─────────────────────┴─────────────────────┘
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PassBlock {
  pub ticket_kind: TicketKind,
  pub applied_discounts_1: DiscountSet,
  pub applied_discounts_2: DiscountSet,
  pub valid_start_at: Timestamp,
  pub valid_interval: ValidityInterval,
  pub num_passengers: u8,
}

impl PassBlock {
  /// # Errors
  ///
  /// [`TypeError::Wire`] on truncation.
  pub fn read_from(cursor: &mut Cursor<'_>) -> Result<Self, TypeError> {
    Ok(Self {
      ticket_kind: TicketKind::read_from(cursor)?,
      applied_discounts_1: DiscountSet::read_from(cursor)?,
      applied_discounts_2: DiscountSet::read_from(cursor)?,
      valid_start_at: cursor.read_timestamp()?,
      valid_interval: cursor.read_validity_interval()?,
      num_passengers: cursor.read_u8()?,
    })
  }

  pub fn valid_to(&self) -> Option<Timestamp> {
    self.valid_interval.as_timestamp(self.valid_start_at)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn reads_monthly_pass() {
    // 2024-01-01 00:00:00, valid 31 days
    let start: u32 = (24 << 26) | (1 << 22) | (1 << 17);
    let mut data = Vec::with_capacity(PASS_BLOCK_WIDTH);
    data.extend_from_slice(&0x0000_2001u32.to_be_bytes());
    data.extend_from_slice(&0x0000_0004u32.to_be_bytes());
    data.extend_from_slice(&0x8000_0000u32.to_be_bytes());
    data.extend_from_slice(&start.to_be_bytes());
    data.extend_from_slice(&(31 * 24 * 60u32).to_be_bytes());
    data.push(1);

    let mut cursor = Cursor::new(&data);
    let pass = PassBlock::read_from(&mut cursor).unwrap();
    assert_eq!(cursor.position(), PASS_BLOCK_WIDTH);
    assert_eq!(pass.ticket_kind.to_string(), "00002001");
    assert_eq!(pass.applied_discounts_1.raw(), 4);
    assert_eq!(pass.applied_discounts_2.applied().collect::<Vec<_>>(), vec![31]);
    assert_eq!(pass.valid_to().unwrap().to_string(), "2024-02-01 00:00:00");
  }
}
