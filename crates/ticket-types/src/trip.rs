use serde::Serialize;
use ticket_wire::{Cursor, Timestamp, ValidityInterval};

use crate::error::TypeError;
use crate::station::{STATION_WIDTH, Station};
use crate::tags::{DiscountSet, TicketKind};

/// Encoded width of a [`TripBlock`].
pub const TRIP_BLOCK_WIDTH: usize = 4 + 2 * STATION_WIDTH + 1 + 4 + 4 + 1 + 4;

/// A point-to-point journey entitlement.
///
/// The same layout is used for the optional trip block (header flag bit 1)
/// and for each entry of the class-upgrade array.
///
/// ```text
/// ┌────────────────────┬──────────────────────────┐
/// │ Field              │ Encoding                 │
/// ├────────────────────┼──────────────────────────┤
/// │ ticket_kind        │ u32 BE tag               │
/// │ departure_station  │ station (24 bytes)       │
/// │ destination_station│ station (24 bytes)       │
/// │ class              │ u8                       │
/// │ valid_start_at     │ packed timestamp         │
/// │ valid_interval     │ u32 BE minutes           │
/// │ num_passengers     │ u8                       │
/// │ applied_discounts  │ u32 BE tag bitmask       │
/// └────────────────────┴──────────────────────────┘
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct TripBlock {
  pub ticket_kind: TicketKind,
  pub departure_station: Station,
  pub destination_station: Station,
  pub class: u8,
  pub valid_start_at: Timestamp,
  pub valid_interval: ValidityInterval,
  pub num_passengers: u8,
  pub applied_discounts: DiscountSet,
}

/// A class upgrade shares the trip block's layout.
pub type ClassUpgradeBlock = TripBlock;

impl TripBlock {
  /// # Errors
  ///
  /// [`TypeError::Wire`] on truncation or a bad station name.
  pub fn read_from(cursor: &mut Cursor<'_>) -> Result<Self, TypeError> {
    Ok(Self {
      ticket_kind: TicketKind::read_from(cursor)?,
      departure_station: Station::read_from(cursor)?,
      destination_station: Station::read_from(cursor)?,
      class: cursor.read_u8()?,
      valid_start_at: cursor.read_timestamp()?,
      valid_interval: cursor.read_validity_interval()?,
      num_passengers: cursor.read_u8()?,
      applied_discounts: DiscountSet::read_from(cursor)?,
    })
  }

  /// End of validity, or `None` when the start is not a real instant.
  pub fn valid_to(&self) -> Option<Timestamp> {
    self.valid_interval.as_timestamp(self.valid_start_at)
  }
}
