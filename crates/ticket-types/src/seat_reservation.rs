use serde::Serialize;
use ticket_wire::{Cursor, Timestamp};

use crate::error::TypeError;
use crate::station::{STATION_WIDTH, Station};
use crate::tags::TicketKind;

/// Encoded width of a [`SeatReservationBlock`].
///
/// Seat reservations have no count field: the payload codec keeps reading
/// records of this width until the buffer is exhausted.
pub const SEAT_RESERVATION_WIDTH: usize = 2 * STATION_WIDTH + 4 + 4 + 2 + 4 + 1 + 2 + 2;

/// A reserved seat on a specific train.
///
/// ```text
/// ┌─────────────────────┬────────────────────┐
/// │ departure_station   │ station (24 bytes) │
/// │ destination_station │ station (24 bytes) │
/// │ ticket_kind         │ u32 BE tag         │
/// │ travel_time         │ packed timestamp   │
/// │ rics_code           │ u16 BE             │
/// │ train_number        │ u32 BE             │
/// │ num_passengers      │ u8                 │
/// │ car_number          │ u16 BE             │
/// │ seat_number         │ u16 BE             │
/// └─────────────────────┴────────────────────┘
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SeatReservationBlock {
  pub departure_station: Station,
  pub destination_station: Station,
  pub ticket_kind: TicketKind,
  pub travel_time: Timestamp,
  pub rics_code: u16,
  pub train_number: u32,
  pub num_passengers: u8,
  pub car_number: u16,
  pub seat_number: u16,
}

impl SeatReservationBlock {
  /// # Errors
  ///
  /// [`TypeError::Wire`] on truncation or a bad station name. The travel
  /// time is kept as packed, even when it is unset.
  pub fn read_from(cursor: &mut Cursor<'_>) -> Result<Self, TypeError> {
    Ok(Self {
      departure_station: Station::read_from(cursor)?,
      destination_station: Station::read_from(cursor)?,
      ticket_kind: TicketKind::read_from(cursor)?,
      travel_time: cursor.read_timestamp()?,
      rics_code: cursor.read_u16_be()?,
      train_number: cursor.read_u32_be()?,
      num_passengers: cursor.read_u8()?,
      car_number: cursor.read_u16_be()?,
      seat_number: cursor.read_u16_be()?,
    })
  }
}
