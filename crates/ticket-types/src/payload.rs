use serde::Serialize;

use crate::header::PayloadHeader;
use crate::pass::PassBlock;
use crate::person::PersonBlock;
use crate::seat_reservation::SeatReservationBlock;
use crate::trip::{ClassUpgradeBlock, TripBlock};

/// The decompressed ticket record.
///
/// ```text
/// ┌──────────────────────────────────────────────────────────────┐
/// │ Payload                                                      │
/// │   header            ← flags + counts drive everything below  │
/// │   person            ← Some iff flags bit 0                   │
/// │   trip              ← Some iff flags bit 1                   │
/// │   class_upgrades    ← exactly header.num_class_upgrade_blocks│
/// │   passes            ← exactly header.num_pass_blocks         │
/// │   seat_reservations ← as many as fill the rest of the buffer │
/// └──────────────────────────────────────────────────────────────┘
/// ```
///
/// An absent block is `None`, never a zero-valued record.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Payload {
  pub header: PayloadHeader,
  pub person: Option<PersonBlock>,
  pub trip: Option<TripBlock>,
  pub class_upgrades: Vec<ClassUpgradeBlock>,
  pub passes: Vec<PassBlock>,
  pub seat_reservations: Vec<SeatReservationBlock>,
}
