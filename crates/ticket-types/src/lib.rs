#![warn(clippy::pedantic)]

pub mod envelope;
pub mod error;
pub mod header;
pub mod layout;
pub mod pass;
pub mod payload;
pub mod person;
pub mod seat_reservation;
pub mod station;
pub mod tags;
pub mod ticket;
pub mod trip;

pub use envelope::Envelope;
pub use error::TypeError;
pub use header::{BlockFlags, PayloadHeader, Price, RicsId};
pub use layout::Layout;
pub use pass::PassBlock;
pub use payload::Payload;
pub use person::PersonBlock;
pub use seat_reservation::SeatReservationBlock;
pub use station::Station;
pub use tags::{DiscountSet, TicketKind, TicketMedium};
pub use ticket::Ticket;
pub use trip::{ClassUpgradeBlock, TripBlock};
