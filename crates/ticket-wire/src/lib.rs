#![warn(clippy::pedantic)]

pub mod cursor;
pub mod datetime;
pub mod error;

pub use cursor::Cursor;
pub use datetime::{PackedDate, Timestamp, ValidityInterval};
pub use error::WireError;
