use serde::Serialize;
use ticket_wire::Cursor;

use crate::error::TypeError;

/// Width of the NUL-padded station name.
pub const STATION_NAME_WIDTH: usize = 20;

/// Encoded width of one [`Station`]: `u32` id + fixed name.
pub const STATION_WIDTH: usize = 4 + STATION_NAME_WIDTH;

/// A station reference: numeric id plus the printed name.
///
/// ```text
/// ┌────────┬──────────┬──────────────────────────────┐
/// │ Offset │ Size     │ Field                        │
/// ├────────┼──────────┼──────────────────────────────┤
/// │ 0x00   │ 4 bytes  │ id (u32 BE)                  │
/// │ 0x04   │ 20 bytes │ name (UTF-8, NUL padded)     │
/// └────────┴──────────┴──────────────────────────────┘
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Station {
  pub id: u32,
  pub name: String,
}

impl Station {
  /// # Errors
  ///
  /// [`TypeError::Wire`] on truncation or a non-UTF-8 name.
  pub fn read_from(cursor: &mut Cursor<'_>) -> Result<Self, TypeError> {
    Ok(Self {
      id: cursor.read_u32_be()?,
      name: cursor.read_fixed_string(STATION_NAME_WIDTH)?,
    })
  }
}
