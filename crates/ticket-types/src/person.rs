use serde::Serialize;
use ticket_wire::{Cursor, PackedDate};

use crate::error::TypeError;

/// Passenger identity, present when header flag bit 0 is set.
///
/// ```text
/// ┌────────────────┬──────────────────────────┐
/// │ Field          │ Encoding                 │
/// ├────────────────┼──────────────────────────┤
/// │ name           │ u8 len + UTF-8           │
/// │ birth_date     │ packed date (3 bytes)    │
/// │ id_card_number │ u8 len + UTF-8           │
/// └────────────────┴──────────────────────────┘
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PersonBlock {
  pub name: String,
  pub birth_date: PackedDate,
  pub id_card_number: String,
}

impl PersonBlock {
  /// # Errors
  ///
  /// [`TypeError::Wire`] on truncation or a non-UTF-8 string.
  pub fn read_from(cursor: &mut Cursor<'_>) -> Result<Self, TypeError> {
    Ok(Self {
      name: cursor.read_string_u8()?,
      birth_date: cursor.read_packed_date()?,
      id_card_number: cursor.read_string_u8()?,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn reads_person() {
    let mut data = vec![11];
    data.extend_from_slice(b"Kovacs Anna");
    let date: u32 = (1990 << 9) | (12 << 5) | 24;
    data.extend_from_slice(&date.to_be_bytes()[1..]);
    data.push(8);
    data.extend_from_slice(b"123456AB");

    let mut cursor = Cursor::new(&data);
    let person = PersonBlock::read_from(&mut cursor).unwrap();
    assert!(cursor.is_empty());
    assert_eq!(person.name, "Kovacs Anna");
    assert_eq!(person.birth_date.to_string(), "1990-12-24");
    assert_eq!(person.id_card_number, "123456AB");
  }

  #[test]
  fn empty_strings_are_valid() {
    let data = [0, 0, 0, 0, 0];
    let person = PersonBlock::read_from(&mut Cursor::new(&data)).unwrap();
    assert_eq!(person, PersonBlock::default());
  }
}
