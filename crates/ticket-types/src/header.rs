use std::fmt;

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use ticket_wire::{Cursor, Timestamp};

use crate::error::TypeError;
use crate::layout::{LEGACY_TICKET_ID_WIDTH, Layout};
use crate::tags::TicketMedium;

/// Block presence bitfield from the payload header.
///
/// Bit layout:
///   bit 0 = person block present
///   bit 1 = trip block present
///   other bits = unassigned, preserved in `raw()` and otherwise ignored
///
/// Legacy headers carry the flags in one byte, migrated headers in two.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BlockFlags(u16);

impl BlockFlags {
  pub const NONE: Self = Self(0);
  pub const PERSON: Self = Self(0b0000_0001);
  pub const TRIP: Self = Self(0b0000_0010);

  pub fn from_raw(raw: u16) -> Self {
    Self(raw)
  }

  pub fn raw(self) -> u16 {
    self.0
  }

  pub fn has_person(self) -> bool {
    self.0 & Self::PERSON.0 != 0
  }

  pub fn has_trip(self) -> bool {
    self.0 & Self::TRIP.0 != 0
  }
}

impl Serialize for BlockFlags {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    let mut state = serializer.serialize_struct("BlockFlags", 3)?;
    state.serialize_field("raw", &self.0)?;
    state.serialize_field("person_block_present", &self.has_person())?;
    state.serialize_field("trip_block_present", &self.has_trip())?;
    state.end()
  }
}

/// Ticket price as a fixed-point amount in hundredths of the currency unit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Price(u32);

impl Price {
  pub fn from_hundredths(hundredths: u32) -> Self {
    Self(hundredths)
  }

  pub fn hundredths(self) -> u32 {
    self.0
  }
}

impl fmt::Display for Price {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
  }
}

impl Serialize for Price {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(f64::from(self.0) / 100.0)
  }
}

/// Numeric carrier id.
///
/// Legacy headers carry the id natively as a `u16`. From version 5 on it
/// is taken from the envelope's textual RICS code, and a code that does not
/// parse is kept as [`RicsId::Unresolved`] instead of collapsing into a
/// zero that would be indistinguishable from a real id.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum RicsId {
  Known(u16),
  Unresolved(String),
}

impl RicsId {
  /// Parse an envelope RICS code.
  pub fn parse(code: &str) -> Self {
    code
      .parse::<u16>()
      .map_or_else(|_| Self::Unresolved(code.to_owned()), Self::Known)
  }

  /// The id, if it resolved.
  pub fn known(&self) -> Option<u16> {
    match self {
      Self::Known(id) => Some(*id),
      Self::Unresolved(_) => None,
    }
  }

  /// The id with unresolved codes degraded to zero.
  pub fn numeric(&self) -> u16 {
    self.known().unwrap_or_default()
  }
}

impl Default for RicsId {
  fn default() -> Self {
    Self::Known(0)
  }
}

impl fmt::Display for RicsId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Known(id) => write!(f, "{id}"),
      Self::Unresolved(code) => write!(f, "unresolved({code:?})"),
    }
  }
}

/// Fixed header at the start of every decompressed payload.
///
/// The two layouts differ only in their first two fields:
///
/// ```text
/// ┌──────────────────────────┬───────────────────┬──────────────────┐
/// │ Field                    │ Legacy (v1-4)     │ Migrated (v5)    │
/// ├──────────────────────────┼───────────────────┼──────────────────┤
/// │ flags                    │ u8                │ u16 BE           │
/// │ ticket_id                │ 18 bytes fixed    │ u8 len + bytes   │
/// │ rics_id                  │ u16 BE            │ u16 BE           │
/// │ issued_at                │ packed timestamp  │ packed timestamp │
/// │ price                    │ u32 BE hundredths │ u32 BE hundredths│
/// │ ticket_medium            │ u32 BE tag        │ u32 BE tag       │
/// │ num_class_upgrade_blocks │ u8                │ u8               │
/// │ num_pass_blocks          │ u8                │ u8               │
/// └──────────────────────────┴───────────────────┴──────────────────┘
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PayloadHeader {
  pub layout: Layout,
  pub flags: BlockFlags,
  pub ticket_id: String,
  pub rics_id: RicsId,
  pub issued_at: Timestamp,
  pub price: Price,
  pub ticket_medium: TicketMedium,
  pub num_class_upgrade_blocks: u8,
  pub num_pass_blocks: u8,
}

impl PayloadHeader {
  /// Decode the header using the layout selected by the envelope version.
  ///
  /// # Errors
  ///
  /// [`TypeError::Wire`] if a field is truncated or not UTF-8.
  pub fn read_from(cursor: &mut Cursor<'_>, layout: Layout) -> Result<Self, TypeError> {
    match layout {
      Layout::Legacy => Self::read_legacy(cursor),
      Layout::Migrated => Self::read_migrated(cursor),
    }
  }

  fn read_legacy(cursor: &mut Cursor<'_>) -> Result<Self, TypeError> {
    let flags = BlockFlags::from_raw(u16::from(cursor.read_u8()?));
    let ticket_id = cursor.read_fixed_string(LEGACY_TICKET_ID_WIDTH)?;
    Self::read_shared_tail(cursor, Layout::Legacy, flags, ticket_id)
  }

  fn read_migrated(cursor: &mut Cursor<'_>) -> Result<Self, TypeError> {
    let flags = BlockFlags::from_raw(cursor.read_u16_be()?);
    let ticket_id = cursor.read_string_u8()?;
    Self::read_shared_tail(cursor, Layout::Migrated, flags, ticket_id)
  }

  fn read_shared_tail(
    cursor: &mut Cursor<'_>,
    layout: Layout,
    flags: BlockFlags,
    ticket_id: String,
  ) -> Result<Self, TypeError> {
    Ok(Self {
      layout,
      flags,
      ticket_id,
      rics_id: RicsId::Known(cursor.read_u16_be()?),
      issued_at: cursor.read_timestamp()?,
      price: Price::from_hundredths(cursor.read_u32_be()?),
      ticket_medium: TicketMedium::read_from(cursor)?,
      num_class_upgrade_blocks: cursor.read_u8()?,
      num_pass_blocks: cursor.read_u8()?,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  // 2024-03-01 08:30:00
  const ISSUED: u32 = (24 << 26) | (3 << 22) | (1 << 17) | (8 << 12) | (30 << 6);

  fn shared_tail(buf: &mut Vec<u8>) {
    buf.extend_from_slice(&1155u16.to_be_bytes());
    buf.extend_from_slice(&ISSUED.to_be_bytes());
    buf.extend_from_slice(&123_456u32.to_be_bytes());
    buf.extend_from_slice(&0x0000_0010u32.to_be_bytes());
    buf.push(2);
    buf.push(0);
  }

  #[test]
  fn legacy_header() {
    let mut buf = vec![0b11];
    buf.extend_from_slice(b"AB123456789012345 ");
    shared_tail(&mut buf);

    let mut cursor = Cursor::new(&buf);
    let header = PayloadHeader::read_from(&mut cursor, Layout::Legacy).unwrap();
    assert!(cursor.is_empty());
    assert_eq!(header.layout, Layout::Legacy);
    assert!(header.flags.has_person());
    assert!(header.flags.has_trip());
    assert_eq!(header.ticket_id, "AB123456789012345");
    assert_eq!(header.rics_id, RicsId::Known(1155));
    assert_eq!(header.issued_at.to_string(), "2024-03-01 08:30:00");
    assert_eq!(header.price.to_string(), "1234.56");
    assert_eq!(header.ticket_medium.raw(), 0x10);
    assert_eq!(header.num_class_upgrade_blocks, 2);
    assert_eq!(header.num_pass_blocks, 0);
  }

  #[test]
  fn migrated_header_has_wide_flags() {
    let mut buf = 0x0102u16.to_be_bytes().to_vec();
    buf.push(0);
    shared_tail(&mut buf);

    let header = PayloadHeader::read_from(&mut Cursor::new(&buf), Layout::Migrated).unwrap();
    assert_eq!(header.flags.raw(), 0x0102);
    assert!(header.flags.has_trip());
    assert!(!header.flags.has_person());
    assert_eq!(header.ticket_id, "");
  }

  #[test]
  fn same_bytes_differ_by_layout() {
    // A migrated header read with the legacy layout swallows the numeric
    // tail into the fixed ticket id.
    let mut buf = 0x0003u16.to_be_bytes().to_vec();
    buf.push(0);
    shared_tail(&mut buf);
    assert!(PayloadHeader::read_from(&mut Cursor::new(&buf), Layout::Migrated).is_ok());
    assert!(PayloadHeader::read_from(&mut Cursor::new(&buf), Layout::Legacy).is_err());
  }

  #[test]
  fn rics_id_parse() {
    assert_eq!(RicsId::parse("1155"), RicsId::Known(1155));
    assert_eq!(RicsId::parse("0043"), RicsId::Known(43));
    let unresolved = RicsId::parse("MAV1");
    assert_eq!(unresolved, RicsId::Unresolved("MAV1".into()));
    assert_eq!(unresolved.known(), None);
    assert_eq!(unresolved.numeric(), 0);
    assert_eq!(RicsId::parse("70000").known(), None);
  }

  #[test]
  fn rics_id_serializes_untagged() {
    assert_eq!(serde_json::to_string(&RicsId::Known(1155)).unwrap(), "1155");
    assert_eq!(
      serde_json::to_string(&RicsId::Unresolved("X1".into())).unwrap(),
      "\"X1\""
    );
  }

  #[test]
  fn price_formats_two_decimals() {
    assert_eq!(Price::from_hundredths(5).to_string(), "0.05");
    assert_eq!(Price::from_hundredths(250_000).to_string(), "2500.00");
  }

  #[test]
  fn flags_serialize_presence() {
    let json = serde_json::to_value(BlockFlags::PERSON).unwrap();
    assert_eq!(json["raw"], 1);
    assert_eq!(json["person_block_present"], true);
    assert_eq!(json["trip_block_present"], false);
  }
}
