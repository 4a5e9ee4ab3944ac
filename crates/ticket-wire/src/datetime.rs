use std::fmt;

use chrono::{Datelike, NaiveDate, NaiveDateTime, TimeDelta, Timelike};
use serde::{Serialize, Serializer};

use crate::cursor::Cursor;
use crate::error::WireError;

/// Base year for the 6-bit year field of a packed timestamp.
pub const TIMESTAMP_EPOCH_YEAR: u16 = 2000;

/// A calendar date whose three sub-fields are kept exactly as encoded.
///
/// Birth dates on tickets may be blank (`0000-00-00`), so the sub-fields are
/// not validated against the calendar.
///
/// Packed into 3 bytes, big-endian:
///
/// ```text
///   23                9 8      5 4      0
///  ┌───────────────────┬────────┬────────┐
///  │ year (15 bits)    │ month  │ day    │
///  └───────────────────┴────────┴────────┘
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PackedDate {
    pub year: u16,
    pub month: u8,
    pub day: u8,
}

impl PackedDate {
    /// Unpack the three sub-fields from their 3-byte encoding.
    pub fn from_bytes([hi, mid, lo]: [u8; 3]) -> Self {
        Self {
            year: (u16::from(hi) << 7) | u16::from(mid >> 1),
            month: ((mid & 0x01) << 3) | (lo >> 5),
            day: lo & 0x1F,
        }
    }
}

impl fmt::Display for PackedDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

/// A wall-clock instant whose sub-fields are kept exactly as encoded.
///
/// Packed into a big-endian `u32`:
///
/// ```text
/// ┌───────────┬────────┬────────┬────────┬────────┬────────┐
/// │ 31..26    │ 25..22 │ 21..17 │ 16..12 │ 11..6  │ 5..0   │
/// │ year-2000 │ month  │ day    │ hour   │ minute │ second │
/// └───────────┴────────┴────────┴────────┴────────┴────────┘
/// ```
///
/// Issuers leave unused timestamps zeroed, so like [`PackedDate`] the value
/// is not checked against the calendar on decode. [`as_naive`](Self::as_naive)
/// is `None` when the sub-fields do not name a real instant.
///
/// Renders as `YYYY-MM-DD HH:MM:SS` and serializes as
/// `YYYY-MM-DDTHH:MM:SS`, both straight from the sub-fields.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(u32);

impl Timestamp {
    pub fn from_packed(raw: u32) -> Self {
        Self(raw)
    }

    /// Pack a calendar instant.
    ///
    /// Returns `None` outside the representable years 2000..=2063.
    pub fn from_naive(at: NaiveDateTime) -> Option<Self> {
        let years = u32::try_from(at.year() - i32::from(TIMESTAMP_EPOCH_YEAR)).ok()?;
        if years >= 1 << 6 {
            return None;
        }
        Some(Self(
            (years << 26)
                | (at.month() << 22)
                | (at.day() << 17)
                | (at.hour() << 12)
                | (at.minute() << 6)
                | at.second(),
        ))
    }

    pub fn raw(self) -> u32 {
        self.0
    }

    pub fn year(self) -> u16 {
        TIMESTAMP_EPOCH_YEAR + u16::from(field(self.0, 26, 6))
    }

    pub fn month(self) -> u8 {
        field(self.0, 22, 4)
    }

    pub fn day(self) -> u8 {
        field(self.0, 17, 5)
    }

    pub fn hour(self) -> u8 {
        field(self.0, 12, 5)
    }

    pub fn minute(self) -> u8 {
        field(self.0, 6, 6)
    }

    pub fn second(self) -> u8 {
        field(self.0, 0, 6)
    }

    /// The instant as a chrono value, if the sub-fields name one.
    pub fn as_naive(self) -> Option<NaiveDateTime> {
        NaiveDate::from_ymd_opt(
            i32::from(self.year()),
            u32::from(self.month()),
            u32::from(self.day()),
        )?
        .and_hms_opt(
            u32::from(self.hour()),
            u32::from(self.minute()),
            u32::from(self.second()),
        )
    }

    pub fn is_valid(self) -> bool {
        self.as_naive().is_some()
    }

    fn write_with(self, f: &mut fmt::Formatter<'_>, separator: char) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02}{separator}{:02}:{:02}:{:02}",
            self.year(),
            self.month(),
            self.day(),
            self.hour(),
            self.minute(),
            self.second()
        )
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_with(f, ' ')
    }
}

/// ISO 8601 rendering used by the serializer.
struct Iso(Timestamp);

impl fmt::Display for Iso {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.write_with(f, 'T')
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&Iso(*self))
    }
}

/// Extract a bit field of at most 8 bits.
fn field(raw: u32, shift: u32, width: u32) -> u8 {
    let mask = (1u32 << width) - 1;
    // Widths are at most 6 bits, so the masked value always fits.
    u8::try_from((raw >> shift) & mask).unwrap_or(u8::MAX)
}

/// How long a ticket stays valid, counted in minutes from its start.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidityInterval(u32);

impl ValidityInterval {
    pub fn from_minutes(minutes: u32) -> Self {
        Self(minutes)
    }

    pub fn minutes(self) -> u32 {
        self.0
    }

    /// The instant at which validity ends, given the block's start.
    ///
    /// Returns `None` if `start` is not a real instant, or if the end falls
    /// outside the packed years 2000..=2063.
    pub fn as_timestamp(self, start: Timestamp) -> Option<Timestamp> {
        start
            .as_naive()?
            .checked_add_signed(TimeDelta::minutes(i64::from(self.0)))
            .and_then(Timestamp::from_naive)
    }
}

impl Cursor<'_> {
    /// # Errors
    ///
    /// [`WireError::TruncatedInput`] if fewer than 3 bytes remain.
    pub fn read_packed_date(&mut self) -> Result<PackedDate, WireError> {
        Ok(PackedDate::from_bytes(self.read_array()?))
    }

    /// # Errors
    ///
    /// [`WireError::TruncatedInput`] if fewer than 4 bytes remain.
    pub fn read_timestamp(&mut self) -> Result<Timestamp, WireError> {
        self.read_u32_be().map(Timestamp)
    }

    /// # Errors
    ///
    /// [`WireError::TruncatedInput`] if fewer than 4 bytes remain.
    pub fn read_validity_interval(&mut self) -> Result<ValidityInterval, WireError> {
        self.read_u32_be().map(ValidityInterval)
    }
}
