use serde::Serialize;
use ticket_wire::Cursor;

use crate::error::TypeError;
use crate::layout::{LEGACY_RICS_CODE_WIDTH, LEGACY_TICKET_ID_WIDTH, Layout};

/// A gzip member needs at least its 10-byte header and 8-byte trailer.
pub const GZIP_MIN_MEMBER_LEN: usize = 18;

/// Width of the gzip trailer's ISIZE field.
const GZIP_ISIZE_WIDTH: usize = 4;

/// The outer container of a ticket record.
///
/// ```text
/// ┌─────────────────────┬──────────────────────────────────────────────┐
/// │ Field               │ Encoding                                     │
/// ├─────────────────────┼──────────────────────────────────────────────┤
/// │ version             │ u8 (1..=5)                                   │
/// │ signature_version   │ u8                                           │
/// │ ticket_id           │ v1-4: 18 bytes fixed │ v5: u8 len + bytes    │
/// │ rics_code           │ v1-4: 4 bytes fixed  │ v5: u8 len + bytes    │
/// │ signature           │ u16 BE len + bytes (opaque, not verified)    │
/// │ compressed_payload  │ u32 BE len + bytes (one gzip member)         │
/// └─────────────────────┴──────────────────────────────────────────────┘
/// ```
///
/// `declared_uncompressed_len` is not a separate field: it is the gzip
/// trailer's ISIZE, the last four bytes of `compressed_payload` read as a
/// little-endian `u32`. It is extracted from the framing before any
/// decompression happens.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Envelope {
  pub version: u8,
  pub signature_version: u8,
  pub ticket_id: String,
  pub rics_code: String,
  #[serde(serialize_with = "hex::serde::serialize")]
  pub signature: Vec<u8>,
  #[serde(serialize_with = "hex::serde::serialize")]
  pub compressed_payload: Vec<u8>,
  pub declared_uncompressed_len: u32,
}

impl Envelope {
  /// Decode an envelope from a cursor positioned at the start of a record.
  ///
  /// The cursor is left just past the compressed payload; anything after
  /// it is not part of the envelope.
  ///
  /// # Errors
  ///
  /// - [`TypeError::UnsupportedVersion`] for an unknown version byte.
  /// - [`TypeError::PayloadOverrun`] if the compressed payload's length
  ///   prefix exceeds the remaining input.
  /// - [`TypeError::PayloadTooShort`] if the compressed payload cannot hold
  ///   a gzip header and trailer.
  /// - [`TypeError::Wire`] if any fixed field is truncated or not UTF-8.
  pub fn read_from(cursor: &mut Cursor<'_>) -> Result<Self, TypeError> {
    let version = cursor.read_u8()?;
    let layout = Layout::for_version(version)?;
    let signature_version = cursor.read_u8()?;

    let (ticket_id, rics_code) = match layout {
      Layout::Legacy => (
        cursor.read_fixed_string(LEGACY_TICKET_ID_WIDTH)?,
        cursor.read_fixed_string(LEGACY_RICS_CODE_WIDTH)?,
      ),
      Layout::Migrated => (cursor.read_string_u8()?, cursor.read_string_u8()?),
    };

    let signature = cursor.read_len_prefixed_u16_be()?.to_vec();

    let declared = usize::try_from(cursor.read_u32_be()?).unwrap_or(usize::MAX);
    if declared > cursor.remaining() {
      return Err(TypeError::PayloadOverrun {
        declared,
        remaining: cursor.remaining(),
      });
    }
    let compressed_payload = cursor.read_bytes(declared)?.to_vec();
    let declared_uncompressed_len = gzip_isize(&compressed_payload)?;

    Ok(Self {
      version,
      signature_version,
      ticket_id,
      rics_code,
      signature,
      compressed_payload,
      declared_uncompressed_len,
    })
  }

  /// Layout family of this envelope's version.
  ///
  /// # Errors
  ///
  /// [`TypeError::UnsupportedVersion`] if `version` was set by hand to a
  /// value no record can carry.
  pub fn layout(&self) -> Result<Layout, TypeError> {
    Layout::for_version(self.version)
  }
}

/// Read ISIZE from the gzip trailer without touching the deflate stream.
fn gzip_isize(member: &[u8]) -> Result<u32, TypeError> {
  if member.len() < GZIP_MIN_MEMBER_LEN {
    return Err(TypeError::PayloadTooShort { len: member.len() });
  }
  let mut trailer = Cursor::new(&member[member.len() - GZIP_ISIZE_WIDTH..]);
  Ok(trailer.read_u32_le()?)
}

#[cfg(test)]
mod tests {
  use super::*;

  /// A fake gzip member: only the length and the trailing ISIZE matter
  /// to the envelope codec.
  fn fake_member(isize: u32) -> Vec<u8> {
    let mut member = vec![0x1F, 0x8B, 0x08];
    member.resize(GZIP_MIN_MEMBER_LEN - 4, 0);
    member.extend_from_slice(&isize.to_le_bytes());
    member
  }

  fn migrated_envelope(ticket_id: &str, rics: &str, member: &[u8]) -> Vec<u8> {
    let mut buf = vec![5, 2];
    buf.push(u8::try_from(ticket_id.len()).unwrap());
    buf.extend_from_slice(ticket_id.as_bytes());
    buf.push(u8::try_from(rics.len()).unwrap());
    buf.extend_from_slice(rics.as_bytes());
    buf.extend_from_slice(&3u16.to_be_bytes());
    buf.extend_from_slice(&[0xAA, 0xBB, 0xCC]);
    buf.extend_from_slice(&u32::try_from(member.len()).unwrap().to_be_bytes());
    buf.extend_from_slice(member);
    buf
  }

  #[test]
  fn migrated_layout() {
    let member = fake_member(412);
    let bytes = migrated_envelope("MV-000123", "1155", &member);
    let mut cursor = Cursor::new(&bytes);
    let envelope = Envelope::read_from(&mut cursor).unwrap();

    assert_eq!(envelope.version, 5);
    assert_eq!(envelope.signature_version, 2);
    assert_eq!(envelope.ticket_id, "MV-000123");
    assert_eq!(envelope.rics_code, "1155");
    assert_eq!(envelope.signature, vec![0xAA, 0xBB, 0xCC]);
    assert_eq!(envelope.compressed_payload, member);
    assert_eq!(envelope.declared_uncompressed_len, 412);
    assert_eq!(envelope.layout().unwrap(), Layout::Migrated);
    assert!(cursor.is_empty());
  }

  #[test]
  fn legacy_layout_uses_fixed_identifiers() {
    let member = fake_member(7);
    let mut bytes = vec![3, 1];
    bytes.extend_from_slice(b"LEGACY-TICKET-42\0\0");
    bytes.extend_from_slice(b"1155");
    bytes.extend_from_slice(&0u16.to_be_bytes());
    bytes.extend_from_slice(&u32::try_from(member.len()).unwrap().to_be_bytes());
    bytes.extend_from_slice(&member);

    let envelope = Envelope::read_from(&mut Cursor::new(&bytes)).unwrap();
    assert_eq!(envelope.ticket_id, "LEGACY-TICKET-42");
    assert_eq!(envelope.rics_code, "1155");
    assert!(envelope.signature.is_empty());
    assert_eq!(envelope.layout().unwrap(), Layout::Legacy);
  }

  #[test]
  fn rejects_unsupported_version() {
    let mut bytes = migrated_envelope("x", "1", &fake_member(0));
    bytes[0] = 9;
    let err = Envelope::read_from(&mut Cursor::new(&bytes)).unwrap_err();
    assert!(matches!(err, TypeError::UnsupportedVersion { version: 9 }));
  }

  #[test]
  fn hand_built_envelope_with_unknown_version_has_no_layout() {
    let envelope = Envelope {
      version: 0,
      ..Envelope::default()
    };
    assert!(matches!(
      envelope.layout(),
      Err(TypeError::UnsupportedVersion { version: 0 })
    ));
  }

  #[test]
  fn rejects_payload_length_past_input() {
    let member = fake_member(10);
    let mut bytes = migrated_envelope("x", "1", &member);
    bytes.truncate(bytes.len() - 1);
    let err = Envelope::read_from(&mut Cursor::new(&bytes)).unwrap_err();
    assert!(matches!(
      err,
      TypeError::PayloadOverrun { declared: 18, remaining: 17 }
    ));
  }

  #[test]
  fn rejects_member_without_room_for_trailer() {
    let bytes = migrated_envelope("x", "1", &[0x1F, 0x8B, 0x08, 0x00]);
    let err = Envelope::read_from(&mut Cursor::new(&bytes)).unwrap_err();
    assert!(matches!(err, TypeError::PayloadTooShort { len: 4 }));
  }

  #[test]
  fn truncated_fixed_fields() {
    let bytes = [5, 2, 10, b'a'];
    let err = Envelope::read_from(&mut Cursor::new(&bytes)).unwrap_err();
    assert!(err.is_truncated());
  }

  #[test]
  fn serializes_byte_runs_as_hex() {
    let envelope = Envelope {
      signature: vec![0xDE, 0xAD],
      ..Envelope::default()
    };
    let json = serde_json::to_value(&envelope).unwrap();
    assert_eq!(json["signature"], "dead");
    assert_eq!(json["compressed_payload"], "");
  }
}
