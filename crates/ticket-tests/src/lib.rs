//! Fixture encoder for the ticket decoder test suite.
//!
//! Production code only ever decodes; the tests need the inverse. This
//! crate builds wire-exact ticket records from data-model values so a test
//! can state its input as blocks, decode the bytes, and compare.
//!
//! ```text
//!   TicketBuilder::new(5)
//!       .person(..).trip(..).seat_reservation(..)  ← data-model blocks
//!       .declared_len(n) / .payload_suffix(..)      ← deliberate damage
//!       .encode()                                   → envelope bytes
//! ```

#![allow(clippy::pedantic)]

use std::io::Write;

use flate2::Compression;
use flate2::write::GzEncoder;
use ticket_types::layout::{LEGACY_RICS_CODE_WIDTH, LEGACY_TICKET_ID_WIDTH, LAST_LEGACY_VERSION};
use ticket_types::station::STATION_NAME_WIDTH;
use ticket_types::{
    BlockFlags, DiscountSet, PassBlock, PersonBlock, SeatReservationBlock, Station, TicketKind,
    TripBlock,
};
use ticket_wire::{PackedDate, Timestamp, ValidityInterval};

// ── Packed fields ─────────────────────────────────────────────────────────────

/// Build a timestamp from calendar fields. Panics on an impossible instant.
pub fn timestamp(year: u16, month: u8, day: u8, hour: u8, minute: u8, second: u8) -> Timestamp {
    let ts = Timestamp::from_packed(
        (u32::from(year - 2000) << 26)
            | (u32::from(month) << 22)
            | (u32::from(day) << 17)
            | (u32::from(hour) << 12)
            | (u32::from(minute) << 6)
            | u32::from(second),
    );
    assert!(ts.is_valid(), "fixture timestamp {ts} is not a real instant");
    ts
}

pub fn pack_date(date: PackedDate) -> [u8; 3] {
    let raw = (u32::from(date.year) << 9) | (u32::from(date.month) << 5) | u32::from(date.day);
    let [_, hi, mid, lo] = raw.to_be_bytes();
    [hi, mid, lo]
}

/// Gzip `data` as a single member.
pub fn gzip(data: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).expect("in-memory gzip cannot fail");
    encoder.finish().expect("in-memory gzip cannot fail")
}

// ── Sample blocks ─────────────────────────────────────────────────────────────

pub fn station(id: u32, name: &str) -> Station {
    Station {
        id,
        name: name.to_owned(),
    }
}

pub fn sample_person() -> PersonBlock {
    PersonBlock {
        name: "Kovacs Anna".to_owned(),
        birth_date: PackedDate {
            year: 1990,
            month: 12,
            day: 24,
        },
        id_card_number: "123456AB".to_owned(),
    }
}

pub fn sample_trip() -> TripBlock {
    TripBlock {
        ticket_kind: TicketKind::from_raw(0x0101),
        departure_station: station(5_500_017, "Budapest-Keleti"),
        destination_station: station(5_510_017, "Debrecen"),
        class: 2,
        valid_start_at: timestamp(2024, 5, 10, 6, 0, 0),
        valid_interval: ValidityInterval::from_minutes(36 * 60),
        num_passengers: 1,
        applied_discounts: DiscountSet::from_raw(0b101),
    }
}

pub fn sample_class_upgrade() -> TripBlock {
    TripBlock {
        ticket_kind: TicketKind::from_raw(0x0202),
        class: 1,
        valid_interval: ValidityInterval::from_minutes(180),
        applied_discounts: DiscountSet::from_raw(0),
        ..sample_trip()
    }
}

pub fn sample_pass() -> PassBlock {
    PassBlock {
        ticket_kind: TicketKind::from_raw(0x2001),
        applied_discounts_1: DiscountSet::from_raw(0x04),
        applied_discounts_2: DiscountSet::from_raw(0),
        valid_start_at: timestamp(2024, 5, 1, 0, 0, 0),
        valid_interval: ValidityInterval::from_minutes(31 * 24 * 60),
        num_passengers: 1,
    }
}

pub fn sample_seat(train_number: u32, seat_number: u16) -> SeatReservationBlock {
    SeatReservationBlock {
        departure_station: station(5_500_017, "Budapest-Keleti"),
        destination_station: station(5_510_017, "Debrecen"),
        ticket_kind: TicketKind::from_raw(0x0300),
        travel_time: timestamp(2024, 5, 10, 7, 15, 0),
        rics_code: 1155,
        train_number,
        num_passengers: 1,
        car_number: 21,
        seat_number,
    }
}

// ── Builder ───────────────────────────────────────────────────────────────────

/// Encodes a complete ticket record.
///
/// Versions 1..=4 get the legacy layout (fixed-width identifiers, 8-bit
/// flags); version 5 and anything above it the migrated one. Unsupported
/// versions are still encoded so tests can feed them to the decoder.
#[derive(Clone, Debug)]
pub struct TicketBuilder {
    version: u8,
    signature_version: u8,
    envelope_ticket_id: String,
    envelope_rics_code: String,
    signature: Vec<u8>,
    header_ticket_id: String,
    header_rics_id: u16,
    issued_at: Timestamp,
    price_hundredths: u32,
    ticket_medium: u32,
    flags: Option<u16>,
    person: Option<PersonBlock>,
    trip: Option<TripBlock>,
    class_upgrades: Vec<TripBlock>,
    passes: Vec<PassBlock>,
    seat_reservations: Vec<SeatReservationBlock>,
    payload_suffix: Vec<u8>,
    declared_len: Option<u32>,
    trailing: Vec<u8>,
}

impl TicketBuilder {
    pub fn new(version: u8) -> Self {
        Self {
            version,
            signature_version: 2,
            envelope_ticket_id: "T-0042".to_owned(),
            envelope_rics_code: "1155".to_owned(),
            signature: vec![0xA5; 16],
            header_ticket_id: "T-0042".to_owned(),
            header_rics_id: 1155,
            issued_at: timestamp(2024, 5, 9, 18, 42, 7),
            price_hundredths: 2490,
            ticket_medium: 1,
            flags: None,
            person: None,
            trip: None,
            class_upgrades: Vec::new(),
            passes: Vec::new(),
            seat_reservations: Vec::new(),
            payload_suffix: Vec::new(),
            declared_len: None,
            trailing: Vec::new(),
        }
    }

    pub fn signature_version(mut self, version: u8) -> Self {
        self.signature_version = version;
        self
    }

    pub fn signature(mut self, signature: &[u8]) -> Self {
        self.signature = signature.to_vec();
        self
    }

    /// Identifiers carried by the envelope.
    pub fn envelope_ids(mut self, ticket_id: &str, rics_code: &str) -> Self {
        self.envelope_ticket_id = ticket_id.to_owned();
        self.envelope_rics_code = rics_code.to_owned();
        self
    }

    /// Identifiers carried by the payload header.
    pub fn header_ids(mut self, ticket_id: &str, rics_id: u16) -> Self {
        self.header_ticket_id = ticket_id.to_owned();
        self.header_rics_id = rics_id;
        self
    }

    pub fn issued_at(mut self, at: Timestamp) -> Self {
        self.issued_at = at;
        self
    }

    pub fn price(mut self, hundredths: u32) -> Self {
        self.price_hundredths = hundredths;
        self
    }

    pub fn ticket_medium(mut self, raw: u32) -> Self {
        self.ticket_medium = raw;
        self
    }

    /// Override the header flags derived from the optional blocks.
    pub fn flags(mut self, raw: u16) -> Self {
        self.flags = Some(raw);
        self
    }

    pub fn person(mut self, person: PersonBlock) -> Self {
        self.person = Some(person);
        self
    }

    pub fn trip(mut self, trip: TripBlock) -> Self {
        self.trip = Some(trip);
        self
    }

    pub fn class_upgrade(mut self, upgrade: TripBlock) -> Self {
        self.class_upgrades.push(upgrade);
        self
    }

    pub fn pass(mut self, pass: PassBlock) -> Self {
        self.passes.push(pass);
        self
    }

    pub fn seat_reservation(mut self, seat: SeatReservationBlock) -> Self {
        self.seat_reservations.push(seat);
        self
    }

    /// Raw bytes appended to the uncompressed payload.
    pub fn payload_suffix(mut self, bytes: &[u8]) -> Self {
        self.payload_suffix = bytes.to_vec();
        self
    }

    /// Override the gzip trailer's ISIZE.
    pub fn declared_len(mut self, len: u32) -> Self {
        self.declared_len = Some(len);
        self
    }

    /// Raw bytes appended after the envelope.
    pub fn trailing(mut self, bytes: &[u8]) -> Self {
        self.trailing = bytes.to_vec();
        self
    }

    fn is_legacy(&self) -> bool {
        self.version <= LAST_LEGACY_VERSION
    }

    /// The uncompressed payload bytes.
    pub fn payload_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        let flags = self.flags.unwrap_or_else(|| {
            let mut raw = BlockFlags::NONE.raw();
            if self.person.is_some() {
                raw |= BlockFlags::PERSON.raw();
            }
            if self.trip.is_some() {
                raw |= BlockFlags::TRIP.raw();
            }
            raw
        });

        if self.is_legacy() {
            buf.push(u8::try_from(flags).expect("legacy flags fit in a byte"));
            put_fixed(&mut buf, &self.header_ticket_id, LEGACY_TICKET_ID_WIDTH, 0);
        } else {
            buf.extend_from_slice(&flags.to_be_bytes());
            put_string_u8(&mut buf, &self.header_ticket_id);
        }
        buf.extend_from_slice(&self.header_rics_id.to_be_bytes());
        buf.extend_from_slice(&self.issued_at.raw().to_be_bytes());
        buf.extend_from_slice(&self.price_hundredths.to_be_bytes());
        buf.extend_from_slice(&self.ticket_medium.to_be_bytes());
        buf.push(u8::try_from(self.class_upgrades.len()).expect("at most 255 class upgrades"));
        buf.push(u8::try_from(self.passes.len()).expect("at most 255 passes"));

        if let Some(person) = &self.person {
            put_person(&mut buf, person);
        }
        if let Some(trip) = &self.trip {
            put_trip(&mut buf, trip);
        }
        for upgrade in &self.class_upgrades {
            put_trip(&mut buf, upgrade);
        }
        for pass in &self.passes {
            put_pass(&mut buf, pass);
        }
        for seat in &self.seat_reservations {
            put_seat(&mut buf, seat);
        }
        buf.extend_from_slice(&self.payload_suffix);
        buf
    }

    /// The gzip member carried by the envelope, ISIZE override applied.
    pub fn compressed_payload(&self) -> Vec<u8> {
        let mut member = gzip(&self.payload_bytes());
        if let Some(len) = self.declared_len {
            let at = member.len() - 4;
            member[at..].copy_from_slice(&len.to_le_bytes());
        }
        member
    }

    /// The complete record.
    pub fn encode(&self) -> Vec<u8> {
        let member = self.compressed_payload();
        self.encode_with_member(&member)
    }

    /// The complete record around an arbitrary compressed payload.
    pub fn encode_with_member(&self, member: &[u8]) -> Vec<u8> {
        let mut buf = vec![self.version, self.signature_version];
        if self.is_legacy() {
            put_fixed(&mut buf, &self.envelope_ticket_id, LEGACY_TICKET_ID_WIDTH, 0);
            put_fixed(&mut buf, &self.envelope_rics_code, LEGACY_RICS_CODE_WIDTH, b' ');
        } else {
            put_string_u8(&mut buf, &self.envelope_ticket_id);
            put_string_u8(&mut buf, &self.envelope_rics_code);
        }
        let signature_len = u16::try_from(self.signature.len()).expect("signature fits u16 length");
        buf.extend_from_slice(&signature_len.to_be_bytes());
        buf.extend_from_slice(&self.signature);
        let member_len = u32::try_from(member.len()).expect("member fits u32 length");
        buf.extend_from_slice(&member_len.to_be_bytes());
        buf.extend_from_slice(member);
        buf.extend_from_slice(&self.trailing);
        buf
    }
}

// ── Block encoders ────────────────────────────────────────────────────────────

fn put_string_u8(buf: &mut Vec<u8>, value: &str) {
    buf.push(u8::try_from(value.len()).expect("string fits u8 length"));
    buf.extend_from_slice(value.as_bytes());
}

fn put_fixed(buf: &mut Vec<u8>, value: &str, width: usize, pad: u8) {
    assert!(value.len() <= width, "{value:?} wider than {width} bytes");
    buf.extend_from_slice(value.as_bytes());
    buf.resize(buf.len() + width - value.len(), pad);
}

fn put_station(buf: &mut Vec<u8>, station: &Station) {
    buf.extend_from_slice(&station.id.to_be_bytes());
    put_fixed(buf, &station.name, STATION_NAME_WIDTH, 0);
}

fn put_person(buf: &mut Vec<u8>, person: &PersonBlock) {
    put_string_u8(buf, &person.name);
    buf.extend_from_slice(&pack_date(person.birth_date));
    put_string_u8(buf, &person.id_card_number);
}

fn put_trip(buf: &mut Vec<u8>, trip: &TripBlock) {
    buf.extend_from_slice(&trip.ticket_kind.raw().to_be_bytes());
    put_station(buf, &trip.departure_station);
    put_station(buf, &trip.destination_station);
    buf.push(trip.class);
    buf.extend_from_slice(&trip.valid_start_at.raw().to_be_bytes());
    buf.extend_from_slice(&trip.valid_interval.minutes().to_be_bytes());
    buf.push(trip.num_passengers);
    buf.extend_from_slice(&trip.applied_discounts.raw().to_be_bytes());
}

fn put_pass(buf: &mut Vec<u8>, pass: &PassBlock) {
    buf.extend_from_slice(&pass.ticket_kind.raw().to_be_bytes());
    buf.extend_from_slice(&pass.applied_discounts_1.raw().to_be_bytes());
    buf.extend_from_slice(&pass.applied_discounts_2.raw().to_be_bytes());
    buf.extend_from_slice(&pass.valid_start_at.raw().to_be_bytes());
    buf.extend_from_slice(&pass.valid_interval.minutes().to_be_bytes());
    buf.push(pass.num_passengers);
}

fn put_seat(buf: &mut Vec<u8>, seat: &SeatReservationBlock) {
    put_station(buf, &seat.departure_station);
    put_station(buf, &seat.destination_station);
    buf.extend_from_slice(&seat.ticket_kind.raw().to_be_bytes());
    buf.extend_from_slice(&seat.travel_time.raw().to_be_bytes());
    buf.extend_from_slice(&seat.rics_code.to_be_bytes());
    buf.extend_from_slice(&seat.train_number.to_be_bytes());
    buf.push(seat.num_passengers);
    buf.extend_from_slice(&seat.car_number.to_be_bytes());
    buf.extend_from_slice(&seat.seat_number.to_be_bytes());
}
