use std::fmt::Display;

use ticket_types::{
    ClassUpgradeBlock, PassBlock, PersonBlock, RicsId, SeatReservationBlock, Ticket, TripBlock,
};
use tracing::warn;

use crate::config::ExportConfig;

// ── Column groups ─────────────────────────────────────────────────────
//
// Each group lists its column names in row order. The row writers below
// push exactly one field per name, or the same number of empty fields
// when the block is absent.

const TICKET_COLUMNS: [&str; 8] = [
    "filename",
    "version",
    "signature_version",
    "ticket_id",
    "rics_id",
    "issued_at",
    "price",
    "ticket_medium_tag",
];

const PERSON_COLUMNS: [&str; 3] = ["name", "birth_date", "id_card_number"];

const TRIP_COLUMNS: [&str; 10] = [
    "ticket_kind_tag",
    "departure_station_id",
    "departure_station_name",
    "destination_station_id",
    "destination_station_name",
    "class",
    "valid_start_at",
    "valid_to",
    "num_passengers",
    "applied_discounts_tag",
];

const CLASS_UPGRADE_COLUMNS: [&str; 10] = [
    "departure_station_id",
    "departure_station_name",
    "destination_station_id",
    "destination_station_name",
    "class",
    "ticket_kind_tag",
    "valid_start_at",
    "valid_to",
    "num_passengers",
    "applied_discounts_tag",
];

const PASS_COLUMNS: [&str; 6] = [
    "ticket_name_tag",
    "applied_discounts_tag1",
    "applied_discounts_tag2",
    "valid_start_at",
    "valid_to",
    "num_passengers",
];

const SEAT_RESERVATION_COLUMNS: [&str; 11] = [
    "departure_station_id",
    "departure_station_name",
    "destination_station_id",
    "destination_station_name",
    "ticket_name_tag",
    "travel_time",
    "rics_code",
    "train_number",
    "num_passengers",
    "car_number",
    "seat_number",
];

/// The CSV header line for `config`, `\n`-terminated.
///
/// Repeated slots reuse the group's column names; the second and later
/// slots get a `_2`, `_3`, ... suffix.
pub fn csv_header(config: &ExportConfig) -> String {
    let mut row = Row::new(config.delimiter);
    for name in TICKET_COLUMNS.iter().chain(&PERSON_COLUMNS).chain(&TRIP_COLUMNS) {
        row.push(name);
    }
    slotted_names(&mut row, &CLASS_UPGRADE_COLUMNS, config.class_upgrade_slots);
    slotted_names(&mut row, &PASS_COLUMNS, config.pass_slots);
    slotted_names(&mut row, &SEAT_RESERVATION_COLUMNS, config.seat_reservation_slots);
    row.finish()
}

/// One CSV row for `ticket`, `\n`-terminated, with exactly as many fields
/// as [`csv_header`] produces for the same `config`.
///
/// An invalid ticket renders as the empty string.
pub fn csv_row(ticket: &Ticket, config: &ExportConfig) -> String {
    if !ticket.valid {
        return String::new();
    }
    let header = &ticket.payload.header;
    let mut row = Row::new(config.delimiter);

    row.push(ticket.filename.as_deref().unwrap_or_default());
    row.push(ticket.envelope.version);
    row.push(ticket.envelope.signature_version);
    row.push(&header.ticket_id);
    match &header.rics_id {
        RicsId::Known(id) => row.push(id),
        RicsId::Unresolved(_) => row.skip(1),
    }
    row.push(header.issued_at);
    row.push(header.price);
    row.push(header.ticket_medium);

    match &ticket.payload.person {
        Some(person) => person_fields(&mut row, person),
        None => row.skip(PERSON_COLUMNS.len()),
    }
    match &ticket.payload.trip {
        Some(trip) => trip_fields(&mut row, trip),
        None => row.skip(TRIP_COLUMNS.len()),
    }

    let source = ticket.filename.as_deref().unwrap_or("<unnamed>");
    slotted_fields(
        &mut row,
        &ticket.payload.class_upgrades,
        config.class_upgrade_slots,
        CLASS_UPGRADE_COLUMNS.len(),
        class_upgrade_fields,
        "class upgrade",
        source,
    );
    slotted_fields(
        &mut row,
        &ticket.payload.passes,
        config.pass_slots,
        PASS_COLUMNS.len(),
        pass_fields,
        "pass",
        source,
    );
    slotted_fields(
        &mut row,
        &ticket.payload.seat_reservations,
        config.seat_reservation_slots,
        SEAT_RESERVATION_COLUMNS.len(),
        seat_reservation_fields,
        "seat reservation",
        source,
    );

    row.finish()
}

// ── Block writers ─────────────────────────────────────────────────────

fn person_fields(row: &mut Row, person: &PersonBlock) {
    row.push(&person.name);
    row.push(person.birth_date);
    row.push(&person.id_card_number);
}

fn trip_fields(row: &mut Row, trip: &TripBlock) {
    row.push(trip.ticket_kind);
    row.push(trip.departure_station.id);
    row.push(&trip.departure_station.name);
    row.push(trip.destination_station.id);
    row.push(&trip.destination_station.name);
    row.push(trip.class);
    row.push(trip.valid_start_at);
    row.push_opt(trip.valid_to());
    row.push(trip.num_passengers);
    row.push(trip.applied_discounts);
}

fn class_upgrade_fields(row: &mut Row, upgrade: &ClassUpgradeBlock) {
    row.push(upgrade.departure_station.id);
    row.push(&upgrade.departure_station.name);
    row.push(upgrade.destination_station.id);
    row.push(&upgrade.destination_station.name);
    row.push(upgrade.class);
    row.push(upgrade.ticket_kind);
    row.push(upgrade.valid_start_at);
    row.push_opt(upgrade.valid_to());
    row.push(upgrade.num_passengers);
    row.push(upgrade.applied_discounts);
}

fn pass_fields(row: &mut Row, pass: &PassBlock) {
    row.push(pass.ticket_kind);
    row.push(pass.applied_discounts_1);
    row.push(pass.applied_discounts_2);
    row.push(pass.valid_start_at);
    row.push_opt(pass.valid_to());
    row.push(pass.num_passengers);
}

fn seat_reservation_fields(row: &mut Row, seat: &SeatReservationBlock) {
    row.push(seat.departure_station.id);
    row.push(&seat.departure_station.name);
    row.push(seat.destination_station.id);
    row.push(&seat.destination_station.name);
    row.push(seat.ticket_kind);
    row.push(seat.travel_time);
    row.push(seat.rics_code);
    row.push(seat.train_number);
    row.push(seat.num_passengers);
    row.push(seat.car_number);
    row.push(seat.seat_number);
}

// ── Slots ─────────────────────────────────────────────────────────────

fn slotted_names(row: &mut Row, columns: &[&str], slots: usize) {
    for slot in 1..=slots {
        for name in columns {
            if slot == 1 {
                row.push(name);
            } else {
                row.push(format_args!("{name}_{slot}"));
            }
        }
    }
}

/// Write up to `slots` blocks, pad the rest, and log what does not fit.
fn slotted_fields<T>(
    row: &mut Row,
    blocks: &[T],
    slots: usize,
    width: usize,
    write: fn(&mut Row, &T),
    block: &str,
    source: &str,
) {
    for item in blocks.iter().take(slots) {
        write(row, item);
    }
    row.skip(width * slots.saturating_sub(blocks.len()));
    if blocks.len() > slots {
        warn!(
            source,
            block,
            present = blocks.len(),
            slots,
            "dropping blocks that do not fit the CSV layout"
        );
    }
}

// ── Row builder ───────────────────────────────────────────────────────

/// Accumulates delimited, quoted fields for a single line.
struct Row {
    delimiter: char,
    line: String,
    fields: usize,
}

impl Row {
    fn new(delimiter: char) -> Self {
        Self {
            delimiter,
            line: String::new(),
            fields: 0,
        }
    }

    fn push(&mut self, value: impl Display) {
        self.begin_field();
        let text = value.to_string();
        if self.needs_quotes(&text) {
            self.line.push('"');
            self.line.push_str(&text.replace('"', "\"\""));
            self.line.push('"');
        } else {
            self.line.push_str(&text);
        }
    }

    fn push_opt(&mut self, value: Option<impl Display>) {
        match value {
            Some(value) => self.push(value),
            None => self.skip(1),
        }
    }

    fn skip(&mut self, count: usize) {
        for _ in 0..count {
            self.begin_field();
        }
    }

    fn begin_field(&mut self) {
        if self.fields > 0 {
            self.line.push(self.delimiter);
        }
        self.fields += 1;
    }

    fn needs_quotes(&self, text: &str) -> bool {
        text.contains(|c: char| c == self.delimiter || matches!(c, '"' | '\n' | '\r'))
    }

    fn finish(mut self) -> String {
        self.line.push('\n');
        self.line
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ticket_types::Station;
    use ticket_wire::Timestamp;

    // 2024-05-10 06:00:00
    const START: u32 = (24 << 26) | (5 << 22) | (10 << 17) | (6 << 12);

    fn fields(line: &str, delimiter: char) -> usize {
        line.trim_end_matches('\n').split(delimiter).count()
    }

    fn seat(train_number: u32) -> SeatReservationBlock {
        SeatReservationBlock {
            train_number,
            travel_time: Timestamp::from_packed(START),
            ..SeatReservationBlock::default()
        }
    }

    fn valid_ticket() -> Ticket {
        let mut ticket = Ticket {
            valid: true,
            ..Ticket::default()
        };
        ticket.envelope.version = 5;
        ticket.envelope.signature_version = 2;
        ticket.payload.header.ticket_id = "T-1".to_owned();
        ticket.payload.header.rics_id = RicsId::Known(1155);
        ticket.payload.header.issued_at = Timestamp::from_packed(START);
        ticket
    }

    #[test]
    fn header_has_default_slot_layout() {
        let header = csv_header(&ExportConfig::default());
        assert!(header.starts_with("filename;version;signature_version;ticket_id;"));
        assert!(header.ends_with("car_number_2;seat_number_2\n"));
        assert_eq!(fields(&header, ';'), 8 + 3 + 10 + 10 + 6 + 2 * 11);
    }

    #[test]
    fn row_matches_header_width_for_any_slots() {
        let mut ticket = valid_ticket();
        ticket.payload.seat_reservations = vec![seat(1), seat(2), seat(3)];
        ticket.payload.passes = vec![PassBlock::default()];

        for (upgrades, passes, seats) in [(0, 0, 0), (1, 1, 2), (2, 3, 1), (0, 2, 5)] {
            let config = ExportConfig {
                class_upgrade_slots: upgrades,
                pass_slots: passes,
                seat_reservation_slots: seats,
                ..ExportConfig::default()
            };
            let header = csv_header(&config);
            let row = csv_row(&ticket, &config);
            assert_eq!(fields(&header, ';'), fields(&row, ';'), "{config:?}");
        }
    }

    #[test]
    fn invalid_ticket_renders_nothing() {
        assert_eq!(csv_row(&Ticket::default(), &ExportConfig::default()), "");
    }

    #[test]
    fn extra_seat_reservations_are_dropped() {
        let mut ticket = valid_ticket();
        ticket.payload.seat_reservations = vec![seat(101), seat(102), seat(103)];
        let row = csv_row(&ticket, &ExportConfig::default());
        assert!(row.contains(";101;"));
        assert!(row.contains(";102;"));
        assert!(!row.contains(";103;"));
    }

    #[test]
    fn unresolved_rics_id_is_empty() {
        let mut ticket = valid_ticket();
        ticket.payload.header.rics_id = RicsId::Unresolved("ABCD".to_owned());
        let row = csv_row(&ticket, &ExportConfig::default());
        assert!(row.starts_with(";5;2;T-1;;2024-05-10 06:00:00;0.00;00000000;"));
    }

    #[test]
    fn fields_with_delimiter_are_quoted() {
        let mut ticket = valid_ticket();
        ticket.filename = Some("a;b\"c.bin".to_owned());
        let row = csv_row(&ticket, &ExportConfig::default());
        assert!(row.starts_with("\"a;b\"\"c.bin\";5;"));
    }

    #[test]
    fn custom_delimiter() {
        let mut ticket = valid_ticket();
        ticket.payload.trip = Some(TripBlock {
            departure_station: Station {
                id: 7,
                name: "Szeged".to_owned(),
            },
            valid_start_at: Timestamp::from_packed(START),
            ..TripBlock::default()
        });
        let config = ExportConfig {
            delimiter: ',',
            ..ExportConfig::default()
        };
        let row = csv_row(&ticket, &config);
        assert!(row.contains(",00000000,7,Szeged,0,,0,2024-05-10 06:00:00,2024-05-10 06:00:00,0,00000000,"));
        assert_eq!(fields(&row, ','), fields(&csv_header(&config), ','));
    }
}
