//! Export tests: decoded tickets projected to CSV rows and JSON documents.
//!
//! CSV rows are snapshotted as `column=value` lines so a diff points at the
//! column that moved, not at a 60-field line.

use insta::assert_snapshot;
use ticket_decoder::TicketDecoder;
use ticket_export::{ExportConfig, csv_header, csv_row, to_json};
use ticket_tests::{
    TicketBuilder, sample_class_upgrade, sample_pass, sample_person, sample_seat, sample_trip,
};
use ticket_types::Ticket;

fn decode(builder: &TicketBuilder, filename: &str) -> Ticket {
    TicketDecoder::decode(&builder.encode())
        .expect("fixture should decode")
        .with_filename(filename)
}

fn full_ticket() -> TicketBuilder {
    TicketBuilder::new(5)
        .person(sample_person())
        .trip(sample_trip())
        .class_upgrade(sample_class_upgrade())
        .seat_reservation(sample_seat(612, 64))
        .seat_reservation(sample_seat(612, 65))
}

/// Pair every header column with the row's value for it.
fn labelled(header: &str, row: &str, delimiter: char) -> String {
    let names: Vec<&str> = header.trim_end().split(delimiter).collect();
    let values: Vec<&str> = row.trim_end().split(delimiter).collect();
    assert_eq!(names.len(), values.len(), "row width differs from header");
    names
        .iter()
        .zip(&values)
        .map(|(name, value)| format!("{name}={value}"))
        .collect::<Vec<_>>()
        .join("\n")
}

// ── CSV ───────────────────────────────────────────────────────────────────────

#[test]
fn csv_full_ticket_row() {
    let config = ExportConfig::default();
    let ticket = decode(&full_ticket(), "a.bin");
    let row = labelled(&csv_header(&config), &csv_row(&ticket, &config), config.delimiter);

    assert_snapshot!(row, @r"
    filename=a.bin
    version=5
    signature_version=2
    ticket_id=T-0042
    rics_id=1155
    issued_at=2024-05-09 18:42:07
    price=24.90
    ticket_medium_tag=00000001
    name=Kovacs Anna
    birth_date=1990-12-24
    id_card_number=123456AB
    ticket_kind_tag=00000101
    departure_station_id=5500017
    departure_station_name=Budapest-Keleti
    destination_station_id=5510017
    destination_station_name=Debrecen
    class=2
    valid_start_at=2024-05-10 06:00:00
    valid_to=2024-05-11 18:00:00
    num_passengers=1
    applied_discounts_tag=00000005
    departure_station_id=5500017
    departure_station_name=Budapest-Keleti
    destination_station_id=5510017
    destination_station_name=Debrecen
    class=1
    ticket_kind_tag=00000202
    valid_start_at=2024-05-10 06:00:00
    valid_to=2024-05-10 09:00:00
    num_passengers=1
    applied_discounts_tag=00000000
    ticket_name_tag=
    applied_discounts_tag1=
    applied_discounts_tag2=
    valid_start_at=
    valid_to=
    num_passengers=
    departure_station_id=5500017
    departure_station_name=Budapest-Keleti
    destination_station_id=5510017
    destination_station_name=Debrecen
    ticket_name_tag=00000300
    travel_time=2024-05-10 07:15:00
    rics_code=1155
    train_number=612
    num_passengers=1
    car_number=21
    seat_number=64
    departure_station_id_2=5500017
    departure_station_name_2=Budapest-Keleti
    destination_station_id_2=5510017
    destination_station_name_2=Debrecen
    ticket_name_tag_2=00000300
    travel_time_2=2024-05-10 07:15:00
    rics_code_2=1155
    train_number_2=612
    num_passengers_2=1
    car_number_2=21
    seat_number_2=65
    ");
}

#[test]
fn csv_rows_keep_header_width_across_shapes() {
    let shapes = [
        TicketBuilder::new(2),
        TicketBuilder::new(5).person(sample_person()),
        TicketBuilder::new(5).pass(sample_pass()).pass(sample_pass()),
        TicketBuilder::new(3)
            .trip(sample_trip())
            .seat_reservation(sample_seat(1, 1))
            .seat_reservation(sample_seat(1, 2))
            .seat_reservation(sample_seat(1, 3)),
    ];
    for config in [
        ExportConfig::default(),
        ExportConfig {
            delimiter: ',',
            class_upgrade_slots: 0,
            pass_slots: 2,
            seat_reservation_slots: 4,
            ..ExportConfig::default()
        },
    ] {
        let width = csv_header(&config).trim_end().split(config.delimiter).count();
        for (idx, builder) in shapes.iter().enumerate() {
            let row = csv_row(&decode(builder, "t.bin"), &config);
            assert_eq!(
                row.trim_end().split(config.delimiter).count(),
                width,
                "shape {idx} with {config:?}"
            );
        }
    }
}

#[test]
fn csv_legacy_ticket_keeps_header_ids() {
    let builder = TicketBuilder::new(3)
        .envelope_ids("ENVELOPE-ID", "2001")
        .header_ids("LEGACY-ID-0001", 55);
    let row = csv_row(&decode(&builder, "c.bin"), &ExportConfig::default());
    assert!(row.starts_with("c.bin;3;2;LEGACY-ID-0001;55;"), "{row}");
    assert!(row.ends_with('\n'));
}

#[test]
fn csv_unresolved_rics_id_is_an_empty_field() {
    let builder = TicketBuilder::new(5).envelope_ids("T-9", "RICS");
    let row = csv_row(&decode(&builder, "u.bin"), &ExportConfig::default());
    assert!(row.starts_with("u.bin;5;2;T-9;;2024-05-09 18:42:07;"), "{row}");
}

#[test]
fn csv_invalid_ticket_is_empty() {
    assert_eq!(csv_row(&Ticket::default(), &ExportConfig::default()), "");
}

// ── JSON ──────────────────────────────────────────────────────────────────────

#[test]
fn json_header_shape() {
    let ticket = decode(&full_ticket(), "a.bin");
    let header = serde_json::to_string_pretty(&ticket.payload.header).unwrap();

    assert_snapshot!(header, @r#"
    {
      "layout": "migrated",
      "flags": {
        "raw": 3,
        "person_block_present": true,
        "trip_block_present": true
      },
      "ticket_id": "T-0042",
      "rics_id": 1155,
      "issued_at": "2024-05-09T18:42:07",
      "price": 24.9,
      "ticket_medium": 1,
      "num_class_upgrade_blocks": 1,
      "num_pass_blocks": 0
    }
    "#);
}

#[test]
fn json_document_fields() {
    let ticket = decode(&full_ticket(), "a.bin");
    let json = to_json(&ticket, &ExportConfig::default())
        .unwrap()
        .expect("valid ticket exports");
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["filename"], "a.bin");
    assert_eq!(value["valid"], true);
    assert_eq!(value["envelope"]["version"], 5);
    assert_eq!(value["envelope"]["signature"], "a5".repeat(16));
    assert_eq!(value["payload"]["person"]["birth_date"]["year"], 1990);
    assert_eq!(value["payload"]["trip"]["ticket_kind"], 0x0101);
    assert_eq!(value["payload"]["trip"]["valid_interval"], 36 * 60);
    assert!(value["payload"]["passes"].as_array().unwrap().is_empty());
    assert_eq!(value["payload"]["seat_reservations"][1]["seat_number"], 65);
}

#[test]
fn json_field_names_do_not_depend_on_version() {
    let keys = |version: u8| {
        let ticket = decode(&TicketBuilder::new(version).person(sample_person()), "k.bin");
        let json = to_json(&ticket, &ExportConfig::default()).unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        value["payload"]["header"]
            .as_object()
            .unwrap()
            .keys()
            .cloned()
            .collect::<Vec<_>>()
    };
    assert_eq!(keys(1), keys(5));
}

#[test]
fn json_invalid_ticket_is_none() {
    assert!(
        to_json(&Ticket::default(), &ExportConfig::default())
            .unwrap()
            .is_none()
    );
}
