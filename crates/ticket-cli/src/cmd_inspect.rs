/// Implementation of `ticket inspect`.
///
/// Decodes one record and prints its envelope, payload header and every
/// block on stdout.
///
/// # Output format
///
/// ```text
/// File:      a.bin
/// Envelope:  v5 (signature v2), ticket_id "T-0042", rics_code "1155"
///            signature 64 bytes, gzip 196 -> 318 bytes
/// Header:    migrated, flags=0x0003, issued 2024-05-10 06:00:00, price 24.90, medium 00000001
///            ticket_id "T-0042", rics_id 1155
/// Person:    "Kovacs Anna", born 1990-12-24, id card "123456AB"
/// Trip:      Budapest-Keleti (5500017) -> Debrecen (5510017), class 2, kind 00000101
///            valid 2024-05-10 06:00:00 .. 2024-05-11 18:00:00, 3 passenger(s), discounts 00000005
/// Seat 0:    Budapest-Keleti (5500017) -> Debrecen (5510017), train 612, car 21, seat 64
///            travel 2024-05-10 07:15:00, rics 1155, kind 00000300, 1 passenger(s)
/// ```
use anyhow::{Context, Result};
use ticket_decoder::DecoderConfig;
use ticket_types::{Layout, PassBlock, Station, TripBlock};

use crate::{InspectArgs, decode_path};

/// Run the `ticket inspect` command.
///
/// # Errors
///
/// Returns an error if the file cannot be read or does not decode.
pub fn run(args: &InspectArgs, decoder: &DecoderConfig) -> Result<()> {
    let ticket = decode_path(&args.file, decoder)
        .with_context(|| format!("failed to decode {}", args.file.display()))?;
    let envelope = &ticket.envelope;
    let payload = &ticket.payload;
    let header = &payload.header;

    println!("File:      {}", ticket.filename.as_deref().unwrap_or("-"));
    println!(
        "Envelope:  v{} (signature v{}), ticket_id {:?}, rics_code {:?}",
        envelope.version, envelope.signature_version, envelope.ticket_id, envelope.rics_code
    );
    println!(
        "           signature {} bytes, gzip {} -> {} bytes",
        envelope.signature.len(),
        envelope.compressed_payload.len(),
        envelope.declared_uncompressed_len
    );
    if args.show_signature {
        println!("           {}", hex::encode(&envelope.signature));
    }

    let layout = match header.layout {
        Layout::Legacy => "legacy",
        Layout::Migrated => "migrated",
    };
    println!(
        "Header:    {layout}, flags=0x{:04X}, issued {}, price {}, medium {}",
        header.flags.raw(),
        header.issued_at,
        header.price,
        header.ticket_medium
    );
    println!(
        "           ticket_id {:?}, rics_id {}",
        header.ticket_id, header.rics_id
    );

    if let Some(person) = &payload.person {
        println!(
            "Person:    {:?}, born {}, id card {:?}",
            person.name, person.birth_date, person.id_card_number
        );
    }
    if let Some(trip) = &payload.trip {
        print_trip("Trip:", trip);
    }
    for (idx, upgrade) in payload.class_upgrades.iter().enumerate() {
        print_trip(&format!("Upgrade {idx}:"), upgrade);
    }
    for (idx, pass) in payload.passes.iter().enumerate() {
        print_pass(idx, pass);
    }
    for (idx, seat) in payload.seat_reservations.iter().enumerate() {
        println!(
            "{:<11}{} -> {}, train {}, car {}, seat {}",
            format!("Seat {idx}:"),
            station(&seat.departure_station),
            station(&seat.destination_station),
            seat.train_number,
            seat.car_number,
            seat.seat_number
        );
        println!(
            "           travel {}, rics {}, kind {}, {} passenger(s)",
            seat.travel_time, seat.rics_code, seat.ticket_kind, seat.num_passengers
        );
    }
    Ok(())
}

fn print_trip(label: &str, trip: &TripBlock) {
    println!(
        "{label:<11}{} -> {}, class {}, kind {}",
        station(&trip.departure_station),
        station(&trip.destination_station),
        trip.class,
        trip.ticket_kind
    );
    println!(
        "           valid {} .. {}, {} passenger(s), discounts {}",
        trip.valid_start_at,
        valid_to_label(trip.valid_to()),
        trip.num_passengers,
        trip.applied_discounts
    );
}

fn print_pass(idx: usize, pass: &PassBlock) {
    println!(
        "{:<11}kind {}, discounts {} / {}",
        format!("Pass {idx}:"),
        pass.ticket_kind,
        pass.applied_discounts_1,
        pass.applied_discounts_2
    );
    println!(
        "           valid {} .. {}, {} passenger(s)",
        pass.valid_start_at,
        valid_to_label(pass.valid_to()),
        pass.num_passengers
    );
}

fn station(station: &Station) -> String {
    format!("{} ({})", station.name, station.id)
}

fn valid_to_label(valid_to: Option<impl std::fmt::Display>) -> String {
    valid_to.map_or_else(|| "unknown".to_owned(), |ts| ts.to_string())
}
