//! Sample record generator for manual CLI runs.
//!
//! Writes a handful of well-formed and deliberately damaged ticket records
//! so `ticket csv`, `ticket validate` and friends have something to chew on.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin generate_samples -p ticket-tests -- /tmp/tickets
//! ticket validate /tmp/tickets/*.bin
//! ```
//!
//! Without an argument the records land in `target/ticket-samples/`.
//!
//! | File                    | Contents                                       |
//! |-------------------------|------------------------------------------------|
//! | full_v5.bin             | Person, trip, class upgrade, two seats         |
//! | legacy_v3.bin           | Fixed-width ids, person and trip               |
//! | pass_only.bin           | Two passes, no optional blocks                 |
//! | unresolved_rics.bin     | Envelope RICS code that is not a number        |
//! | length_mismatch.bin     | ISIZE trailer one byte too large               |
//! | dangling_seat.bin       | Ten stray bytes after the last seat record     |
//! | unsupported_version.bin | Envelope version 9                             |

#![allow(clippy::pedantic)]

use std::path::{Path, PathBuf};

use ticket_tests::{
    TicketBuilder, sample_class_upgrade, sample_pass, sample_person, sample_seat, sample_trip,
};

fn main() {
    let out_dir = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| {
            PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../target/ticket-samples")
        });

    let full = TicketBuilder::new(5)
        .person(sample_person())
        .trip(sample_trip())
        .class_upgrade(sample_class_upgrade())
        .seat_reservation(sample_seat(612, 64))
        .seat_reservation(sample_seat(612, 65));
    let full_len = full.payload_bytes().len() as u32;

    write_file(&out_dir.join("full_v5.bin"), &full.encode());
    write_file(
        &out_dir.join("legacy_v3.bin"),
        &TicketBuilder::new(3)
            .envelope_ids("LEGACY-ID-0001", "55")
            .header_ids("LEGACY-ID-0001", 55)
            .person(sample_person())
            .trip(sample_trip())
            .encode(),
    );
    write_file(
        &out_dir.join("pass_only.bin"),
        &TicketBuilder::new(5)
            .pass(sample_pass())
            .pass(sample_pass())
            .encode(),
    );
    write_file(
        &out_dir.join("unresolved_rics.bin"),
        &TicketBuilder::new(5).envelope_ids("T-0099", "RICS").encode(),
    );
    write_file(
        &out_dir.join("length_mismatch.bin"),
        &full.clone().declared_len(full_len + 1).encode(),
    );
    write_file(
        &out_dir.join("dangling_seat.bin"),
        &full.clone().payload_suffix(&[0; 10]).encode(),
    );
    write_file(
        &out_dir.join("unsupported_version.bin"),
        &TicketBuilder::new(9).encode(),
    );

    println!("All samples written to {}", out_dir.display());
}

fn write_file(path: &Path, data: &[u8]) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create_dir_all");
    }
    std::fs::write(path, data).expect("write_file");
    println!("  wrote {}", path.display());
}
