#![no_main]

use libfuzzer_sys::fuzz_target;
use ticket_wire::{Timestamp, ValidityInterval};

// Fuzz target: packed timestamp rendering and validity arithmetic.
//
// Any packed value must render; a real instant must survive a round trip
// through chrono.
fuzz_target!(|raw: (u32, u32)| {
    let start = Timestamp::from_packed(raw.0);
    let _ = start.to_string();
    if let Some(at) = start.as_naive() {
        assert_eq!(Timestamp::from_naive(at), Some(start));
    }
    let _ = ValidityInterval::from_minutes(raw.1).as_timestamp(start);
});
