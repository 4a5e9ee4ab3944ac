#![no_main]

use libfuzzer_sys::fuzz_target;
use ticket_wire::Cursor;

// Fuzz target: Envelope::read_from with arbitrary bytes.
//
// Catches bugs in:
// - Version checking
// - Fixed-width versus length-prefixed id fields
// - Signature and payload length prefixes overrunning the input
// - ISIZE extraction from short members
fuzz_target!(|data: &[u8]| {
    let mut cursor = Cursor::new(data);
    let _ = ticket_types::Envelope::read_from(&mut cursor);
});
