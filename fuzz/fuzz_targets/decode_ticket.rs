#![no_main]

use libfuzzer_sys::fuzz_target;
use ticket_export::{csv_header, csv_row, to_json, ExportConfig};

// Fuzz target: full decoder entry point, then both exporters.
//
// Catches bugs in:
// - Envelope framing and length prefixes
// - Gzip magic and ISIZE handling
// - Payload layout dispatch and block counts
// - Migrated id override
// - CSV row width drifting away from the header
fuzz_target!(|data: &[u8]| {
    if let Ok(ticket) = ticket_decoder::TicketDecoder::decode(data) {
        let config = ExportConfig::default();
        let header = csv_header(&config);
        let row = csv_row(&ticket, &config);
        assert_eq!(
            header.matches(config.delimiter).count(),
            row.matches(config.delimiter).count() - quoted_delimiters(&row, config.delimiter),
        );
        let _ = to_json(&ticket, &config);
    }
});

fn quoted_delimiters(row: &str, delimiter: char) -> usize {
    let mut inside = false;
    let mut count = 0;
    for c in row.chars() {
        if c == '"' {
            inside = !inside;
        } else if inside && c == delimiter {
            count += 1;
        }
    }
    count
}
