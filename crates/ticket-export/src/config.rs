/// Configuration for the CSV and JSON projections.
///
/// The CSV layout is fixed-width: every row carries the same number of
/// columns regardless of which blocks a ticket contains. The slot counts
/// decide how many column groups are reserved for each repeated block.
///
/// ```text
/// ┌────────────────────────┬─────────┬───────────────────────────────────┐
/// │ Field                  │ Default │ Purpose                           │
/// ├────────────────────────┼─────────┼───────────────────────────────────┤
/// │ delimiter              │ ';'     │ CSV field separator               │
/// │ class_upgrade_slots    │ 1       │ class-upgrade column groups       │
/// │ pass_slots             │ 1       │ pass column groups                │
/// │ seat_reservation_slots │ 2       │ seat-reservation column groups    │
/// │ pretty_json            │ false   │ indent JSON output                │
/// └────────────────────────┴─────────┴───────────────────────────────────┘
/// ```
///
/// Blocks beyond the reserved slots are left out of the row and logged.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportConfig {
    pub delimiter: char,
    pub class_upgrade_slots: usize,
    pub pass_slots: usize,
    pub seat_reservation_slots: usize,
    pub pretty_json: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            delimiter: ';',
            class_upgrade_slots: 1,
            pass_slots: 1,
            seat_reservation_slots: 2,
            pretty_json: false,
        }
    }
}
