use ticket_types::seat_reservation::SEAT_RESERVATION_WIDTH;
use ticket_types::{
    Layout, PassBlock, Payload, PayloadHeader, PersonBlock, SeatReservationBlock, TripBlock,
    TypeError,
};
use ticket_wire::Cursor;
use tracing::trace;

/// Decode a decompressed payload for the given envelope version.
///
/// The header's flags and counts decide what follows it:
///
///   1. A person block iff flag bit 0, a trip block iff flag bit 1. An
///      absent block consumes no bytes.
///   2. Exactly `num_class_upgrade_blocks` class upgrades, then exactly
///      `num_pass_blocks` passes.
///   3. Seat reservations until the buffer is exhausted. A remainder
///      shorter than one record is a [`TypeError::DanglingRecord`].
///
/// # Errors
///
/// Any [`TypeError`]: an unsupported version, a truncated or non-UTF-8
/// field, or a dangling seat record.
pub fn decode_payload(buf: &[u8], version: u8) -> Result<Payload, TypeError> {
    let layout = Layout::for_version(version)?;
    let mut cursor = Cursor::new(buf);

    let header = PayloadHeader::read_from(&mut cursor, layout)?;
    trace!(
        ?layout,
        flags = header.flags.raw(),
        class_upgrades = header.num_class_upgrade_blocks,
        passes = header.num_pass_blocks,
        "decoded payload header"
    );

    let person = if header.flags.has_person() {
        Some(PersonBlock::read_from(&mut cursor)?)
    } else {
        None
    };
    let trip = if header.flags.has_trip() {
        Some(TripBlock::read_from(&mut cursor)?)
    } else {
        None
    };

    let class_upgrades = read_counted(
        &mut cursor,
        header.num_class_upgrade_blocks,
        "class upgrade",
        TripBlock::read_from,
    )?;
    let passes = read_counted(&mut cursor, header.num_pass_blocks, "pass", PassBlock::read_from)?;
    let seat_reservations = read_seat_reservations(&mut cursor)?;

    Ok(Payload {
        header,
        person,
        trip,
        class_upgrades,
        passes,
        seat_reservations,
    })
}

fn read_counted<T>(
    cursor: &mut Cursor<'_>,
    count: u8,
    block: &'static str,
    read: fn(&mut Cursor<'_>) -> Result<T, TypeError>,
) -> Result<Vec<T>, TypeError> {
    let mut blocks = Vec::with_capacity(usize::from(count));
    for index in 0..count {
        let offset = cursor.position();
        blocks.push(read(cursor)?);
        trace!(block, index, offset, "decoded block");
    }
    Ok(blocks)
}

fn read_seat_reservations(
    cursor: &mut Cursor<'_>,
) -> Result<Vec<SeatReservationBlock>, TypeError> {
    let mut seats = Vec::with_capacity(cursor.remaining() / SEAT_RESERVATION_WIDTH);
    while !cursor.is_empty() {
        if cursor.remaining() < SEAT_RESERVATION_WIDTH {
            return Err(TypeError::DanglingRecord {
                block: "seat reservation",
                remaining: cursor.remaining(),
                record_width: SEAT_RESERVATION_WIDTH,
            });
        }
        let offset = cursor.position();
        seats.push(SeatReservationBlock::read_from(cursor)?);
        trace!(block = "seat reservation", index = seats.len() - 1, offset, "decoded block");
    }
    Ok(seats)
}
