use ticket_types::layout::LAST_LEGACY_VERSION;
use ticket_types::{Envelope, Payload, RicsId, Ticket};
use tracing::warn;

/// Combine a decoded envelope and payload into a valid [`Ticket`].
///
/// From version 5 on the envelope's identifiers are authoritative: the
/// header's `ticket_id` is replaced by the envelope's, and `rics_id` by the
/// numeric value of the envelope's `rics_code`. A RICS code that is not a
/// 16-bit number becomes [`RicsId::Unresolved`]. Older versions keep the
/// header's values.
pub fn assemble(envelope: Envelope, mut payload: Payload) -> Ticket {
    if envelope.version > LAST_LEGACY_VERSION {
        payload.header.ticket_id.clone_from(&envelope.ticket_id);
        payload.header.rics_id = RicsId::parse(&envelope.rics_code);
        if let RicsId::Unresolved(raw) = &payload.header.rics_id {
            warn!(
                rics_code = %raw,
                ticket_id = %envelope.ticket_id,
                "envelope RICS code is not a 16-bit number, leaving it unresolved"
            );
        }
    }

    Ticket {
        filename: None,
        envelope,
        payload,
        valid: true,
    }
}
