use ticket_types::Ticket;

use crate::config::ExportConfig;
use crate::error::ExportError;

/// Serialize `ticket` to JSON, or `None` if it is not a valid ticket.
///
/// Field names come straight from the data model and do not depend on the
/// envelope version. Tag codes are raw numbers, timestamps ISO-8601
/// without a zone, and byte runs lowercase hex.
///
/// # Errors
///
/// [`ExportError::Json`] if serialization fails.
pub fn to_json(ticket: &Ticket, config: &ExportConfig) -> Result<Option<String>, ExportError> {
    if !ticket.valid {
        return Ok(None);
    }
    let json = if config.pretty_json {
        serde_json::to_string_pretty(ticket)?
    } else {
        serde_json::to_string(ticket)?
    };
    Ok(Some(json))
}
