use serde::Serialize;

use crate::envelope::Envelope;
use crate::payload::Payload;

/// A decoded ticket: envelope, payload, and where it came from.
///
/// Only the decoder produces tickets with `valid == true`, and only after
/// every stage succeeded. `Ticket::default()` is the invalid placeholder
/// that exporters render as nothing.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Ticket {
  /// Source name assigned by the caller; the decoder never sets it.
  pub filename: Option<String>,
  pub envelope: Envelope,
  pub payload: Payload,
  pub valid: bool,
}

impl Ticket {
  /// Record the name of the source this ticket was read from.
  #[must_use]
  pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
    self.filename = Some(filename.into());
    self
  }
}
