/// Errors that can occur while projecting a ticket.
///
/// CSV rendering is infallible; only JSON serialization can fail.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}
