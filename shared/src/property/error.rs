use thiserror::Error;

/// Errors that can occur during replicated property operations.
///
/// "Nothing to deliver" conditions (no-op writes, unknown observers, absent
/// keys, out-of-range indices) are not errors: mutators return `Ok(None)`
/// for those.
#[derive(Debug, Error)]
pub enum PropertyError {
    /// A value could not be converted to its wire representation.
    #[error("failed to encode replicated value for the wire: {0}")]
    Encode(#[from] serde_json::Error),
}
