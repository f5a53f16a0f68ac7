use serde::Serialize;

use crate::property::PropertyError;

/// Wire representation of a replicated value.
///
/// The core has no wire format of its own; values are handed to the dispatch
/// sink as structured JSON values and the transport layer decides how they
/// travel.
pub type WireValue = serde_json::Value;

/// Default value-to-wire conversion, used by `ValueStrategy::standard`.
pub fn to_wire<T: Serialize>(value: &T) -> Result<WireValue, PropertyError> {
    Ok(serde_json::to_value(value)?)
}
