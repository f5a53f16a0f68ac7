use serde::{Deserialize, Serialize};

// EntityId

/// Identifies the entity owning a replicated property. Opaque: allocation is
/// the business of an external registry.
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Debug, Serialize, Deserialize)]
pub struct EntityId(u64);

impl EntityId {
    pub fn from_u64(value: u64) -> Self {
        EntityId(value)
    }

    pub fn to_u64(&self) -> u64 {
        self.0
    }
}

// PropertyId

/// Distinguishes properties within a single entity.
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Debug, Serialize, Deserialize)]
pub struct PropertyId(u32);

impl PropertyId {
    pub fn from_u32(value: u32) -> Self {
        PropertyId(value)
    }

    pub fn to_u32(&self) -> u32 {
        self.0
    }
}

// ObserverId

/// A remote subscriber that may receive a distinct value for a replicated
/// property. `Ord` so that target sets have a deterministic order.
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Debug, Serialize, Deserialize)]
pub struct ObserverId(u64);

impl ObserverId {
    pub fn from_u64(value: u64) -> Self {
        ObserverId(value)
    }

    pub fn to_u64(&self) -> u64 {
        self.0
    }
}
