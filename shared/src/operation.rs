use std::collections::BTreeSet;

use serde::Serialize;

use crate::{
    types::{EntityId, ObserverId, PropertyId},
    wire::WireValue,
};

// TargetSet

/// The observers an operation should be delivered to.
///
/// `All` is produced when a canonical change has no overridden or muted
/// observers to exclude, so the sink can broadcast without enumerating
/// connections.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum TargetSet {
    All,
    Only(BTreeSet<ObserverId>),
}

impl TargetSet {
    pub fn only(observer: ObserverId) -> Self {
        let mut set = BTreeSet::new();
        set.insert(observer);
        TargetSet::Only(set)
    }

    pub fn contains(&self, observer: &ObserverId) -> bool {
        match self {
            TargetSet::All => true,
            TargetSet::Only(set) => set.contains(observer),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            TargetSet::All => false,
            TargetSet::Only(set) => set.is_empty(),
        }
    }
}

// OperationPayload

/// The change an operation carries. Collection properties emit fine-grained
/// deltas rather than whole-collection replacements to keep wire payloads
/// small.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum OperationPayload {
    /// Full value replacement (scalar and whole-collection cases).
    Set(WireValue),
    ListAdd { index: usize, value: WireValue },
    ListSet { index: usize, value: WireValue },
    ListRemove { index: usize, value: WireValue },
    MapAdd { key: WireValue, value: WireValue },
    MapSet { key: WireValue, value: WireValue },
    MapRemove { key: WireValue, value: WireValue },
}

// Operation

/// A change record produced by a property mutation, destined for a dispatch
/// sink and a target observer set.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Operation {
    pub entity: EntityId,
    pub property: PropertyId,
    pub targets: TargetSet,
    pub payload: OperationPayload,
}
