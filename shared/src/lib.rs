//! # Propsync Shared
//! Core primitives for per-observer replicated properties: a canonical value
//! per entity/property pair, sparse per-observer overrides, per-observer
//! muting, and change operations destined for a dispatch sink.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

mod directory;
mod operation;
mod property;
mod sink;
mod types;
mod wire;

pub use directory::ObserverDirectory;
pub use operation::{Operation, OperationPayload, TargetSet};
pub use property::{
    PropertyError, ReplicatedListProperty, ReplicatedMapProperty, ReplicatedProperty,
    ValueStrategy,
};
pub use sink::OperationSink;
pub use types::{EntityId, ObserverId, PropertyId};
pub use wire::{to_wire, WireValue};
