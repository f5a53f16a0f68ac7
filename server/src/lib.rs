//! # Propsync Server
//! Host-side glue around the replication core: an observer registry that
//! answers "who are all the observers", key allocation, buffered operation
//! sinks, and a thin host facade tying them together.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

pub mod shared {
    pub use propsync_shared::{
        to_wire, EntityId, ObserverDirectory, ObserverId, Operation, OperationPayload,
        OperationSink, PropertyError, PropertyId, ReplicatedListProperty, ReplicatedMapProperty,
        ReplicatedProperty, TargetSet, ValueStrategy, WireValue,
    };
}

mod error;
mod host;
mod key_generator;
mod observer;
mod registry;
mod sink;

pub use error::RegistryError;
pub use host::ReplicationHost;
pub use key_generator::KeyGenerator;
pub use observer::Observer;
pub use registry::ObserverRegistry;
pub use sink::BufferedSink;
