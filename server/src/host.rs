use std::net::SocketAddr;

use log::debug;

use propsync_shared::{ObserverId, Operation, OperationSink};

use crate::{error::RegistryError, observer::Observer, registry::ObserverRegistry, sink::BufferedSink};

/// Ties the observer registry and a dispatch sink together.
///
/// Properties themselves stay owned by the host application (one per logical
/// entity/property pair); the host hands their registry in on mutation and
/// forwards whatever operation comes back into the sink.
pub struct ReplicationHost<S: OperationSink = BufferedSink> {
    registry: ObserverRegistry,
    sink: S,
}

impl ReplicationHost<BufferedSink> {
    pub fn new() -> Self {
        Self::with_sink(BufferedSink::new())
    }
}

impl Default for ReplicationHost<BufferedSink> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: OperationSink> ReplicationHost<S> {
    pub fn with_sink(sink: S) -> Self {
        Self {
            registry: ObserverRegistry::new(),
            sink,
        }
    }

    /// Register a newly connected observer.
    pub fn connect_observer(&mut self) -> ObserverId {
        self.registry.register(Observer::new())
    }

    /// Register a newly connected observer with a known delivery address.
    pub fn connect_observer_at(&mut self, addr: &SocketAddr) -> ObserverId {
        let mut observer = Observer::new();
        observer.set_address(addr);
        self.registry.register(observer)
    }

    pub fn disconnect_observer(&mut self, id: ObserverId) -> Result<(), RegistryError> {
        self.registry.deregister(id)?;
        Ok(())
    }

    pub fn registry(&self) -> &ObserverRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut ObserverRegistry {
        &mut self.registry
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Hand a produced operation to the sink. Returns whether anything was
    /// delivered; `None` (a no-op mutation) is passed through silently so
    /// callers can feed mutation results in directly.
    pub fn dispatch(&mut self, operation: Option<Operation>) -> bool {
        let Some(operation) = operation else {
            return false;
        };
        debug!(
            "ReplicationHost: dispatching {:?} for entity {:?}",
            operation.property, operation.entity
        );
        self.sink.deliver(operation);
        true
    }
}
