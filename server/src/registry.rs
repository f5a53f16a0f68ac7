use std::collections::{BTreeSet, HashMap};

use log::info;

use propsync_shared::{ObserverDirectory, ObserverId};

use crate::{error::RegistryError, key_generator::KeyGenerator, observer::Observer};

/// Owns the set of known observers and allocates their ids.
///
/// This is the concrete `ObserverDirectory` the replication core consults
/// when computing broadcast target sets.
pub struct ObserverRegistry {
    observers: HashMap<ObserverId, Observer>,
    key_generator: KeyGenerator,
}

impl ObserverRegistry {
    pub fn new() -> Self {
        Self {
            observers: HashMap::new(),
            key_generator: KeyGenerator::new(),
        }
    }

    /// Register a new observer, returning its freshly allocated id.
    pub fn register(&mut self, observer: Observer) -> ObserverId {
        let id = self.key_generator.generate();
        info!("ObserverRegistry: registering observer {:?}", id);
        self.observers.insert(id, observer);
        id
    }

    /// Remove an observer, releasing its id for reuse.
    pub fn deregister(&mut self, id: ObserverId) -> Result<Observer, RegistryError> {
        let Some(observer) = self.observers.remove(&id) else {
            return Err(RegistryError::UnknownObserver { observer: id });
        };
        info!("ObserverRegistry: deregistering observer {:?}", id);
        self.key_generator.recycle(id);
        Ok(observer)
    }

    pub fn has_observer(&self, id: &ObserverId) -> bool {
        self.observers.contains_key(id)
    }

    pub fn observer(&self, id: &ObserverId) -> Option<&Observer> {
        self.observers.get(id)
    }

    pub fn observer_mut(&mut self, id: &ObserverId) -> Option<&mut Observer> {
        self.observers.get_mut(id)
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }
}

impl Default for ObserverRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ObserverDirectory for ObserverRegistry {
    fn observer_ids(&self) -> BTreeSet<ObserverId> {
        self.observers.keys().copied().collect()
    }
}
