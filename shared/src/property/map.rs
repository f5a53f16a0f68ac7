use std::{
    collections::HashMap,
    hash::Hash,
    ops::{Deref, DerefMut},
};

use serde::Serialize;

use crate::{
    directory::ObserverDirectory,
    operation::{Operation, OperationPayload, TargetSet},
    property::{error::PropertyError, scalar::ReplicatedProperty, strategy::ValueStrategy},
    types::{EntityId, ObserverId, PropertyId},
    wire::{to_wire, WireValue},
};

/// A replicated map with key-addressed delta operations.
///
/// Wraps a `ReplicatedProperty<HashMap<K, V>>`: whole-value replacement uses
/// the derived order-insensitive map equality, while `insert`/`set_key`/
/// `remove` produce `MapAdd`/`MapSet`/`MapRemove` operations through the
/// same per-observer override and mute machinery. The element strategy
/// applies to values only; keys use native map equality and plain serde on
/// the wire.
///
/// A duplicate `insert` overwrites the existing entry; `remove` of an absent
/// key is a safe no-op.
pub struct ReplicatedMapProperty<K, V> {
    inner: ReplicatedProperty<HashMap<K, V>>,
    element: ValueStrategy<V>,
}

impl<K, V> ReplicatedMapProperty<K, V>
where
    K: Eq + Hash + Clone + Serialize + 'static,
    V: Clone + PartialEq + Serialize + 'static,
{
    /// Create a map property with the standard value strategy.
    pub fn standard(entity: EntityId, property: PropertyId, initial: HashMap<K, V>) -> Self {
        Self::new(entity, property, initial, ValueStrategy::standard())
    }
}

impl<K, V> ReplicatedMapProperty<K, V>
where
    K: Eq + Hash + Clone + Serialize + 'static,
    V: 'static,
{
    pub fn new(
        entity: EntityId,
        property: PropertyId,
        initial: HashMap<K, V>,
        element: ValueStrategy<V>,
    ) -> Self {
        let inner = ReplicatedProperty::new(entity, property, initial, element.for_map::<K>());
        Self { inner, element }
    }

    // Canonical map mutation

    /// Insert into the canonical map. A duplicate key overwrites the
    /// existing entry; `Ok(None)` only when the existing value already
    /// compares equal.
    pub fn insert(
        &mut self,
        directory: &dyn ObserverDirectory,
        key: K,
        value: V,
    ) -> Result<Option<Operation>, PropertyError> {
        self.write_canonical(directory, key, value, MapWrite::Add)
    }

    /// Set the value under `key` in the canonical map, inserting if absent.
    pub fn set_key(
        &mut self,
        directory: &dyn ObserverDirectory,
        key: K,
        value: V,
    ) -> Result<Option<Operation>, PropertyError> {
        self.write_canonical(directory, key, value, MapWrite::Set)
    }

    /// Remove `key` from the canonical map. `Ok(None)` if the key is
    /// absent.
    pub fn remove(
        &mut self,
        directory: &dyn ObserverDirectory,
        key: &K,
    ) -> Result<Option<Operation>, PropertyError> {
        let Some(existing) = self.inner.value().get(key) else {
            return Ok(None);
        };
        let payload = OperationPayload::MapRemove {
            key: to_wire(key)?,
            value: self.element.serialize(existing, None)?,
        };
        self.inner.canonical_mut().remove(key);
        self.inner.notify_changed();

        let targets = self.inner.broadcast_targets(directory);
        Ok(Some(self.inner.operation(targets, payload)))
    }

    // Observer-scoped map mutation. Each call lazily establishes the
    // observer's branch exactly as the scalar case does, then operates on
    // the branch; delivery is suppressed while the observer is muted.

    /// Insert into the given observer's map.
    pub fn insert_for(
        &mut self,
        observer: ObserverId,
        key: K,
        value: V,
    ) -> Result<Option<Operation>, PropertyError> {
        self.write_branch(observer, key, value, MapWrite::Add)
    }

    /// Set the value under `key` in the given observer's map, inserting if
    /// absent.
    pub fn set_key_for(
        &mut self,
        observer: ObserverId,
        key: K,
        value: V,
    ) -> Result<Option<Operation>, PropertyError> {
        self.write_branch(observer, key, value, MapWrite::Set)
    }

    /// Remove `key` from the given observer's map. `Ok(None)` if the key is
    /// absent.
    pub fn remove_for(
        &mut self,
        observer: ObserverId,
        key: &K,
    ) -> Result<Option<Operation>, PropertyError> {
        let branch = self.inner.override_mut(observer);
        let Some(existing) = branch.get(key) else {
            return Ok(None);
        };
        let payload = OperationPayload::MapRemove {
            key: to_wire(key)?,
            value: self.element.serialize(existing, Some(observer))?,
        };
        self.inner.override_mut(observer).remove(key);
        self.inner.notify_observer_changed(observer);

        if self.inner.is_muted(observer) {
            return Ok(None);
        }
        Ok(Some(self.inner.operation(TargetSet::only(observer), payload)))
    }

    fn write_canonical(
        &mut self,
        directory: &dyn ObserverDirectory,
        key: K,
        value: V,
        kind: MapWrite,
    ) -> Result<Option<Operation>, PropertyError> {
        let unchanged = self
            .inner
            .value()
            .get(&key)
            .is_some_and(|existing| self.element.values_equal(existing, &value));
        if unchanged {
            return Ok(None);
        }

        let payload = kind.payload(to_wire(&key)?, self.element.serialize(&value, None)?);
        self.inner.canonical_mut().insert(key, value);
        self.inner.notify_changed();

        let targets = self.inner.broadcast_targets(directory);
        Ok(Some(self.inner.operation(targets, payload)))
    }

    fn write_branch(
        &mut self,
        observer: ObserverId,
        key: K,
        value: V,
        kind: MapWrite,
    ) -> Result<Option<Operation>, PropertyError> {
        let branch = self.inner.override_mut(observer);
        let unchanged = branch
            .get(&key)
            .is_some_and(|existing| self.element.values_equal(existing, &value));
        if unchanged {
            return Ok(None);
        }

        let payload = kind.payload(to_wire(&key)?, self.element.serialize(&value, Some(observer))?);
        self.inner.override_mut(observer).insert(key, value);
        self.inner.notify_observer_changed(observer);

        if self.inner.is_muted(observer) {
            return Ok(None);
        }
        Ok(Some(self.inner.operation(TargetSet::only(observer), payload)))
    }
}

/// Whether a keyed write travels as a `MapAdd` or a `MapSet`.
#[derive(Clone, Copy)]
enum MapWrite {
    Add,
    Set,
}

impl MapWrite {
    fn payload(self, key: WireValue, value: WireValue) -> OperationPayload {
        match self {
            MapWrite::Add => OperationPayload::MapAdd { key, value },
            MapWrite::Set => OperationPayload::MapSet { key, value },
        }
    }
}

impl<K, V> Deref for ReplicatedMapProperty<K, V> {
    type Target = ReplicatedProperty<HashMap<K, V>>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl<K, V> DerefMut for ReplicatedMapProperty<K, V> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.inner
    }
}
