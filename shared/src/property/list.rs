use std::ops::{Deref, DerefMut};

use log::warn;
use serde::Serialize;

use crate::{
    directory::ObserverDirectory,
    operation::{Operation, OperationPayload, TargetSet},
    property::{error::PropertyError, scalar::ReplicatedProperty, strategy::ValueStrategy},
    types::{EntityId, ObserverId, PropertyId},
};

/// A replicated list with index-addressed delta operations.
///
/// Wraps a `ReplicatedProperty<Vec<T>>`: whole-value replacement, sync and
/// mute transitions go through the inner property (available via deref),
/// while `set_at`/`push`/`remove` produce fine-grained `ListSet`/`ListAdd`/
/// `ListRemove` operations through the same per-observer override and mute
/// machinery.
///
/// Out-of-range indices are tolerated as safe no-ops (`Ok(None)`), logged at
/// warn level.
pub struct ReplicatedListProperty<T> {
    inner: ReplicatedProperty<Vec<T>>,
    element: ValueStrategy<T>,
}

impl<T: Clone + PartialEq + Serialize + 'static> ReplicatedListProperty<T> {
    /// Create a list property with the standard element strategy.
    pub fn standard(entity: EntityId, property: PropertyId, initial: Vec<T>) -> Self {
        Self::new(entity, property, initial, ValueStrategy::standard())
    }
}

impl<T: 'static> ReplicatedListProperty<T> {
    pub fn new(
        entity: EntityId,
        property: PropertyId,
        initial: Vec<T>,
        element: ValueStrategy<T>,
    ) -> Self {
        let inner = ReplicatedProperty::new(entity, property, initial, element.for_list());
        Self { inner, element }
    }

    // Canonical list mutation

    /// Replace the element at `index` in the canonical list.
    pub fn set_at(
        &mut self,
        directory: &dyn ObserverDirectory,
        index: usize,
        value: T,
    ) -> Result<Option<Operation>, PropertyError> {
        let list = self.inner.value();
        if index >= list.len() {
            warn!(
                "set_at index {} out of range (len {}), ignoring",
                index,
                list.len()
            );
            return Ok(None);
        }
        if self.element.values_equal(&list[index], &value) {
            return Ok(None);
        }

        let wire = self.element.serialize(&value, None)?;
        self.inner.canonical_mut()[index] = value;
        self.inner.notify_changed();

        let targets = self.inner.broadcast_targets(directory);
        Ok(Some(
            self.inner
                .operation(targets, OperationPayload::ListSet { index, value: wire }),
        ))
    }

    /// Append to the canonical list.
    pub fn push(
        &mut self,
        directory: &dyn ObserverDirectory,
        value: T,
    ) -> Result<Option<Operation>, PropertyError> {
        let wire = self.element.serialize(&value, None)?;
        let list = self.inner.canonical_mut();
        list.push(value);
        let index = list.len() - 1;
        self.inner.notify_changed();

        let targets = self.inner.broadcast_targets(directory);
        Ok(Some(
            self.inner
                .operation(targets, OperationPayload::ListAdd { index, value: wire }),
        ))
    }

    /// Remove the first element equal to `value` (by the element equality)
    /// from the canonical list. `Ok(None)` if no element matches.
    pub fn remove(
        &mut self,
        directory: &dyn ObserverDirectory,
        value: &T,
    ) -> Result<Option<Operation>, PropertyError> {
        let Some(index) = self.position(self.inner.value(), value) else {
            return Ok(None);
        };
        self.remove_at(directory, index)
    }

    /// Remove the element at `index` from the canonical list.
    pub fn remove_at(
        &mut self,
        directory: &dyn ObserverDirectory,
        index: usize,
    ) -> Result<Option<Operation>, PropertyError> {
        if index >= self.inner.value().len() {
            warn!(
                "remove_at index {} out of range (len {}), ignoring",
                index,
                self.inner.value().len()
            );
            return Ok(None);
        }

        let wire = self.element.serialize(&self.inner.value()[index], None)?;
        self.inner.canonical_mut().remove(index);
        self.inner.notify_changed();

        let targets = self.inner.broadcast_targets(directory);
        Ok(Some(
            self.inner
                .operation(targets, OperationPayload::ListRemove { index, value: wire }),
        ))
    }

    // Observer-scoped list mutation. Each call lazily establishes the
    // observer's branch exactly as the scalar case does, then operates on
    // the branch; delivery is suppressed while the observer is muted.

    /// Replace the element at `index` in the given observer's list.
    pub fn set_at_for(
        &mut self,
        observer: ObserverId,
        index: usize,
        value: T,
    ) -> Result<Option<Operation>, PropertyError> {
        let branch = self.inner.override_mut(observer);
        if index >= branch.len() {
            warn!(
                "set_at_for index {} out of range (len {}), ignoring",
                index,
                branch.len()
            );
            return Ok(None);
        }
        if self.element.values_equal(&branch[index], &value) {
            return Ok(None);
        }

        let wire = self.element.serialize(&value, Some(observer))?;
        branch[index] = value;
        self.inner.notify_observer_changed(observer);

        if self.inner.is_muted(observer) {
            return Ok(None);
        }
        Ok(Some(self.inner.operation(
            TargetSet::only(observer),
            OperationPayload::ListSet { index, value: wire },
        )))
    }

    /// Append to the given observer's list.
    pub fn push_for(
        &mut self,
        observer: ObserverId,
        value: T,
    ) -> Result<Option<Operation>, PropertyError> {
        let wire = self.element.serialize(&value, Some(observer))?;
        let branch = self.inner.override_mut(observer);
        branch.push(value);
        let index = branch.len() - 1;
        self.inner.notify_observer_changed(observer);

        if self.inner.is_muted(observer) {
            return Ok(None);
        }
        Ok(Some(self.inner.operation(
            TargetSet::only(observer),
            OperationPayload::ListAdd { index, value: wire },
        )))
    }

    /// Remove the first element equal to `value` from the given observer's
    /// list. `Ok(None)` if no element matches.
    pub fn remove_for(
        &mut self,
        observer: ObserverId,
        value: &T,
    ) -> Result<Option<Operation>, PropertyError> {
        let Some(index) = self.position(self.inner.value_for(observer), value) else {
            return Ok(None);
        };
        self.remove_at_for(observer, index)
    }

    /// Remove the element at `index` from the given observer's list.
    pub fn remove_at_for(
        &mut self,
        observer: ObserverId,
        index: usize,
    ) -> Result<Option<Operation>, PropertyError> {
        let branch = self.inner.override_mut(observer);
        if index >= branch.len() {
            warn!(
                "remove_at_for index {} out of range (len {}), ignoring",
                index,
                branch.len()
            );
            return Ok(None);
        }

        let wire = self.element.serialize(&branch[index], Some(observer))?;
        branch.remove(index);
        self.inner.notify_observer_changed(observer);

        if self.inner.is_muted(observer) {
            return Ok(None);
        }
        Ok(Some(self.inner.operation(
            TargetSet::only(observer),
            OperationPayload::ListRemove { index, value: wire },
        )))
    }

    fn position(&self, list: &[T], value: &T) -> Option<usize> {
        list.iter()
            .position(|element| self.element.values_equal(element, value))
    }
}

impl<T> Deref for ReplicatedListProperty<T> {
    type Target = ReplicatedProperty<Vec<T>>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl<T> DerefMut for ReplicatedListProperty<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.inner
    }
}
