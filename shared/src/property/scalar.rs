use std::collections::{BTreeSet, HashMap};

use serde::Serialize;

use crate::{
    directory::ObserverDirectory,
    operation::{Operation, OperationPayload, TargetSet},
    property::{error::PropertyError, strategy::ValueStrategy},
    types::{EntityId, ObserverId, PropertyId},
};

type ChangedFn<T> = Box<dyn FnMut(&T)>;
type ObserverChangedFn<T> = Box<dyn FnMut(ObserverId, &T)>;

/// A single logical property value replicated to multiple observers, with
/// per-observer divergence.
///
/// Holds one canonical value plus a sparse map of per-observer overrides and
/// a set of muted observers. An observer absent from the override map sees
/// the canonical value; a muted observer keeps its state but receives no
/// update operations.
///
/// Every mutator returns `Ok(Some(Operation))` when there is something for
/// the dispatch sink to deliver, `Ok(None)` when the mutation was a no-op or
/// delivery is suppressed. Mutation methods are ordinary synchronous calls
/// with no internal locking: callers on a multi-threaded host must serialize
/// access externally.
pub struct ReplicatedProperty<T> {
    entity: EntityId,
    property: PropertyId,
    canonical: T,
    overrides: HashMap<ObserverId, T>,
    muted: BTreeSet<ObserverId>,
    strategy: ValueStrategy<T>,
    on_changed: Option<ChangedFn<T>>,
    on_observer_changed: Option<ObserverChangedFn<T>>,
}

impl<T: Clone + PartialEq + Serialize + 'static> ReplicatedProperty<T> {
    /// Create a property with the standard strategy (native equality, serde
    /// wire conversion, `clone` snapshots).
    pub fn standard(entity: EntityId, property: PropertyId, initial: T) -> Self {
        Self::new(entity, property, initial, ValueStrategy::standard())
    }
}

impl<T> ReplicatedProperty<T> {
    pub fn new(
        entity: EntityId,
        property: PropertyId,
        initial: T,
        strategy: ValueStrategy<T>,
    ) -> Self {
        Self {
            entity,
            property,
            canonical: initial,
            overrides: HashMap::new(),
            muted: BTreeSet::new(),
            strategy,
            on_changed: None,
            on_observer_changed: None,
        }
    }

    pub fn entity(&self) -> EntityId {
        self.entity
    }

    pub fn property_id(&self) -> PropertyId {
        self.property
    }

    /// The canonical value, authoritative for every non-overridden observer.
    pub fn value(&self) -> &T {
        &self.canonical
    }

    /// The value effective for the given observer: its override if present,
    /// else canonical. Unknown observers are treated permissively as
    /// canonical.
    pub fn value_for(&self, observer: ObserverId) -> &T {
        self.overrides.get(&observer).unwrap_or(&self.canonical)
    }

    /// True if any observer currently holds a private override.
    pub fn is_asynchronous(&self) -> bool {
        !self.overrides.is_empty()
    }

    /// True if any observer is currently muted.
    pub fn is_partially_muted(&self) -> bool {
        !self.muted.is_empty()
    }

    pub fn is_muted(&self, observer: ObserverId) -> bool {
        self.muted.contains(&observer)
    }

    pub fn has_override(&self, observer: ObserverId) -> bool {
        self.overrides.contains_key(&observer)
    }

    /// Register a callback invoked after every canonical value change.
    pub fn on_changed(&mut self, callback: impl FnMut(&T) + 'static) {
        self.on_changed = Some(Box::new(callback));
    }

    /// Register a callback invoked after every per-observer value change.
    pub fn on_observer_changed(&mut self, callback: impl FnMut(ObserverId, &T) + 'static) {
        self.on_observer_changed = Some(Box::new(callback));
    }

    // Canonical mutation

    /// Update the canonical value.
    ///
    /// Returns `Ok(None)` if the new value equals the current canonical
    /// value (by the configured equality) and `force` is false. Otherwise
    /// updates the value, fires the change callback, and produces an
    /// operation targeting every known observer for which the canonical
    /// value is authoritative: overridden and muted observers are excluded,
    /// and when there is nothing to exclude the target is `All` without
    /// consulting the directory.
    pub fn set(
        &mut self,
        directory: &dyn ObserverDirectory,
        value: T,
        force: bool,
    ) -> Result<Option<Operation>, PropertyError> {
        if !force && self.strategy.values_equal(&self.canonical, &value) {
            return Ok(None);
        }

        // Serialize before touching state: an encode failure must leave the
        // value and callbacks untouched.
        let wire = self.strategy.serialize(&value, None)?;
        self.canonical = value;
        self.notify_changed();

        let targets = self.broadcast_targets(directory);
        Ok(Some(self.operation(targets, OperationPayload::Set(wire))))
    }

    /// Update the value effective for one observer.
    ///
    /// If the observer had no prior override, one is established first as a
    /// snapshot copy of the canonical value, even when the write then turns
    /// out to be a no-op. Returns `Ok(None)` if the new value equals the
    /// observer's effective prior value and `force` is false, and likewise
    /// (after updating internal state) while the observer is muted, unless
    /// forced.
    pub fn set_for(
        &mut self,
        observer: ObserverId,
        value: T,
        force: bool,
    ) -> Result<Option<Operation>, PropertyError> {
        self.establish_override(observer);

        let unchanged = self
            .overrides
            .get(&observer)
            .map(|prior| self.strategy.values_equal(prior, &value))
            .unwrap_or(false);
        if !force && unchanged {
            return Ok(None);
        }

        let suppressed = self.muted.contains(&observer) && !force;
        let wire = if suppressed {
            None
        } else {
            Some(self.strategy.serialize(&value, Some(observer))?)
        };

        self.overrides.insert(observer, value);
        self.notify_observer_changed(observer);

        let Some(wire) = wire else {
            return Ok(None);
        };
        Ok(Some(self.operation(
            TargetSet::only(observer),
            OperationPayload::Set(wire),
        )))
    }

    // Sync / DeSync transitions

    /// Resynchronize every observer to the canonical value, clearing all
    /// overrides and mutes. If any observer was diverged or muted, produces
    /// a canonical operation targeting all observers so they explicitly snap
    /// back; otherwise `Ok(None)`.
    pub fn sync_all(&mut self) -> Result<Option<Operation>, PropertyError> {
        if self.overrides.is_empty() && self.muted.is_empty() {
            return Ok(None);
        }

        let wire = self.strategy.serialize(&self.canonical, None)?;
        self.overrides.clear();
        self.muted.clear();

        Ok(Some(self.operation(TargetSet::All, OperationPayload::Set(wire))))
    }

    /// Transition one observer between the synchronized and branched states.
    ///
    /// `is_sync == false` establishes a private override initialized to a
    /// snapshot copy of the canonical value (no operation to deliver).
    /// `is_sync == true` removes the observer's override; if the dropped
    /// override differed from canonical and the observer is not muted, the
    /// returned operation tells that one observer to adopt the canonical
    /// value.
    pub fn sync(
        &mut self,
        observer: ObserverId,
        is_sync: bool,
    ) -> Result<Option<Operation>, PropertyError> {
        if !is_sync {
            self.establish_override(observer);
            return Ok(None);
        }

        let Some(prior) = self.overrides.get(&observer) else {
            return Ok(None);
        };
        if self.strategy.values_equal(prior, &self.canonical) || self.muted.contains(&observer) {
            self.overrides.remove(&observer);
            return Ok(None);
        }

        let wire = self.strategy.serialize(&self.canonical, Some(observer))?;
        self.overrides.remove(&observer);
        Ok(Some(self.operation(
            TargetSet::only(observer),
            OperationPayload::Set(wire),
        )))
    }

    /// Transition one observer between the notified and muted states.
    ///
    /// `is_notifying == false` mutes the observer: its override state is
    /// untouched but it stops receiving update operations. `is_notifying ==
    /// true` unmutes; if the observer was muted, the returned operation
    /// re-delivers its current effective value to catch it up.
    pub fn desync(
        &mut self,
        observer: ObserverId,
        is_notifying: bool,
    ) -> Result<Option<Operation>, PropertyError> {
        if !is_notifying {
            self.muted.insert(observer);
            return Ok(None);
        }

        if !self.muted.contains(&observer) {
            return Ok(None);
        }

        let effective = self.overrides.get(&observer).unwrap_or(&self.canonical);
        let wire = self.strategy.serialize(effective, Some(observer))?;
        self.muted.remove(&observer);
        Ok(Some(self.operation(
            TargetSet::only(observer),
            OperationPayload::Set(wire),
        )))
    }

    // Internals shared with the list/map specializations

    pub(crate) fn strategy(&self) -> &ValueStrategy<T> {
        &self.strategy
    }

    pub(crate) fn canonical_mut(&mut self) -> &mut T {
        &mut self.canonical
    }

    /// Lazily create the observer's branch as a snapshot copy of canonical,
    /// then return it for mutation.
    pub(crate) fn override_mut(&mut self, observer: ObserverId) -> &mut T {
        self.overrides
            .entry(observer)
            .or_insert_with(|| self.strategy.duplicate(&self.canonical))
    }

    pub(crate) fn notify_changed(&mut self) {
        if let Some(callback) = &mut self.on_changed {
            callback(&self.canonical);
        }
    }

    pub(crate) fn notify_observer_changed(&mut self, observer: ObserverId) {
        if let Some(callback) = &mut self.on_observer_changed {
            if let Some(value) = self.overrides.get(&observer) {
                callback(observer, value);
            }
        }
    }

    /// Every known observer for which the canonical value is authoritative.
    /// The directory is only consulted when there are exclusions.
    pub(crate) fn broadcast_targets(&self, directory: &dyn ObserverDirectory) -> TargetSet {
        if self.overrides.is_empty() && self.muted.is_empty() {
            return TargetSet::All;
        }
        let targets = directory.observer_ids_where(&|id| {
            !self.overrides.contains_key(id) && !self.muted.contains(id)
        });
        TargetSet::Only(targets)
    }

    pub(crate) fn operation(&self, targets: TargetSet, payload: OperationPayload) -> Operation {
        Operation {
            entity: self.entity,
            property: self.property,
            targets,
            payload,
        }
    }

    fn establish_override(&mut self, observer: ObserverId) {
        if !self.overrides.contains_key(&observer) {
            let snapshot = self.strategy.duplicate(&self.canonical);
            self.overrides.insert(observer, snapshot);
        }
    }
}
