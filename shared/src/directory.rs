use std::collections::BTreeSet;

use crate::types::ObserverId;

/// Answers "who are all the known observers".
///
/// Injected into canonical mutations so the core can compute which observers
/// a broadcast actually reaches once overridden and muted observers are
/// excluded. The core never reaches into ambient global state for this.
pub trait ObserverDirectory {
    /// All currently known observer ids.
    fn observer_ids(&self) -> BTreeSet<ObserverId>;

    /// All known observer ids matching the given filter.
    fn observer_ids_where(&self, filter: &dyn Fn(&ObserverId) -> bool) -> BTreeSet<ObserverId> {
        self.observer_ids()
            .into_iter()
            .filter(|id| filter(id))
            .collect()
    }
}
