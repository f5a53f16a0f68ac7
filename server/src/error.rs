use thiserror::Error;

use propsync_shared::ObserverId;

/// Errors raised by the observer registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// The given observer id is not (or no longer) registered.
    #[error("observer {observer:?} is not registered")]
    UnknownObserver { observer: ObserverId },
}
