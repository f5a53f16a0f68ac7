mod error;
mod list;
mod map;
mod scalar;
mod strategy;

pub use error::PropertyError;
pub use list::ReplicatedListProperty;
pub use map::ReplicatedMapProperty;
pub use scalar::ReplicatedProperty;
pub use strategy::ValueStrategy;
