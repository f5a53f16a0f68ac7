use crate::operation::Operation;

/// Consumes operations produced by replicated properties.
///
/// Delivery is fire-and-forget from the core's point of view: the sink owns
/// all delivery guarantees, the core never blocks on it and never retries.
/// Operations arrive in the same order the mutations occurred.
pub trait OperationSink {
    fn deliver(&mut self, operation: Operation);
}
