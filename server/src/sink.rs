use std::collections::VecDeque;

use propsync_shared::{Operation, OperationSink};

/// An operation sink that queues everything it is handed, preserving
/// production order, until the transport layer drains it.
pub struct BufferedSink {
    operations: VecDeque<Operation>,
}

impl BufferedSink {
    pub fn new() -> Self {
        Self {
            operations: VecDeque::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Take all queued operations, oldest first.
    pub fn drain(&mut self) -> Vec<Operation> {
        self.operations.drain(..).collect()
    }
}

impl Default for BufferedSink {
    fn default() -> Self {
        Self::new()
    }
}

impl OperationSink for BufferedSink {
    fn deliver(&mut self, operation: Operation) {
        self.operations.push_back(operation);
    }
}
