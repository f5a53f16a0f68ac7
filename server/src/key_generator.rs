use std::collections::VecDeque;

use propsync_shared::ObserverId;

/// Allocates observer ids sequentially, recycling ids that have been
/// released so long-running hosts do not exhaust the id space.
pub struct KeyGenerator {
    recycled: VecDeque<ObserverId>,
    next: u64,
}

impl KeyGenerator {
    pub fn new() -> Self {
        Self {
            recycled: VecDeque::new(),
            next: 0,
        }
    }

    pub fn generate(&mut self) -> ObserverId {
        if let Some(recycled) = self.recycled.pop_front() {
            return recycled;
        }
        let id = ObserverId::from_u64(self.next);
        self.next += 1;
        id
    }

    pub fn recycle(&mut self, id: ObserverId) {
        self.recycled.push_back(id);
    }
}

impl Default for KeyGenerator {
    fn default() -> Self {
        Self::new()
    }
}
