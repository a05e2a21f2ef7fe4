//! Index allocation for instances that need a fresh identity.

use std::collections::BTreeSet;

use fleet_id::InstanceIndex;

/// Hands out the smallest indices not already taken.
///
/// Only indices held by instances that survive the pass are retained.
/// Indices of instances being destroyed are free again immediately.
#[derive(Debug, Clone, Default)]
pub struct IndexAllocator {
    taken: BTreeSet<InstanceIndex>,

    /// Every index below this one is taken.
    floor: u32,
}

impl IndexAllocator {
    /// Create an allocator with the given indices already retained.
    pub fn new<I>(retained: I) -> Self
    where
        I: IntoIterator<Item = InstanceIndex>,
    {
        Self {
            taken: retained.into_iter().collect(),
            floor: 0,
        }
    }

    /// Returns true if the index is retained or already handed out.
    pub fn is_taken(&self, index: InstanceIndex) -> bool {
        self.taken.contains(&index)
    }

    /// Reserve a specific index.
    ///
    /// Returns false if the index was already taken.
    pub fn reserve(&mut self, index: InstanceIndex) -> bool {
        self.taken.insert(index)
    }

    /// Take the smallest free index.
    pub fn next_free(&mut self) -> InstanceIndex {
        let mut candidate = InstanceIndex::new(self.floor);
        while self.taken.contains(&candidate) {
            candidate = candidate.next();
        }
        self.taken.insert(candidate);
        self.floor = candidate.value();
        candidate
    }

    /// Take the `count` smallest free indices, in ascending order.
    pub fn allocate(&mut self, count: usize) -> Vec<InstanceIndex> {
        (0..count).map(|_| self.next_free()).collect()
    }
}
