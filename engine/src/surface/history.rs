//! Undo history for deleted decals

use std::collections::VecDeque;

use super::decal::Decal;

/// Default number of deletions remembered
pub const DEFAULT_HISTORY_CAPACITY: usize = 32;

/// A decal removed from a surface, with the index it occupied
#[derive(Clone, Debug, PartialEq)]
pub struct RemovedDecal {
    pub index: usize,
    pub decal: Decal,
}

/// Bounded LIFO of deleted decals
///
/// When full, pushing drops the oldest entry.
#[derive(Clone, Debug)]
pub struct DecalHistory {
    entries: VecDeque<RemovedDecal>,
    capacity: usize,
}

impl Default for DecalHistory {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }
}

impl DecalHistory {
    /// A zero capacity history remembers nothing
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity.min(DEFAULT_HISTORY_CAPACITY)),
            capacity,
        }
    }

    pub fn push(&mut self, removed: RemovedDecal) {
        if self.capacity == 0 {
            return;
        }
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(removed);
    }

    pub fn pop(&mut self) -> Option<RemovedDecal> {
        self.entries.pop_back()
    }

    pub fn peek(&self) -> Option<&RemovedDecal> {
        self.entries.back()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
