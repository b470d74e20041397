use std::collections::VecDeque;

use crate::cap::CapId;

/// Deduplicating work queue of capability ids, iterated in insertion order.
#[derive(Debug, Default, Clone)]
pub struct PendingSet {
    items: VecDeque<CapId>,
    members: u64,
}

impl PendingSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` when `id` was already pending.
    pub fn insert(&mut self, id: CapId) -> bool {
        let bit = 1u64 << id.index();
        if self.members & bit != 0 {
            return false;
        }
        self.members |= bit;
        self.items.push_back(id);
        true
    }

    pub fn contains(&self, id: CapId) -> bool {
        self.members & (1u64 << id.index()) != 0
    }

    pub fn front(&self) -> Option<CapId> {
        self.items.front().copied()
    }

    pub fn pop_front(&mut self) -> Option<CapId> {
        let id = self.items.pop_front()?;
        self.members &= !(1u64 << id.index());
        Some(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = CapId> + '_ {
        self.items.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Drops everything inserted after the first `len` entries.
    pub fn truncate(&mut self, len: usize) {
        while self.items.len() > len {
            if let Some(id) = self.items.pop_back() {
                self.members &= !(1u64 << id.index());
            }
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.members = 0;
    }
}

// The membership word holds one bit per capability.
const _: () = assert!(CapId::COUNT <= 64);
