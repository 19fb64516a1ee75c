//! Stack snapshots.
//!
//! A snapshot is the contents of one tier at one point in a cycle, top first.
//! Each issue stage reads the snapshot produced by the previous stage and
//! produces a fresh one; only the persistent snapshot is ever mutated.

use std::ops::Index;

use crate::common::RegisterSlot;

/// Ordered contents of a stack tier, index 0 = top.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snapshot {
    slots: Vec<RegisterSlot>,
}

impl Snapshot {
    /// Creates a snapshot of `depth` empty slots (the reset state).
    pub fn zeroed(depth: usize) -> Self {
        Self {
            slots: vec![RegisterSlot::EMPTY; depth],
        }
    }

    /// Creates a snapshot from explicit slot contents, top first.
    pub const fn from_slots(slots: Vec<RegisterSlot>) -> Self {
        Self { slots }
    }

    /// Number of slots.
    #[inline]
    pub fn depth(&self) -> usize {
        self.slots.len()
    }

    /// Top-most slot, or [`RegisterSlot::EMPTY`] for an empty snapshot.
    #[inline]
    pub fn top(&self) -> RegisterSlot {
        self.get(0).unwrap_or_default()
    }

    /// Bottom-most slot, or [`RegisterSlot::EMPTY`] for an empty snapshot.
    #[inline]
    pub fn bottom(&self) -> RegisterSlot {
        self.slots.last().copied().unwrap_or_default()
    }

    /// Slot at `index`, if it exists.
    #[inline]
    pub fn get(&self, index: usize) -> Option<RegisterSlot> {
        self.slots.get(index).copied()
    }

    /// All slots, top first.
    pub fn slots(&self) -> &[RegisterSlot] {
        &self.slots
    }

    /// Number of slots still waiting on a writeback.
    pub fn pending(&self) -> usize {
        self.slots.iter().filter(|s| !s.is_resolved()).count()
    }
}

impl Index<usize> for Snapshot {
    type Output = RegisterSlot;

    fn index(&self, index: usize) -> &RegisterSlot {
        &self.slots[index]
    }
}

impl FromIterator<RegisterSlot> for Snapshot {
    fn from_iter<I: IntoIterator<Item = RegisterSlot>>(iter: I) -> Self {
        Self {
            slots: iter.into_iter().collect(),
        }
    }
}
