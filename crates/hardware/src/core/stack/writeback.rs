//! Writeback bus and tag matching.
//!
//! The writeback bus carries `C` broadcasts that are presented to every slot of
//! every tier during the commit step of a cycle. It provides:
//! 1. **Broadcasts:** A fixed number of value/tag channels; tag 0 marks an idle channel.
//! 2. **Resolution:** Pending slots whose tag matches a broadcast take its value and resolve.
//! 3. **Conflict Detection:** Slots matched by more than one broadcast in a cycle are counted.

use tracing::warn;

use crate::common::{RegisterLayout, RegisterSlot};
use crate::core::stack::snapshot::Snapshot;

/// Broadcasts presented to both tiers during one commit step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WritebackBus {
    channels: Vec<RegisterSlot>,
}

/// Outcome of matching a snapshot against the writeback bus.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Resolution {
    /// Snapshot after writeback, ready to latch.
    pub snapshot: Snapshot,
    /// Slots that resolved this cycle.
    pub resolved: usize,
    /// Slots matched by more than one broadcast.
    pub conflicts: usize,
}

impl WritebackBus {
    /// Creates a bus of `count` idle channels.
    pub fn idle(count: usize) -> Self {
        Self {
            channels: vec![RegisterSlot::EMPTY; count],
        }
    }

    /// Creates a bus carrying the given broadcasts, in priority order (last wins).
    pub const fn from_slots(channels: Vec<RegisterSlot>) -> Self {
        Self { channels }
    }

    /// Number of channels.
    pub fn len(&self) -> usize {
        self.channels.len()
    }

    /// Returns `true` if the bus has no channels.
    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Drives channel `index`. Returns `false` if the channel does not exist.
    pub fn drive(&mut self, index: usize, broadcast: RegisterSlot) -> bool {
        match self.channels.get_mut(index) {
            Some(channel) => {
                *channel = broadcast;
                true
            }
            None => false,
        }
    }

    /// Broadcasts on the bus, in priority order.
    pub fn channels(&self) -> &[RegisterSlot] {
        &self.channels
    }

    /// Applies the bus to a single slot.
    ///
    /// Matching compares against the slot's tag before any broadcast is applied,
    /// and each match overrides the previous one, so the last matching channel wins.
    /// Returns the resulting slot and the number of channels that matched.
    pub fn apply(&self, slot: RegisterSlot, layout: RegisterLayout) -> (RegisterSlot, usize) {
        let mut result = slot;
        let mut matches = 0;
        if slot.is_resolved() {
            return (result, matches);
        }
        for broadcast in &self.channels {
            let broadcast = layout.fit(*broadcast);
            if broadcast.tag.is_pending() && broadcast.tag == slot.tag {
                result = RegisterSlot::resolved(broadcast.value);
                matches += 1;
            }
        }
        (result, matches)
    }

    /// Resolves every slot of `snapshot` against the bus.
    pub fn resolve(&self, snapshot: &Snapshot, layout: RegisterLayout) -> Resolution {
        let mut resolved = 0;
        let mut conflicts = 0;
        let snapshot = snapshot
            .slots()
            .iter()
            .enumerate()
            .map(|(depth, slot)| {
                let (next, matches) = self.apply(*slot, layout);
                if matches > 0 {
                    resolved += 1;
                }
                if matches > 1 {
                    conflicts += 1;
                    warn!(
                        depth,
                        tag = slot.tag.val(),
                        matches,
                        "multiple writebacks matched one slot; last channel wins"
                    );
                }
                next
            })
            .collect();
        Resolution {
            snapshot,
            resolved,
            conflicts,
        }
    }
}
