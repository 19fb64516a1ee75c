//! Speculative stack register file.
//!
//! This module contains the two stack tiers and their composition:
//! 1. **Top Tier:** Full-crossbar region with multi-slot moves per issue stage.
//! 2. **Mid Tier:** Shift-only region with one NOP/POP/PUSH per issue stage.
//! 3. **Bridge:** Structural wiring of the two tiers into one elastic stack.
//! 4. **Writeback:** Tag-matched resolution of pending slots at commit.

/// Two-tier composition.
pub mod bridge;

/// Shift-only mid tier.
pub mod mid;

/// Stack snapshots.
pub mod snapshot;

/// Full-crossbar top tier.
pub mod top;

/// Shared tier interface.
pub mod traits;

/// Writeback bus.
pub mod writeback;

pub use bridge::{CycleInputs, CycleOutputs, IssueStage, Ssia, StageOutput};
pub use mid::{MidStack, MidStackCommand, MidStageOutput};
pub use snapshot::Snapshot;
pub use top::{SlotSource, Swizzle, TopStack, TopStageOutput};
pub use traits::{StackTier, StageInput, TierCycle};
pub use writeback::{Resolution, WritebackBus};
