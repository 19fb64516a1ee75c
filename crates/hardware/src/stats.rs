//! Stack statistics collection and reporting.
//!
//! This module tracks how the composed stack is exercised. It provides:
//! 1. **Cycles:** Total clock cycles advanced.
//! 2. **Movement:** Mid-tier pushes and pops, the traffic crossing the tier boundary.
//! 3. **Writeback:** Slots resolved and multi-match conflicts on the writeback bus.
//! 4. **Occupancy:** Pending (unresolved) slots latched per tier, and the peak.

use std::fmt;

use crate::core::stack::mid::MidStackCommand;

/// Statistics accumulated by [`crate::Ssia`] across cycles.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StackStats {
    /// Clock cycles advanced.
    pub cycles: u64,
    /// Mid-tier stages that pushed (spills from the top tier).
    pub mid_pushes: u64,
    /// Mid-tier stages that popped (refills toward the top tier).
    pub mid_pops: u64,
    /// Slots resolved by writeback, both tiers.
    pub writebacks_resolved: u64,
    /// Slots matched by more than one writeback in the same cycle.
    pub writeback_conflicts: u64,
    /// Pending slots in the top tier after the last latch.
    pub pending_top: usize,
    /// Pending slots in the mid tier after the last latch.
    pub pending_mid: usize,
    /// Largest total of pending slots ever latched.
    pub peak_pending: usize,
}

impl StackStats {
    /// Accounts for one mid-tier command.
    pub(crate) fn record_command(&mut self, command: MidStackCommand) {
        match command {
            MidStackCommand::Nop => {}
            MidStackCommand::Pop => self.mid_pops += 1,
            MidStackCommand::Push => self.mid_pushes += 1,
        }
    }

    /// Accounts for one latched cycle.
    pub(crate) fn record_commit(
        &mut self,
        resolved: usize,
        conflicts: usize,
        pending_top: usize,
        pending_mid: usize,
    ) {
        self.cycles += 1;
        self.writebacks_resolved += resolved as u64;
        self.writeback_conflicts += conflicts as u64;
        self.pending_top = pending_top;
        self.pending_mid = pending_mid;
        self.peak_pending = self.peak_pending.max(pending_top + pending_mid);
    }
}

impl fmt::Display for StackStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "==========================================================")?;
        writeln!(f, "STACK STATISTICS")?;
        writeln!(f, "==========================================================")?;
        writeln!(f, "sim_cycles               {}", self.cycles)?;
        writeln!(f, "mid.pushes               {}", self.mid_pushes)?;
        writeln!(f, "mid.pops                 {}", self.mid_pops)?;
        writeln!(f, "writeback.resolved       {}", self.writebacks_resolved)?;
        writeln!(f, "writeback.conflicts      {}", self.writeback_conflicts)?;
        writeln!(f, "pending.top              {}", self.pending_top)?;
        writeln!(f, "pending.mid              {}", self.pending_mid)?;
        write!(f, "pending.peak             {}", self.peak_pending)
    }
}
