//! Two-tier stack composition.
//!
//! The bridge wires the top tier and the mid tier into one elastic stack. For
//! every issue stage `s`:
//! 1. **Spill:** the top tier's bottom slot entering stage `s` is the mid tier's push value.
//! 2. **Refill:** the mid tier's top slot entering stage `s` is the top tier's pull-up value.
//! 3. **Writeback:** every broadcast is presented to both tiers identically at commit.
//!
//! The bridge adds no state of its own besides statistics. Both tiers are
//! stepped in lockstep, stage by stage, and latched together at the end of the
//! cycle.

use serde::Serialize;
use tracing::{debug, trace};

use crate::common::{ConfigError, RegisterSlot};
use crate::config::StackConfig;
use crate::core::stack::mid::{MidStack, MidStackCommand};
use crate::core::stack::snapshot::Snapshot;
use crate::core::stack::top::{Swizzle, TopStack};
use crate::core::stack::traits::StackTier;
use crate::core::stack::writeback::WritebackBus;
use crate::stats::StackStats;

/// Commands and values for one issue stage of the composed stack.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IssueStage {
    /// Value offered for injection at the top of the top tier.
    pub push: RegisterSlot,
    /// Value pulled up from below the mid tier.
    pub pull_up: RegisterSlot,
    /// Crossbar command for the top tier.
    pub swizzle: Swizzle,
    /// Shift command for the mid tier.
    pub command: MidStackCommand,
}

/// Everything the composed stack consumes in one cycle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CycleInputs {
    /// One entry per issue stage, in issue order.
    pub stages: Vec<IssueStage>,
    /// Broadcasts applied to both tiers at commit.
    pub writeback: WritebackBus,
}

/// Values exposed by the composed stack at one issue stage.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct StageOutput {
    /// The two top-most slots of the top tier.
    pub top_peek: [RegisterSlot; 2],
    /// Bottom slot of the top tier.
    pub top_bottom: RegisterSlot,
    /// Top slot of the mid tier.
    pub mid_peek: RegisterSlot,
    /// Bottom slot of the mid tier, which the next tier down must accept.
    pub mid_bottom: RegisterSlot,
}

/// Everything the composed stack exposes for one cycle.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CycleOutputs {
    /// One entry per issue stage.
    pub stages: Vec<StageOutput>,
    /// Slots resolved by writeback across both tiers.
    pub resolved: usize,
    /// Slots matched by more than one writeback across both tiers.
    pub conflicts: usize,
}

/// Speculative stack issue array: a top tier backed by a mid tier.
///
/// # Examples
///
/// ```
/// use ssia_core::Ssia;
/// use ssia_core::common::RegisterSlot;
/// use ssia_core::config::StackConfig;
/// use ssia_core::core::stack::{StackTier, Swizzle};
///
/// let mut stack = Ssia::new(&StackConfig::default()).unwrap();
/// let mut inputs = stack.idle_inputs();
/// inputs.stages[0].swizzle = Swizzle::push(stack.top().config());
/// inputs.stages[0].push = RegisterSlot::new(0x1234, 5);
///
/// let outputs = stack.advance(&inputs).unwrap();
/// assert_eq!(outputs.stages[1].top_peek[0], RegisterSlot::new(0x1234, 5));
/// assert_eq!(stack.top_state().top(), RegisterSlot::new(0x1234, 5));
/// ```
#[derive(Debug)]
pub struct Ssia {
    config: StackConfig,
    top: TopStack,
    mid: MidStack,
    stats: StackStats,
}

impl Ssia {
    /// Creates the composed stack in the reset state.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if any parameter of `config` is invalid.
    pub fn new(config: &StackConfig) -> Result<Self, ConfigError> {
        let top = TopStack::new(config.top_tier()?);
        let mid = MidStack::new(config.mid_tier()?);
        debug!(?config, "stack issue array configured");
        Ok(Self {
            config: config.clone(),
            top,
            mid,
            stats: StackStats::default(),
        })
    }

    /// Returns both tiers and the statistics to their reset state.
    pub fn reset(&mut self) {
        self.top.reset();
        self.mid.reset();
        self.stats = StackStats::default();
        debug!("stack issue array reset");
    }

    /// Configuration the stack was built from.
    pub const fn config(&self) -> &StackConfig {
        &self.config
    }

    /// The top tier.
    pub const fn top(&self) -> &TopStack {
        &self.top
    }

    /// The mid tier.
    pub const fn mid(&self) -> &MidStack {
        &self.mid
    }

    /// Persistent snapshot of the top tier.
    pub fn top_state(&self) -> &Snapshot {
        self.top.state()
    }

    /// Persistent snapshot of the mid tier.
    pub fn mid_state(&self) -> &Snapshot {
        self.mid.state()
    }

    /// Accumulated statistics.
    pub const fn stats(&self) -> &StackStats {
        &self.stats
    }

    /// Seeds the persistent snapshots of both tiers.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::GeometryMismatch`] if either depth differs. Neither
    /// tier is modified on error.
    pub fn load_state(&mut self, top: &Snapshot, mid: &Snapshot) -> Result<(), ConfigError> {
        ConfigError::check_dim("mid snapshot depth", self.config.mid_depth, mid.depth())?;
        self.top.load_state(top)?;
        self.mid.load_state(mid)
    }

    /// Inputs that leave both tiers unchanged and drive no writebacks.
    pub fn idle_inputs(&self) -> CycleInputs {
        let stage = IssueStage {
            push: RegisterSlot::EMPTY,
            pull_up: RegisterSlot::EMPTY,
            swizzle: Swizzle::identity(self.top.config()),
            command: MidStackCommand::Nop,
        };
        CycleInputs {
            stages: vec![stage; self.config.issue_width],
            writeback: WritebackBus::idle(self.config.writeback_count),
        }
    }

    fn check_inputs(&self, inputs: &CycleInputs) -> Result<(), ConfigError> {
        ConfigError::check_dim("issue stages", self.config.issue_width, inputs.stages.len())?;
        ConfigError::check_dim(
            "writeback channels",
            self.config.writeback_count,
            inputs.writeback.len(),
        )?;
        inputs
            .stages
            .iter()
            .try_for_each(|stage| self.top.check_command(&stage.swizzle))
    }

    /// Runs one clock cycle of the composed stack.
    ///
    /// Each stage observes both tiers, steps the top tier with the mid tier's
    /// peek as its pull-up value and steps the mid tier with the top tier's
    /// bottom as its push value. After the last stage both tiers are resolved
    /// against the writeback bus and latched.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::GeometryMismatch`] if `inputs` were built for another
    /// geometry. Nothing is latched on error.
    pub fn advance(&mut self, inputs: &CycleInputs) -> Result<CycleOutputs, ConfigError> {
        self.check_inputs(inputs)?;

        let mut top = self.top.state().clone();
        let mut mid = self.mid.state().clone();
        let mut stages = Vec::with_capacity(inputs.stages.len());
        for stage in &inputs.stages {
            let top_out = TopStack::observe(&top);
            let mid_out = MidStack::observe(&mid);

            let next_top = self.top.step(&top, &stage.swizzle, stage.push, mid_out.peek)?;
            let next_mid = self.mid.step(&mid, &stage.command, top_out.bottom, stage.pull_up)?;

            stages.push(StageOutput {
                top_peek: top_out.peek,
                top_bottom: top_out.bottom,
                mid_peek: mid_out.peek,
                mid_bottom: mid_out.bottom,
            });
            top = next_top;
            mid = next_mid;
        }

        let top_resolution = self.top.commit(&top, &inputs.writeback)?;
        let mid_resolution = self.mid.commit(&mid, &inputs.writeback)?;
        for stage in &inputs.stages {
            self.stats.record_command(stage.command);
        }
        let resolved = top_resolution.resolved + mid_resolution.resolved;
        let conflicts = top_resolution.conflicts + mid_resolution.conflicts;
        self.stats.record_commit(
            resolved,
            conflicts,
            self.top.state().pending(),
            self.mid.state().pending(),
        );
        trace!(
            cycle = self.stats.cycles,
            resolved,
            conflicts,
            top = ?self.top.state().slots(),
            mid = ?self.mid.state().slots(),
            "cycle latched"
        );

        Ok(CycleOutputs {
            stages,
            resolved,
            conflicts,
        })
    }
}
