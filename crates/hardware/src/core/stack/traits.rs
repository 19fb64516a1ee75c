//! Stack tier interface.
//!
//! This module defines the capability shared by every stack tier. It provides:
//! 1. **Stage Interface:** A pure `step` from one snapshot to the next under one command.
//! 2. **Commit Interface:** Writeback resolution and the single latch per cycle.
//! 3. **Cycle Driver:** A provided `advance` that chains `S` stages and commits the last.

use crate::common::{ConfigError, RegisterSlot};
use crate::config::TierConfig;
use crate::core::stack::snapshot::Snapshot;
use crate::core::stack::writeback::{Resolution, WritebackBus};

/// Inputs consumed by one issue stage of a tier.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StageInput<C> {
    /// Movement command for the stage.
    pub command: C,
    /// Value offered for injection at the top of the tier.
    pub push: RegisterSlot,
    /// Value offered from the tier below for injection at the bottom.
    pub pull_up: RegisterSlot,
}

impl<C: Default> Default for StageInput<C> {
    fn default() -> Self {
        Self {
            command: C::default(),
            push: RegisterSlot::EMPTY,
            pull_up: RegisterSlot::EMPTY,
        }
    }
}

/// Everything a tier exposes for one cycle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TierCycle<O> {
    /// Per-stage outputs, one entry per issue stage.
    pub stages: Vec<O>,
    /// Slots resolved by writeback at commit.
    pub resolved: usize,
    /// Slots matched by more than one writeback at commit.
    pub conflicts: usize,
}

/// A stack region with its own depth and update rule.
///
/// Implementors provide the per-stage update rule and the outputs observed at
/// each stage; chaining, writeback and latching are shared.
pub trait StackTier {
    /// Per-stage movement command.
    type Command;

    /// Values exposed for each issue stage.
    type StageOutput;

    /// Validated geometry of the tier.
    fn config(&self) -> &TierConfig;

    /// Persistent (architectural) snapshot.
    fn state(&self) -> &Snapshot;

    /// Replaces the persistent snapshot. Called once per cycle.
    fn latch(&mut self, snapshot: Snapshot);

    /// Checks that a command was built for this tier's geometry.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::GeometryMismatch`] for a command of another geometry.
    fn check_command(&self, command: &Self::Command) -> Result<(), ConfigError>;

    /// Derives the snapshot after one issue stage.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::GeometryMismatch`] if `prior` or `command` was built
    /// for another geometry.
    fn step(
        &self,
        prior: &Snapshot,
        command: &Self::Command,
        push: RegisterSlot,
        pull_up: RegisterSlot,
    ) -> Result<Snapshot, ConfigError>;

    /// Outputs exposed by a stage, taken from the snapshot entering it.
    /// Slots the snapshot does not have read as [`RegisterSlot::EMPTY`].
    fn observe(prior: &Snapshot) -> Self::StageOutput;

    /// Checks a full cycle's worth of stage inputs.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::GeometryMismatch`] if the stage count or any command
    /// disagrees with the tier geometry.
    fn check_inputs(&self, inputs: &[StageInput<Self::Command>]) -> Result<(), ConfigError> {
        ConfigError::check_dim("issue stages", self.config().issue_width(), inputs.len())?;
        inputs
            .iter()
            .try_for_each(|input| self.check_command(&input.command))
    }

    /// Evaluates the transient snapshot chain for one cycle.
    ///
    /// Returns `S + 1` snapshots: the persistent state followed by the result of
    /// each stage. Nothing is latched.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::GeometryMismatch`] if the inputs do not fit the tier.
    fn evaluate(&self, inputs: &[StageInput<Self::Command>]) -> Result<Vec<Snapshot>, ConfigError> {
        self.check_inputs(inputs)?;
        let mut chain = Vec::with_capacity(inputs.len() + 1);
        let mut prior = self.state().clone();
        for input in inputs {
            let next = self.step(&prior, &input.command, input.push, input.pull_up)?;
            chain.push(std::mem::replace(&mut prior, next));
        }
        chain.push(prior);
        Ok(chain)
    }

    /// Resolves the final snapshot against the writeback bus and latches it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::GeometryMismatch`] if the bus width or snapshot depth
    /// disagrees with the tier geometry. Nothing is latched on error.
    fn commit(&mut self, last: &Snapshot, bus: &WritebackBus) -> Result<Resolution, ConfigError> {
        ConfigError::check_dim("writeback channels", self.config().writeback_count(), bus.len())?;
        ConfigError::check_dim("snapshot depth", self.config().depth(), last.depth())?;
        let resolution = bus.resolve(last, self.config().layout());
        self.latch(resolution.snapshot.clone());
        Ok(resolution)
    }

    /// Runs one clock cycle: `S` chained stages, writeback, then latch.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::GeometryMismatch`] if the inputs or the bus were built
    /// for another geometry. The persistent state is untouched on error.
    fn advance(
        &mut self,
        inputs: &[StageInput<Self::Command>],
        bus: &WritebackBus,
    ) -> Result<TierCycle<Self::StageOutput>, ConfigError> {
        ConfigError::check_dim("writeback channels", self.config().writeback_count(), bus.len())?;
        let chain = self.evaluate(inputs)?;
        let stages = chain[..inputs.len()].iter().map(Self::observe).collect();
        let resolution = self.commit(&chain[inputs.len()], bus)?;
        Ok(TierCycle {
            stages,
            resolved: resolution.resolved,
            conflicts: resolution.conflicts,
        })
    }
}
