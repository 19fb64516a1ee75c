//! Mid stack tier (shift only).
//!
//! The mid tier holds the generation of stack data immediately below the top
//! tier. Like the top tier it supports deferred writeback, but each issue stage
//! can only apply a single NOP/POP/PUSH shift to the whole tier, which keeps its
//! area linear in depth. Chaining `S` stages still allows a net movement of up to
//! `S` slots per cycle.
//!
//! Regions below this tier do not support deferred writeback: the issuing logic
//! must stall until writebacks drain before an access crosses that boundary.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::common::{ConfigError, RegisterSlot};
use crate::config::TierConfig;
use crate::core::stack::snapshot::Snapshot;
use crate::core::stack::traits::{StackTier, StageInput};

/// Shift applied to the whole mid tier by one issue stage.
///
/// The discriminants are the 2-bit wire encoding.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
#[repr(u8)]
pub enum MidStackCommand {
    /// Leave every slot unchanged.
    #[default]
    Nop = 0b00,
    /// Shift up by one; the bottom takes the pull-up value.
    Pop = 0b01,
    /// Shift down by one; the top takes the push value and the bottom falls out.
    Push = 0b10,
}

impl TryFrom<u8> for MidStackCommand {
    type Error = ConfigError;

    fn try_from(bits: u8) -> Result<Self, ConfigError> {
        match bits {
            0b00 => Ok(Self::Nop),
            0b01 => Ok(Self::Pop),
            0b10 => Ok(Self::Push),
            other => Err(ConfigError::InvalidCommand(other)),
        }
    }
}

impl From<MidStackCommand> for u8 {
    fn from(command: MidStackCommand) -> Self {
        command as Self
    }
}

/// Values the mid tier exposes at one issue stage.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct MidStageOutput {
    /// Top-most slot, offered to the top tier as its pull-up value.
    pub peek: RegisterSlot,
    /// Bottom-most slot, which the next tier down must be able to accept.
    pub bottom: RegisterSlot,
}

/// Shift-only mid tier of the stack.
#[derive(Debug)]
pub struct MidStack {
    config: TierConfig,
    state: Snapshot,
}

impl MidStack {
    /// Creates a mid tier in the reset state.
    pub fn new(config: TierConfig) -> Self {
        debug!(
            depth = config.depth(),
            issue_width = config.issue_width(),
            "mid stack configured"
        );
        Self {
            state: Snapshot::zeroed(config.depth()),
            config,
        }
    }

    /// Returns every slot to `(0, 0)`.
    pub fn reset(&mut self) {
        self.state = Snapshot::zeroed(self.config.depth());
    }

    /// Seeds the persistent snapshot, truncating slots to the configured widths.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::GeometryMismatch`] if the snapshot depth differs.
    pub fn load_state(&mut self, snapshot: &Snapshot) -> Result<(), ConfigError> {
        ConfigError::check_dim("snapshot depth", self.config.depth(), snapshot.depth())?;
        let layout = self.config.layout();
        self.state = snapshot.slots().iter().map(|s| layout.fit(*s)).collect();
        Ok(())
    }

    /// Stage inputs that apply `command` at every stage.
    pub fn uniform_inputs(&self, command: MidStackCommand) -> Vec<StageInput<MidStackCommand>> {
        vec![
            StageInput {
                command,
                ..StageInput::default()
            };
            self.config.issue_width()
        ]
    }
}

impl StackTier for MidStack {
    type Command = MidStackCommand;
    type StageOutput = MidStageOutput;

    fn config(&self) -> &TierConfig {
        &self.config
    }

    fn state(&self) -> &Snapshot {
        &self.state
    }

    fn latch(&mut self, snapshot: Snapshot) {
        self.state = snapshot;
    }

    fn check_command(&self, _command: &MidStackCommand) -> Result<(), ConfigError> {
        Ok(())
    }

    fn step(
        &self,
        prior: &Snapshot,
        command: &MidStackCommand,
        push: RegisterSlot,
        pull_up: RegisterSlot,
    ) -> Result<Snapshot, ConfigError> {
        ConfigError::check_dim("snapshot depth", self.config.depth(), prior.depth())?;
        let layout = self.config.layout();
        let last = prior.depth() - 1;
        Ok(match command {
            MidStackCommand::Nop => prior.clone(),
            MidStackCommand::Pop => (0..=last)
                .map(|d| if d < last { prior[d + 1] } else { layout.fit(pull_up) })
                .collect(),
            MidStackCommand::Push => (0..=last)
                .map(|d| if d == 0 { layout.fit(push) } else { prior[d - 1] })
                .collect(),
        })
    }

    fn observe(prior: &Snapshot) -> MidStageOutput {
        MidStageOutput {
            peek: prior.top(),
            bottom: prior.bottom(),
        }
    }
}
