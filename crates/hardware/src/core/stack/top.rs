//! Top stack tier (full crossbar).
//!
//! The top tier holds the working set nearest the top of the stack. Every slot
//! of every issue stage can select any slot of the prior stage, so a single
//! stage can express any push, pop, swap or reorder. It provides:
//! 1. **Swizzles:** Validated per-slot selector vectors, including raw wire encodings.
//! 2. **Stage Logic:** The crossbar step with push injection at the top and pull-up at the bottom.
//! 3. **Observation:** The top two slots and the bottom slot at every stage.

use serde::Serialize;
use tracing::debug;

use crate::common::{ConfigError, RegisterSlot};
use crate::config::TierConfig;
use crate::core::stack::snapshot::Snapshot;
use crate::core::stack::traits::{StackTier, StageInput};

/// Where a destination slot takes its value from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SlotSource {
    /// A slot of the prior snapshot.
    Slot(usize),
    /// The push value (slot 0) or the pull-up value (bottom slot).
    Inject,
}

/// One crossbar command: a source for every slot of the tier.
///
/// A swizzle can only be built through its constructors, which keep every
/// selector inside `[0, depth)` and allow [`SlotSource::Inject`] only for the
/// top and bottom slots. The canned swizzles take a validated [`TierConfig`],
/// so their depth is at least two.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Swizzle {
    sources: Vec<SlotSource>,
}

impl Swizzle {
    /// Feed-forward: every slot keeps its value.
    pub fn identity(tier: &TierConfig) -> Self {
        Self {
            sources: (0..tier.depth()).map(SlotSource::Slot).collect(),
        }
    }

    /// Pushes the stage's push value; the old bottom falls out of the tier.
    pub fn push(tier: &TierConfig) -> Self {
        Self {
            sources: (0..tier.depth())
                .map(|d| if d == 0 { SlotSource::Inject } else { SlotSource::Slot(d - 1) })
                .collect(),
        }
    }

    /// Pops the top; the bottom is refilled from the pull-up value.
    pub fn pop(tier: &TierConfig) -> Self {
        let depth = tier.depth();
        Self {
            sources: (0..depth)
                .map(|d| if d + 1 < depth { SlotSource::Slot(d + 1) } else { SlotSource::Inject })
                .collect(),
        }
    }

    /// Exchanges the top two slots.
    pub fn swap(tier: &TierConfig) -> Self {
        Self {
            sources: (0..tier.depth())
                .map(|d| match d {
                    0 => SlotSource::Slot(1),
                    1 => SlotSource::Slot(0),
                    _ => SlotSource::Slot(d),
                })
                .collect(),
        }
    }

    /// Decodes raw selectors, one per slot, top first.
    ///
    /// Values `0..depth` select a prior slot; the value `depth` selects the push
    /// value for slot 0 and the pull-up value for the bottom slot.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::DepthTooShallow`] for fewer than two selectors,
    /// [`ConfigError::InjectNotAllowed`] for `depth` on an interior slot and
    /// [`ConfigError::SelectorOutOfRange`] for anything larger.
    pub fn from_selectors(selectors: &[usize]) -> Result<Self, ConfigError> {
        let depth = selectors.len();
        if depth < 2 {
            return Err(ConfigError::DepthTooShallow {
                name: "swizzle",
                depth,
            });
        }
        let sources = selectors
            .iter()
            .enumerate()
            .map(|(slot, &selector)| Self::decode(slot, selector, depth))
            .collect::<Result<_, _>>()?;
        Ok(Self { sources })
    }

    /// Replaces the source of one destination slot.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if `slot` or `source` is out of range for the
    /// swizzle's depth, or if `source` injects into an interior slot.
    pub fn route(mut self, slot: usize, source: SlotSource) -> Result<Self, ConfigError> {
        let depth = self.depth();
        if slot >= depth {
            return Err(ConfigError::SlotOutOfRange { slot, depth });
        }
        let selector = match source {
            SlotSource::Slot(index) => index,
            SlotSource::Inject => depth,
        };
        self.sources[slot] = Self::decode(slot, selector, depth)?;
        Ok(self)
    }

    fn decode(slot: usize, selector: usize, depth: usize) -> Result<SlotSource, ConfigError> {
        let edge = slot == 0 || slot == depth - 1;
        match selector {
            s if s < depth => Ok(SlotSource::Slot(s)),
            s if s == depth && edge => Ok(SlotSource::Inject),
            s if s == depth => Err(ConfigError::InjectNotAllowed { slot, depth }),
            s => Err(ConfigError::SelectorOutOfRange {
                slot,
                selector: s,
                depth,
            }),
        }
    }

    /// Number of slots this swizzle drives.
    pub fn depth(&self) -> usize {
        self.sources.len()
    }

    /// Source of each destination slot, top first.
    pub fn sources(&self) -> &[SlotSource] {
        &self.sources
    }

    /// Raw selector encoding, the inverse of [`Swizzle::from_selectors`].
    pub fn selectors(&self) -> Vec<usize> {
        let depth = self.depth();
        self.sources
            .iter()
            .map(|source| match source {
                SlotSource::Slot(index) => *index,
                SlotSource::Inject => depth,
            })
            .collect()
    }

    /// Width in bits of the selector driving `slot` in a tier of `depth` slots.
    ///
    /// Edge selectors range over `[0, depth]`, interior ones over `[0, depth)`.
    pub const fn selector_bits(depth: usize, slot: usize) -> u32 {
        let edge = slot == 0 || slot + 1 == depth;
        let max = if edge { depth } else { depth.saturating_sub(1) };
        usize::BITS - max.leading_zeros()
    }
}

/// Values the top tier exposes at one issue stage.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct TopStageOutput {
    /// The two top-most slots, top first.
    pub peek: [RegisterSlot; 2],
    /// The bottom-most slot, handed to the tier below.
    pub bottom: RegisterSlot,
}

/// Full-crossbar top tier of the stack.
#[derive(Debug)]
pub struct TopStack {
    config: TierConfig,
    state: Snapshot,
}

impl TopStack {
    /// Creates a top tier in the reset state.
    pub fn new(config: TierConfig) -> Self {
        debug!(
            depth = config.depth(),
            issue_width = config.issue_width(),
            "top stack configured"
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

    /// Stage inputs that leave the tier unchanged.
    pub fn idle_inputs(&self) -> Vec<StageInput<Swizzle>> {
        vec![
            StageInput {
                command: Swizzle::identity(&self.config),
                push: RegisterSlot::EMPTY,
                pull_up: RegisterSlot::EMPTY,
            };
            self.config.issue_width()
        ]
    }
}

impl StackTier for TopStack {
    type Command = Swizzle;
    type StageOutput = TopStageOutput;

    fn config(&self) -> &TierConfig {
        &self.config
    }

    fn state(&self) -> &Snapshot {
        &self.state
    }

    fn latch(&mut self, snapshot: Snapshot) {
        self.state = snapshot;
    }

    fn check_command(&self, command: &Swizzle) -> Result<(), ConfigError> {
        ConfigError::check_dim("swizzle depth", self.config.depth(), command.depth())
    }

    fn step(
        &self,
        prior: &Snapshot,
        command: &Swizzle,
        push: RegisterSlot,
        pull_up: RegisterSlot,
    ) -> Result<Snapshot, ConfigError> {
        ConfigError::check_dim("snapshot depth", self.config.depth(), prior.depth())?;
        self.check_command(command)?;
        let layout = self.config.layout();
        Ok(command
            .sources()
            .iter()
            .enumerate()
            .map(|(d, source)| match *source {
                SlotSource::Slot(index) => prior[index],
                SlotSource::Inject if d == 0 => layout.fit(push),
                SlotSource::Inject => layout.fit(pull_up),
            })
            .collect())
    }

    fn observe(prior: &Snapshot) -> TopStageOutput {
        TopStageOutput {
            peek: [prior.top(), prior.get(1).unwrap_or_default()],
            bottom: prior.bottom(),
        }
    }
}
