//! JSON scenarios for the composed stack.
//!
//! A scenario names a stack configuration and a list of cycles. Each cycle
//! lists the per-stage commands and the writeback broadcasts, and may be
//! repeated. Stages left out of a cycle are idle (identity swizzle, NOP).
//!
//! ```json
//! {
//!   "config": { "top_depth": 4, "issue_width": 2 },
//!   "cycles": [
//!     { "stages": [ { "push": { "value": 1, "tag": 3 }, "swizzle": [4, 0, 1, 2] } ] },
//!     { "repeat": 2, "writeback": [ { "value": 99, "tag": 3 } ] }
//!   ]
//! }
//! ```

use std::fs;
use std::path::Path;

use serde::Deserialize;
use ssia_core::common::{ConfigError, RegisterSlot};
use ssia_core::config::StackConfig;
use ssia_core::core::stack::{CycleInputs, MidStackCommand, Ssia, StackTier, Swizzle};
use thiserror::Error;

/// Errors raised while loading or running a scenario.
#[derive(Debug, Error)]
pub enum ScenarioError {
    /// The scenario file could not be read.
    #[error("could not read scenario: {0}")]
    Io(#[from] std::io::Error),
    /// The scenario is not valid JSON for the expected shape.
    #[error("malformed scenario: {0}")]
    Json(#[from] serde_json::Error),
    /// The configuration or a command is invalid for the stack.
    #[error("invalid scenario: {0}")]
    Config(#[from] ConfigError),
    /// A cycle lists more stages or broadcasts than the stack has.
    #[error("cycle {cycle}: {what} {found} exceeds the configured {limit}")]
    TooWide {
        /// Index of the offending cycle entry.
        cycle: usize,
        /// Which list overflowed.
        what: &'static str,
        /// Entries in the scenario.
        found: usize,
        /// Entries supported by the stack.
        limit: usize,
    },
}

/// One issue stage as written in a scenario.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StageSpec {
    /// Value offered for push at the top of the top tier.
    #[serde(default)]
    pub push: RegisterSlot,
    /// Value pulled up from below the mid tier.
    #[serde(default)]
    pub pull_up: RegisterSlot,
    /// Raw top-tier selectors; identity when absent.
    #[serde(default)]
    pub swizzle: Option<Vec<usize>>,
    /// Mid-tier command.
    #[serde(default)]
    pub command: MidStackCommand,
}

/// One cycle entry as written in a scenario.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CycleSpec {
    /// Number of consecutive cycles driven with these inputs.
    #[serde(default = "CycleSpec::default_repeat")]
    pub repeat: usize,
    /// Per-stage inputs, in issue order.
    #[serde(default)]
    pub stages: Vec<StageSpec>,
    /// Writeback broadcasts, in priority order.
    #[serde(default)]
    pub writeback: Vec<RegisterSlot>,
}

impl CycleSpec {
    const fn default_repeat() -> usize {
        1
    }
}

/// A complete scenario.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    /// Stack configuration; defaults apply to missing fields.
    #[serde(default)]
    pub config: StackConfig,
    /// Cycle entries, in order.
    pub cycles: Vec<CycleSpec>,
}

impl Scenario {
    /// Parses a scenario from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError::Json`] if the text does not describe a scenario.
    pub fn from_json(text: &str) -> Result<Self, ScenarioError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Reads and parses a scenario file.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError::Io`] or [`ScenarioError::Json`].
    pub fn load(path: &Path) -> Result<Self, ScenarioError> {
        Self::from_json(&fs::read_to_string(path)?)
    }

    /// Expands the scenario into one `CycleInputs` per simulated cycle.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError::Config`] for an invalid configuration or swizzle,
    /// and [`ScenarioError::TooWide`] for a cycle that does not fit the stack.
    pub fn expand(&self, stack: &Ssia) -> Result<Vec<CycleInputs>, ScenarioError> {
        let config = stack.config();
        let mut expanded = Vec::new();
        for (index, cycle) in self.cycles.iter().enumerate() {
            if cycle.stages.len() > config.issue_width {
                return Err(ScenarioError::TooWide {
                    cycle: index,
                    what: "stages",
                    found: cycle.stages.len(),
                    limit: config.issue_width,
                });
            }

            let mut inputs = stack.idle_inputs();
            for (stage, spec) in inputs.stages.iter_mut().zip(&cycle.stages) {
                stage.push = spec.push;
                stage.pull_up = spec.pull_up;
                stage.command = spec.command;
                stage.swizzle = match &spec.swizzle {
                    Some(selectors) => Swizzle::from_selectors(selectors)?,
                    None => Swizzle::identity(stack.top().config()),
                };
            }
            for (channel, broadcast) in cycle.writeback.iter().enumerate() {
                if !inputs.writeback.drive(channel, *broadcast) {
                    return Err(ScenarioError::TooWide {
                        cycle: index,
                        what: "writebacks",
                        found: cycle.writeback.len(),
                        limit: config.writeback_count,
                    });
                }
            }
            expanded.extend(std::iter::repeat_n(inputs, cycle.repeat));
        }
        Ok(expanded)
    }
}
