//! Configuration system for the stack register file.
//!
//! This module defines the construction-time parameters of the stack. It provides:
//! 1. **Defaults:** The reference geometry (32-bit registers, 4-deep tiers, 4-wide issue).
//! 2. **Structures:** `StackConfig` for the composed stack and `TierConfig` for a single tier.
//! 3. **Validation:** Every geometry error is rejected here, before any cycle is simulated.
//!
//! Configuration is deserialized from JSON, or use `StackConfig::default()`.

use serde::Deserialize;

use crate::common::{ConfigError, RegisterLayout};

/// Default configuration constants for the stack.
///
/// These values match the reference scenarios the stack was validated against.
mod defaults {
    /// Register value width in bits.
    pub const REGISTER_WIDTH: u32 = 32;

    /// Number of slots in the full-crossbar top tier.
    pub const TOP_DEPTH: usize = 4;

    /// Number of slots in the shift-only mid tier.
    pub const MID_DEPTH: usize = 4;

    /// Issue stages evaluated per cycle.
    pub const ISSUE_WIDTH: usize = 4;

    /// Tag width in bits (7 live producers plus the resolved sentinel).
    pub const TAG_WIDTH: u32 = 3;

    /// Writeback channels broadcast per cycle.
    pub const WRITEBACK_COUNT: usize = 1;
}

/// Root configuration of the two-tier stack.
///
/// # Examples
///
/// ```
/// use ssia_core::config::StackConfig;
///
/// let json = r#"{ "top_depth": 6, "issue_width": 2 }"#;
/// let config: StackConfig = serde_json::from_str(json).unwrap();
/// assert_eq!(config.top_depth, 6);
/// assert_eq!(config.mid_depth, 4);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StackConfig {
    /// Width of a register value in bits (`W`).
    #[serde(default = "StackConfig::default_register_width")]
    pub register_width: u32,

    /// Depth of the top tier (`D1`).
    #[serde(default = "StackConfig::default_top_depth")]
    pub top_depth: usize,

    /// Depth of the mid tier (`D2`).
    #[serde(default = "StackConfig::default_mid_depth")]
    pub mid_depth: usize,

    /// Issue stages per cycle (`S`).
    #[serde(default = "StackConfig::default_issue_width")]
    pub issue_width: usize,

    /// Width of a producer tag in bits (`T`).
    #[serde(default = "StackConfig::default_tag_width")]
    pub tag_width: u32,

    /// Writeback channels per cycle (`C`).
    #[serde(default = "StackConfig::default_writeback_count")]
    pub writeback_count: usize,
}

impl StackConfig {
    fn default_register_width() -> u32 {
        defaults::REGISTER_WIDTH
    }

    fn default_top_depth() -> usize {
        defaults::TOP_DEPTH
    }

    fn default_mid_depth() -> usize {
        defaults::MID_DEPTH
    }

    fn default_issue_width() -> usize {
        defaults::ISSUE_WIDTH
    }

    fn default_tag_width() -> u32 {
        defaults::TAG_WIDTH
    }

    fn default_writeback_count() -> usize {
        defaults::WRITEBACK_COUNT
    }

    /// Checks every parameter of the composed stack.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found among the shared parameters and
    /// the two tier depths.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let _ = self.top_tier()?;
        let _ = self.mid_tier()?;
        Ok(())
    }

    /// Projects the configuration onto the top tier.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the shared parameters or `top_depth` are invalid.
    pub fn top_tier(&self) -> Result<TierConfig, ConfigError> {
        TierConfig::build(self, "top_depth", self.top_depth)
    }

    /// Projects the configuration onto the mid tier.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the shared parameters or `mid_depth` are invalid.
    pub fn mid_tier(&self) -> Result<TierConfig, ConfigError> {
        TierConfig::build(self, "mid_depth", self.mid_depth)
    }
}

impl Default for StackConfig {
    fn default() -> Self {
        Self {
            register_width: defaults::REGISTER_WIDTH,
            top_depth: defaults::TOP_DEPTH,
            mid_depth: defaults::MID_DEPTH,
            issue_width: defaults::ISSUE_WIDTH,
            tag_width: defaults::TAG_WIDTH,
            writeback_count: defaults::WRITEBACK_COUNT,
        }
    }
}

/// Validated geometry of a single stack tier.
///
/// A `TierConfig` can only be obtained through validation, so every tier built
/// from one has a legal geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierConfig {
    layout: RegisterLayout,
    depth: usize,
    issue_width: usize,
    writeback_count: usize,
}

impl TierConfig {
    /// Creates a tier configuration from its five parameters.
    ///
    /// # Arguments
    ///
    /// * `register_width` - Width of a register value in bits (1-64).
    /// * `depth` - Number of slots in the tier (at least 2).
    /// * `issue_width` - Issue stages evaluated per cycle (at least 1).
    /// * `tag_width` - Width of a producer tag in bits (1-32).
    /// * `writeback_count` - Writeback channels per cycle (at least 1).
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] describing the first invalid parameter.
    pub fn new(
        register_width: u32,
        depth: usize,
        issue_width: usize,
        tag_width: u32,
        writeback_count: usize,
    ) -> Result<Self, ConfigError> {
        let config = StackConfig {
            register_width,
            top_depth: depth,
            mid_depth: depth,
            issue_width,
            tag_width,
            writeback_count,
        };
        Self::build(&config, "depth", depth)
    }

    fn build(config: &StackConfig, depth_name: &'static str, depth: usize) -> Result<Self, ConfigError> {
        if config.register_width == 0 {
            return Err(ConfigError::ZeroParameter {
                name: "register_width",
            });
        }
        if config.register_width > u64::BITS {
            return Err(ConfigError::RegisterWidthTooLarge(config.register_width));
        }
        // One bit is the minimum that leaves room for a live tag next to the sentinel.
        if config.tag_width == 0 {
            return Err(ConfigError::ZeroParameter { name: "tag_width" });
        }
        if config.tag_width > u32::BITS {
            return Err(ConfigError::TagWidthTooLarge(config.tag_width));
        }
        if config.issue_width == 0 {
            return Err(ConfigError::ZeroParameter {
                name: "issue_width",
            });
        }
        if config.writeback_count == 0 {
            return Err(ConfigError::ZeroParameter {
                name: "writeback_count",
            });
        }
        if depth < 2 {
            return Err(ConfigError::DepthTooShallow {
                name: depth_name,
                depth,
            });
        }
        Ok(Self {
            layout: RegisterLayout::new(config.register_width, config.tag_width),
            depth,
            issue_width: config.issue_width,
            writeback_count: config.writeback_count,
        })
    }

    /// Wire layout of a slot.
    pub const fn layout(&self) -> RegisterLayout {
        self.layout
    }

    /// Number of slots in the tier.
    pub const fn depth(&self) -> usize {
        self.depth
    }

    /// Issue stages per cycle.
    pub const fn issue_width(&self) -> usize {
        self.issue_width
    }

    /// Writeback channels per cycle.
    pub const fn writeback_count(&self) -> usize {
        self.writeback_count
    }
}
