//! Configuration error definitions.
//!
//! The stack is a closed, statically-sized network: once constructed it has no
//! runtime failure modes. Every error in this crate is therefore a configuration
//! error, rejected before any cycle is simulated. This module provides:
//! 1. **Geometry Errors:** Non-positive or out-of-range widths, depths, and counts.
//! 2. **Command Errors:** Selector and command encodings outside their valid range.
//! 3. **Wiring Errors:** Inputs built for one stack geometry applied to another.

use thiserror::Error;

/// Errors raised while configuring the stack or building its per-cycle commands.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A size parameter that must be positive was zero.
    #[error("`{name}` must be at least 1")]
    ZeroParameter {
        /// Name of the offending parameter.
        name: &'static str,
    },

    /// A stack tier was configured shallower than two slots.
    ///
    /// Both tiers need a distinct top and bottom slot.
    #[error("`{name}` must be at least 2, got {depth}")]
    DepthTooShallow {
        /// Name of the offending parameter.
        name: &'static str,
        /// Configured depth.
        depth: usize,
    },

    /// The register value does not fit the 64-bit storage word.
    #[error("register width {0} exceeds 64 bits")]
    RegisterWidthTooLarge(u32),

    /// The tag field does not fit the 32-bit tag word.
    #[error("tag width {0} exceeds 32 bits")]
    TagWidthTooLarge(u32),

    /// A compactor was configured wider than its 64-bit enable mask.
    #[error("compactor supports at most 64 lanes, got {0}")]
    TooManyLanes(usize),

    /// A swizzle selector pointed outside the prior snapshot.
    #[error("selector {selector} for slot {slot} is out of range for depth {depth}")]
    SelectorOutOfRange {
        /// Destination slot.
        slot: usize,
        /// Offending selector.
        selector: usize,
        /// Depth of the tier.
        depth: usize,
    },

    /// Injection was requested for a slot other than the top or bottom.
    #[error("slot {slot} cannot take an injected value (depth {depth})")]
    InjectNotAllowed {
        /// Destination slot.
        slot: usize,
        /// Depth of the tier.
        depth: usize,
    },

    /// A swizzle addressed a slot beyond the tier depth.
    #[error("slot {slot} does not exist in a tier of depth {depth}")]
    SlotOutOfRange {
        /// Destination slot.
        slot: usize,
        /// Depth of the tier.
        depth: usize,
    },

    /// A mid-tier command encoding outside {NOP, POP, PUSH}.
    #[error("invalid mid-stack command encoding {0:#04b}")]
    InvalidCommand(u8),

    /// Per-cycle inputs do not match the geometry of the stack they drive.
    #[error("{what}: expected {expected}, found {found}")]
    GeometryMismatch {
        /// Which dimension disagreed.
        what: &'static str,
        /// Dimension configured on the stack.
        expected: usize,
        /// Dimension found on the inputs.
        found: usize,
    },
}

impl ConfigError {
    /// Checks that an input dimension matches the configured one.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::GeometryMismatch`] if `found != expected`.
    pub(crate) const fn check_dim(
        what: &'static str,
        expected: usize,
        found: usize,
    ) -> Result<(), Self> {
        if expected == found {
            Ok(())
        } else {
            Err(Self::GeometryMismatch {
                what,
                expected,
                found,
            })
        }
    }
}
