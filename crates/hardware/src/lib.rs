//! Speculative stack register file library.
//!
//! This crate models, cycle-accurately, the operand stack of a stack-oriented
//! out-of-order pipeline:
//! 1. **Slots:** Value/tag pairs where tag 0 marks a resolved value.
//! 2. **Top Tier:** A full-crossbar region rearranged arbitrarily at every issue stage.
//! 3. **Mid Tier:** A shift-only region whose area grows linearly with depth.
//! 4. **Bridge:** Spill and refill wiring that composes both tiers into one stack.
//! 5. **Units:** The stream compactor, plus configuration and statistics.

/// Common types (register slots, tags, wire layout, configuration errors).
pub mod common;
/// Stack configuration (defaults, validated tier geometry).
pub mod config;
/// Stack tiers, writeback bus, composition, and compactor.
pub mod core;
/// Statistics collection and reporting.
pub mod stats;

/// Root configuration type; use `StackConfig::default()` or deserialize from JSON.
pub use crate::config::StackConfig;
/// The composed two-tier stack; construct with `Ssia::new`.
pub use crate::core::Ssia;
