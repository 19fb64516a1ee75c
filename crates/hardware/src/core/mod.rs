//! Stack core implementation.
//!
//! This module contains the speculative stack register file and the
//! combinational units it is built from.

/// Stack tiers, writeback, and the two-tier composition.
pub mod stack;

/// Combinational units (stream compaction).
pub mod units;

pub use self::stack::Ssia;
