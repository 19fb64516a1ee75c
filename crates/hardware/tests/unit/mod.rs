//! # Unit Components
//!
//! This module organizes the unit tests for the stack: shared slot types,
//! the two tiers and their composition, the compactor, configuration and
//! statistics.

/// Unit tests for slots, tags, wire layout and configuration errors.
pub mod common;

/// Unit tests for the stack tiers, the bridge and the compactor.
pub mod core;

/// Unit tests for configuration defaults, deserialization and validation.
pub mod config;

/// Unit tests for statistics accounting and the report format.
pub mod stats;
