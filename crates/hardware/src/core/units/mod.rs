//! Combinational units.
//!
//! Stateless networks evaluated freshly on every call.

/// Order-preserving stream compactor.
pub mod compactor;

pub use compactor::{Compacted, Compactor, Lane};
