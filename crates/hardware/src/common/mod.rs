//! Common types shared by every stack tier.
//!
//! This module provides the fundamental building blocks of the stack register file:
//! 1. **Register Slots:** The value/tag pair stored in every stack position.
//! 2. **Wire Layout:** Bit widths and packing of slots on the external interface.
//! 3. **Error Handling:** Configuration errors rejected at construction time.

/// Configuration error types.
pub mod error;

/// Register slot, tag, and wire layout types.
pub mod slot;

pub use error::ConfigError;
pub use slot::{RegisterLayout, RegisterSlot, SlotState, Tag};
