//! Register slot and tag types.
//!
//! This module defines the atomic unit stored in every stack position. It provides:
//! 1. **Tags:** A strong type for producer tags, with `0` reserved as the "resolved" sentinel.
//! 2. **Register Slots:** The value/tag pair held by every stack position and writeback channel.
//! 3. **Slot State:** A typed view separating resolved values from pending placeholders.
//! 4. **Wire Layout:** Bit-exact packing of a slot into a `tag:value` integer.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Tag identifying the in-flight producer of a stack value.
///
/// Tag `0` is the sentinel for a resolved (committed) value and is never assigned
/// to a real producer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tag(pub u32);

impl Tag {
    /// The sentinel tag carried by resolved values.
    pub const RESOLVED: Self = Self(0);

    /// Returns `true` if this tag names an in-flight producer.
    #[inline(always)]
    pub const fn is_pending(self) -> bool {
        self.0 != 0
    }

    /// Returns the raw tag bits.
    #[inline(always)]
    pub const fn val(self) -> u32 {
        self.0
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t{}", self.0)
    }
}

/// A value/tag pair, the contents of one stack position.
///
/// A slot with [`Tag::RESOLVED`] holds a committed value. A slot with a
/// non-zero tag is a speculative placeholder whose value will arrive on the
/// writeback bus.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RegisterSlot {
    /// Register value (only the low `register_width` bits are meaningful).
    pub value: u64,
    /// Producer tag, `0` when resolved.
    pub tag: Tag,
}

/// Typed view of a [`RegisterSlot`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlotState {
    /// The value is committed; no producer is outstanding.
    Resolved(u64),
    /// The value is still being produced by `tag`.
    Pending {
        /// In-flight producer.
        tag: Tag,
        /// Placeholder value carried until writeback.
        value: u64,
    },
}

impl RegisterSlot {
    /// The reset value of every stack position.
    pub const EMPTY: Self = Self {
        value: 0,
        tag: Tag::RESOLVED,
    };

    /// Creates a slot from a raw value and tag.
    #[inline(always)]
    pub const fn new(value: u64, tag: u32) -> Self {
        Self {
            value,
            tag: Tag(tag),
        }
    }

    /// Creates a resolved slot.
    #[inline(always)]
    pub const fn resolved(value: u64) -> Self {
        Self::new(value, 0)
    }

    /// Returns `true` if no producer is outstanding for this slot.
    #[inline(always)]
    pub const fn is_resolved(&self) -> bool {
        !self.tag.is_pending()
    }

    /// Returns the typed state of this slot.
    pub const fn state(&self) -> SlotState {
        if self.tag.is_pending() {
            SlotState::Pending {
                tag: self.tag,
                value: self.value,
            }
        } else {
            SlotState::Resolved(self.value)
        }
    }
}

impl From<SlotState> for RegisterSlot {
    fn from(state: SlotState) -> Self {
        match state {
            SlotState::Resolved(value) => Self::resolved(value),
            SlotState::Pending { tag, value } => Self { value, tag },
        }
    }
}

impl fmt::Display for RegisterSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.state() {
            SlotState::Resolved(value) => write!(f, "{value:#x}"),
            SlotState::Pending { tag, value } => write!(f, "{value:#x}@{tag}"),
        }
    }
}

/// Bit widths of a register slot on the wire.
///
/// The packed encoding places the value in the low `value_bits` bits and the
/// tag directly above it, so `0x1_1234_5678` with a 32-bit value is the slot
/// `(0x1234_5678, t1)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RegisterLayout {
    value_bits: u32,
    tag_bits: u32,
}

impl RegisterLayout {
    /// Creates a layout. Widths are validated by [`crate::config::StackConfig::validate`].
    pub(crate) const fn new(value_bits: u32, tag_bits: u32) -> Self {
        Self {
            value_bits,
            tag_bits,
        }
    }

    /// Width of the value field in bits.
    pub const fn value_bits(&self) -> u32 {
        self.value_bits
    }

    /// Width of the tag field in bits.
    pub const fn tag_bits(&self) -> u32 {
        self.tag_bits
    }

    /// Total packed width in bits.
    pub const fn total_bits(&self) -> u32 {
        self.value_bits + self.tag_bits
    }

    /// Largest tag representable in this layout.
    pub const fn max_tag(&self) -> u32 {
        low_mask(self.tag_bits) as u32
    }

    /// Truncates a slot to the configured field widths.
    #[inline]
    pub const fn fit(&self, slot: RegisterSlot) -> RegisterSlot {
        RegisterSlot {
            value: slot.value & low_mask(self.value_bits),
            tag: Tag((slot.tag.0 as u64 & low_mask(self.tag_bits)) as u32),
        }
    }

    /// Packs a slot into its `tag:value` wire encoding.
    pub const fn pack(&self, slot: RegisterSlot) -> u128 {
        let slot = self.fit(slot);
        ((slot.tag.0 as u128) << self.value_bits) | slot.value as u128
    }

    /// Unpacks a `tag:value` wire encoding, discarding bits above the layout.
    pub const fn unpack(&self, bits: u128) -> RegisterSlot {
        RegisterSlot {
            value: (bits as u64) & low_mask(self.value_bits),
            tag: Tag(((bits >> self.value_bits) as u64 & low_mask(self.tag_bits)) as u32),
        }
    }
}

/// Mask of the low `bits` bits of a `u64`.
#[inline(always)]
const fn low_mask(bits: u32) -> u64 {
    if bits >= u64::BITS {
        u64::MAX
    } else {
        (1u64 << bits) - 1
    }
}
