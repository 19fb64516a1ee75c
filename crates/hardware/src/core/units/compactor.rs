//! Stream compactor.
//!
//! Packs the enabled lanes of a sparse input into a dense, order-preserving
//! output. Each output slot is produced by a priority encoder over an enable
//! mask; the lowest set bit is consumed (`mask &= mask - 1`) before the next
//! slot is encoded, so `N` encoders are chained per evaluation.

use crate::common::ConfigError;

/// One input lane of the compactor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Lane {
    /// Lane value.
    pub value: u64,
    /// Whether the lane takes part in the output.
    pub enabled: bool,
}

impl Lane {
    /// An enabled lane carrying `value`.
    pub const fn enabled(value: u64) -> Self {
        Self {
            value,
            enabled: true,
        }
    }

    /// A disabled lane.
    pub const fn disabled() -> Self {
        Self {
            value: 0,
            enabled: false,
        }
    }
}

/// Dense output of a compaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Compacted {
    /// One entry per lane; entry `i` holds the `i`-th lowest enabled lane, the rest are zero.
    pub values: Vec<u64>,
    /// Number of enabled lanes.
    pub count: usize,
    width: u32,
}

impl Compacted {
    /// Concatenation of the output slots, slot 0 least significant.
    ///
    /// Returns `None` if the output does not fit in 128 bits.
    pub fn packed(&self) -> Option<u128> {
        let total = self.width as usize * self.values.len();
        if total > u128::BITS as usize {
            return None;
        }
        Some(
            self.values
                .iter()
                .rev()
                .fold(0u128, |acc, v| (acc << self.width) | u128::from(*v)),
        )
    }
}

/// Order-preserving stream compactor over `count` lanes of `width` bits.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Compactor {
    width: u32,
    count: usize,
}

impl Compactor {
    /// Creates a compactor.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if `width` is not in `1..=64`, or if `count` is
    /// zero or wider than the 64-bit enable mask.
    pub fn new(width: u32, count: usize) -> Result<Self, ConfigError> {
        if width == 0 {
            return Err(ConfigError::ZeroParameter { name: "width" });
        }
        if width > u64::BITS {
            return Err(ConfigError::RegisterWidthTooLarge(width));
        }
        if count == 0 {
            return Err(ConfigError::ZeroParameter { name: "count" });
        }
        if count > u64::BITS as usize {
            return Err(ConfigError::TooManyLanes(count));
        }
        Ok(Self { width, count })
    }

    /// Lane value width in bits.
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of lanes.
    pub const fn count(&self) -> usize {
        self.count
    }

    /// Compacts `lanes`.
    ///
    /// Lanes past `count` are ignored and missing lanes read as disabled.
    /// Values are truncated to `width` bits.
    pub fn compact(&self, lanes: &[Lane]) -> Compacted {
        let value_mask = if self.width == u64::BITS {
            u64::MAX
        } else {
            (1u64 << self.width) - 1
        };
        let lanes = &lanes[..lanes.len().min(self.count)];
        let initial: u64 = lanes
            .iter()
            .enumerate()
            .filter(|(_, lane)| lane.enabled)
            .fold(0, |mask, (i, _)| mask | (1u64 << i));

        let mut mask = initial;
        let values = (0..self.count)
            .map(|_| {
                if mask == 0 {
                    return 0;
                }
                let index = mask.trailing_zeros() as usize;
                mask &= mask - 1;
                lanes[index].value & value_mask
            })
            .collect();

        Compacted {
            values,
            count: initial.count_ones() as usize,
            width: self.width,
        }
    }
}
