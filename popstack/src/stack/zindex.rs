//! Z-index allocation for stacked overlays.
//!
//! Top-level values are `base + index * step`. The gap between two
//! consecutive values is reserved for an overlay's own layers.
//!
//! Promotions keep raising the top value. When the next one would pass
//! `i32::MAX` the allocator reports it and the registry renumbers the whole
//! stack from `base`.

use crate::config::StackConfig;

/// Internal layer of a single overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    Backdrop,
    Content,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZIndexAllocator {
    base: i32,
    step: i32,
}

impl Default for ZIndexAllocator {
    fn default() -> Self {
        Self::new(StackConfig::default())
    }
}

impl ZIndexAllocator {
    pub fn new(config: StackConfig) -> Self {
        let config = config.normalized();
        Self {
            base: config.base_z_index,
            step: config.z_step,
        }
    }

    pub fn base(&self) -> i32 {
        self.base
    }

    pub fn step(&self) -> i32 {
        self.step
    }

    /// Top-level value for depth `index` in a freshly numbered stack.
    pub fn slot(&self, index: usize) -> i32 {
        let index = i32::try_from(index).unwrap_or(i32::MAX);
        self.base.saturating_add(index.saturating_mul(self.step))
    }

    /// Value for an entry appended at `index`.
    ///
    /// `highest` is the largest value currently assigned; promotions can
    /// push it past the index slot, in which case the new entry goes above it.
    /// `None` when that would overflow and the stack needs renumbering.
    pub fn for_registration(&self, index: usize, highest: Option<i32>) -> Option<i32> {
        let slot = self.slot(index);
        match highest {
            Some(highest) => Some(slot.max(self.above(highest)?)),
            None => Some(slot),
        }
    }

    /// Value for an entry promoted above `highest`. Other entries keep theirs.
    /// `None` when that would overflow and the stack needs renumbering.
    pub fn for_promotion(&self, highest: i32) -> Option<i32> {
        self.above(highest)
    }

    /// Z-index of one of an overlay's own layers.
    pub fn layer(&self, z_index: i32, layer: Layer) -> i32 {
        match layer {
            Layer::Backdrop => z_index,
            Layer::Content => self.offset(z_index, 1),
        }
    }

    /// `z_index + offset`, kept below the next top-level value.
    pub fn offset(&self, z_index: i32, offset: i32) -> i32 {
        z_index.saturating_add(offset.clamp(0, self.step - 1))
    }

    fn above(&self, z_index: i32) -> Option<i32> {
        z_index.checked_add(self.step)
    }
}
