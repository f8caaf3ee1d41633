//! Stack configuration.

use serde::{Deserialize, Serialize};

/// Smallest step that still leaves room for a backdrop and a content layer.
pub const MIN_Z_STEP: i32 = 2;

/// Configuration for z-index allocation.
///
/// Hosts usually embed this in their own settings; every field has a
/// default so partial documents deserialize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StackConfig {
    /// Z-index given to the bottom overlay of an empty stack.
    pub base_z_index: i32,
    /// Distance between two consecutive top-level overlays.
    pub z_step: i32,
}

impl Default for StackConfig {
    fn default() -> Self {
        Self {
            base_z_index: 1000,
            z_step: 10,
        }
    }
}

impl StackConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the base z-index.
    pub fn base_z_index(mut self, base: i32) -> Self {
        self.base_z_index = base;
        self
    }

    /// Set the step between overlays. Values below [`MIN_Z_STEP`] are clamped.
    pub fn z_step(mut self, step: i32) -> Self {
        self.z_step = step;
        self.normalized()
    }

    /// Return a copy with out-of-range values clamped.
    ///
    /// Deserialized configs should pass through here before use.
    pub fn normalized(mut self) -> Self {
        if self.z_step < MIN_Z_STEP {
            log::warn!(
                "[config] z_step {} leaves no room for internal layers, using {}",
                self.z_step,
                MIN_Z_STEP
            );
            self.z_step = MIN_Z_STEP;
        }
        self
    }
}
