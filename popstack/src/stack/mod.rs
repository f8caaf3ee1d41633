//! Overlay stack: ordering and z-index bookkeeping.

mod entry;
mod registry;
mod zindex;

pub use entry::{Control, DismissPolicy, Lifecycle, OverlayId, StackEntry};
pub use registry::StackRegistry;
pub use zindex::{Layer, ZIndexAllocator};
