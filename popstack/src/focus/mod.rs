//! Focus trapping for modal overlays.

mod trap;

pub use trap::{FocusScope, FocusTrap};
