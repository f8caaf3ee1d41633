//! Stacking engine for overlays: modals, popovers, tooltips and dialogs.
//!
//! The engine tracks every open overlay in one ordered stack, assigns
//! z-indexes, decides which overlay an Escape press or an outside click
//! closes, traps focus inside modal overlays and hides background content
//! from assistive technology.

pub mod config;
pub mod dismiss;
pub mod element;
pub mod error;
pub mod event;
pub mod focus;
pub mod hit;
pub mod input;
pub mod layout;
pub mod manager;
pub mod notify;
pub mod stack;
pub mod visibility;

pub use config::StackConfig;
pub use dismiss::{CloseReason, Dismissal};
pub use element::{Document, Element, Role};
pub use error::{DocumentError, StackError};
pub use event::{Event, Key, Modifiers, MouseButton, Propagation};
pub use focus::{FocusScope, FocusTrap};
pub use hit::hit_test;
pub use input::translate;
pub use layout::{LayoutResult, Rect};
pub use manager::{OverlayManager, OverlayRequest};
pub use notify::{Notifier, StackEvent};
pub use stack::{
    Control, DismissPolicy, Layer, Lifecycle, OverlayId, StackEntry, StackRegistry,
    ZIndexAllocator,
};
pub use visibility::AssistiveVisibility;
