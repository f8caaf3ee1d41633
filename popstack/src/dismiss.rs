//! Escape and outside-click dismissal decisions.
//!
//! The coordinator is stateless: every decision is made against the
//! registry as it is when the event arrives. Repeating an event against an
//! unchanged stack repeats the decision.

use crate::element::Document;
use crate::event::{Event, Key};
use crate::stack::{DismissPolicy, OverlayId, StackEntry, StackRegistry};

/// Why an overlay closed or was asked to close.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CloseReason {
    /// The host closed it.
    Explicit,
    Escape,
    OutsideClick,
    /// The host unmounted it without closing first.
    Unmount,
    /// The overlay it was spawned from closed.
    ParentClosed,
    /// The whole stack was torn down.
    Teardown,
}

/// A decision that one overlay should close.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dismissal {
    pub id: OverlayId,
    pub reason: CloseReason,
}

/// Decide which overlay, if any, an event dismisses.
pub fn decide(registry: &StackRegistry, doc: &Document, event: &Event) -> Option<Dismissal> {
    match event {
        Event::Key {
            key: Key::Escape, ..
        } => on_escape(registry),
        Event::PointerDown { target, .. } => on_outside_click(registry, doc, target.as_deref()),
        _ => None,
    }
}

/// The overlay an Escape press closes.
///
/// Every entry is considered regardless of dismissal policy, but only entries
/// that opted into Escape are eligible. At most one overlay closes per press.
pub fn on_escape(registry: &StackRegistry) -> Option<Dismissal> {
    let entry = registry.topmost(|entry| entry.close_on_escape)?;
    log::debug!("[dismiss] escape closes '{}'", entry.id);
    Some(Dismissal {
        id: entry.id.clone(),
        reason: CloseReason::Escape,
    })
}

/// The overlay a pointer press on `target` closes.
///
/// Only the topmost entry of the `Topmost` cohort is evaluated. Overlays with
/// any other policy neither close nor shield the cohort's top.
pub fn on_outside_click(
    registry: &StackRegistry,
    doc: &Document,
    target: Option<&str>,
) -> Option<Dismissal> {
    let entry = registry.topmost(|entry| entry.policy == DismissPolicy::Topmost)?;

    if is_inside(registry, doc, entry, target) {
        log::trace!("[dismiss] click on {:?} is inside '{}'", target, entry.id);
        return None;
    }

    log::debug!("[dismiss] click on {:?} closes '{}'", target, entry.id);
    Some(Dismissal {
        id: entry.id.clone(),
        reason: CloseReason::OutsideClick,
    })
}

/// Whether `target` lies in the entry's interactive region or in any
/// still-open overlay spawned from it.
///
/// A press that hit nothing is outside everything.
pub fn is_inside(
    registry: &StackRegistry,
    doc: &Document,
    entry: &StackEntry,
    target: Option<&str>,
) -> bool {
    let Some(target) = target else {
        return false;
    };

    if doc.contains(entry.region(), target) {
        return true;
    }

    registry
        .descendants_of(&entry.id)
        .iter()
        .any(|child| doc.contains(child.root(), target))
}
