//! The overlay engine hosts pass around.
//!
//! `OverlayManager` wires the registry, dismissal decisions, focus traps,
//! assistive hiding and notifications together. It is an explicit value,
//! not a global: create one per application and hand it to every overlay.
//!
//! # Release guarantee
//!
//! Every way an overlay can go away (explicit close, Escape, outside click,
//! unmount, parent close, teardown) runs through the same release path,
//! which unregisters the entry, drops its `aria-hidden` references and
//! shelters, and restores focus.

use std::collections::HashMap;

use tokio::sync::mpsc::UnboundedReceiver;

use crate::config::StackConfig;
use crate::dismiss::{self, CloseReason, Dismissal};
use crate::element::Document;
use crate::error::StackError;
use crate::event::{Event, Key, Propagation};
use crate::focus::{FocusScope, FocusTrap};
use crate::notify::{Notifier, StackEvent};
use crate::stack::{Control, DismissPolicy, Layer, OverlayId, StackEntry, StackRegistry};
use crate::visibility::AssistiveVisibility;

/// Everything the host tells the engine when an overlay opens.
#[derive(Debug, Clone)]
pub struct OverlayRequest {
    pub entry: StackEntry,
    pub trap_focus: bool,
    /// Declared focus targets; collected from the document when absent.
    pub focus_scope: Option<FocusScope>,
    /// Explicit first-focus target, overriding the scope's preference order.
    pub initial_focus: Option<String>,
    pub hide_others: bool,
}

impl OverlayRequest {
    /// A bare overlay: no dismissal, no focus trap, no hiding.
    pub fn new(root: impl Into<OverlayId>) -> Self {
        Self {
            entry: StackEntry::new(root),
            trap_focus: false,
            focus_scope: None,
            initial_focus: None,
            hide_others: false,
        }
    }

    /// Modal dialog: closes on Escape, traps focus, hides the background.
    pub fn modal(root: impl Into<OverlayId>) -> Self {
        Self::new(root)
            .close_on_escape(true)
            .trap_focus(true)
            .hide_others(true)
    }

    /// Popover or menu: closes on Escape and on outside clicks.
    pub fn popover(root: impl Into<OverlayId>) -> Self {
        Self::new(root)
            .close_on_escape(true)
            .policy(DismissPolicy::Topmost)
    }

    /// Tooltip: closes on Escape only.
    pub fn tooltip(root: impl Into<OverlayId>) -> Self {
        Self::new(root).close_on_escape(true)
    }

    pub fn policy(mut self, policy: DismissPolicy) -> Self {
        self.entry.policy = policy;
        self
    }

    pub fn close_on_escape(mut self, close: bool) -> Self {
        self.entry.close_on_escape = close;
        self
    }

    pub fn parent(mut self, parent: impl Into<OverlayId>) -> Self {
        self.entry.parent = Some(parent.into());
        self
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.entry.content = Some(content.into());
        self
    }

    pub fn control(mut self, control: Control) -> Self {
        self.entry.control = control;
        self
    }

    pub fn trap_focus(mut self, trap: bool) -> Self {
        self.trap_focus = trap;
        self
    }

    /// Declare focus targets explicitly. Implies focus trapping.
    pub fn focus_scope(mut self, scope: FocusScope) -> Self {
        self.focus_scope = Some(scope);
        self.trap_focus = true;
        self
    }

    pub fn initial_focus(mut self, id: impl Into<String>) -> Self {
        self.initial_focus = Some(id.into());
        self
    }

    pub fn hide_others(mut self, hide: bool) -> Self {
        self.hide_others = hide;
        self
    }

    pub fn id(&self) -> &OverlayId {
        &self.entry.id
    }
}

/// Stack of open overlays plus the behaviors that follow their order.
#[derive(Debug, Default)]
pub struct OverlayManager {
    registry: StackRegistry,
    traps: HashMap<OverlayId, FocusTrap>,
    visibility: AssistiveVisibility,
    notifier: Notifier,
}

impl OverlayManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: StackConfig) -> Self {
        Self {
            registry: StackRegistry::with_config(config),
            ..Default::default()
        }
    }

    // --- Lifecycle ---

    /// Open an overlay on top of the stack.
    ///
    /// Returns its z-index. A request rejected with an error leaves the
    /// stack, the document and focus untouched.
    pub fn open(&mut self, doc: &mut Document, request: OverlayRequest) -> Result<i32, StackError> {
        let OverlayRequest {
            entry,
            trap_focus,
            focus_scope,
            initial_focus,
            hide_others,
        } = request;
        let id = entry.id.clone();

        if self.registry.contains(&id) {
            return Err(StackError::DuplicateEntry(id));
        }

        let scope = if trap_focus {
            let mut scope = match focus_scope {
                Some(scope) => scope,
                None => FocusScope::from_document(doc, id.root()),
            };
            if initial_focus.is_some() {
                scope.initial = initial_focus;
            }
            if scope.initial_target(doc).is_none() {
                return Err(StackError::NoFocusableElement(id));
            }
            Some(scope)
        } else {
            None
        };

        let previous_top = self.top_id();
        let before = self.z_snapshot();
        let z_index = self.registry.register(entry)?;
        self.notify_renumbered(&before, &id);

        if hide_others {
            let open_roots: Vec<String> = self
                .registry
                .entries()
                .iter()
                .filter(|entry| entry.id != id)
                .map(|entry| entry.id.root().to_string())
                .collect();
            self.visibility.hide_others(doc, &id, &open_roots);
        }
        self.visibility.shelter(doc, &id);

        if let Some(scope) = scope {
            match FocusTrap::activate(id.clone(), &scope, doc) {
                Ok(trap) => {
                    self.traps.insert(id.clone(), trap);
                }
                Err(err) => {
                    self.visibility.release(doc, &id);
                    self.registry.unregister(&id);
                    return Err(err);
                }
            }
        }

        log::debug!("[manager] opened '{}' with z-index {}", id, z_index);
        self.notifier.emit(StackEvent::Opened {
            id: id.clone(),
            z_index,
        });
        self.notify_top_change(previous_top);
        Ok(z_index)
    }

    /// Close an overlay and every overlay spawned from it.
    ///
    /// Descendants close first, topmost first. Unknown ids are ignored;
    /// returns whether anything closed.
    pub fn close(&mut self, doc: &mut Document, id: &OverlayId, reason: CloseReason) -> bool {
        if !self.registry.contains(id) {
            return false;
        }

        let previous_top = self.top_id();
        for descendant in self.registry.descendants_of(id).iter().rev() {
            self.release(doc, descendant, CloseReason::ParentClosed);
        }
        self.release(doc, id, reason);
        self.notify_top_change(previous_top);
        true
    }

    /// Close an overlay the host is unmounting, then detach its root.
    pub fn unmount(&mut self, doc: &mut Document, id: &OverlayId) -> bool {
        let closed = self.close(doc, id, CloseReason::Unmount);
        doc.unmount(id.root());
        closed
    }

    /// Close everything, topmost first.
    pub fn teardown(&mut self, doc: &mut Document) {
        let ids: Vec<OverlayId> = self
            .registry
            .entries()
            .iter()
            .rev()
            .map(|entry| entry.id.clone())
            .collect();
        for id in ids {
            self.close(doc, &id, CloseReason::Teardown);
        }
        log::debug!("[manager] teardown complete");
    }

    /// Bring an overlay, then the overlays spawned from it, to the front.
    ///
    /// Returns the overlay's z-index after the move.
    pub fn promote(&mut self, id: &OverlayId) -> Result<i32, StackError> {
        let previous_top = self.top_id();

        let mut z_index = self.bring_to_front(id)?;
        for descendant in self.registry.descendants_of(id) {
            self.bring_to_front(&descendant)?;
        }
        // A descendant's move can renumber the stack.
        if let Some(entry) = self.registry.get(id) {
            z_index = entry.z_index;
        }

        self.notify_top_change(previous_top);
        Ok(z_index)
    }

    fn bring_to_front(&mut self, id: &OverlayId) -> Result<i32, StackError> {
        let was_top = self.top_id().as_ref() == Some(id);
        let before = self.z_snapshot();
        let z_index = self.registry.bring_to_front(id)?;
        self.notify_renumbered(&before, id);
        if !was_top {
            self.notifier.emit(StackEvent::Restacked {
                id: id.clone(),
                z_index,
            });
        }
        Ok(z_index)
    }

    /// Unregister one overlay and undo everything it changed.
    fn release(&mut self, doc: &mut Document, id: &OverlayId, reason: CloseReason) {
        if self.registry.unregister(id).is_none() {
            return;
        }

        self.visibility.release(doc, id);

        if let Some(trap) = self.traps.remove(id) {
            let restore = match doc.focused() {
                Some(focused) => {
                    focused == Document::ROOT
                        || !doc.is_attached(focused)
                        || doc.contains(id.root(), focused)
                        || !self.is_inside_open_overlay(doc, focused)
                }
                None => true,
            };

            // Traps that would restore into this overlay inherit its target.
            for other in self.traps.values_mut() {
                let points_inside = other
                    .restore_to()
                    .is_some_and(|target| doc.contains(id.root(), target));
                if points_inside {
                    other.set_restore_to(trap.restore_to().map(str::to_string));
                }
            }

            trap.deactivate(doc, restore);
        }

        log::debug!("[manager] closed '{}' ({:?})", id, reason);
        self.notifier.emit(StackEvent::Closed {
            id: id.clone(),
            reason,
        });
    }

    // --- Events ---

    /// Route an event through dismissal, focus trapping and promotion.
    pub fn handle_event(&mut self, doc: &mut Document, event: &Event) -> Propagation {
        match event {
            Event::Key {
                key: Key::Escape, ..
            } => match dismiss::on_escape(&self.registry) {
                Some(dismissal) => {
                    self.dispatch(doc, dismissal);
                    Propagation::Stop
                }
                None => Propagation::Continue,
            },

            Event::Key {
                key: Key::Tab,
                modifiers,
            } => self.cycle_focus(doc, modifiers.shift),

            Event::Key {
                key: Key::BackTab, ..
            } => self.cycle_focus(doc, true),

            Event::PointerDown { target, .. } => {
                if let Some(dismissal) =
                    dismiss::on_outside_click(&self.registry, doc, target.as_deref())
                {
                    self.dispatch(doc, dismissal);
                }
                if let Some(target) = target {
                    self.promote_owner(doc, target);
                }
                Propagation::Continue
            }

            Event::Focus { target } => {
                if let Some(trap) = self.active_trap() {
                    let trapped = trap.overlay().clone();
                    if !self.is_within_or_above(doc, &trapped, target) {
                        log::debug!("[manager] focus on '{}' blocked by trap '{}'", target, trapped);
                        return Propagation::Stop;
                    }
                }
                doc.focus(target);
                self.promote_owner(doc, target);
                Propagation::Continue
            }

            Event::Key { .. } => Propagation::Continue,
        }
    }

    /// Report a dismissal and, for managed overlays, carry it out.
    fn dispatch(&mut self, doc: &mut Document, dismissal: Dismissal) {
        let Dismissal { id, reason } = dismissal;
        self.notifier.emit(StackEvent::CloseRequested {
            id: id.clone(),
            reason,
        });

        let managed = self
            .registry
            .get(&id)
            .is_some_and(|entry| entry.control == Control::Managed);
        if managed {
            self.close(doc, &id, reason);
        }
    }

    fn cycle_focus(&self, doc: &mut Document, backwards: bool) -> Propagation {
        let Some(trap) = self.active_trap() else {
            return Propagation::Continue;
        };
        let moved = if backwards {
            trap.focus_prev(doc)
        } else {
            trap.focus_next(doc)
        };
        log::trace!("[manager] tab within '{}' -> {:?}", trap.overlay(), moved);
        Propagation::Stop
    }

    fn promote_owner(&mut self, doc: &Document, target: &str) {
        if let Some(owner) = self.owner_of(doc, target) {
            if let Err(err) = self.promote(&owner) {
                log::warn!("[manager] could not promote '{}': {}", owner, err);
            }
        }
    }

    // --- Queries ---

    pub fn registry(&self) -> &StackRegistry {
        &self.registry
    }

    pub fn visibility(&self) -> &AssistiveVisibility {
        &self.visibility
    }

    pub fn trap(&self, id: &OverlayId) -> Option<&FocusTrap> {
        self.traps.get(id)
    }

    /// The trap of the highest overlay that traps focus.
    pub fn active_trap(&self) -> Option<&FocusTrap> {
        let entry = self
            .registry
            .topmost(|entry| self.traps.contains_key(&entry.id))?;
        self.traps.get(&entry.id)
    }

    pub fn top_id(&self) -> Option<OverlayId> {
        self.registry.top().map(|entry| entry.id.clone())
    }

    pub fn is_open(&self, id: &OverlayId) -> bool {
        self.registry.contains(id)
    }

    /// Whether `id` is the top of the whole stack.
    pub fn is_topmost(&self, id: &OverlayId) -> Result<bool, StackError> {
        self.registry.is_topmost(id, |_| true)
    }

    pub fn z_index(&self, id: &OverlayId) -> Option<i32> {
        self.registry.get(id).map(|entry| entry.z_index)
    }

    /// Z-index for one of the overlay's internal layers.
    pub fn layer_z_index(&self, id: &OverlayId, layer: Layer) -> Option<i32> {
        let z_index = self.z_index(id)?;
        Some(self.registry.allocator().layer(z_index, layer))
    }

    /// The highest open overlay whose root contains `target`.
    pub fn owner_of(&self, doc: &Document, target: &str) -> Option<OverlayId> {
        self.registry
            .entries()
            .iter()
            .rev()
            .find(|entry| doc.contains(entry.id.root(), target))
            .map(|entry| entry.id.clone())
    }

    fn is_inside_open_overlay(&self, doc: &Document, target: &str) -> bool {
        self.owner_of(doc, target).is_some()
    }

    /// True if `target` is inside `id` or inside any overlay stacked above it.
    fn is_within_or_above(&self, doc: &Document, id: &OverlayId, target: &str) -> bool {
        let Some(position) = self.registry.position(id) else {
            return false;
        };
        self.registry.entries()[position..]
            .iter()
            .any(|entry| doc.contains(entry.id.root(), target))
    }

    // --- Notifications ---

    pub fn subscribe(&mut self) -> UnboundedReceiver<StackEvent> {
        self.notifier.subscribe()
    }

    pub fn watch(&mut self, id: OverlayId) -> UnboundedReceiver<StackEvent> {
        self.notifier.watch(id)
    }

    fn z_snapshot(&self) -> Vec<(OverlayId, i32)> {
        self.registry
            .entries()
            .iter()
            .map(|entry| (entry.id.clone(), entry.z_index))
            .collect()
    }

    /// Announce overlays other than `moved` that a renumbering touched.
    fn notify_renumbered(&mut self, before: &[(OverlayId, i32)], moved: &OverlayId) {
        let changed: Vec<(OverlayId, i32)> = before
            .iter()
            .filter(|(id, _)| id != moved)
            .filter_map(|(id, old)| {
                let z_index = self.registry.get(id)?.z_index;
                (z_index != *old).then(|| (id.clone(), z_index))
            })
            .collect();
        for (id, z_index) in changed {
            self.notifier.emit(StackEvent::Restacked { id, z_index });
        }
    }

    fn notify_top_change(&mut self, previous: Option<OverlayId>) {
        let current = self.top_id();
        if previous == current {
            return;
        }
        if let Some(previous) = previous {
            if self.registry.contains(&previous) {
                self.notifier.emit(StackEvent::LostTopmost { id: previous });
            }
        }
        if let Some(current) = current {
            self.notifier.emit(StackEvent::BecameTopmost { id: current });
        }
    }
}
