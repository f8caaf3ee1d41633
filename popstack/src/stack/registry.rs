//! Ordered registry of open overlays.

use super::entry::{Lifecycle, OverlayId, StackEntry};
use super::zindex::ZIndexAllocator;
use crate::config::StackConfig;
use crate::error::StackError;

/// All currently open overlays, bottom to top.
///
/// # Invariants
///
/// - Entries are unique by id.
/// - Only open entries are stored.
/// - The last entry is the most recently registered-or-promoted overlay.
/// - `z_index` strictly increases from first to last, provided
///   `base + len * step` fits in an `i32`.
///
/// Mutations only update bookkeeping; callers read the new order
/// synchronously afterwards.
#[derive(Debug, Clone, Default)]
pub struct StackRegistry {
    entries: Vec<StackEntry>,
    allocator: ZIndexAllocator,
}

impl StackRegistry {
    /// Create an empty registry with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: StackConfig) -> Self {
        Self {
            entries: Vec::new(),
            allocator: ZIndexAllocator::new(config),
        }
    }

    pub fn allocator(&self) -> &ZIndexAllocator {
        &self.allocator
    }

    /// Append an entry on top of the stack.
    ///
    /// Returns the z-index assigned to it.
    pub fn register(&mut self, mut entry: StackEntry) -> Result<i32, StackError> {
        if self.contains(&entry.id) {
            return Err(StackError::DuplicateEntry(entry.id));
        }

        let highest = self.entries.last().map(|e| e.z_index);
        entry.z_index = match self.allocator.for_registration(self.entries.len(), highest) {
            Some(z_index) => z_index,
            None => {
                self.renumber();
                self.allocator.slot(self.entries.len())
            }
        };
        entry.lifecycle = Lifecycle::Open;
        let z_index = entry.z_index;

        log::debug!(
            "[stack] register '{}' at depth {} with z-index {}",
            entry.id,
            self.entries.len(),
            z_index
        );
        self.entries.push(entry);
        Ok(z_index)
    }

    /// Remove an entry. Unknown ids are ignored.
    ///
    /// The removed entry is returned marked as closed.
    pub fn unregister(&mut self, id: &OverlayId) -> Option<StackEntry> {
        let idx = self.position(id)?;
        let mut entry = self.entries.remove(idx);
        entry.lifecycle = Lifecycle::Closed;
        log::debug!("[stack] unregister '{}' from depth {}", id, idx);
        Some(entry)
    }

    /// Move an entry to the top of the stack.
    ///
    /// Only the moved entry gets a new z-index, unless the range is
    /// exhausted and the stack is renumbered. Promoting the current top is
    /// a no-op. Returns the entry's z-index after the move.
    pub fn bring_to_front(&mut self, id: &OverlayId) -> Result<i32, StackError> {
        let idx = self
            .position(id)
            .ok_or_else(|| StackError::NotFound(id.clone()))?;

        let last = self.entries.len() - 1;
        if idx == last {
            return Ok(self.entries[idx].z_index);
        }

        let highest = self.entries[last].z_index;
        let mut entry = self.entries.remove(idx);
        entry.z_index = match self.allocator.for_promotion(highest) {
            Some(z_index) => z_index,
            None => {
                self.renumber();
                self.allocator.slot(self.entries.len())
            }
        };
        let z_index = entry.z_index;

        log::debug!(
            "[stack] bring '{}' to front from depth {} with z-index {}",
            id,
            idx,
            z_index
        );
        self.entries.push(entry);
        Ok(z_index)
    }

    /// Entries bottom to top.
    pub fn entries(&self) -> &[StackEntry] {
        &self.entries
    }

    /// Owned snapshot of the stack, bottom to top.
    pub fn get_all(&self) -> Vec<StackEntry> {
        self.entries.clone()
    }

    /// The entry on top of the whole stack.
    pub fn top(&self) -> Option<&StackEntry> {
        self.entries.last()
    }

    /// The highest entry satisfying `predicate`.
    pub fn topmost<P>(&self, predicate: P) -> Option<&StackEntry>
    where
        P: Fn(&StackEntry) -> bool,
    {
        self.entries.iter().rev().find(|entry| predicate(entry))
    }

    /// Whether `id` is the highest entry satisfying `predicate`.
    ///
    /// Unlike [`topmost`](Self::topmost) this requires `id` to be registered.
    pub fn is_topmost<P>(&self, id: &OverlayId, predicate: P) -> Result<bool, StackError>
    where
        P: Fn(&StackEntry) -> bool,
    {
        if !self.contains(id) {
            return Err(StackError::NotFound(id.clone()));
        }
        Ok(self.topmost(predicate).is_some_and(|entry| &entry.id == id))
    }

    pub fn get(&self, id: &OverlayId) -> Option<&StackEntry> {
        self.entries.iter().find(|entry| &entry.id == id)
    }

    pub fn contains(&self, id: &OverlayId) -> bool {
        self.position(id).is_some()
    }

    /// Depth of `id`, 0 being the bottom.
    pub fn position(&self, id: &OverlayId) -> Option<usize> {
        self.entries.iter().position(|entry| &entry.id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries whose parent is `id`, in stack order.
    pub fn children_of(&self, id: &OverlayId) -> Vec<&StackEntry> {
        self.entries
            .iter()
            .filter(|entry| entry.parent.as_ref() == Some(id))
            .collect()
    }

    /// All open overlays spawned from `id`, directly or transitively,
    /// in stack order.
    pub fn descendants_of(&self, id: &OverlayId) -> Vec<OverlayId> {
        self.entries
            .iter()
            .filter(|entry| self.is_descendant(&entry.id, id))
            .map(|entry| entry.id.clone())
            .collect()
    }

    /// True if `id` was spawned from `ancestor`, at any depth.
    pub fn is_descendant(&self, id: &OverlayId, ancestor: &OverlayId) -> bool {
        let mut current = self.get(id).and_then(|entry| entry.parent.as_ref());
        // Parent links are host-supplied and may form a cycle.
        for _ in 0..self.entries.len() {
            match current {
                Some(parent) if parent == ancestor => return true,
                Some(parent) => current = self.get(parent).and_then(|e| e.parent.as_ref()),
                None => return false,
            }
        }
        false
    }

    /// Reassign `base + index * step` to every entry, keeping the order.
    fn renumber(&mut self) {
        log::warn!(
            "[stack] z-index range exhausted, renumbering {} overlay(s) from {}",
            self.entries.len(),
            self.allocator.base()
        );
        for (index, entry) in self.entries.iter_mut().enumerate() {
            entry.z_index = self.allocator.slot(index);
        }
    }

    /// Remove every entry, returning them top first.
    pub fn clear(&mut self) -> Vec<StackEntry> {
        let mut removed: Vec<StackEntry> = self.entries.drain(..).rev().collect();
        for entry in &mut removed {
            entry.lifecycle = Lifecycle::Closed;
        }
        removed
    }
}
