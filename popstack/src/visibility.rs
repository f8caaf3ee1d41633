//! Hiding background content from assistive technology.
//!
//! While an overlay is open, everything beside its ancestor chain is marked
//! `aria-hidden`. Several overlays can want the same node hidden, so each
//! node carries a reference count and is only revealed when the last
//! overlay holding it closes.
//!
//! An overlay can open inside a node an earlier overlay already hid, for
//! example a popover whose portal was mounted before the modal opened. Its
//! root and ancestors are then sheltered: revealed while it is open, hidden
//! again when it closes if another overlay still holds them.

use std::collections::{HashMap, HashSet};

use crate::element::Document;
use crate::stack::OverlayId;

#[derive(Debug, Clone, Default)]
pub struct AssistiveVisibility {
    counts: HashMap<String, usize>,
    /// Nodes the host had already hidden before any overlay touched them.
    preexisting: HashSet<String>,
    held: HashMap<OverlayId, Vec<String>>,
    /// Open overlays whose chain runs through each node.
    sheltered: HashMap<String, usize>,
    shelters: HashMap<OverlayId, Vec<String>>,
}

impl AssistiveVisibility {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hide every sibling along the path from the overlay root to the
    /// document root.
    ///
    /// Siblings that contain, or sit inside, one of `open_roots` stay
    /// exposed. Calling this again for an overlay that already holds nodes
    /// does nothing.
    pub fn hide_others(&mut self, doc: &mut Document, overlay: &OverlayId, open_roots: &[String]) {
        if self.held.contains_key(overlay) {
            return;
        }

        let mut hidden = Vec::new();
        for node in path(doc, overlay) {
            for sibling in doc.siblings(&node) {
                let shelters_overlay = open_roots.iter().any(|root| {
                    root.as_str() != overlay.root()
                        && (doc.contains(&sibling, root) || doc.contains(root, &sibling))
                });
                if shelters_overlay {
                    continue;
                }

                let count = self.counts.entry(sibling.clone()).or_insert(0);
                *count += 1;
                let first = *count == 1;
                log::trace!("[visibility] '{}' hidden by {} overlay(s)", sibling, *count);

                if first && doc.is_aria_hidden(&sibling) {
                    self.preexisting.insert(sibling.clone());
                }
                self.sync(doc, &sibling);
                hidden.push(sibling);
            }
        }

        log::debug!("[visibility] '{}' hid {} node(s)", overlay, hidden.len());
        self.held.insert(overlay.clone(), hidden);
    }

    /// Reveal the overlay's own root and ancestors for as long as it is
    /// open, overriding holds placed by overlays opened before it.
    ///
    /// Calling this again for the same overlay does nothing.
    pub fn shelter(&mut self, doc: &mut Document, overlay: &OverlayId) {
        if self.shelters.contains_key(overlay) {
            return;
        }

        let chain = path(doc, overlay);
        for node in &chain {
            *self.sheltered.entry(node.clone()).or_insert(0) += 1;
            if self.count(node) > 0 {
                log::debug!("[visibility] '{}' revealed while '{}' is open", node, overlay);
                self.sync(doc, node);
            }
        }
        self.shelters.insert(overlay.clone(), chain);
    }

    /// Drop the overlay's hides and shelters, re-applying whatever the
    /// remaining overlays still ask for.
    pub fn release(&mut self, doc: &mut Document, overlay: &OverlayId) {
        for node in self.shelters.remove(overlay).unwrap_or_default() {
            if let Some(count) = self.sheltered.get_mut(&node) {
                *count -= 1;
                if *count == 0 {
                    self.sheltered.remove(&node);
                }
            }
            if self.count(&node) > 0 {
                self.sync(doc, &node);
            }
        }

        for node in self.held.remove(overlay).unwrap_or_default() {
            let Some(count) = self.counts.get_mut(&node) else {
                continue;
            };
            *count -= 1;
            if *count > 0 {
                continue;
            }

            self.counts.remove(&node);
            if !self.preexisting.remove(&node) {
                doc.set_aria_hidden(&node, false);
            }
            log::trace!("[visibility] '{}' revealed", node);
        }
    }

    /// Number of open overlays holding `id` hidden.
    pub fn count(&self, id: &str) -> usize {
        self.counts.get(id).copied().unwrap_or(0)
    }

    /// Whether an open overlay's chain currently keeps `id` exposed.
    pub fn is_sheltered(&self, id: &str) -> bool {
        self.sheltered.contains_key(id)
    }

    pub fn is_holding(&self, overlay: &OverlayId) -> bool {
        self.held.contains_key(overlay)
    }

    /// Write the attribute a held node should carry right now.
    /// Host-hidden nodes are never touched.
    fn sync(&self, doc: &mut Document, node: &str) {
        if self.preexisting.contains(node) {
            return;
        }
        let hidden = self.count(node) > 0 && !self.is_sheltered(node);
        doc.set_aria_hidden(node, hidden);
    }
}

/// The overlay root followed by its ancestors, nearest first.
fn path(doc: &Document, overlay: &OverlayId) -> Vec<String> {
    let mut path = vec![overlay.root().to_string()];
    path.extend(doc.ancestors(overlay.root()));
    path
}
