use std::collections::HashMap;

use super::{Element, Role};
use crate::error::DocumentError;

#[derive(Debug, Clone)]
struct Node {
    parent: Option<String>,
    children: Vec<String>,
    focusable: bool,
    role: Role,
    aria_hidden: bool,
}

impl Node {
    fn root() -> Self {
        Self {
            parent: None,
            children: Vec::new(),
            focusable: false,
            role: Role::None,
            aria_hidden: false,
        }
    }
}

/// Live UI tree the overlay engine reads and annotates.
///
/// Holds structure, focusability, role, the `aria-hidden` attribute and the
/// element that currently owns keyboard focus. Elements are addressed by id.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: HashMap<String, Node>,
    focused: Option<String>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Id of the root node every tree is mounted under.
    pub const ROOT: &'static str = "document";

    pub fn new() -> Self {
        let mut nodes = HashMap::new();
        nodes.insert(Self::ROOT.to_string(), Node::root());
        Self {
            nodes,
            focused: None,
        }
    }

    /// Attach `element` and its descendants as the last child of `parent`.
    ///
    /// Nothing is attached if any id in the tree is already taken.
    pub fn mount(&mut self, parent: &str, element: Element) -> Result<(), DocumentError> {
        if !self.nodes.contains_key(parent) {
            return Err(DocumentError::UnknownParent(parent.to_string()));
        }

        let mut seen = Vec::new();
        check_ids(&element, &self.nodes, &mut seen)?;

        if let Some(node) = self.nodes.get_mut(parent) {
            node.children.push(element.id.clone());
        }
        self.insert_tree(parent, element);
        Ok(())
    }

    fn insert_tree(&mut self, parent: &str, element: Element) {
        let Element {
            id,
            children,
            focusable,
            role,
            aria_hidden,
        } = element;

        let child_ids = children.iter().map(|c| c.id.clone()).collect();
        self.nodes.insert(
            id.clone(),
            Node {
                parent: Some(parent.to_string()),
                children: child_ids,
                focusable,
                role,
                aria_hidden,
            },
        );

        for child in children {
            self.insert_tree(&id, child);
        }
    }

    /// Detach an element and its subtree.
    ///
    /// Returns false for unknown ids and for the root. If focus was inside
    /// the subtree it falls back to the root.
    pub fn unmount(&mut self, id: &str) -> bool {
        if id == Self::ROOT || !self.nodes.contains_key(id) {
            return false;
        }

        let focus_inside = self
            .focused
            .as_deref()
            .is_some_and(|focused| self.contains(id, focused));

        if let Some(parent) = self.parent(id).map(str::to_string) {
            if let Some(node) = self.nodes.get_mut(&parent) {
                node.children.retain(|child| child != id);
            }
        }

        let mut pending = vec![id.to_string()];
        while let Some(next) = pending.pop() {
            if let Some(node) = self.nodes.remove(&next) {
                pending.extend(node.children);
            }
        }

        if focus_inside {
            log::debug!("[document] focused element detached with '{}', focusing root", id);
            self.focused = Some(Self::ROOT.to_string());
        }
        true
    }

    /// Number of attached nodes, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    pub fn is_attached(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn parent(&self, id: &str) -> Option<&str> {
        self.nodes.get(id)?.parent.as_deref()
    }

    pub fn children(&self, id: &str) -> &[String] {
        self.nodes
            .get(id)
            .map(|node| node.children.as_slice())
            .unwrap_or(&[])
    }

    /// Ancestors of `id`, nearest first, ending with the root.
    pub fn ancestors(&self, id: &str) -> Vec<String> {
        let mut result = Vec::new();
        let mut current = self.parent(id);
        while let Some(parent) = current {
            result.push(parent.to_string());
            current = self.parent(parent);
        }
        result
    }

    /// Other children of `id`'s parent, in tree order.
    pub fn siblings(&self, id: &str) -> Vec<String> {
        match self.parent(id) {
            Some(parent) => self
                .children(parent)
                .iter()
                .filter(|child| child.as_str() != id)
                .cloned()
                .collect(),
            None => Vec::new(),
        }
    }

    /// True if `id` is `ancestor` or lies inside its subtree.
    pub fn contains(&self, ancestor: &str, id: &str) -> bool {
        if !self.nodes.contains_key(id) {
            return false;
        }
        let mut current = Some(id);
        while let Some(node) = current {
            if node == ancestor {
                return true;
            }
            current = self.parent(node);
        }
        false
    }

    pub fn role(&self, id: &str) -> Role {
        self.nodes.get(id).map(|node| node.role).unwrap_or_default()
    }

    pub fn is_focusable(&self, id: &str) -> bool {
        self.nodes.get(id).is_some_and(|node| node.focusable)
    }

    /// Returns false if the element is not attached.
    pub fn set_focusable(&mut self, id: &str, focusable: bool) -> bool {
        match self.nodes.get_mut(id) {
            Some(node) => {
                node.focusable = focusable;
                true
            }
            None => false,
        }
    }

    /// The element's own `aria-hidden` attribute.
    pub fn is_aria_hidden(&self, id: &str) -> bool {
        self.nodes.get(id).is_some_and(|node| node.aria_hidden)
    }

    /// Returns false if the element is not attached.
    pub fn set_aria_hidden(&mut self, id: &str, hidden: bool) -> bool {
        match self.nodes.get_mut(id) {
            Some(node) => {
                node.aria_hidden = hidden;
                true
            }
            None => false,
        }
    }

    /// True if the element or any ancestor is `aria-hidden`.
    pub fn is_hidden_from_assistive_tech(&self, id: &str) -> bool {
        if self.is_aria_hidden(id) {
            return true;
        }
        self.ancestors(id)
            .iter()
            .any(|ancestor| self.is_aria_hidden(ancestor))
    }

    /// All focusable element ids under `root` (inclusive), in tree order.
    pub fn collect_focusable(&self, root: &str) -> Vec<String> {
        let mut result = Vec::new();
        self.walk(root, &mut |id, node| {
            if node.focusable {
                result.push(id.to_string());
            }
            false
        });
        result
    }

    /// First element under `root` (inclusive) with the given role.
    pub fn find_role(&self, root: &str, role: Role) -> Option<String> {
        let mut found = None;
        self.walk(root, &mut |id, node| {
            if node.role == role {
                found = Some(id.to_string());
                return true;
            }
            false
        });
        found
    }

    /// Pre-order walk; the visitor returns true to stop.
    fn walk(&self, id: &str, visit: &mut dyn FnMut(&str, &Node) -> bool) -> bool {
        let Some(node) = self.nodes.get(id) else {
            return false;
        };
        if visit(id, node) {
            return true;
        }
        for child in &node.children {
            if self.walk(child, visit) {
                return true;
            }
        }
        false
    }

    /// The element that currently owns keyboard focus.
    pub fn focused(&self) -> Option<&str> {
        self.focused.as_deref()
    }

    /// Move focus to an attached element.
    /// Returns true if focus changed.
    pub fn focus(&mut self, id: &str) -> bool {
        if !self.nodes.contains_key(id) || self.focused.as_deref() == Some(id) {
            return false;
        }
        self.focused = Some(id.to_string());
        true
    }

    /// Clear focus.
    /// Returns true if there was something focused.
    pub fn blur(&mut self) -> bool {
        self.focused.take().is_some()
    }
}

fn check_ids(
    element: &Element,
    nodes: &HashMap<String, Node>,
    seen: &mut Vec<String>,
) -> Result<(), DocumentError> {
    if nodes.contains_key(&element.id) || seen.contains(&element.id) {
        return Err(DocumentError::DuplicateElement(element.id.clone()));
    }
    seen.push(element.id.clone());
    for child in &element.children {
        check_ids(child, nodes, seen)?;
    }
    Ok(())
}
