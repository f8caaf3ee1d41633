use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_ID: AtomicU64 = AtomicU64::new(0);

fn generate_id(prefix: &str) -> String {
    let id = NEXT_ID.fetch_add(1, Ordering::Relaxed);
    format!("{prefix}-{id}")
}

/// What an element means to overlay focus management.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum Role {
    #[default]
    None,
    /// The control that dismisses its overlay (a close button).
    DismissControl,
    /// The overlay's heading or label.
    Heading,
}

/// Declarative description of a host UI subtree.
///
/// Elements are built with the builder methods and then mounted into a
/// [`Document`](super::Document), which owns the live structure.
#[derive(Debug, Clone)]
pub struct Element {
    pub id: String,
    pub children: Vec<Element>,
    pub focusable: bool,
    pub role: Role,
    /// Host-authored `aria-hidden`, independent of what overlays apply.
    pub aria_hidden: bool,
}

impl Default for Element {
    fn default() -> Self {
        Self {
            id: generate_id("el"),
            children: Vec::new(),
            focusable: false,
            role: Role::None,
            aria_hidden: false,
        }
    }
}

impl Element {
    /// Create an element with an explicit id.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    /// Create an anonymous container with a generated id.
    pub fn box_() -> Self {
        Self::default()
    }

    /// Create a focusable button.
    pub fn button(id: impl Into<String>) -> Self {
        Self::new(id).focusable(true)
    }

    /// Create a dismiss control (close button).
    pub fn close_button(id: impl Into<String>) -> Self {
        Self::button(id).role(Role::DismissControl)
    }

    /// Create a heading. Headings are not focusable unless made so.
    pub fn heading(id: impl Into<String>) -> Self {
        Self::new(id).role(Role::Heading)
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = Element>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn focusable(mut self, focusable: bool) -> Self {
        self.focusable = focusable;
        self
    }

    pub fn role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    pub fn aria_hidden(mut self, hidden: bool) -> Self {
        self.aria_hidden = hidden;
        self
    }
}
