use std::fmt;

/// Identifier of an open overlay: the id of its root element.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OverlayId(pub String);

impl OverlayId {
    pub fn new(root: impl Into<String>) -> Self {
        Self(root.into())
    }

    /// Id of the overlay's root element in the document.
    pub fn root(&self) -> &str {
        &self.0
    }
}

impl From<&str> for OverlayId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for OverlayId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl fmt::Display for OverlayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// When an overlay closes itself on an outside click.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum DismissPolicy {
    /// Never auto-dismissed by outside clicks.
    #[default]
    Never,
    /// Closes on an outside click only while it is the topmost overlay
    /// among the overlays that also carry this policy.
    Topmost,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lifecycle {
    #[default]
    Open,
    Closed,
}

/// Who performs a close the engine decided on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Control {
    /// The engine closes the overlay itself and reports it.
    #[default]
    Managed,
    /// The engine only requests the close; the host calls `close`.
    Controlled,
}

/// One open overlay in the stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackEntry {
    pub id: OverlayId,
    /// Assigned by the registry on register and promotion.
    pub z_index: i32,
    pub policy: DismissPolicy,
    /// Explicit opt-in to closing on Escape.
    pub close_on_escape: bool,
    pub lifecycle: Lifecycle,
    /// Overlay this one was spawned from.
    pub parent: Option<OverlayId>,
    /// Interactive region when the root is only a wrapper or backdrop.
    pub content: Option<String>,
    pub control: Control,
}

impl StackEntry {
    pub fn new(id: impl Into<OverlayId>) -> Self {
        Self {
            id: id.into(),
            z_index: 0,
            policy: DismissPolicy::default(),
            close_on_escape: false,
            lifecycle: Lifecycle::Open,
            parent: None,
            content: None,
            control: Control::default(),
        }
    }

    pub fn policy(mut self, policy: DismissPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn close_on_escape(mut self, close: bool) -> Self {
        self.close_on_escape = close;
        self
    }

    pub fn parent(mut self, parent: impl Into<OverlayId>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn control(mut self, control: Control) -> Self {
        self.control = control;
        self
    }

    /// Element whose subtree counts as "inside" for outside-click checks.
    pub fn region(&self) -> &str {
        self.content.as_deref().unwrap_or(self.id.root())
    }

    pub fn is_open(&self) -> bool {
        self.lifecycle == Lifecycle::Open
    }
}
