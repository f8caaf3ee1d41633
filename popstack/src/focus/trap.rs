use crate::element::{Document, Role};
use crate::error::StackError;
use crate::stack::OverlayId;

/// Elements an overlay declares to focus management.
///
/// Built explicitly by the host or collected from the overlay's subtree
/// with [`FocusScope::from_document`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FocusScope {
    /// Explicit first-focus target.
    pub initial: Option<String>,
    pub dismiss_control: Option<String>,
    pub heading: Option<String>,
    /// Tab order inside the overlay.
    pub focusables: Vec<String>,
}

impl FocusScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect focusables, the dismiss control and the heading under `root`.
    pub fn from_document(doc: &Document, root: &str) -> Self {
        Self {
            initial: None,
            dismiss_control: doc.find_role(root, Role::DismissControl),
            heading: doc.find_role(root, Role::Heading),
            focusables: doc.collect_focusable(root),
        }
    }

    pub fn initial(mut self, id: impl Into<String>) -> Self {
        self.initial = Some(id.into());
        self
    }

    pub fn dismiss_control(mut self, id: impl Into<String>) -> Self {
        self.dismiss_control = Some(id.into());
        self
    }

    pub fn heading(mut self, id: impl Into<String>) -> Self {
        self.heading = Some(id.into());
        self
    }

    pub fn focusables<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.focusables = ids.into_iter().map(Into::into).collect();
        self
    }

    /// First attached candidate, in preference order: explicit target,
    /// dismiss control, heading, first declared focusable.
    pub fn initial_target(&self, doc: &Document) -> Option<String> {
        [
            self.initial.as_ref(),
            self.dismiss_control.as_ref(),
            self.heading.as_ref(),
            self.focusables.first(),
        ]
        .into_iter()
        .flatten()
        .find(|id| doc.is_attached(id))
        .cloned()
    }
}

/// Focus confinement for one open overlay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FocusTrap {
    overlay: OverlayId,
    restore_to: Option<String>,
    focusables: Vec<String>,
    /// Target that was made focusable only for the trap's lifetime.
    temporary: Option<String>,
}

impl FocusTrap {
    /// Record the current focus and move it into the overlay.
    pub fn activate(
        overlay: OverlayId,
        scope: &FocusScope,
        doc: &mut Document,
    ) -> Result<Self, StackError> {
        let target = scope
            .initial_target(doc)
            .ok_or_else(|| StackError::NoFocusableElement(overlay.clone()))?;

        let restore_to = doc.focused().map(str::to_string);

        let temporary = if doc.is_focusable(&target) {
            None
        } else {
            doc.set_focusable(&target, true);
            Some(target.clone())
        };

        doc.focus(&target);
        log::debug!(
            "[focus] trap '{}' focused '{}', will restore {:?}",
            overlay,
            target,
            restore_to
        );

        Ok(Self {
            overlay,
            restore_to,
            focusables: scope.focusables.clone(),
            temporary,
        })
    }

    pub fn overlay(&self) -> &OverlayId {
        &self.overlay
    }

    /// Element focus returns to when the trap is released.
    pub fn restore_to(&self) -> Option<&str> {
        self.restore_to.as_deref()
    }

    /// Replace the restore target, used when the element it pointed at is
    /// going away together with another overlay.
    pub fn set_restore_to(&mut self, restore_to: Option<String>) {
        self.restore_to = restore_to;
    }

    /// Move focus to the next declared focusable, wrapping at the end.
    /// Returns the newly focused element ID if focus changed.
    pub fn focus_next(&self, doc: &mut Document) -> Option<String> {
        let focusable = self.attached(doc);
        if focusable.is_empty() {
            return None;
        }

        let idx = doc
            .focused()
            .and_then(|current| focusable.iter().position(|id| id == current));
        let new_focus = match idx {
            Some(i) => focusable[(i + 1) % focusable.len()].clone(),
            None => focusable[0].clone(),
        };

        doc.focus(&new_focus).then_some(new_focus)
    }

    /// Move focus to the previous declared focusable, wrapping at the start.
    /// Returns the newly focused element ID if focus changed.
    pub fn focus_prev(&self, doc: &mut Document) -> Option<String> {
        let focusable = self.attached(doc);
        if focusable.is_empty() {
            return None;
        }

        let last = focusable.len() - 1;
        let idx = doc
            .focused()
            .and_then(|current| focusable.iter().position(|id| id == current));
        let new_focus = match idx {
            Some(0) | None => focusable[last].clone(),
            Some(i) => focusable[i - 1].clone(),
        };

        doc.focus(&new_focus).then_some(new_focus)
    }

    /// Undo the trap's changes.
    ///
    /// With `restore` set, focus goes back to the recorded element, or to
    /// the document root when that element is no longer attached.
    pub fn deactivate(self, doc: &mut Document, restore: bool) {
        if let Some(temporary) = &self.temporary {
            doc.set_focusable(temporary, false);
        }

        if !restore {
            return;
        }

        let target = self
            .restore_to
            .filter(|id| doc.is_attached(id))
            .unwrap_or_else(|| Document::ROOT.to_string());
        log::debug!("[focus] trap '{}' released, focusing '{}'", self.overlay, target);
        doc.focus(&target);
    }

    fn attached(&self, doc: &Document) -> Vec<String> {
        self.focusables
            .iter()
            .filter(|id| doc.is_attached(id))
            .cloned()
            .collect()
    }
}
