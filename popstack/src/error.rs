use thiserror::Error;

use crate::stack::OverlayId;

/// Errors raised by the UI tree model.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentError {
    /// The parent element is not attached to the document.
    #[error("parent element '{0}' is not attached")]
    UnknownParent(String),

    /// An element with this id is already attached.
    #[error("element '{0}' is already attached")]
    DuplicateElement(String),
}

/// Errors raised by the overlay stack.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StackError {
    /// `register` was called twice for the same overlay.
    #[error("overlay '{0}' is already registered")]
    DuplicateEntry(OverlayId),

    /// The overlay is not (or no longer) in the stack.
    #[error("overlay '{0}' is not in the stack")]
    NotFound(OverlayId),

    /// The overlay has nothing that can receive initial focus.
    #[error("overlay '{0}' has no element that can receive focus")]
    NoFocusableElement(OverlayId),

    #[error(transparent)]
    Document(#[from] DocumentError),
}
