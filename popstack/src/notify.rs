//! Subscription channels for stack changes.
//!
//! Subscribers receive an unbounded tokio receiver; hosts either drain it
//! with `try_recv` after each engine call or await it from a task.

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::dismiss::CloseReason;
use crate::stack::OverlayId;

/// A change in the overlay stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StackEvent {
    Opened { id: OverlayId, z_index: i32 },
    Closed { id: OverlayId, reason: CloseReason },
    /// The dismissal coordinator wants this overlay closed.
    CloseRequested { id: OverlayId, reason: CloseReason },
    BecameTopmost { id: OverlayId },
    LostTopmost { id: OverlayId },
    /// The overlay was brought to front and has a new z-index.
    Restacked { id: OverlayId, z_index: i32 },
}

impl StackEvent {
    /// The overlay this event is about.
    pub fn id(&self) -> &OverlayId {
        match self {
            Self::Opened { id, .. }
            | Self::Closed { id, .. }
            | Self::CloseRequested { id, .. }
            | Self::BecameTopmost { id }
            | Self::LostTopmost { id }
            | Self::Restacked { id, .. } => id,
        }
    }
}

#[derive(Debug)]
struct Subscriber {
    /// Only events about this overlay, when set.
    filter: Option<OverlayId>,
    tx: UnboundedSender<StackEvent>,
}

/// Fan-out of [`StackEvent`]s to subscribers.
#[derive(Debug, Default)]
pub struct Notifier {
    subscribers: Vec<Subscriber>,
}

impl Notifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Receive every event.
    pub fn subscribe(&mut self) -> UnboundedReceiver<StackEvent> {
        self.add(None)
    }

    /// Receive events about one overlay.
    ///
    /// The channel closes after that overlay's `Closed` event.
    pub fn watch(&mut self, id: OverlayId) -> UnboundedReceiver<StackEvent> {
        self.add(Some(id))
    }

    fn add(&mut self, filter: Option<OverlayId>) -> UnboundedReceiver<StackEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers.push(Subscriber { filter, tx });
        rx
    }

    /// Deliver an event. Subscribers whose receiver was dropped are pruned,
    /// including watchers of other overlays.
    pub fn emit(&mut self, event: StackEvent) {
        log::trace!("[notify] {:?}", event);
        let closed = match &event {
            StackEvent::Closed { id, .. } => Some(id.clone()),
            _ => None,
        };

        self.subscribers.retain(|subscriber| {
            if subscriber.tx.is_closed() {
                return false;
            }
            if let Some(filter) = &subscriber.filter {
                if filter != event.id() {
                    return true;
                }
            }
            subscriber.tx.send(event.clone()).is_ok()
        });

        if let Some(id) = closed {
            self.subscribers
                .retain(|subscriber| subscriber.filter.as_ref() != Some(&id));
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}
