//! Translation of raw terminal input into engine events.

use crossterm::event::{Event as CrosstermEvent, KeyEventKind, MouseEventKind};

use crate::element::Document;
use crate::event::{Event, Key, Modifiers};
use crate::hit::hit_test;
use crate::layout::LayoutResult;

/// Convert raw crossterm events into overlay engine events.
///
/// Only key presses and mouse-button presses matter to overlays; releases,
/// moves, scrolls and resizes are dropped.
pub fn translate(raw: &[CrosstermEvent], doc: &Document, layout: &LayoutResult) -> Vec<Event> {
    let mut events = Vec::new();

    for raw_event in raw {
        match raw_event {
            CrosstermEvent::Key(key_event) => {
                // Only process key press events (not release/repeat on some terminals)
                if key_event.kind != KeyEventKind::Press {
                    continue;
                }

                let key: Key = key_event.code.into();
                let modifiers: Modifiers = key_event.modifiers.into();
                events.push(Event::Key { key, modifiers });
            }

            CrosstermEvent::Mouse(mouse_event) => {
                if let MouseEventKind::Down(button) = mouse_event.kind {
                    let x = mouse_event.column;
                    let y = mouse_event.row;
                    let target = hit_test(layout, doc, x, y);
                    events.push(Event::PointerDown {
                        target,
                        x,
                        y,
                        button: button.into(),
                    });
                }
            }

            _ => {}
        }
    }

    events
}
