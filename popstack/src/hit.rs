use crate::element::Document;
use crate::layout::LayoutResult;

/// Find the deepest attached element at the given coordinates.
///
/// Children are checked in reverse order so the last mounted sibling wins,
/// which is also the order overlay portals are appended in. Elements without
/// a rect are transparent: their children are still searched.
pub fn hit_test(layout: &LayoutResult, doc: &Document, x: u16, y: u16) -> Option<String> {
    let hit = hit_test_node(layout, doc, Document::ROOT, x, y);
    log::trace!("[hit] ({}, {}) -> {:?}", x, y, hit);
    hit
}

fn hit_test_node(
    layout: &LayoutResult,
    doc: &Document,
    id: &str,
    x: u16,
    y: u16,
) -> Option<String> {
    let inside = match layout.get(id) {
        Some(rect) => {
            if !rect.contains(x, y) {
                return None;
            }
            true
        }
        None => false,
    };

    for child in doc.children(id).iter().rev() {
        if let Some(found) = hit_test_node(layout, doc, child, x, y) {
            return Some(found);
        }
    }

    if inside && id != Document::ROOT {
        Some(id.to_string())
    } else {
        None
    }
}
