use popstack::{
    AssistiveVisibility, CloseReason, DismissPolicy, Document, Element, Event, Key, OverlayId,
    OverlayManager, OverlayRequest,
};

fn modal(id: &str) -> Element {
    Element::new(id).child(Element::close_button(format!("{id}-close")))
}

fn page() -> Document {
    let mut doc = Document::new();
    doc.mount(Document::ROOT, Element::new("header")).unwrap();
    doc.mount(
        Document::ROOT,
        Element::new("main").child(Element::button("trigger")),
    )
    .unwrap();
    doc.mount(Document::ROOT, Element::new("footer")).unwrap();
    doc.focus("trigger");
    doc
}

// ============================================================================
// Hiding
// ============================================================================

#[test]
fn test_modal_hides_siblings_until_closed() {
    let mut doc = page();
    let mut overlays = OverlayManager::new();
    doc.mount(Document::ROOT, modal("dialog")).unwrap();

    overlays
        .open(&mut doc, OverlayRequest::modal("dialog"))
        .unwrap();

    for id in ["header", "main", "footer"] {
        assert!(doc.is_aria_hidden(id), "{id} should be hidden");
    }
    assert!(doc.is_hidden_from_assistive_tech("trigger"));
    assert!(!doc.is_hidden_from_assistive_tech("dialog-close"));
    assert_eq!(overlays.visibility().count("main"), 1);

    overlays.close(&mut doc, &OverlayId::from("dialog"), CloseReason::Explicit);

    for id in ["header", "main", "footer"] {
        assert!(!doc.is_aria_hidden(id), "{id} should be revealed");
    }
    assert_eq!(overlays.visibility().count("main"), 0);
}

#[test]
fn test_siblings_hidden_along_ancestor_chain() {
    let mut doc = Document::new();
    doc.mount(Document::ROOT, Element::new("app")).unwrap();
    doc.mount(
        Document::ROOT,
        Element::new("portal")
            .child(modal("dialog"))
            .child(Element::new("toast")),
    )
    .unwrap();
    let mut visibility = AssistiveVisibility::new();
    let dialog = OverlayId::from("dialog");

    visibility.hide_others(&mut doc, &dialog, &[]);

    assert!(doc.is_aria_hidden("app"));
    assert!(doc.is_aria_hidden("toast"));
    assert!(!doc.is_aria_hidden("portal"));
    assert!(!doc.is_hidden_from_assistive_tech("dialog-close"));
    assert!(visibility.is_holding(&dialog));

    visibility.release(&mut doc, &dialog);

    assert!(!doc.is_aria_hidden("app"));
    assert!(!doc.is_aria_hidden("toast"));
    assert!(!visibility.is_holding(&dialog));
}

#[test]
fn test_hide_others_is_idempotent_per_overlay() {
    let mut doc = page();
    doc.mount(Document::ROOT, modal("dialog")).unwrap();
    let mut visibility = AssistiveVisibility::new();
    let dialog = OverlayId::from("dialog");

    visibility.hide_others(&mut doc, &dialog, &[]);
    visibility.hide_others(&mut doc, &dialog, &[]);
    assert_eq!(visibility.count("main"), 1);

    visibility.release(&mut doc, &dialog);
    visibility.release(&mut doc, &dialog);
    assert!(!doc.is_aria_hidden("main"));
}

// ============================================================================
// Reference Counting
// ============================================================================

#[test]
fn test_shared_nodes_stay_hidden_until_last_release() {
    let mut doc = page();
    let mut overlays = OverlayManager::new();
    doc.mount(Document::ROOT, modal("first")).unwrap();
    overlays.open(&mut doc, OverlayRequest::modal("first")).unwrap();

    doc.mount(Document::ROOT, modal("second")).unwrap();
    overlays
        .open(&mut doc, OverlayRequest::modal("second"))
        .unwrap();

    assert_eq!(overlays.visibility().count("main"), 2);
    assert!(!doc.is_aria_hidden("first"));

    overlays.close(&mut doc, &OverlayId::from("second"), CloseReason::Explicit);
    assert!(doc.is_aria_hidden("main"));
    assert_eq!(overlays.visibility().count("main"), 1);

    overlays.close(&mut doc, &OverlayId::from("first"), CloseReason::Explicit);
    assert!(!doc.is_aria_hidden("main"));
}

#[test]
fn test_host_hidden_nodes_stay_hidden() {
    let mut doc = Document::new();
    doc.mount(Document::ROOT, Element::new("legacy").aria_hidden(true))
        .unwrap();
    doc.mount(Document::ROOT, Element::new("nav")).unwrap();
    doc.mount(Document::ROOT, modal("dialog")).unwrap();
    let mut overlays = OverlayManager::new();

    overlays
        .open(&mut doc, OverlayRequest::modal("dialog"))
        .unwrap();
    overlays.close(&mut doc, &OverlayId::from("dialog"), CloseReason::Explicit);

    assert!(doc.is_aria_hidden("legacy"));
    assert!(!doc.is_aria_hidden("nav"));
}

// ============================================================================
// Overlays Opened Inside Hidden Content
// ============================================================================

#[test]
fn test_premounted_child_overlay_is_revealed_while_open() {
    let mut doc = page();
    doc.mount(Document::ROOT, modal("dialog")).unwrap();
    doc.mount(
        Document::ROOT,
        Element::new("tip").child(Element::new("tip-text")),
    )
    .unwrap();
    let mut overlays = OverlayManager::new();

    overlays
        .open(&mut doc, OverlayRequest::modal("dialog"))
        .unwrap();
    assert!(doc.is_aria_hidden("tip"));

    overlays
        .open(&mut doc, OverlayRequest::tooltip("tip").parent("dialog"))
        .unwrap();

    assert!(!doc.is_aria_hidden("tip"));
    assert!(!doc.is_hidden_from_assistive_tech("tip-text"));
    assert!(overlays.visibility().is_sheltered("tip"));
    assert!(doc.is_aria_hidden("main"));

    overlays.close(&mut doc, &OverlayId::from("tip"), CloseReason::Explicit);
    assert!(doc.is_aria_hidden("tip"));
    assert!(!overlays.visibility().is_sheltered("tip"));

    overlays.close(&mut doc, &OverlayId::from("dialog"), CloseReason::Explicit);
    assert!(!doc.is_aria_hidden("tip"));
    assert!(!doc.is_aria_hidden("main"));
}

#[test]
fn test_overlay_in_hidden_portal_reveals_its_chain() {
    let mut doc = page();
    doc.mount(
        Document::ROOT,
        Element::new("portal").child(Element::new("menu").child(Element::button("menu-item"))),
    )
    .unwrap();
    doc.mount(Document::ROOT, modal("dialog")).unwrap();
    let mut overlays = OverlayManager::new();
    overlays
        .open(&mut doc, OverlayRequest::modal("dialog"))
        .unwrap();
    assert!(doc.is_hidden_from_assistive_tech("menu-item"));

    overlays
        .open(&mut doc, OverlayRequest::popover("menu").parent("dialog"))
        .unwrap();

    assert!(!doc.is_aria_hidden("portal"));
    assert!(!doc.is_hidden_from_assistive_tech("menu-item"));
    assert_eq!(overlays.visibility().count("portal"), 1);

    overlays.teardown(&mut doc);
    assert!(!doc.is_aria_hidden("portal"));
    assert_eq!(overlays.visibility().count("portal"), 0);
}

#[test]
fn test_shelter_leaves_host_hidden_nodes_alone() {
    let mut doc = Document::new();
    doc.mount(
        Document::ROOT,
        Element::new("legacy")
            .aria_hidden(true)
            .child(Element::new("tip")),
    )
    .unwrap();
    doc.mount(Document::ROOT, modal("dialog")).unwrap();
    let mut overlays = OverlayManager::new();

    overlays
        .open(&mut doc, OverlayRequest::modal("dialog"))
        .unwrap();
    overlays
        .open(&mut doc, OverlayRequest::tooltip("tip").parent("dialog"))
        .unwrap();
    overlays.teardown(&mut doc);

    assert!(doc.is_aria_hidden("legacy"));
}

// ============================================================================
// Release On Every Close Path
// ============================================================================

fn dismissable_dialog() -> Element {
    Element::new("dialog").child(
        Element::new("dialog-panel").child(Element::close_button("dialog-close")),
    )
}

fn open_dismissable(doc: &mut Document, overlays: &mut OverlayManager) {
    doc.mount(Document::ROOT, dismissable_dialog()).unwrap();
    overlays
        .open(
            doc,
            OverlayRequest::modal("dialog")
                .policy(DismissPolicy::Topmost)
                .content("dialog-panel"),
        )
        .unwrap();
    assert_eq!(doc.focused(), Some("dialog-close"));
    assert!(doc.is_aria_hidden("main"));
}

fn assert_released(doc: &Document, overlays: &OverlayManager) {
    assert!(overlays.registry().is_empty());
    assert!(overlays.active_trap().is_none());
    assert_eq!(doc.focused(), Some("trigger"));
    for id in ["header", "main", "footer"] {
        assert!(!doc.is_aria_hidden(id), "{id} should be revealed");
    }
}

#[test]
fn test_release_on_explicit_close() {
    let mut doc = page();
    let mut overlays = OverlayManager::new();
    open_dismissable(&mut doc, &mut overlays);

    overlays.close(&mut doc, &OverlayId::from("dialog"), CloseReason::Explicit);

    assert_released(&doc, &overlays);
}

#[test]
fn test_release_on_escape() {
    let mut doc = page();
    let mut overlays = OverlayManager::new();
    open_dismissable(&mut doc, &mut overlays);

    overlays.handle_event(&mut doc, &Event::key(Key::Escape));

    assert_released(&doc, &overlays);
}

#[test]
fn test_release_on_outside_click() {
    let mut doc = page();
    let mut overlays = OverlayManager::new();
    open_dismissable(&mut doc, &mut overlays);

    overlays.handle_event(&mut doc, &Event::click("dialog"));

    assert_released(&doc, &overlays);
}

#[test]
fn test_release_on_unmount() {
    let mut doc = page();
    let mut overlays = OverlayManager::new();
    open_dismissable(&mut doc, &mut overlays);

    overlays.unmount(&mut doc, &OverlayId::from("dialog"));

    assert_released(&doc, &overlays);
    assert!(!doc.is_attached("dialog"));
}

#[test]
fn test_release_on_parent_close() {
    let mut doc = page();
    let mut overlays = OverlayManager::new();
    doc.mount(Document::ROOT, Element::new("launcher")).unwrap();
    overlays
        .open(&mut doc, OverlayRequest::new("launcher"))
        .unwrap();
    doc.mount(Document::ROOT, dismissable_dialog()).unwrap();
    overlays
        .open(
            &mut doc,
            OverlayRequest::modal("dialog").parent("launcher"),
        )
        .unwrap();

    overlays.close(&mut doc, &OverlayId::from("launcher"), CloseReason::Explicit);

    assert_released(&doc, &overlays);
    assert!(!doc.is_aria_hidden("launcher"));
}

#[test]
fn test_release_on_teardown() {
    let mut doc = page();
    let mut overlays = OverlayManager::new();
    open_dismissable(&mut doc, &mut overlays);

    overlays.teardown(&mut doc);

    assert_released(&doc, &overlays);
}
