use std::fs::File;

use popstack::{
    CloseReason, Document, Element, Event, Key, OverlayId, OverlayManager, OverlayRequest,
    StackConfig, StackError, StackEvent,
};
use simplelog::{Config, LevelFilter, WriteLogger};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Set up file logging
    let log_file = File::create("nested.log")?;
    WriteLogger::init(LevelFilter::Debug, Config::default(), log_file)?;

    let mut doc = page()?;
    let mut overlays = OverlayManager::with_config(StackConfig::default());
    let mut events = overlays.subscribe();

    doc.focus("open-settings");

    // A modal with a popover spawned from one of its buttons
    doc.mount(Document::ROOT, settings_modal())?;
    overlays.open(&mut doc, OverlayRequest::modal("settings"))?;

    doc.mount(Document::ROOT, theme_menu())?;
    overlays.open(&mut doc, OverlayRequest::popover("theme-menu").parent("settings"))?;

    print_stack(&overlays);

    // Escape closes the menu only; the modal keeps focus
    overlays.handle_event(&mut doc, &Event::key(Key::Escape));
    print_stack(&overlays);
    println!("focus: {:?}", doc.focused());

    // Clicking the page does nothing: the modal has no outside-click policy
    overlays.handle_event(&mut doc, &Event::click("main"));
    print_stack(&overlays);

    // Closing the modal restores focus to the button that opened it
    overlays.close(&mut doc, &OverlayId::from("settings"), CloseReason::Explicit);
    println!("focus: {:?}", doc.focused());
    println!("main hidden: {}", doc.is_hidden_from_assistive_tech("main"));

    while let Ok(event) = events.try_recv() {
        println!("event: {:?}", event);
    }

    let empty = Element::new("empty-modal");
    doc.mount(Document::ROOT, empty)?;
    match overlays.open(&mut doc, OverlayRequest::modal("empty-modal")) {
        Err(StackError::NoFocusableElement(id)) => println!("rejected '{}': nothing to focus", id),
        other => println!("unexpected: {:?}", other),
    }
    if let Ok(StackEvent::Opened { .. }) = events.try_recv() {
        println!("a rejected overlay must not be announced");
    }

    overlays.teardown(&mut doc);
    Ok(())
}

fn page() -> Result<Document, StackError> {
    let mut doc = Document::new();
    doc.mount(
        Document::ROOT,
        Element::new("main")
            .child(Element::button("open-settings"))
            .child(Element::button("search")),
    )?;
    Ok(doc)
}

fn settings_modal() -> Element {
    Element::new("settings")
        .child(Element::heading("settings-title"))
        .child(Element::button("theme"))
        .child(Element::button("save"))
        .child(Element::close_button("settings-close"))
}

fn theme_menu() -> Element {
    Element::new("theme-menu")
        .child(Element::button("theme-light"))
        .child(Element::button("theme-dark"))
}

fn print_stack(overlays: &OverlayManager) {
    let stack: Vec<String> = overlays
        .registry()
        .entries()
        .iter()
        .map(|entry| format!("{}@{}", entry.id, entry.z_index))
        .collect();
    println!("stack: [{}]", stack.join(", "));
}
