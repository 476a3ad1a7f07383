//! Comprehensive tests for lumen-dom
//!
//! Exercises the tree, selectors, observers and document state together.

use lumen_dom::{
    Document, EventKind, MutationObserverInit, MutationType, ScrollBehavior, UiEvent, Window,
};

fn page() -> Document {
    let mut doc = Document::new("https://example.com/");
    let body = doc.body();
    let tree = &mut doc.tree;

    let nav = tree.create_element("nav");
    let main = tree.create_element("main");
    let section = tree.create_element("section");
    let heading = tree.create_element("h2");
    let title = tree.create_text("Latest");
    let img = tree.create_element("img");

    tree.append_child(body, nav).unwrap();
    tree.append_child(body, main).unwrap();
    tree.append_child(main, section).unwrap();
    tree.append_child(section, heading).unwrap();
    tree.append_child(heading, title).unwrap();
    tree.append_child(section, img).unwrap();
    tree.set_attribute(main, "id", "content");
    tree.set_attribute(img, "alt", "Cat");
    doc
}

#[test]
fn test_query_selector_in_document_order() {
    let doc = page();
    let tree = doc.tree();

    let found = tree.query_selector_all(tree.root(), "nav, main, h2");
    let tags: Vec<_> = found.iter().filter_map(|&n| tree.tag_name(n)).collect();
    assert_eq!(tags, vec!["nav", "main", "h2"]);

    assert!(tree.query_selector(tree.root(), "main > section > img[alt=Cat]").is_some());
    assert!(tree.query_selector(tree.root(), "nav img").is_none());
}

#[test]
fn test_invalid_selector_matches_nothing() {
    let doc = page();
    let tree = doc.tree();
    assert!(tree.query_selector_all(tree.root(), "main >").is_empty());
    assert!(!tree.matches(doc.body(), "[unterminated"));
}

#[test]
fn test_closest_walks_ancestors() {
    let doc = page();
    let tree = doc.tree();
    let img = tree.query_selector(tree.root(), "img").unwrap();
    let main = doc.get_element_by_id("content").unwrap();

    assert_eq!(tree.closest(img, "main"), Some(main));
    assert_eq!(tree.closest(img, "img"), Some(img));
    assert_eq!(tree.closest(img, "aside"), None);
}

#[test]
fn test_detached_nodes_leave_queries() {
    let mut doc = page();
    let img = doc.tree.query_selector(doc.tree.root(), "img").unwrap();
    doc.tree.detach(img);
    assert!(doc.tree.query_selector(doc.tree.root(), "img").is_none());
    // Still addressable
    assert_eq!(doc.tree.get_attribute(img, "alt"), Some("Cat"));
}

#[test]
fn test_observer_sees_nested_insertions_only_under_target() {
    let mut doc = page();
    let body = doc.body();
    let head = doc.head();
    let observer = doc
        .tree
        .observe(body, MutationObserverInit::child_list_subtree());

    let section = doc.tree.query_selector(body, "section").unwrap();
    let extra = doc.tree.create_element("img");
    doc.tree.append_child(section, extra).unwrap();
    let style = doc.tree.create_element("style");
    doc.tree.append_child(head, style).unwrap();

    let records = doc.tree.take_records(observer);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].mutation_type, MutationType::ChildList);
    assert_eq!(records[0].target, section);

    doc.tree.detach(extra);
    let records = doc.tree.take_records(observer);
    assert_eq!(records[0].removed_nodes, vec![extra]);

    assert!(doc.tree.disconnect(observer));
    assert!(!doc.tree.disconnect(observer));
}

#[test]
fn test_attribute_observation_is_opt_in() {
    let mut doc = page();
    let body = doc.body();
    let observer = doc.tree.observe(
        body,
        MutationObserverInit {
            attributes: true,
            subtree: true,
            ..Default::default()
        },
    );
    let img = doc.tree.query_selector(body, "img").unwrap();
    doc.tree.set_attribute(img, "aria-hidden", "true");
    doc.tree.remove_attribute(img, "missing");

    let records = doc.tree.take_records(observer);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].attribute_name.as_deref(), Some("aria-hidden"));
}

#[test]
fn test_focus_scroll_and_listeners() {
    let mut doc = page();
    let main = doc.get_element_by_id("content").unwrap();
    let listener = doc.add_event_listener(doc.tree.root(), EventKind::FocusIn);

    assert!(doc.focus(main));
    doc.scroll_into_view(main, ScrollBehavior::Smooth);

    let events = doc.take_pending_events();
    assert_eq!(events, vec![UiEvent::FocusIn { target: main }]);
    assert_eq!(doc.listeners_for(&events[0]), vec![listener]);
    let scroll = doc.last_scroll_request().unwrap();
    assert_eq!(scroll.target, main);
    assert_eq!(scroll.behavior, ScrollBehavior::Smooth);

    doc.tree.detach(main);
    assert_eq!(doc.active_element(), None);
}

#[test]
fn test_window_wraps_document() {
    let mut window = Window::with_document(page());
    let doc = window.document_mut().unwrap();
    let body = doc.body();
    doc.tree.set_style_property(body, "--accessibility-text-scale", "1.25");
    assert_eq!(
        window
            .document()
            .map(|d| d.tree.style_property(d.body(), "--accessibility-text-scale")),
        Some("1.25".to_string())
    );
}
