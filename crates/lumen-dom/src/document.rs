//! Document - High-level document API
//!
//! Wraps the tree with the pieces of browser state the accessibility
//! layer touches: cached `<html>`/`<head>`/`<body>`, focus, scroll
//! requests and event listeners.

use crate::events::Listener;
use crate::{DOMRect, DomTree, EventKind, ListenerId, NodeId, UiEvent};

/// `scrollIntoView` behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollBehavior {
    #[default]
    Auto,
    Smooth,
}

/// Last scroll requested through `scroll_into_view`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollRequest {
    pub target: NodeId,
    pub behavior: ScrollBehavior,
}

/// HTML Document
#[derive(Debug)]
pub struct Document {
    /// The DOM tree
    pub tree: DomTree,
    url: String,
    html_element: NodeId,
    head_element: NodeId,
    body_element: NodeId,
    active_element: Option<NodeId>,
    pending_events: Vec<UiEvent>,
    last_scroll: Option<ScrollRequest>,
    listeners: Vec<Listener>,
    next_listener: u32,
}

impl Document {
    /// Create a document with empty `<html>`, `<head>` and `<body>`
    pub fn new(url: &str) -> Self {
        Self::from_tree(url, DomTree::new())
    }

    /// Adopt a parsed tree, creating any missing `<html>`/`<head>`/`<body>`
    pub fn from_tree(url: &str, mut tree: DomTree) -> Self {
        let root = tree.root();
        let html = find_or_create(&mut tree, root, "html", false);
        let head = find_or_create(&mut tree, html, "head", true);
        let body = find_or_create(&mut tree, html, "body", false);

        Self {
            tree,
            url: url.to_string(),
            html_element: html,
            head_element: head,
            body_element: body,
            active_element: None,
            pending_events: Vec::new(),
            last_scroll: None,
            listeners: Vec::new(),
            next_listener: 0,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Text of the first `<title>` in `<head>`
    pub fn title(&self) -> String {
        self.tree
            .element_children(self.head_element)
            .find(|&n| self.tree.is_tag(n, "title"))
            .map(|title| self.tree.text_content(title).trim().to_string())
            .unwrap_or_default()
    }

    /// Get <html> element
    pub fn document_element(&self) -> NodeId {
        self.html_element
    }

    pub fn head(&self) -> NodeId {
        self.head_element
    }

    pub fn body(&self) -> NodeId {
        self.body_element
    }

    pub fn tree(&self) -> &DomTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut DomTree {
        &mut self.tree
    }

    /// First connected element whose id attribute equals `id`
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        if id.is_empty() {
            return None;
        }
        self.tree
            .descendants(self.tree.root())
            .into_iter()
            .find(|&n| self.tree.element(n).and_then(|e| e.id()) == Some(id))
    }

    // ------------------------------------------------------------------
    // Focus
    // ------------------------------------------------------------------

    /// Focused element, if it is still connected
    pub fn active_element(&self) -> Option<NodeId> {
        self.active_element.filter(|&n| self.tree.is_connected(n))
    }

    /// Move focus to `node`, queueing a `FocusIn` event for the host
    pub fn focus(&mut self, node: NodeId) -> bool {
        if !self.tree.is_element(node) || !self.tree.is_connected(node) {
            return false;
        }
        if self.active_element == Some(node) {
            return true;
        }
        self.active_element = Some(node);
        self.pending_events.push(UiEvent::FocusIn { target: node });
        true
    }

    pub fn blur(&mut self) {
        self.active_element = None;
    }

    /// Drain events raised by programmatic actions such as `focus`
    pub fn take_pending_events(&mut self) -> Vec<UiEvent> {
        std::mem::take(&mut self.pending_events)
    }

    // ------------------------------------------------------------------
    // Scrolling and geometry
    // ------------------------------------------------------------------

    pub fn scroll_into_view(&mut self, node: NodeId, behavior: ScrollBehavior) {
        self.last_scroll = Some(ScrollRequest {
            target: node,
            behavior,
        });
    }

    pub fn last_scroll_request(&self) -> Option<ScrollRequest> {
        self.last_scroll
    }

    /// `getBoundingClientRect`, zero-sized when not laid out
    pub fn bounding_client_rect(&self, node: NodeId) -> DOMRect {
        self.tree.geometry(node).bounding.unwrap_or_default()
    }

    // ------------------------------------------------------------------
    // Event listeners
    // ------------------------------------------------------------------

    pub fn add_event_listener(&mut self, target: NodeId, kind: EventKind) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push(Listener { id, target, kind });
        tracing::trace!(?id, ?target, ?kind, "event listener added");
        id
    }

    pub fn remove_event_listener(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|l| l.id != id);
        before != self.listeners.len()
    }

    pub fn has_listener(&self, id: ListenerId) -> bool {
        self.listeners.iter().any(|l| l.id == id)
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Listeners reached by `event`, walking from the target up to the document
    pub fn listeners_for(&self, event: &UiEvent) -> Vec<ListenerId> {
        let kind = event.kind();
        let mut out = Vec::new();
        let mut current = Some(event.target());
        while let Some(node) = current {
            out.extend(
                self.listeners
                    .iter()
                    .filter(|l| l.kind == kind && l.target == node)
                    .map(|l| l.id),
            );
            current = self.tree.parent(node);
        }
        out
    }
}

fn find_or_create(tree: &mut DomTree, parent: NodeId, tag: &str, prepend: bool) -> NodeId {
    let existing = tree.element_children(parent).find(|&n| tree.is_tag(n, tag));
    if let Some(node) = existing {
        return node;
    }
    let node = tree.create_element(tag);
    // fresh element under a live parent, cannot fail
    let _ = if prepend {
        tree.prepend_child(parent, node)
    } else {
        tree.append_child(parent, node)
    };
    node
}

impl Default for Document {
    fn default() -> Self {
        Self::new("about:blank")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_document_structure() {
        let doc = Document::default();
        let tree = doc.tree();
        assert_eq!(tree.tag_name(doc.document_element()), Some("html"));
        assert_eq!(tree.parent(doc.head()), Some(doc.document_element()));
        assert_eq!(tree.parent(doc.body()), Some(doc.document_element()));
        assert_eq!(doc.url(), "about:blank");
    }

    #[test]
    fn test_get_element_by_id_ignores_detached() {
        let mut doc = Document::default();
        let body = doc.body();
        let div = doc.tree.create_element("div");
        doc.tree.set_attribute(div, "id", "main");
        doc.tree.append_child(body, div).unwrap();
        assert_eq!(doc.get_element_by_id("main"), Some(div));

        doc.tree.detach(div);
        assert_eq!(doc.get_element_by_id("main"), None);
    }

    #[test]
    fn test_focus_queues_event() {
        let mut doc = Document::default();
        let body = doc.body();
        let button = doc.tree.create_element("button");
        doc.tree.append_child(body, button).unwrap();

        assert!(doc.focus(button));
        assert_eq!(doc.active_element(), Some(button));
        assert_eq!(
            doc.take_pending_events(),
            vec![UiEvent::FocusIn { target: button }]
        );

        // Refocusing the same element raises nothing
        doc.focus(button);
        assert!(doc.take_pending_events().is_empty());

        let detached = doc.tree.create_element("a");
        assert!(!doc.focus(detached));
    }

    #[test]
    fn test_listener_bubbling() {
        let mut doc = Document::default();
        let body = doc.body();
        let link = doc.tree.create_element("a");
        doc.tree.append_child(body, link).unwrap();

        let on_doc = doc.add_event_listener(doc.tree.root(), EventKind::Click);
        let on_link = doc.add_event_listener(link, EventKind::Click);
        doc.add_event_listener(link, EventKind::FocusIn);

        let event = UiEvent::Click { target: link };
        assert_eq!(doc.listeners_for(&event), vec![on_link, on_doc]);

        assert!(doc.remove_event_listener(on_link));
        assert_eq!(doc.listeners_for(&event), vec![on_doc]);
        assert_eq!(doc.listener_count(), 2);
    }
}
