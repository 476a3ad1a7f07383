//! DOM Tree (arena-based allocation)
//!
//! Nodes are never freed; detaching a node only unlinks it, so a stale
//! `NodeId` stays safe to look up. Everything that walks the document
//! (`descendants`, selector queries) only sees connected nodes.

use crate::observer::{MutationObserverInit, MutationRecord, ObserverId, ObserverRegistry};
use crate::{
    CssStyleDeclaration, DOMTokenList, DomError, DomResult, ElementData, ElementGeometry, Node,
    NodeData, NodeId, SelectorList,
};

/// Arena-based DOM tree
#[derive(Debug)]
pub struct DomTree {
    nodes: Vec<Node>,
    observers: ObserverRegistry,
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

impl DomTree {
    /// Create a tree holding only the document node
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::document()],
            observers: ObserverRegistry::default(),
        }
    }

    /// Document node
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Number of allocated nodes, detached ones included
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0 as usize)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0 as usize)
    }

    fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.push(Node::element(tag))
    }

    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.push(Node::text(text))
    }

    pub fn create_comment(&mut self, text: &str) -> NodeId {
        self.push(Node::comment(text))
    }

    // ------------------------------------------------------------------
    // Structure
    // ------------------------------------------------------------------

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).map(|n| n.parent).filter(|p| p.is_valid())
    }

    /// Child node IDs in document order
    pub fn children(&self, id: NodeId) -> Children<'_> {
        Children {
            tree: self,
            next: self.get(id).map_or(NodeId::NONE, |n| n.first_child),
        }
    }

    pub fn element_children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children(id).filter(move |&c| self.is_element(c))
    }

    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).map(|n| n.first_child).filter(|c| c.is_valid())
    }

    /// All nodes below `id` in pre-order, `id` itself excluded
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).collect();
        stack.reverse();
        while let Some(node) = stack.pop() {
            out.push(node);
            let start = stack.len();
            stack.extend(self.children(node));
            stack[start..].reverse();
        }
        out
    }

    /// Whether `node` is `ancestor` or lies below it
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    /// Whether the node is reachable from the document node
    pub fn is_connected(&self, id: NodeId) -> bool {
        self.get(id).is_some() && self.contains(self.root(), id)
    }

    /// Insert `child` into `parent` before `reference` (append when `None`)
    pub fn insert_before(
        &mut self,
        parent: NodeId,
        child: NodeId,
        reference: Option<NodeId>,
    ) -> DomResult<()> {
        let parent_node = self.get(parent).ok_or(DomError::NotFound(parent))?;
        if !parent_node.can_have_children() {
            return Err(DomError::InvalidNodeType(parent));
        }
        if self.get(child).is_none() {
            return Err(DomError::NotFound(child));
        }
        if child == NodeId::ROOT || self.contains(child, parent) {
            return Err(DomError::HierarchyRequest { parent, child });
        }
        if let Some(reference) = reference {
            if self.parent(reference) != Some(parent) {
                return Err(DomError::NotAChild {
                    parent,
                    child: reference,
                });
            }
            if reference == child {
                return Ok(());
            }
        }

        self.unlink(child);

        let (prev, next) = match reference {
            Some(reference) => (self.nodes[reference.0 as usize].prev_sibling, reference),
            None => (self.nodes[parent.0 as usize].last_child, NodeId::NONE),
        };
        {
            let node = &mut self.nodes[child.0 as usize];
            node.parent = parent;
            node.prev_sibling = prev;
            node.next_sibling = next;
        }
        if prev.is_valid() {
            self.nodes[prev.0 as usize].next_sibling = child;
        } else {
            self.nodes[parent.0 as usize].first_child = child;
        }
        if next.is_valid() {
            self.nodes[next.0 as usize].prev_sibling = child;
        } else {
            self.nodes[parent.0 as usize].last_child = child;
        }

        self.notify(MutationRecord::child_added(parent, child));
        Ok(())
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<()> {
        self.insert_before(parent, child, None)
    }

    pub fn prepend_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<()> {
        let first = self.first_child(parent);
        self.insert_before(parent, child, first)
    }

    /// Insert `node` immediately after `reference`
    pub fn insert_after(&mut self, reference: NodeId, node: NodeId) -> DomResult<()> {
        let parent = self
            .parent(reference)
            .ok_or(DomError::NotFound(reference))?;
        let next = self.get(reference).map(|n| n.next_sibling).filter(|n| n.is_valid());
        self.insert_before(parent, node, next)
    }

    /// Unlink a node from its parent; no-op when already detached
    pub fn detach(&mut self, id: NodeId) {
        self.unlink(id);
    }

    fn unlink(&mut self, id: NodeId) {
        let Some(node) = self.get(id) else {
            return;
        };
        let (parent, prev, next) = (node.parent, node.prev_sibling, node.next_sibling);
        if !parent.is_valid() {
            return;
        }
        if prev.is_valid() {
            self.nodes[prev.0 as usize].next_sibling = next;
        } else {
            self.nodes[parent.0 as usize].first_child = next;
        }
        if next.is_valid() {
            self.nodes[next.0 as usize].prev_sibling = prev;
        } else {
            self.nodes[parent.0 as usize].last_child = prev;
        }
        let node = &mut self.nodes[id.0 as usize];
        node.parent = NodeId::NONE;
        node.prev_sibling = NodeId::NONE;
        node.next_sibling = NodeId::NONE;

        self.notify(MutationRecord::child_removed(parent, id));
    }

    // ------------------------------------------------------------------
    // Elements and attributes
    // ------------------------------------------------------------------

    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        self.get(id).and_then(Node::as_element)
    }

    fn element_mut(&mut self, id: NodeId) -> Option<&mut ElementData> {
        self.get_mut(id).and_then(Node::as_element_mut)
    }

    pub fn is_element(&self, id: NodeId) -> bool {
        self.element(id).is_some()
    }

    /// Lowercase tag name
    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(|e| e.tag.as_str())
    }

    pub fn is_tag(&self, id: NodeId, tag: &str) -> bool {
        self.tag_name(id).is_some_and(|t| t.eq_ignore_ascii_case(tag))
    }

    pub fn get_attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id).and_then(|e| e.get_attr(name))
    }

    pub fn has_attribute(&self, id: NodeId, name: &str) -> bool {
        self.get_attribute(id, name).is_some()
    }

    /// Set an attribute; ignored for non-element nodes
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) {
        let Some(element) = self.element_mut(id) else {
            return;
        };
        element.attrs.set_attribute(name, value);
        self.notify(MutationRecord::attribute(id, name));
    }

    /// Remove an attribute, returning its previous value
    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> Option<String> {
        let removed = self
            .element_mut(id)
            .and_then(|e| e.attrs.remove_named_item(name))
            .map(|a| a.value);
        if removed.is_some() {
            self.notify(MutationRecord::attribute(id, name));
        }
        removed
    }

    pub fn class_list(&self, id: NodeId) -> DOMTokenList {
        DOMTokenList::from_string(self.get_attribute(id, "class").unwrap_or(""))
    }

    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.element(id).is_some_and(|e| e.has_class(class))
    }

    pub fn add_class(&mut self, id: NodeId, class: &str) {
        let mut list = self.class_list(id);
        if !list.contains(class) {
            list.add(class);
            self.set_attribute(id, "class", &list.value());
        }
    }

    /// Remove a class; the attribute goes away once it is empty
    pub fn remove_class(&mut self, id: NodeId, class: &str) {
        let mut list = self.class_list(id);
        if !list.contains(class) {
            return;
        }
        list.remove(class);
        if list.is_empty() {
            self.remove_attribute(id, "class");
        } else {
            self.set_attribute(id, "class", &list.value());
        }
    }

    // ------------------------------------------------------------------
    // Text
    // ------------------------------------------------------------------

    /// Concatenated text of all descendant text nodes
    pub fn text_content(&self, id: NodeId) -> String {
        if let Some(text) = self.get(id).and_then(Node::as_text) {
            return text.to_string();
        }
        self.descendants(id)
            .into_iter()
            .filter_map(|n| self.get(n).and_then(Node::as_text))
            .collect()
    }

    /// Replace all children with a single text node (none if empty)
    pub fn set_text_content(&mut self, id: NodeId, text: &str) {
        match self.get_mut(id).map(|n| &mut n.data) {
            Some(NodeData::Text(content)) => {
                *content = text.to_string();
                return;
            }
            Some(NodeData::Element(_) | NodeData::Document) => {}
            _ => return,
        }
        let children: Vec<NodeId> = self.children(id).collect();
        for child in children {
            self.unlink(child);
        }
        if !text.is_empty() {
            let node = self.create_text(text);
            // parent is a live element and node is fresh, so this cannot fail
            let _ = self.append_child(id, node);
        }
    }

    // ------------------------------------------------------------------
    // Inline style
    // ------------------------------------------------------------------

    pub fn style(&self, id: NodeId) -> CssStyleDeclaration {
        CssStyleDeclaration::parse(self.get_attribute(id, "style").unwrap_or(""))
    }

    /// Inline style property value, empty string when unset
    pub fn style_property(&self, id: NodeId, name: &str) -> String {
        self.style(id).get_property_value(name).to_string()
    }

    /// Set an inline style property; an empty value removes it
    pub fn set_style_property(&mut self, id: NodeId, name: &str, value: &str) {
        if !self.is_element(id) {
            return;
        }
        let mut style = self.style(id);
        style.set_property(name, value);
        if style.is_empty() {
            self.remove_attribute(id, "style");
        } else {
            self.set_attribute(id, "style", &style.css_text());
        }
    }

    // ------------------------------------------------------------------
    // Geometry
    // ------------------------------------------------------------------

    pub fn geometry(&self, id: NodeId) -> ElementGeometry {
        self.element(id).map(|e| e.geometry).unwrap_or_default()
    }

    pub fn set_geometry(&mut self, id: NodeId, geometry: ElementGeometry) {
        if let Some(element) = self.element_mut(id) {
            element.geometry = geometry;
        }
    }

    // ------------------------------------------------------------------
    // Selectors
    // ------------------------------------------------------------------

    /// Connected elements below `root` matching `selector`, in document order
    pub fn query_selector_all(&self, root: NodeId, selector: &str) -> Vec<NodeId> {
        match SelectorList::parse(selector) {
            Ok(list) => self.select_all(root, &list),
            Err(err) => {
                tracing::debug!(%err, selector, "invalid selector");
                Vec::new()
            }
        }
    }

    pub fn query_selector(&self, root: NodeId, selector: &str) -> Option<NodeId> {
        self.query_selector_all(root, selector).into_iter().next()
    }

    pub fn select_all(&self, root: NodeId, list: &SelectorList) -> Vec<NodeId> {
        self.descendants(root)
            .into_iter()
            .filter(|&n| list.matches(self, n))
            .collect()
    }

    pub fn matches(&self, id: NodeId, selector: &str) -> bool {
        SelectorList::parse(selector).is_ok_and(|list| list.matches(self, id))
    }

    /// Nearest inclusive ancestor matching `selector`
    pub fn closest(&self, id: NodeId, selector: &str) -> Option<NodeId> {
        let list = SelectorList::parse(selector).ok()?;
        let mut current = Some(id);
        while let Some(node) = current {
            if list.matches(self, node) {
                return Some(node);
            }
            current = self.parent(node);
        }
        None
    }

    // ------------------------------------------------------------------
    // Mutation observation
    // ------------------------------------------------------------------

    pub fn observe(&mut self, target: NodeId, options: MutationObserverInit) -> ObserverId {
        self.observers.observe(target, options)
    }

    pub fn disconnect(&mut self, observer: ObserverId) -> bool {
        self.observers.disconnect(observer)
    }

    pub fn take_records(&mut self, observer: ObserverId) -> Vec<MutationRecord> {
        self.observers.take_records(observer)
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    fn notify(&mut self, record: MutationRecord) {
        if self.observers.is_empty() {
            return;
        }
        let target = record.target;
        let interested: Vec<bool> = self
            .observers
            .registrations()
            .map(|r| {
                r.wants(&record)
                    && (r.target == target
                        || (r.options.subtree && self.contains(r.target, target)))
            })
            .collect();
        for (registration, wanted) in self.observers.registrations_mut().zip(interested) {
            if wanted {
                registration.records.push(record.clone());
            }
        }
    }
}

/// Iterator over a node's children
pub struct Children<'a> {
    tree: &'a DomTree,
    next: NodeId,
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        if !self.next.is_valid() {
            return None;
        }
        let current = self.next;
        self.next = self.tree.get(current).map_or(NodeId::NONE, |n| n.next_sibling);
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_and_siblings() {
        let mut tree = DomTree::new();
        let div = tree.create_element("div");
        let a = tree.create_element("p");
        let b = tree.create_element("p");
        tree.append_child(tree.root(), div).unwrap();
        tree.append_child(div, a).unwrap();
        tree.append_child(div, b).unwrap();

        assert_eq!(tree.children(div).collect::<Vec<_>>(), vec![a, b]);
        assert_eq!(tree.descendants(tree.root()), vec![div, a, b]);
    }

    #[test]
    fn test_insert_after_and_prepend() {
        let mut tree = DomTree::new();
        let div = tree.create_element("div");
        let a = tree.create_element("a");
        let b = tree.create_element("b");
        let c = tree.create_element("i");
        tree.append_child(tree.root(), div).unwrap();
        tree.append_child(div, a).unwrap();
        tree.insert_after(a, b).unwrap();
        tree.prepend_child(div, c).unwrap();

        assert_eq!(tree.children(div).collect::<Vec<_>>(), vec![c, a, b]);
    }

    #[test]
    fn test_detach_keeps_id_valid() {
        let mut tree = DomTree::new();
        let div = tree.create_element("div");
        let span = tree.create_element("span");
        tree.append_child(tree.root(), div).unwrap();
        tree.append_child(div, span).unwrap();

        tree.detach(span);
        assert!(!tree.is_connected(span));
        assert!(tree.get(span).is_some());
        assert_eq!(tree.children(div).count(), 0);

        // Detaching twice is harmless
        tree.detach(span);
    }

    #[test]
    fn test_hierarchy_errors() {
        let mut tree = DomTree::new();
        let outer = tree.create_element("div");
        let inner = tree.create_element("div");
        let text = tree.create_text("hi");
        tree.append_child(tree.root(), outer).unwrap();
        tree.append_child(outer, inner).unwrap();

        assert!(matches!(
            tree.append_child(inner, outer),
            Err(DomError::HierarchyRequest { .. })
        ));
        assert!(matches!(
            tree.append_child(text, inner),
            Err(DomError::InvalidNodeType(_))
        ));
        assert!(matches!(
            tree.insert_before(tree.root(), text, Some(inner)),
            Err(DomError::NotAChild { .. })
        ));
    }

    #[test]
    fn test_text_content() {
        let mut tree = DomTree::new();
        let p = tree.create_element("p");
        let t1 = tree.create_text("Hello, ");
        let b = tree.create_element("b");
        let t2 = tree.create_text("World");
        tree.append_child(tree.root(), p).unwrap();
        tree.append_child(p, t1).unwrap();
        tree.append_child(p, b).unwrap();
        tree.append_child(b, t2).unwrap();

        assert_eq!(tree.text_content(p), "Hello, World");
        tree.set_text_content(p, "Bye");
        assert_eq!(tree.text_content(p), "Bye");
        assert_eq!(tree.children(p).count(), 1);
        tree.set_text_content(p, "");
        assert_eq!(tree.children(p).count(), 0);
    }

    #[test]
    fn test_class_and_style_helpers() {
        let mut tree = DomTree::new();
        let div = tree.create_element("div");

        tree.add_class(div, "a");
        tree.add_class(div, "b");
        tree.add_class(div, "a");
        assert_eq!(tree.get_attribute(div, "class"), Some("a b"));
        tree.remove_class(div, "a");
        tree.remove_class(div, "b");
        assert!(!tree.has_attribute(div, "class"));

        tree.set_style_property(div, "display", "none");
        assert_eq!(tree.style_property(div, "display"), "none");
        tree.set_style_property(div, "display", "");
        assert!(!tree.has_attribute(div, "style"));
    }

    #[test]
    fn test_observer_receives_subtree_child_list() {
        let mut tree = DomTree::new();
        let body = tree.create_element("body");
        let div = tree.create_element("div");
        tree.append_child(tree.root(), body).unwrap();
        tree.append_child(body, div).unwrap();

        let observer = tree.observe(body, MutationObserverInit::child_list_subtree());
        let img = tree.create_element("img");
        tree.append_child(div, img).unwrap();
        tree.set_attribute(img, "alt", "x");

        let records = tree.take_records(observer);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].added_nodes, vec![img]);
        assert!(tree.take_records(observer).is_empty());

        assert!(tree.disconnect(observer));
        let other = tree.create_element("img");
        tree.append_child(div, other).unwrap();
        assert_eq!(tree.observer_count(), 0);
    }
}
