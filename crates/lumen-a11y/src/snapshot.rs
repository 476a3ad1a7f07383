//! Enhancement bookkeeping
//!
//! `AttributeSnapshot` remembers the value every attribute had before the
//! engine first touched it, so disabling can put the page back exactly.
//! `CreatedElements` lists the nodes the engine inserted.

use std::collections::HashMap;

use lumen_dom::{DomTree, NodeId};

/// First-write-wins record of pre-enhancement attribute values
#[derive(Debug, Default)]
pub struct AttributeSnapshot {
    /// element -> attribute -> original value (`None` when absent)
    entries: HashMap<NodeId, HashMap<String, Option<String>>>,
}

impl AttributeSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remember the current value of `name` unless already recorded
    pub fn record(&mut self, tree: &DomTree, node: NodeId, name: &str) {
        let attrs = self.entries.entry(node).or_default();
        if !attrs.contains_key(name) {
            let original = tree.get_attribute(node, name).map(str::to_string);
            attrs.insert(name.to_string(), original);
        }
    }

    /// Record, then overwrite
    pub fn set(&mut self, tree: &mut DomTree, node: NodeId, name: &str, value: &str) {
        self.record(tree, node, name);
        tree.set_attribute(node, name, value);
    }

    pub fn is_recorded(&self, node: NodeId, name: &str) -> bool {
        self.entries
            .get(&node)
            .is_some_and(|attrs| attrs.contains_key(name))
    }

    /// Number of recorded (element, attribute) pairs
    pub fn len(&self) -> usize {
        self.entries.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Put every recorded attribute back and forget them
    pub fn restore(&mut self, tree: &mut DomTree) {
        for (node, attrs) in self.entries.drain() {
            for (name, original) in attrs {
                match original {
                    Some(value) => tree.set_attribute(node, &name, &value),
                    None => {
                        tree.remove_attribute(node, &name);
                    }
                }
            }
        }
    }
}

/// Nodes inserted by the engine, removed together on teardown
#[derive(Debug, Default)]
pub struct CreatedElements {
    nodes: Vec<NodeId>,
}

impl CreatedElements {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `node`, forgetting entries that have since left the document
    pub fn track(&mut self, tree: &DomTree, node: NodeId) {
        self.nodes.retain(|&n| n != node && tree.is_connected(n));
        self.nodes.push(node);
    }

    /// Stop tracking `node` so teardown leaves it in place
    pub fn forget(&mut self, node: NodeId) -> bool {
        let before = self.nodes.len();
        self.nodes.retain(|&n| n != node);
        self.nodes.len() != before
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.nodes.contains(&node)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Detach everything, newest first
    pub fn remove_all(&mut self, tree: &mut DomTree) {
        for node in self.nodes.drain(..).rev() {
            tree.detach(node);
        }
    }
}
