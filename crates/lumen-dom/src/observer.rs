//! Mutation observation
//!
//! A MutationObserver without callbacks: the tree queues records per
//! observer, and the owner drains them with `take_records`. Disconnecting
//! drops the registration together with any queued records.

use crate::NodeId;

/// Handle returned by `observe`; pass it to `disconnect` to cancel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(pub(crate) u32);

/// Mutation observer options
#[derive(Debug, Clone, Default)]
pub struct MutationObserverInit {
    pub child_list: bool,
    pub attributes: bool,
    pub subtree: bool,
}

impl MutationObserverInit {
    /// `{ childList: true, subtree: true }`
    pub fn child_list_subtree() -> Self {
        Self {
            child_list: true,
            subtree: true,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationType {
    Attributes,
    ChildList,
}

/// Mutation record
#[derive(Debug, Clone)]
pub struct MutationRecord {
    pub mutation_type: MutationType,
    pub target: NodeId,
    pub added_nodes: Vec<NodeId>,
    pub removed_nodes: Vec<NodeId>,
    pub attribute_name: Option<String>,
}

impl MutationRecord {
    pub fn child_added(target: NodeId, child: NodeId) -> Self {
        Self {
            mutation_type: MutationType::ChildList,
            target,
            added_nodes: vec![child],
            removed_nodes: Vec::new(),
            attribute_name: None,
        }
    }

    pub fn child_removed(target: NodeId, child: NodeId) -> Self {
        Self {
            mutation_type: MutationType::ChildList,
            target,
            added_nodes: Vec::new(),
            removed_nodes: vec![child],
            attribute_name: None,
        }
    }

    pub fn attribute(target: NodeId, name: &str) -> Self {
        Self {
            mutation_type: MutationType::Attributes,
            target,
            added_nodes: Vec::new(),
            removed_nodes: Vec::new(),
            attribute_name: Some(name.to_string()),
        }
    }
}

#[derive(Debug)]
pub(crate) struct Registration {
    pub(crate) id: ObserverId,
    pub(crate) target: NodeId,
    pub(crate) options: MutationObserverInit,
    pub(crate) records: Vec<MutationRecord>,
}

impl Registration {
    pub(crate) fn wants(&self, record: &MutationRecord) -> bool {
        match record.mutation_type {
            MutationType::ChildList => self.options.child_list,
            MutationType::Attributes => self.options.attributes,
        }
    }
}

/// All live observer registrations for one tree
#[derive(Debug, Default)]
pub(crate) struct ObserverRegistry {
    registrations: Vec<Registration>,
    next_id: u32,
}

impl ObserverRegistry {
    pub(crate) fn observe(&mut self, target: NodeId, options: MutationObserverInit) -> ObserverId {
        let id = ObserverId(self.next_id);
        self.next_id += 1;
        self.registrations.push(Registration {
            id,
            target,
            options,
            records: Vec::new(),
        });
        tracing::trace!(?id, ?target, "mutation observer registered");
        id
    }

    pub(crate) fn disconnect(&mut self, id: ObserverId) -> bool {
        let before = self.registrations.len();
        self.registrations.retain(|r| r.id != id);
        before != self.registrations.len()
    }

    pub(crate) fn take_records(&mut self, id: ObserverId) -> Vec<MutationRecord> {
        self.registrations
            .iter_mut()
            .find(|r| r.id == id)
            .map(|r| std::mem::take(&mut r.records))
            .unwrap_or_default()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    pub(crate) fn len(&self) -> usize {
        self.registrations.len()
    }

    pub(crate) fn registrations(&self) -> impl Iterator<Item = &Registration> {
        self.registrations.iter()
    }

    pub(crate) fn registrations_mut(&mut self) -> impl Iterator<Item = &mut Registration> {
        self.registrations.iter_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_observe_and_disconnect() {
        let mut registry = ObserverRegistry::default();
        let id = registry.observe(NodeId(1), MutationObserverInit::child_list_subtree());
        assert_eq!(registry.len(), 1);

        assert!(registry.disconnect(id));
        assert!(registry.is_empty());
        assert!(!registry.disconnect(id));
        assert!(registry.take_records(id).is_empty());
    }

    #[test]
    fn test_registration_filters_by_type() {
        let mut registry = ObserverRegistry::default();
        registry.observe(NodeId(1), MutationObserverInit::child_list_subtree());
        let registration = registry.registrations_mut().next().unwrap();

        assert!(registration.wants(&MutationRecord::child_added(NodeId(1), NodeId(2))));
        assert!(!registration.wants(&MutationRecord::attribute(NodeId(1), "class")));
    }
}
