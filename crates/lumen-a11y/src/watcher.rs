//! Mutation watcher
//!
//! While image hiding is on, the body is observed for child-list changes
//! and every batch of records re-runs the hide pass so images added later
//! are converted too.

use lumen_dom::{Document, MutationObserverInit, ObserverId};

use crate::images::ImageVisibility;

#[derive(Debug, Default)]
pub struct MutationWatcher {
    observer: Option<ObserverId>,
}

impl MutationWatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_watching(&self) -> bool {
        self.observer.is_some()
    }

    /// Start observing `<body>`; no-op when already watching
    pub fn watch(&mut self, doc: &mut Document) {
        if self.observer.is_some() {
            return;
        }
        let body = doc.body();
        self.observer = Some(doc.tree.observe(body, MutationObserverInit::child_list_subtree()));
        tracing::debug!("image watcher started");
    }

    /// Disconnect the observer and drop any queued records
    pub fn cancel(&mut self, doc: &mut Document) {
        if let Some(observer) = self.observer.take() {
            doc.tree.disconnect(observer);
            tracing::debug!("image watcher stopped");
        }
    }

    /// Drain pending records; re-run the hide pass if anything changed
    pub fn process(&mut self, doc: &mut Document, images: &mut ImageVisibility) -> usize {
        let Some(observer) = self.observer else {
            return 0;
        };
        if doc.tree.take_records(observer).is_empty() {
            return 0;
        }
        let hidden = images.hide_all(doc);
        // Our own placeholder insertions are not worth another pass
        doc.tree.take_records(observer);
        hidden
    }
}
