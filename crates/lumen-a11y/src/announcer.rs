//! Global announcer
//!
//! Two visually hidden live regions (polite and assertive) under one
//! persistent container. A message is written into its region a couple
//! of frames after the region is emptied, so assistive tech sees a change
//! even when the same text is announced twice, and it is cleared again
//! after a delay.

use lumen_dom::{Document, NodeId};
use serde::{Deserialize, Serialize};

use crate::scheduler::{Scheduler, Task};
use crate::speech::Speaker;
use crate::values::Priority;

pub const ANNOUNCER_ID: &str = "accessibility-announcer";
pub const POLITE_REGION_ID: &str = "accessibility-announcer-polite";
pub const ASSERTIVE_REGION_ID: &str = "accessibility-announcer-assertive";
pub const TOAST_ID: &str = "accessibility-announcer-toast";

/// Inline style that hides content visually but not from assistive tech
pub const VISUALLY_HIDDEN_STYLE: &str = "position: absolute; width: 1px; height: 1px; \
     padding: 0; margin: -1px; overflow: hidden; clip: rect(0, 0, 0, 0); \
     clip-path: inset(50%); white-space: nowrap; border: 0;";

const TOAST_STYLE: &str = "position: fixed; bottom: 16px; right: 16px; z-index: 2147483647; \
     max-width: 320px; padding: 12px 16px; border-radius: 6px; \
     background-color: #111827; color: #f9fafb; font-size: 14px; \
     box-shadow: 0 4px 12px rgba(0, 0, 0, 0.3);";

/// Options for `initialize_announcer`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AnnouncerOptions {
    /// Show each announcement as an on-screen toast
    pub debug: bool,
    pub use_speech_synthesis: bool,
}

/// Timing of announcement commits and cleanup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AnnouncePolicy {
    /// Frames between emptying a region and writing the message; 0 writes at once
    pub commit_after_frames: u32,
    pub clear_after_ms: u64,
    pub toast_duration_ms: u64,
}

impl Default for AnnouncePolicy {
    fn default() -> Self {
        Self {
            commit_after_frames: 2,
            clear_after_ms: 5000,
            toast_duration_ms: 3000,
        }
    }
}

impl AnnouncePolicy {
    /// Commit in the same call, useful for hosts without frames
    pub fn immediate() -> Self {
        Self {
            commit_after_frames: 0,
            ..Self::default()
        }
    }
}

pub fn region_id(priority: Priority) -> &'static str {
    match priority {
        Priority::Polite => POLITE_REGION_ID,
        Priority::Assertive => ASSERTIVE_REGION_ID,
    }
}

fn slot(priority: Priority) -> usize {
    match priority {
        Priority::Polite => 0,
        Priority::Assertive => 1,
    }
}

/// Announcer state: flags plus write generations per region
#[derive(Debug, Default)]
pub struct Announcer {
    policy: AnnouncePolicy,
    debug: bool,
    speech: bool,
    generations: [u64; 2],
    toast_generation: u64,
}

impl Announcer {
    pub fn new(policy: AnnouncePolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    pub fn policy(&self) -> &AnnouncePolicy {
        &self.policy
    }

    pub fn is_debug(&self) -> bool {
        self.debug
    }

    pub fn set_debug(&mut self, debug: bool) {
        self.debug = debug;
    }

    pub fn speech_enabled(&self) -> bool {
        self.speech
    }

    pub fn set_speech_enabled(&mut self, enabled: bool) {
        self.speech = enabled;
    }

    /// Create the container and both regions unless present.
    /// Returns the container and whether it was created now.
    pub fn ensure_regions(&self, doc: &mut Document) -> (NodeId, bool) {
        if let Some(container) = doc.get_element_by_id(ANNOUNCER_ID) {
            return (container, false);
        }
        let tree = &mut doc.tree;
        let container = tree.create_element("div");
        tree.set_attribute(container, "id", ANNOUNCER_ID);

        for (id, live, role) in [
            (POLITE_REGION_ID, "polite", "status"),
            (ASSERTIVE_REGION_ID, "assertive", "alert"),
        ] {
            let region = tree.create_element("div");
            tree.set_attribute(region, "id", id);
            tree.set_attribute(region, "aria-live", live);
            tree.set_attribute(region, "aria-atomic", "true");
            tree.set_attribute(region, "role", role);
            tree.set_attribute(region, "style", VISUALLY_HIDDEN_STYLE);
            if let Err(err) = tree.append_child(container, region) {
                tracing::warn!(%err, "could not build live region");
            }
        }

        let body = doc.body();
        if let Err(err) = doc.tree.append_child(body, container) {
            tracing::warn!(%err, "could not attach announcer");
        }
        tracing::debug!("announcer regions created");
        (container, true)
    }

    /// Queue `message` for assistive tech; speak and toast it when enabled
    pub fn announce(
        &mut self,
        doc: &mut Document,
        scheduler: &mut Scheduler,
        speaker: &mut Speaker,
        message: &str,
        priority: Priority,
    ) {
        tracing::debug!(message, %priority, "announce");
        if self.debug {
            self.show_toast(doc, scheduler, message);
        }
        if self.speech {
            speaker.speak(message, priority == Priority::Assertive);
        }

        if let Some(region) = doc.get_element_by_id(region_id(priority)) {
            doc.tree.set_text_content(region, "");
        }
        if self.policy.commit_after_frames == 0 {
            self.commit(doc, scheduler, priority, message);
        } else {
            scheduler.after_frames(
                self.policy.commit_after_frames,
                Task::CommitAnnouncement {
                    priority,
                    message: message.to_string(),
                },
            );
        }
    }

    /// Write `message` into its region and schedule the clear
    pub fn commit(
        &mut self,
        doc: &mut Document,
        scheduler: &mut Scheduler,
        priority: Priority,
        message: &str,
    ) {
        let Some(region) = doc.get_element_by_id(region_id(priority)) else {
            tracing::trace!(%priority, "no live region, announcement dropped");
            return;
        };
        let generation = &mut self.generations[slot(priority)];
        *generation += 1;
        doc.tree.set_text_content(region, message);
        scheduler.after_ms(
            self.policy.clear_after_ms,
            Task::ClearAnnouncement {
                priority,
                generation: *generation,
            },
        );
    }

    /// Empty the region unless a newer message has been committed since
    pub fn clear(&mut self, doc: &mut Document, priority: Priority, generation: u64) {
        if self.generations[slot(priority)] != generation {
            return;
        }
        if let Some(region) = doc.get_element_by_id(region_id(priority)) {
            doc.tree.set_text_content(region, "");
        }
    }

    fn show_toast(&mut self, doc: &mut Document, scheduler: &mut Scheduler, message: &str) {
        if let Some(old) = doc.get_element_by_id(TOAST_ID) {
            doc.tree.detach(old);
        }
        let tree = &mut doc.tree;
        let toast = tree.create_element("div");
        tree.set_attribute(toast, "id", TOAST_ID);
        tree.set_attribute(toast, "aria-hidden", "true");
        tree.set_attribute(toast, "style", TOAST_STYLE);
        tree.set_text_content(toast, message);
        let body = doc.body();
        if let Err(err) = doc.tree.append_child(body, toast) {
            tracing::warn!(%err, "could not show toast");
            return;
        }
        self.toast_generation += 1;
        scheduler.after_ms(
            self.policy.toast_duration_ms,
            Task::RemoveToast {
                generation: self.toast_generation,
            },
        );
    }

    pub fn remove_toast(&mut self, doc: &mut Document, generation: u64) {
        if generation != self.toast_generation {
            return;
        }
        if let Some(toast) = doc.get_element_by_id(TOAST_ID) {
            doc.tree.detach(toast);
        }
    }
}
