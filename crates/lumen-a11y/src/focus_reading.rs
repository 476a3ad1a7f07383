//! Focus reading and keyboard shortcuts
//!
//! While enabled, every focus change onto something interactive is read
//! aloud after a short settle delay, and Alt-key shortcuts read parts of
//! the page on demand.

use lumen_dom::{Document, EventKind, KeyboardEvent, ListenerId, NodeId};

use crate::name::{describe_element, is_focusable_looking, normalize_whitespace};
use crate::scheduler::{Scheduler, Task};
use crate::speech::Speaker;
use crate::styles::is_panel_element;

pub const DEFAULT_SETTLE_DELAY_MS: u64 = 150;
pub const LINK_SUMMARY_LIMIT: usize = 10;

const HEADINGS: &str = "h1, h2, h3, h4, h5, h6, [role=\"heading\"]";

/// Alt-key shortcut
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortcut {
    ReadFocused,
    Headings,
    Links,
    Stop,
    Paragraph,
}

impl Shortcut {
    /// Alt plus R, H, L, S or P; nothing else
    pub fn from_event(event: &KeyboardEvent) -> Option<Self> {
        if !event.alt_only() {
            return None;
        }
        Some(match event.key.to_ascii_lowercase().as_str() {
            "r" => Self::ReadFocused,
            "h" => Self::Headings,
            "l" => Self::Links,
            "s" => Self::Stop,
            "p" => Self::Paragraph,
            _ => return None,
        })
    }
}

#[derive(Debug)]
pub struct FocusReader {
    focus_listener: Option<ListenerId>,
    key_listener: Option<ListenerId>,
    settle_delay_ms: u64,
}

impl Default for FocusReader {
    fn default() -> Self {
        Self {
            focus_listener: None,
            key_listener: None,
            settle_delay_ms: DEFAULT_SETTLE_DELAY_MS,
        }
    }
}

impl FocusReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_enabled(&self) -> bool {
        self.focus_listener.is_some()
    }

    pub fn shortcuts_enabled(&self) -> bool {
        self.key_listener.is_some()
    }

    pub fn settle_delay_ms(&self) -> u64 {
        self.settle_delay_ms
    }

    /// Register listeners on the document root; re-enabling only updates settings
    pub fn enable(&mut self, doc: &mut Document, shortcuts: bool, settle_delay_ms: u64) {
        let root = doc.tree.root();
        self.settle_delay_ms = settle_delay_ms;
        if self.focus_listener.is_none() {
            self.focus_listener = Some(doc.add_event_listener(root, EventKind::FocusIn));
            tracing::debug!(settle_delay_ms, "focus reading enabled");
        }
        match (shortcuts, self.key_listener) {
            (true, None) => {
                self.key_listener = Some(doc.add_event_listener(root, EventKind::KeyDown));
            }
            (false, Some(id)) => {
                doc.remove_event_listener(id);
                self.key_listener = None;
            }
            _ => {}
        }
    }

    /// Remove listeners, drop pending reads and stop speaking
    pub fn disable(
        &mut self,
        doc: &mut Document,
        scheduler: &mut Scheduler,
        speaker: &mut Speaker,
    ) {
        let was_enabled = self.is_enabled();
        for id in [self.focus_listener.take(), self.key_listener.take()]
            .into_iter()
            .flatten()
        {
            doc.remove_event_listener(id);
        }
        scheduler.cancel_focus_reads();
        speaker.cancel();
        if was_enabled {
            tracing::debug!("focus reading disabled");
        }
    }

    pub fn owns(&self, listener: ListenerId) -> bool {
        self.focus_listener == Some(listener) || self.key_listener == Some(listener)
    }

    /// Queue a read of `target`; false when it is not worth reading
    pub fn on_focus(&self, doc: &Document, scheduler: &mut Scheduler, target: NodeId) -> bool {
        if !self.is_enabled()
            || !is_focusable_looking(doc, target)
            || is_panel_element(doc, target)
        {
            return false;
        }
        scheduler.after_ms(self.settle_delay_ms, Task::ReadFocus { target });
        true
    }

    /// Speak `target` if focus is still on it
    pub fn read_focus(&self, doc: &Document, speaker: &mut Speaker, target: NodeId) -> bool {
        if !self.is_enabled() || doc.active_element() != Some(target) {
            return false;
        }
        speaker.speak(&describe_element(doc, target), true);
        true
    }

    /// Run the shortcut for `event`; true when the key was consumed
    pub fn on_key(&self, doc: &Document, speaker: &mut Speaker, event: &KeyboardEvent) -> bool {
        if !self.shortcuts_enabled() {
            return false;
        }
        let Some(shortcut) = Shortcut::from_event(event) else {
            return false;
        };
        tracing::debug!(?shortcut, "shortcut");
        let text = match shortcut {
            Shortcut::Stop => {
                speaker.cancel();
                return true;
            }
            Shortcut::ReadFocused => match doc.active_element() {
                Some(focused) => describe_element(doc, focused),
                None => "No element focused".to_string(),
            },
            Shortcut::Headings => headings_outline(doc),
            Shortcut::Links => links_summary(doc),
            Shortcut::Paragraph => nearest_paragraph(doc),
        };
        speaker.speak(&text, true);
        true
    }
}

fn page_elements(doc: &Document, selector: &str) -> Vec<NodeId> {
    let tree = &doc.tree;
    tree.query_selector_all(tree.root(), selector)
        .into_iter()
        .filter(|&n| {
            !is_panel_element(doc, n) && tree.get_attribute(n, "aria-hidden") != Some("true")
        })
        .collect()
}

fn plural(n: usize, one: &str, many: &str) -> String {
    if n == 1 {
        format!("{n} {one}")
    } else {
        format!("{n} {many}")
    }
}

/// "Found 2 headings. Heading level 1, Title. Heading level 2, Intro."
pub fn headings_outline(doc: &Document) -> String {
    let headings = page_elements(doc, HEADINGS);
    if headings.is_empty() {
        return "No headings found".to_string();
    }
    let mut out = format!("Found {}.", plural(headings.len(), "heading", "headings"));
    for heading in &headings {
        let level = crate::aria::heading_level(&doc.tree, *heading).unwrap_or(2);
        let text = normalize_whitespace(&doc.tree.text_content(*heading));
        out.push_str(&format!(" Heading level {level}, {text}."));
    }
    out
}

/// Count of links plus the names of the first ten
pub fn links_summary(doc: &Document) -> String {
    let links = page_elements(doc, "a[href]");
    if links.is_empty() {
        return "No links found".to_string();
    }
    let mut out = format!("Found {}.", plural(links.len(), "link", "links"));
    for (i, link) in links.iter().take(LINK_SUMMARY_LIMIT).enumerate() {
        let name = crate::name::accessible_name(doc, *link);
        let name = if name.is_empty() { "unlabeled" } else { name.as_str() };
        out.push_str(&format!(" Link {}: {name}.", i + 1));
    }
    out
}

/// Paragraph holding focus, else the first non-empty one
pub fn nearest_paragraph(doc: &Document) -> String {
    let tree = &doc.tree;
    let text_of = |p: NodeId| {
        Some(normalize_whitespace(&tree.text_content(p))).filter(|t| !t.is_empty())
    };

    doc.active_element()
        .and_then(|focused| tree.closest(focused, "p"))
        .and_then(text_of)
        .or_else(|| page_elements(doc, "p").into_iter().find_map(text_of))
        .unwrap_or_else(|| "No paragraph found".to_string())
}
