//! Screen-reader mode
//!
//! Configuration and per-session bookkeeping. A session lives from the
//! first enable to the next disable and owns everything needed to put
//! the page back: the attribute snapshot, the nodes it created and the
//! skip-link listener.

use lumen_dom::{Document, ListenerId, NodeId};
use serde::{Deserialize, Serialize};

use crate::snapshot::{AttributeSnapshot, CreatedElements};
use crate::styles::{inject_style, remove_style};

pub const MODE_CLASS: &str = "accessibility-screen-reader-mode";
pub const MODE_ATTRIBUTE: &str = "data-screen-reader-mode";
pub const FOCUS_STYLE_ID: &str = "accessibility-focus-styles";
pub const SR_ONLY_CLASS: &str = "accessibility-sr-only";

const GENERATED_ID_PREFIX: &str = "accessibility-generated";

/// Feature switches for screen-reader mode
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScreenReaderConfig {
    pub enhanced_aria: bool,
    pub skip_links: bool,
    pub enhanced_focus: bool,
    pub landmark_roles: bool,
    pub live_regions: bool,
    pub read_on_focus: bool,
    pub keyboard_shortcuts: bool,
    /// Settle delay before a focused element is read
    pub announcement_delay_ms: u64,
}

impl Default for ScreenReaderConfig {
    fn default() -> Self {
        Self {
            enhanced_aria: true,
            skip_links: true,
            enhanced_focus: true,
            landmark_roles: true,
            live_regions: true,
            read_on_focus: true,
            keyboard_shortcuts: true,
            announcement_delay_ms: 150,
        }
    }
}

impl ScreenReaderConfig {
    /// Everything off; useful as a base for enabling single features
    pub fn none() -> Self {
        Self {
            enhanced_aria: false,
            skip_links: false,
            enhanced_focus: false,
            landmark_roles: false,
            live_regions: false,
            read_on_focus: false,
            keyboard_shortcuts: false,
            ..Self::default()
        }
    }
}

/// State of one enable/disable cycle
#[derive(Debug, Default)]
pub struct ScreenReaderSession {
    pub config: ScreenReaderConfig,
    pub snapshot: AttributeSnapshot,
    pub created: CreatedElements,
    pub skip_listener: Option<ListenerId>,
    next_id: u32,
}

impl ScreenReaderSession {
    pub fn new(config: ScreenReaderConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Snapshot the attribute, then overwrite it
    pub fn set_attribute(&mut self, doc: &mut Document, node: NodeId, name: &str, value: &str) {
        self.snapshot.set(&mut doc.tree, node, name, value);
    }

    /// Set `name` only when the element does not carry it yet
    pub fn set_if_absent(
        &mut self,
        doc: &mut Document,
        node: NodeId,
        name: &str,
        value: &str,
    ) -> bool {
        if doc.tree.has_attribute(node, name) {
            return false;
        }
        self.set_attribute(doc, node, name, value);
        true
    }

    /// Fresh id of the form `{prefix}-{n}` not used anywhere in the document
    pub fn generate_id(&mut self, doc: &Document, prefix: &str) -> String {
        loop {
            self.next_id += 1;
            let id = format!("{prefix}-{}", self.next_id);
            if doc.get_element_by_id(&id).is_none() {
                return id;
            }
        }
    }

    /// Existing id of `node`, or a generated one recorded in the snapshot
    pub fn ensure_id(&mut self, doc: &mut Document, node: NodeId) -> String {
        self.ensure_id_with_prefix(doc, node, GENERATED_ID_PREFIX)
    }

    pub fn ensure_id_with_prefix(
        &mut self,
        doc: &mut Document,
        node: NodeId,
        prefix: &str,
    ) -> String {
        if let Some(id) = doc.tree.get_attribute(node, "id").filter(|id| !id.trim().is_empty()) {
            return id.to_string();
        }
        let id = self.generate_id(doc, prefix);
        self.set_attribute(doc, node, "id", &id);
        id
    }
}

pub fn focus_styles_css() -> String {
    format!(
        ".{MODE_CLASS} *:focus {{\n  \
         outline: 3px solid #2563eb !important;\n  \
         outline-offset: 2px !important;\n  \
         box-shadow: 0 0 0 6px rgba(37, 99, 235, 0.25) !important;\n\
         }}\n\
         .{MODE_CLASS} *:focus:not(:focus-visible) {{\n  \
         outline-color: #1d4ed8 !important;\n\
         }}\n\
         .{SR_ONLY_CLASS} {{\n  \
         position: absolute !important;\n  \
         width: 1px !important;\n  \
         height: 1px !important;\n  \
         padding: 0 !important;\n  \
         margin: -1px !important;\n  \
         overflow: hidden !important;\n  \
         clip: rect(0, 0, 0, 0) !important;\n  \
         clip-path: inset(50%) !important;\n  \
         white-space: nowrap !important;\n  \
         border: 0 !important;\n\
         }}\n"
    )
}

/// Inject the focus stylesheet once per session
pub fn apply_focus_styles(doc: &mut Document, session: &mut ScreenReaderSession) {
    if doc.get_element_by_id(FOCUS_STYLE_ID).is_some() {
        return;
    }
    let style = inject_style(doc, FOCUS_STYLE_ID, &focus_styles_css());
    session.created.track(&doc.tree, style);
}

pub fn remove_focus_styles(doc: &mut Document) -> bool {
    remove_style(doc, FOCUS_STYLE_ID)
}

/// Tag `<body>` with the mode class and attribute
pub fn mark_body(doc: &mut Document, enabled: bool) {
    let body = doc.body();
    if enabled {
        doc.tree.add_class(body, MODE_CLASS);
        doc.tree.set_attribute(body, MODE_ATTRIBUTE, "true");
    } else {
        doc.tree.remove_class(body, MODE_CLASS);
        doc.tree.remove_attribute(body, MODE_ATTRIBUTE);
    }
}
