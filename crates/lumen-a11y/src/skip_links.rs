//! Skip links
//!
//! One hidden-until-focused anchor per landmark found on the page, all in
//! a container that becomes the first child of `<body>`.

use lumen_dom::{Document, EventKind, NodeId, ScrollBehavior};

use crate::screen_reader::ScreenReaderSession;
use crate::styles::{inject_style, is_panel_element};

pub const SKIP_LINKS_ID: &str = "accessibility-skip-links";
pub const SKIP_LINK_CLASS: &str = "accessibility-skip-link";
pub const SKIP_LINK_STYLE_ID: &str = "accessibility-skip-link-styles";

/// Landmark a skip link can jump to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkipTarget {
    pub key: &'static str,
    pub label: &'static str,
    /// Tried in order; the first non-panel match wins
    pub selectors: &'static [&'static str],
}

pub const SKIP_TARGETS: &[SkipTarget] = &[
    SkipTarget {
        key: "main",
        label: "Skip to main content",
        selectors: &[
            "main",
            "[role=\"main\"]",
            "#main",
            "#main-content",
            "#content",
            ".main-content",
            ".content",
        ],
    },
    SkipTarget {
        key: "navigation",
        label: "Skip to navigation",
        selectors: &[
            "nav",
            "[role=\"navigation\"]",
            "#navigation",
            "#nav",
            ".navigation",
            ".nav",
        ],
    },
    SkipTarget {
        key: "search",
        label: "Skip to search",
        selectors: &[
            "[role=\"search\"]",
            "#search",
            ".search",
            "form[action*=\"search\"]",
            "input[type=\"search\"]",
        ],
    },
    SkipTarget {
        key: "footer",
        label: "Skip to footer",
        selectors: &["footer", "[role=\"contentinfo\"]", "#footer", ".footer"],
    },
];

fn find_target(doc: &Document, target: &SkipTarget) -> Option<NodeId> {
    let tree = &doc.tree;
    target.selectors.iter().find_map(|selector| {
        tree.query_selector_all(tree.root(), selector)
            .into_iter()
            .find(|&n| !is_panel_element(doc, n))
    })
}

/// Every target present in the document, in link order
pub fn find_targets(doc: &Document) -> Vec<(&'static SkipTarget, NodeId)> {
    SKIP_TARGETS
        .iter()
        .filter_map(|target| find_target(doc, target).map(|node| (target, node)))
        .collect()
}

pub fn skip_links_css() -> String {
    format!(
        "#{SKIP_LINKS_ID} {{\n  \
         position: absolute;\n  \
         top: 0;\n  \
         left: 0;\n  \
         z-index: 2147483647;\n\
         }}\n\
         .{SKIP_LINK_CLASS} {{\n  \
         position: absolute;\n  \
         left: -10000px;\n  \
         top: auto;\n  \
         width: 1px;\n  \
         height: 1px;\n  \
         overflow: hidden;\n  \
         padding: 8px 16px;\n  \
         background-color: #000000;\n  \
         color: #ffffff;\n  \
         font-weight: 600;\n  \
         text-decoration: none;\n  \
         border-radius: 0 0 4px 0;\n\
         }}\n\
         .{SKIP_LINK_CLASS}:focus {{\n  \
         position: fixed;\n  \
         left: 0;\n  \
         top: 0;\n  \
         width: auto;\n  \
         height: auto;\n  \
         overflow: visible;\n  \
         outline: 3px solid #fbbf24;\n\
         }}\n"
    )
}

/// Build the skip-link container; returns the number of links created
pub fn create_skip_links(doc: &mut Document, session: &mut ScreenReaderSession) -> usize {
    if doc.get_element_by_id(SKIP_LINKS_ID).is_some() {
        return 0;
    }
    let targets = find_targets(doc);
    if targets.is_empty() {
        tracing::debug!("no skip-link targets found");
        return 0;
    }

    let mut links = Vec::with_capacity(targets.len());
    for (target, node) in &targets {
        let prefix = format!("accessibility-skip-target-{}", target.key);
        let id = session.ensure_id_with_prefix(doc, *node, &prefix);
        session.set_if_absent(doc, *node, "tabindex", "-1");
        links.push((target.label, id));
    }

    let tree = &mut doc.tree;
    let container = tree.create_element("div");
    tree.set_attribute(container, "id", SKIP_LINKS_ID);
    tree.set_attribute(container, "aria-label", "Skip links");
    for (label, id) in &links {
        let anchor = tree.create_element("a");
        tree.set_attribute(anchor, "href", &format!("#{id}"));
        tree.set_attribute(anchor, "class", SKIP_LINK_CLASS);
        tree.set_text_content(anchor, label);
        if let Err(err) = tree.append_child(container, anchor) {
            tracing::warn!(%err, "could not build skip link");
        }
    }
    let body = doc.body();
    if let Err(err) = doc.tree.prepend_child(body, container) {
        tracing::warn!(%err, "could not insert skip links");
        return 0;
    }
    session.created.track(&doc.tree, container);

    let style = inject_style(doc, SKIP_LINK_STYLE_ID, &skip_links_css());
    session.created.track(&doc.tree, style);

    session.skip_listener = Some(doc.add_event_listener(container, EventKind::Click));
    tracing::debug!(count = links.len(), "skip links created");
    links.len()
}

/// Follow the skip link at or above `clicked`; true when focus moved
pub fn activate_skip_link(doc: &mut Document, clicked: NodeId) -> bool {
    let Some(link) = doc.tree.closest(clicked, &format!("a.{SKIP_LINK_CLASS}")) else {
        return false;
    };
    let Some(id) = doc
        .tree
        .get_attribute(link, "href")
        .and_then(|href| href.strip_prefix('#'))
        .map(str::to_string)
    else {
        return false;
    };
    let Some(target) = doc.get_element_by_id(&id) else {
        tracing::debug!(id, "skip-link target vanished");
        return false;
    };
    doc.focus(target);
    doc.scroll_into_view(target, ScrollBehavior::Smooth);
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page() -> (Document, NodeId, NodeId) {
        let mut doc = Document::default();
        let body = doc.body();
        let content = doc.tree.create_element("div");
        doc.tree.set_attribute(content, "class", "content");
        let main = doc.tree.create_element("main");
        let footer = doc.tree.create_element("footer");
        doc.tree.set_attribute(footer, "id", "site-footer");
        for node in [content, main, footer] {
            doc.tree.append_child(body, node).unwrap();
        }
        (doc, main, footer)
    }

    #[test]
    fn test_priority_order() {
        let (doc, main, footer) = page();
        let found: Vec<_> = find_targets(&doc)
            .into_iter()
            .map(|(t, n)| (t.key, n))
            .collect();
        assert_eq!(found, vec![("main", main), ("footer", footer)]);
    }

    #[test]
    fn test_create_and_activate() {
        let (mut doc, main, footer) = page();
        let mut session = ScreenReaderSession::default();
        assert_eq!(create_skip_links(&mut doc, &mut session), 2);
        assert_eq!(create_skip_links(&mut doc, &mut session), 0);

        let container = doc.get_element_by_id(SKIP_LINKS_ID).unwrap();
        assert_eq!(doc.tree.first_child(doc.body()), Some(container));
        assert_eq!(doc.tree.get_attribute(main, "tabindex"), Some("-1"));
        assert_eq!(doc.tree.get_attribute(footer, "id"), Some("site-footer"));

        let main_id = doc.tree.get_attribute(main, "id").unwrap().to_string();
        assert!(main_id.starts_with("accessibility-skip-target-main"));

        let links = doc.tree.query_selector_all(container, "a");
        assert_eq!(doc.tree.text_content(links[1]), "Skip to footer");
        assert!(activate_skip_link(&mut doc, links[0]));
        assert_eq!(doc.active_element(), Some(main));
        let scroll = doc.last_scroll_request().unwrap();
        assert_eq!(scroll.behavior, ScrollBehavior::Smooth);
    }

    #[test]
    fn test_no_targets() {
        let mut doc = Document::default();
        let mut session = ScreenReaderSession::default();
        assert_eq!(create_skip_links(&mut doc, &mut session), 0);
        assert!(doc.get_element_by_id(SKIP_LINK_STYLE_ID).is_none());
        assert!(session.skip_listener.is_none());
    }
}
