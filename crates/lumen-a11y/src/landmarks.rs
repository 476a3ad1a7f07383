//! Landmark roles
//!
//! Explicit roles for sectioning elements that lack one, so that
//! landmark navigation works even in assistive tech that ignores the
//! implicit mappings. Existing roles and labels are left alone.

use lumen_dom::{Document, NodeId};

use crate::screen_reader::ScreenReaderSession;
use crate::styles::is_panel_element;

const HEADINGS: &str = "h1, h2, h3, h4, h5, h6";

fn candidates(doc: &Document, selector: &str) -> Vec<NodeId> {
    let tree = &doc.tree;
    tree.query_selector_all(tree.root(), selector)
        .into_iter()
        .filter(|&n| !is_panel_element(doc, n))
        .collect()
}

fn is_labelled(doc: &Document, node: NodeId) -> bool {
    ["aria-label", "aria-labelledby"]
        .iter()
        .any(|attr| doc.tree.get_attribute(node, attr).is_some_and(|v| !v.trim().is_empty()))
}

/// Role for the first match of `selector`, if that element has none
fn assign_first(doc: &mut Document, session: &mut ScreenReaderSession, selector: &str, role: &str) {
    if let Some(&node) = candidates(doc, selector).first() {
        session.set_if_absent(doc, node, "role", role);
    }
}

/// Role plus a numbered label on every unroled match
fn assign_numbered(
    doc: &mut Document,
    session: &mut ScreenReaderSession,
    selector: &str,
    role: &str,
    label: &str,
) {
    let mut n = 0;
    for node in candidates(doc, selector) {
        if doc.tree.has_attribute(node, "role") {
            continue;
        }
        n += 1;
        session.set_attribute(doc, node, "role", role);
        if !is_labelled(doc, node) {
            session.set_attribute(doc, node, "aria-label", &format!("{label} {n}"));
        }
    }
}

pub fn is_search_form(doc: &Document, form: NodeId) -> bool {
    let tree = &doc.tree;
    tree.matches(form, "form[action*=\"search\"]")
        || tree.query_selector(form, "input[type=\"search\"]").is_some()
}

/// Apply every landmark rule; returns how many attributes were written
pub fn apply_landmarks(doc: &mut Document, session: &mut ScreenReaderSession) -> usize {
    let before = session.snapshot.len();

    assign_first(doc, session, "main", "main");
    assign_numbered(doc, session, "nav", "navigation", "Navigation");
    assign_first(doc, session, "header", "banner");
    assign_first(doc, session, "footer", "contentinfo");
    assign_numbered(doc, session, "aside", "complementary", "Complementary content");

    for form in candidates(doc, "form:not([role])") {
        if is_search_form(doc, form) {
            session.set_attribute(doc, form, "role", "search");
        }
    }

    for section in candidates(doc, "section") {
        if is_labelled(doc, section) {
            continue;
        }
        let Some(heading) = doc.tree.query_selector(section, HEADINGS) else {
            continue;
        };
        let id = session.ensure_id(doc, heading);
        session.set_attribute(doc, section, "aria-labelledby", &id);
    }

    let written = session.snapshot.len() - before;
    tracing::debug!(written, "landmark roles applied");
    written
}
