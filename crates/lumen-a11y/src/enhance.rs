//! ARIA enhancement pass
//!
//! One scan of the live document that fills in missing alt text, labels,
//! `aria-current`, fieldset labelling, table semantics and disclosure
//! state. Only attributes that are absent get written, and every write
//! goes through the session snapshot so disabling can undo it.

use lumen_dom::{Document, NodeId};

use crate::aria::input_type;
use crate::name::{accessible_name, has_label};
use crate::screen_reader::ScreenReaderSession;
use crate::styles::is_panel_element;

const COLLAPSE_MARKERS: &str = "[data-toggle=\"collapse\"], [data-bs-toggle=\"collapse\"], \
     .collapsible, .accordion-button, .dropdown-toggle";

const UNLABELED_SKIP_TYPES: &[&str] = &["hidden", "submit", "button", "reset", "image"];

/// Run every enhancement; returns how many attributes were written
pub fn enhance_aria(doc: &mut Document, session: &mut ScreenReaderSession) -> usize {
    let before = session.snapshot.len();
    enhance_images(doc, session);
    enhance_links(doc, session);
    enhance_buttons(doc, session);
    enhance_current_links(doc, session);
    enhance_form_fields(doc, session);
    enhance_fieldsets(doc, session);
    enhance_tables(doc, session);
    enhance_disclosures(doc, session);
    let written = session.snapshot.len() - before;
    tracing::debug!(written, "aria enhancements applied");
    written
}

fn select(doc: &Document, selector: &str) -> Vec<NodeId> {
    let tree = &doc.tree;
    tree.query_selector_all(tree.root(), selector)
        .into_iter()
        .filter(|&n| !is_panel_element(doc, n))
        .collect()
}

fn enhance_images(doc: &mut Document, session: &mut ScreenReaderSession) {
    for img in select(doc, "img:not([alt])") {
        session.set_attribute(doc, img, "alt", "Image");
        session.set_if_absent(doc, img, "role", "img");
    }
}

fn enhance_links(doc: &mut Document, session: &mut ScreenReaderSession) {
    for link in select(doc, "a[href]") {
        if !accessible_name(doc, link).is_empty() {
            continue;
        }
        let href = doc.tree.get_attribute(link, "href").unwrap_or_default();
        let label = link_label(href);
        session.set_attribute(doc, link, "aria-label", &label);
    }
}

/// `Link: about us` from `/about-us/`, plain `Link` when nothing usable
pub fn link_label(href: &str) -> String {
    let path = href.split(['?', '#']).next().unwrap_or_default();
    let segment = path
        .rsplit('/')
        .map(str::trim)
        .find(|s| !s.is_empty() && !s.contains(':'));
    let words = segment
        .map(|s| s.rsplit_once('.').map_or(s, |(stem, _)| stem))
        .map(|s| s.replace(['-', '_'], " "))
        .map(|s| s.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|s| !s.is_empty() && s != "index");
    match words {
        Some(words) => format!("Link: {words}"),
        None => "Link".to_string(),
    }
}

fn enhance_buttons(doc: &mut Document, session: &mut ScreenReaderSession) {
    for button in select(doc, "button, [role=\"button\"]") {
        if !accessible_name(doc, button).is_empty() {
            continue;
        }
        let label = match doc.tree.get_attribute(button, "type").map(str::trim) {
            Some(t) if t.eq_ignore_ascii_case("submit") => "Submit",
            Some(t) if t.eq_ignore_ascii_case("reset") => "Reset",
            _ => "Button",
        };
        session.set_attribute(doc, button, "aria-label", label);
    }
}

fn is_current_marked(doc: &Document, node: NodeId) -> bool {
    let tree = &doc.tree;
    let marked = |n: NodeId| tree.has_class(n, "active") || tree.has_class(n, "current");
    marked(node) || tree.parent(node).is_some_and(marked)
}

fn enhance_current_links(doc: &mut Document, session: &mut ScreenReaderSession) {
    for link in select(doc, "nav a[href], [role=\"navigation\"] a[href]") {
        if doc.tree.has_attribute(link, "aria-current") || !is_current_marked(doc, link) {
            continue;
        }
        session.set_attribute(doc, link, "aria-current", "page");
    }
}

fn needs_label(doc: &Document, node: NodeId) -> bool {
    let tree = &doc.tree;
    let skipped_type = UNLABELED_SKIP_TYPES.contains(&input_type(tree, node).as_str());
    if tree.is_tag(node, "input") && skipped_type {
        return false;
    }
    let named = ["aria-labelledby", "aria-label", "title"]
        .iter()
        .any(|attr| tree.get_attribute(node, attr).is_some_and(|v| !v.trim().is_empty()));
    !named && !has_label(doc, node)
}

/// Label for a form control that has none
pub fn field_label(doc: &Document, node: NodeId) -> String {
    let tree = &doc.tree;
    if let Some(placeholder) = tree
        .get_attribute(node, "placeholder")
        .map(str::trim)
        .filter(|p| !p.is_empty())
    {
        return placeholder.to_string();
    }
    let label = match tree.tag_name(node) {
        Some("select") => "Select option",
        Some("textarea") => "Text area",
        _ => match input_type(tree, node).as_str() {
            "text" => "Text input",
            "email" => "Email address",
            "search" => "Search",
            "tel" => "Phone number",
            "url" => "Website address",
            "password" => "Password",
            "number" => "Number",
            "date" => "Date",
            "checkbox" => "Checkbox",
            "radio" => "Radio button",
            _ => "Input field",
        },
    };
    label.to_string()
}

fn enhance_form_fields(doc: &mut Document, session: &mut ScreenReaderSession) {
    for field in select(doc, "input, select, textarea") {
        if !needs_label(doc, field) {
            continue;
        }
        let label = field_label(doc, field);
        session.set_attribute(doc, field, "aria-label", &label);
    }
}

fn enhance_fieldsets(doc: &mut Document, session: &mut ScreenReaderSession) {
    for fieldset in select(doc, "fieldset:not([aria-labelledby])") {
        let Some(legend) = doc
            .tree
            .element_children(fieldset)
            .find(|&c| doc.tree.is_tag(c, "legend"))
        else {
            continue;
        };
        let id = session.ensure_id(doc, legend);
        session.set_attribute(doc, fieldset, "aria-labelledby", &id);
    }
}

/// `row` for header cells in a body row that also holds data cells
pub fn header_scope(doc: &Document, th: NodeId) -> &'static str {
    let tree = &doc.tree;
    let in_body = tree.closest(th, "tbody").is_some();
    let row_has_data = tree
        .closest(th, "tr")
        .is_some_and(|row| tree.element_children(row).any(|c| tree.is_tag(c, "td")));
    if in_body && row_has_data { "row" } else { "col" }
}

fn enhance_tables(doc: &mut Document, session: &mut ScreenReaderSession) {
    for table in select(doc, "table:not([role])") {
        session.set_attribute(doc, table, "role", "table");
    }
    for th in select(doc, "th:not([scope])") {
        let scope = header_scope(doc, th);
        session.set_attribute(doc, th, "scope", scope);
    }
}

fn expanded_state(doc: &Document, node: NodeId) -> &'static str {
    let tree = &doc.tree;
    if tree.has_class(node, "collapsed") {
        return "false";
    }
    if ["expanded", "open", "show", "active"]
        .iter()
        .any(|c| tree.has_class(node, c))
    {
        return "true";
    }
    match tree.get_attribute(node, "data-expanded").map(str::trim) {
        Some("true") => "true",
        _ => "false",
    }
}

fn enhance_disclosures(doc: &mut Document, session: &mut ScreenReaderSession) {
    for toggle in select(doc, COLLAPSE_MARKERS) {
        if doc.tree.has_attribute(toggle, "aria-expanded") {
            continue;
        }
        let state = expanded_state(doc, toggle);
        session.set_attribute(doc, toggle, "aria-expanded", state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_label() {
        assert_eq!(link_label("/about-us/"), "Link: about us");
        assert_eq!(
            link_label("https://example.com/docs/getting_started.html?x=1"),
            "Link: getting started"
        );
        assert_eq!(link_label("#"), "Link");
        assert_eq!(link_label("/"), "Link");
        assert_eq!(link_label("https://example.com"), "Link: example");
        assert_eq!(link_label("/index.html"), "Link");
    }

    fn doc_with_body(build: impl FnOnce(&mut Document)) -> Document {
        let mut doc = Document::default();
        build(&mut doc);
        doc
    }

    fn add(doc: &mut Document, parent: NodeId, tag: &str, attrs: &[(&str, &str)]) -> NodeId {
        let node = doc.tree.create_element(tag);
        for (name, value) in attrs {
            doc.tree.set_attribute(node, name, value);
        }
        doc.tree.append_child(parent, node).unwrap();
        node
    }

    #[test]
    fn test_images_and_buttons() {
        let mut img = NodeId::NONE;
        let mut submit = NodeId::NONE;
        let mut named = NodeId::NONE;
        let mut doc = doc_with_body(|doc| {
            let body = doc.body();
            img = add(doc, body, "img", &[]);
            submit = add(doc, body, "button", &[("type", "submit")]);
            named = add(doc, body, "button", &[("title", "Close")]);
        });
        let mut session = ScreenReaderSession::default();
        enhance_aria(&mut doc, &mut session);

        let tree = &doc.tree;
        assert_eq!(tree.get_attribute(img, "alt"), Some("Image"));
        assert_eq!(tree.get_attribute(img, "role"), Some("img"));
        assert_eq!(tree.get_attribute(submit, "aria-label"), Some("Submit"));
        assert!(!tree.has_attribute(named, "aria-label"));
    }

    #[test]
    fn test_form_field_labels() {
        let mut email = NodeId::NONE;
        let mut search = NodeId::NONE;
        let mut wrapped = NodeId::NONE;
        let mut hidden = NodeId::NONE;
        let mut area = NodeId::NONE;
        let mut doc = doc_with_body(|doc| {
            let body = doc.body();
            email = add(doc, body, "input", &[("type", "email")]);
            let attrs = [("type", "search"), ("placeholder", "Find products")];
            search = add(doc, body, "input", &attrs);
            let label = add(doc, body, "label", &[]);
            wrapped = add(doc, label, "input", &[]);
            hidden = add(doc, body, "input", &[("type", "hidden")]);
            area = add(doc, body, "textarea", &[]);
        });
        let mut session = ScreenReaderSession::default();
        enhance_aria(&mut doc, &mut session);

        let tree = &doc.tree;
        assert_eq!(tree.get_attribute(email, "aria-label"), Some("Email address"));
        assert_eq!(tree.get_attribute(search, "aria-label"), Some("Find products"));
        assert_eq!(tree.get_attribute(area, "aria-label"), Some("Text area"));
        assert!(!tree.has_attribute(wrapped, "aria-label"));
        assert!(!tree.has_attribute(hidden, "aria-label"));
    }

    #[test]
    fn test_disclosure_state() {
        let mut collapsed = NodeId::NONE;
        let mut open = NodeId::NONE;
        let mut data = NodeId::NONE;
        let mut doc = doc_with_body(|doc| {
            let body = doc.body();
            collapsed = add(doc, body, "button", &[("class", "accordion-button collapsed")]);
            open = add(doc, body, "div", &[("class", "collapsible open")]);
            data = add(doc, body, "a", &[("data-toggle", "collapse"), ("data-expanded", "true")]);
        });
        let mut session = ScreenReaderSession::default();
        enhance_aria(&mut doc, &mut session);

        let tree = &doc.tree;
        assert_eq!(tree.get_attribute(collapsed, "aria-expanded"), Some("false"));
        assert_eq!(tree.get_attribute(open, "aria-expanded"), Some("true"));
        assert_eq!(tree.get_attribute(data, "aria-expanded"), Some("true"));
    }

    #[test]
    fn test_second_pass_writes_nothing() {
        let mut doc = doc_with_body(|doc| {
            let body = doc.body();
            add(doc, body, "img", &[]);
            add(doc, body, "a", &[("href", "/contact")]);
        });
        let mut session = ScreenReaderSession::default();
        assert_eq!(enhance_aria(&mut doc, &mut session), 3);
        assert_eq!(enhance_aria(&mut doc, &mut session), 0);
    }
}
