//! Accessible names and spoken descriptions
//!
//! Name sources are tried in a fixed order: `aria-labelledby` referents,
//! `aria-label`, `<label for>` (form controls), `title`, `alt` (images),
//! then the element's own text.

use lumen_dom::{Document, NodeId};

use crate::aria::{AriaRole, TEXT_INPUT_TYPES, heading_level, input_type, role_of};

const FORM_CONTROLS: &[&str] =
    &["input", "select", "textarea", "button", "meter", "output", "progress"];

/// Collapse runs of whitespace and trim
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Computed accessible name, empty when nothing applies
pub fn accessible_name(doc: &Document, node: NodeId) -> String {
    let tree = &doc.tree;

    if let Some(ids) = tree.get_attribute(node, "aria-labelledby") {
        let text = ids
            .split_whitespace()
            .filter_map(|id| doc.get_element_by_id(id))
            .map(|referent| normalize_whitespace(&tree.text_content(referent)))
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        if !text.is_empty() {
            return text;
        }
    }

    if let Some(label) = non_empty_attr(doc, node, "aria-label") {
        return label;
    }

    if tree.tag_name(node).is_some_and(|t| FORM_CONTROLS.contains(&t)) {
        if let Some(text) = label_for_text(doc, node) {
            return text;
        }
    }

    if let Some(title) = non_empty_attr(doc, node, "title") {
        return title;
    }

    if tree.is_tag(node, "img") {
        if let Some(alt) = non_empty_attr(doc, node, "alt") {
            return alt;
        }
    }

    normalize_whitespace(&tree.text_content(node))
}

fn non_empty_attr(doc: &Document, node: NodeId, name: &str) -> Option<String> {
    doc.tree
        .get_attribute(node, name)
        .map(normalize_whitespace)
        .filter(|v| !v.is_empty())
}

/// Text of the `<label for=...>` pointing at `node`
fn label_for_text(doc: &Document, node: NodeId) -> Option<String> {
    let tree = &doc.tree;
    let id = tree.get_attribute(node, "id").filter(|id| !id.is_empty())?;
    tree.query_selector_all(tree.root(), "label[for]")
        .into_iter()
        .find(|&label| tree.get_attribute(label, "for") == Some(id))
        .map(|label| normalize_whitespace(&tree.text_content(label)))
        .filter(|t| !t.is_empty())
}

/// Whether a `<label>` labels `node`, either by `for` or by wrapping it
pub fn has_label(doc: &Document, node: NodeId) -> bool {
    label_for_text(doc, node).is_some() || doc.tree.closest(node, "label").is_some()
}

/// Native interactive element, or anything with a role or tabindex
pub fn is_focusable_looking(doc: &Document, node: NodeId) -> bool {
    let tree = &doc.tree;
    let Some(tag) = tree.tag_name(node) else {
        return false;
    };
    matches!(tag, "a" | "button" | "input" | "select" | "textarea" | "summary")
        || tree.has_attribute(node, "role")
        || tree.has_attribute(node, "tabindex")
}

fn attr_is_true(doc: &Document, node: NodeId, name: &str) -> bool {
    doc.tree
        .get_attribute(node, name)
        .is_some_and(|v| v.trim().eq_ignore_ascii_case("true"))
}

/// Spoken state words for `node`
pub fn element_states(doc: &Document, node: NodeId) -> Vec<String> {
    let tree = &doc.tree;
    let mut states = Vec::new();

    if let Some(role) = role_of(tree, node).filter(AriaRole::is_checkable) {
        let aria_checked = tree.get_attribute(node, "aria-checked").map(str::trim);
        let state = match aria_checked {
            Some("mixed") => "partially checked",
            Some(v) if v.eq_ignore_ascii_case("true") => "checked",
            Some(_) => "not checked",
            None if tree.has_attribute(node, "checked") => "checked",
            None => "not checked",
        };
        // Radios only say so when selected
        if role != AriaRole::Radio || state == "checked" {
            states.push(state.to_string());
        }
    }
    if tree.has_attribute(node, "disabled") || attr_is_true(doc, node, "aria-disabled") {
        states.push("disabled".into());
    }
    if tree.has_attribute(node, "required") || attr_is_true(doc, node, "aria-required") {
        states.push("required".into());
    }
    match tree.get_attribute(node, "aria-expanded").map(str::trim) {
        Some("true") => states.push("expanded".into()),
        Some("false") => states.push("collapsed".into()),
        _ => {}
    }
    if attr_is_true(doc, node, "aria-selected") {
        states.push("selected".into());
    }
    if attr_is_true(doc, node, "aria-pressed") {
        states.push("pressed".into());
    }
    if tree
        .get_attribute(node, "aria-current")
        .is_some_and(|v| !v.trim().is_empty() && v.trim() != "false")
    {
        states.push("current".into());
    }
    states
}

/// Value of a text-like input or the selected option of a select
pub fn element_value(doc: &Document, node: NodeId) -> Option<String> {
    let tree = &doc.tree;
    let tag = tree.tag_name(node)?;
    let value = match tag {
        "input" => {
            let kind = input_type(tree, node);
            if kind == "password" || !TEXT_INPUT_TYPES.contains(&kind.as_str()) {
                return None;
            }
            tree.get_attribute(node, "value")?.to_string()
        }
        "textarea" => tree.text_content(node),
        "select" => {
            let options = tree.query_selector_all(node, "option");
            let selected = options
                .iter()
                .copied()
                .find(|&o| tree.has_attribute(o, "selected"))
                .or_else(|| options.first().copied())?;
            tree.text_content(selected)
        }
        _ => return None,
    };
    Some(normalize_whitespace(&value)).filter(|v| !v.is_empty())
}

/// Full spoken description: name, role, states and value
pub fn describe_element(doc: &Document, node: NodeId) -> String {
    let tree = &doc.tree;
    let mut parts = Vec::new();

    let name = accessible_name(doc, node);
    if !name.is_empty() {
        parts.push(name);
    }
    if let Some(role) = role_of(tree, node) {
        match (role, heading_level(tree, node)) {
            (AriaRole::Heading, Some(level)) => parts.push(format!("heading level {level}")),
            _ => parts.extend(role.spoken().map(str::to_string)),
        }
    }
    parts.extend(element_states(doc, node));
    if let Some(value) = element_value(doc, node) {
        parts.push(value);
    }

    if parts.is_empty() {
        "Unlabeled element".to_string()
    } else {
        parts.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc_with(build: impl FnOnce(&mut Document) -> NodeId) -> (Document, NodeId) {
        let mut doc = Document::default();
        let node = build(&mut doc);
        (doc, node)
    }

    fn element(doc: &mut Document, tag: &str, attrs: &[(&str, &str)], text: &str) -> NodeId {
        let body = doc.body();
        let node = doc.tree.create_element(tag);
        for (name, value) in attrs {
            doc.tree.set_attribute(node, name, value);
        }
        if !text.is_empty() {
            doc.tree.set_text_content(node, text);
        }
        doc.tree.append_child(body, node).unwrap();
        node
    }

    #[test]
    fn test_labelledby_wins() {
        let (doc, button) = doc_with(|doc| {
            element(doc, "span", &[("id", "a")], "Save");
            element(doc, "span", &[("id", "b")], " draft ");
            element(
                doc,
                "button",
                &[("aria-labelledby", "a b missing"), ("aria-label", "ignored")],
                "Text",
            )
        });
        assert_eq!(accessible_name(&doc, button), "Save draft");
    }

    #[test]
    fn test_label_for_only_on_form_controls() {
        let (doc, input) = doc_with(|doc| {
            element(doc, "label", &[("for", "email")], "Email");
            element(doc, "input", &[("id", "email"), ("title", "Your email")], "")
        });
        assert_eq!(accessible_name(&doc, input), "Email");

        let (doc, div) = doc_with(|doc| {
            element(doc, "label", &[("for", "box")], "Box");
            element(doc, "div", &[("id", "box"), ("title", "Titled")], "")
        });
        assert_eq!(accessible_name(&doc, div), "Titled");
    }

    #[test]
    fn test_alt_then_text() {
        let (doc, img) = doc_with(|doc| element(doc, "img", &[("alt", "Cat")], ""));
        assert_eq!(accessible_name(&doc, img), "Cat");

        let (doc, link) = doc_with(|doc| element(doc, "a", &[("href", "/")], "  Home\n page "));
        assert_eq!(accessible_name(&doc, link), "Home page");

        let (doc, empty) = doc_with(|doc| element(doc, "div", &[], ""));
        assert_eq!(accessible_name(&doc, empty), "");
    }

    #[test]
    fn test_describe_checkbox_and_states() {
        let (doc, checkbox) = doc_with(|doc| {
            element(
                doc,
                "input",
                &[
                    ("type", "checkbox"),
                    ("aria-label", "Subscribe"),
                    ("checked", ""),
                    ("required", ""),
                ],
                "",
            )
        });
        assert_eq!(
            describe_element(&doc, checkbox),
            "Subscribe, checkbox, checked, required"
        );
    }

    #[test]
    fn test_describe_values() {
        let (doc, input) = doc_with(|doc| {
            element(doc, "input", &[("aria-label", "Name"), ("value", "Ada")], "")
        });
        assert_eq!(describe_element(&doc, input), "Name, edit text, Ada");

        let (mut doc, select) = doc_with(|doc| {
            element(doc, "select", &[("aria-label", "Size"), ("aria-expanded", "false")], "")
        });
        for (text, selected) in [("Small", false), ("Large", true)] {
            let option = doc.tree.create_element("option");
            doc.tree.set_text_content(option, text);
            if selected {
                doc.tree.set_attribute(option, "selected", "");
            }
            doc.tree.append_child(select, option).unwrap();
        }
        assert_eq!(describe_element(&doc, select), "Size, combo box, collapsed, Large");
    }

    #[test]
    fn test_heading_description() {
        let (doc, h2) = doc_with(|doc| element(doc, "h2", &[], "Latest news"));
        assert_eq!(describe_element(&doc, h2), "Latest news, heading level 2");
    }

    #[test]
    fn test_focusable_looking() {
        let (doc, div) = doc_with(|doc| element(doc, "div", &[("tabindex", "0")], ""));
        assert!(is_focusable_looking(&doc, div));
        let (doc, p) = doc_with(|doc| element(doc, "p", &[], "text"));
        assert!(!is_focusable_looking(&doc, p));
    }
}
