//! Style effects
//!
//! Typography variables and filters live on the root element's inline
//! style; everything larger goes into a `<style>` element in `<head>`
//! identified by a fixed id. Re-injecting a managed stylesheet always
//! removes the old element first, so each id exists at most once.

use lumen_dom::{Document, NodeId};

use crate::values::{FontFamily, LineHeight, Saturation, Spacing, TextSize};

pub const TEXT_SCALE_VAR: &str = "--accessibility-text-scale";
pub const LINE_HEIGHT_VAR: &str = "--accessibility-line-height-scale";
pub const LETTER_SPACING_VAR: &str = "--accessibility-letter-spacing-scale";
pub const WORD_SPACING_VAR: &str = "--accessibility-word-spacing-scale";
pub const FONT_FAMILY_VAR: &str = "--accessibility-font-family";

pub const FONT_FAMILY_STYLE_ID: &str = "accessibility-font-family-style";

/// Marks the control panel; injected rules never reach inside it
pub const PANEL_ATTRIBUTE: &str = "data-accessibility-panel";
pub const PANEL_LINK_CLASS: &str = "accessibility-panel-link";

/// Appended to a selector to keep it off the panel and its links
pub const PANEL_EXCLUSION: &str =
    ":not([data-accessibility-panel]):not([data-accessibility-panel] *):not(.accessibility-panel-link)";

/// Whether `node` is the panel, inside it, or a panel link
pub fn is_panel_element(doc: &Document, node: NodeId) -> bool {
    doc.tree.has_class(node, PANEL_LINK_CLASS)
        || doc
            .tree
            .closest(node, &format!("[{PANEL_ATTRIBUTE}]"))
            .is_some()
}

// ----------------------------------------------------------------------
// Managed stylesheets
// ----------------------------------------------------------------------

/// Replace the `<style id=...>` element with one holding `css`
pub fn inject_style(doc: &mut Document, id: &str, css: &str) -> NodeId {
    remove_style(doc, id);
    let head = doc.head();
    let style = doc.tree.create_element("style");
    doc.tree.set_attribute(style, "id", id);
    doc.tree.set_text_content(style, css);
    if let Err(err) = doc.tree.append_child(head, style) {
        tracing::warn!(%err, id, "could not attach stylesheet");
    }
    tracing::debug!(id, bytes = css.len(), "stylesheet injected");
    style
}

/// Remove every element carrying `id`; returns whether one existed
pub fn remove_style(doc: &mut Document, id: &str) -> bool {
    let mut removed = false;
    while let Some(existing) = doc.get_element_by_id(id) {
        doc.tree.detach(existing);
        removed = true;
    }
    if removed {
        tracing::debug!(id, "stylesheet removed");
    }
    removed
}

/// Text of the managed stylesheet, if present
pub fn style_text(doc: &Document, id: &str) -> Option<String> {
    doc.get_element_by_id(id).map(|n| doc.tree.text_content(n))
}

// ----------------------------------------------------------------------
// Typography
// ----------------------------------------------------------------------

/// Set a custom property on the root element to `scale`
pub fn apply_typography_var(doc: &mut Document, name: &str, scale: f64) {
    let name = if name.starts_with("--") {
        name.to_string()
    } else {
        format!("--{name}")
    };
    let root = doc.document_element();
    doc.tree.set_style_property(root, &name, &format_scale(scale));
    tracing::debug!(%name, scale, "typography variable applied");
}

pub fn apply_text_size(doc: &mut Document, size: TextSize) {
    apply_typography_var(doc, TEXT_SCALE_VAR, size.scale());
}

pub fn apply_line_height(doc: &mut Document, height: LineHeight) {
    apply_typography_var(doc, LINE_HEIGHT_VAR, height.scale());
}

pub fn apply_letter_spacing(doc: &mut Document, spacing: Spacing) {
    apply_typography_var(doc, LETTER_SPACING_VAR, spacing.scale());
}

pub fn apply_word_spacing(doc: &mut Document, spacing: Spacing) {
    apply_typography_var(doc, WORD_SPACING_VAR, spacing.scale());
}

/// `1.0` -> `"1"`, `0.875` -> `"0.875"`
fn format_scale(scale: f64) -> String {
    if scale.is_finite() {
        format!("{scale}")
    } else {
        "1".to_string()
    }
}

// ----------------------------------------------------------------------
// Filters
// ----------------------------------------------------------------------

/// Composed filter value; grayscale always comes first
pub fn filter_value(monochrome: bool, saturation: Saturation) -> String {
    let mut filters = Vec::new();
    if monochrome {
        filters.push("grayscale(100%)".to_string());
    }
    if let Some(factor) = saturation.factor() {
        filters.push(format!("saturate({factor})"));
    }
    filters.join(" ")
}

/// Write the filter to the root element; empty clears it
pub fn apply_filters(doc: &mut Document, monochrome: bool, saturation: Saturation) {
    let value = filter_value(monochrome, saturation);
    let root = doc.document_element();
    doc.tree.set_style_property(root, "filter", &value);
    tracing::debug!(filter = %value, "filters applied");
}

// ----------------------------------------------------------------------
// Font family
// ----------------------------------------------------------------------

pub fn font_family_css() -> String {
    format!(
        "body *{PANEL_EXCLUSION} {{\n  font-family: var({FONT_FAMILY_VAR}) !important;\n}}\n"
    )
}

/// Swap the page font; `Default` removes every trace of the override
pub fn apply_font_family(doc: &mut Document, family: FontFamily) {
    let root = doc.document_element();
    match family.stack() {
        None => {
            remove_style(doc, FONT_FAMILY_STYLE_ID);
            doc.tree.set_style_property(root, FONT_FAMILY_VAR, "");
        }
        Some(stack) => {
            doc.tree.set_style_property(root, FONT_FAMILY_VAR, stack);
            inject_style(doc, FONT_FAMILY_STYLE_ID, &font_family_css());
        }
    }
    tracing::debug!(%family, "font family applied");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typography_var_on_root() {
        let mut doc = Document::default();
        apply_text_size(&mut doc, TextSize::Small);
        apply_typography_var(&mut doc, "accessibility-line-height-scale", 2.0);

        let root = doc.document_element();
        assert_eq!(doc.tree.style_property(root, TEXT_SCALE_VAR), "0.875");
        assert_eq!(doc.tree.style_property(root, LINE_HEIGHT_VAR), "2");
    }

    #[test]
    fn test_filter_composition() {
        assert_eq!(
            filter_value(true, Saturation::High),
            "grayscale(100%) saturate(1.5)"
        );
        assert_eq!(filter_value(false, Saturation::Low), "saturate(0.5)");
        assert_eq!(filter_value(false, Saturation::Normal), "");
    }

    #[test]
    fn test_apply_filters_clears() {
        let mut doc = Document::default();
        let root = doc.document_element();
        apply_filters(&mut doc, true, Saturation::Normal);
        assert_eq!(doc.tree.style_property(root, "filter"), "grayscale(100%)");
        apply_filters(&mut doc, false, Saturation::Normal);
        assert_eq!(doc.tree.style_property(root, "filter"), "");
    }

    #[test]
    fn test_inject_style_replaces() {
        let mut doc = Document::default();
        inject_style(&mut doc, "x", "a { color: red; }");
        inject_style(&mut doc, "x", "a { color: blue; }");
        let tree = &doc.tree;
        assert_eq!(tree.query_selector_all(tree.root(), "#x").len(), 1);
        assert_eq!(style_text(&doc, "x").as_deref(), Some("a { color: blue; }"));

        assert!(remove_style(&mut doc, "x"));
        assert!(!remove_style(&mut doc, "x"));
    }

    #[test]
    fn test_font_family_round_trip() {
        let mut doc = Document::default();
        let root = doc.document_element();
        apply_font_family(&mut doc, FontFamily::Monospace);
        assert!(doc.get_element_by_id(FONT_FAMILY_STYLE_ID).is_some());
        assert!(doc.tree.style_property(root, FONT_FAMILY_VAR).contains("monospace"));

        apply_font_family(&mut doc, FontFamily::Default);
        assert!(doc.get_element_by_id(FONT_FAMILY_STYLE_ID).is_none());
        assert!(!doc.tree.has_attribute(root, "style"));
    }
}
