//! Image hiding
//!
//! Hidden images get `display: none` and a same-sized placeholder block
//! right after them. Each hidden image maps to exactly one placeholder;
//! the `data-original-display-saved` marker keeps a second pass from
//! adding another.

use std::collections::HashMap;

use lumen_dom::{Document, NodeId};

use crate::styles::is_panel_element;

pub const SAVED_MARKER: &str = "data-original-display-saved";
pub const PLACEHOLDER_CLASS: &str = "accessibility-image-placeholder";
pub const DEFAULT_PLACEHOLDER_SIZE: (f64, f64) = (200.0, 150.0);

const IMAGE_SELECTOR: &str = "img:not([aria-hidden=\"true\"])";

/// Inline styles an image had before it was hidden
#[derive(Debug, Clone, PartialEq, Eq)]
struct HiddenImage {
    placeholder: NodeId,
    display: String,
    width: String,
    height: String,
}

/// Image-to-placeholder ownership map
#[derive(Debug, Default)]
pub struct ImageVisibility {
    hidden: HashMap<NodeId, HiddenImage>,
}

impl ImageVisibility {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hidden_count(&self) -> usize {
        self.hidden.len()
    }

    pub fn is_hidden(&self, image: NodeId) -> bool {
        self.hidden.contains_key(&image)
    }

    pub fn placeholder_for(&self, image: NodeId) -> Option<NodeId> {
        self.hidden.get(&image).map(|h| h.placeholder)
    }

    pub fn apply(&mut self, doc: &mut Document, enabled: bool) {
        if enabled {
            self.hide_all(doc);
        } else {
            self.restore_all(doc);
        }
    }

    /// Hide every visible image not yet processed; returns how many
    pub fn hide_all(&mut self, doc: &mut Document) -> usize {
        let images = doc.tree.query_selector_all(doc.tree.root(), IMAGE_SELECTOR);
        let mut count = 0;
        for image in images {
            if self.hidden.contains_key(&image)
                || doc.tree.has_attribute(image, SAVED_MARKER)
                || is_panel_element(doc, image)
            {
                continue;
            }
            self.hide(doc, image);
            count += 1;
        }
        if count > 0 {
            tracing::debug!(count, "images hidden");
        }
        count
    }

    fn hide(&mut self, doc: &mut Document, image: NodeId) {
        let tree = &mut doc.tree;
        let saved = HiddenImage {
            placeholder: NodeId::NONE,
            display: tree.style_property(image, "display"),
            width: tree.style_property(image, "width"),
            height: tree.style_property(image, "height"),
        };

        let (width, height) = tree
            .geometry(image)
            .measured_size()
            .unwrap_or(DEFAULT_PLACEHOLDER_SIZE);
        let label = tree
            .get_attribute(image, "alt")
            .map(str::trim)
            .filter(|alt| !alt.is_empty())
            .unwrap_or("Image")
            .to_string();

        let placeholder = tree.create_element("div");
        tree.set_attribute(placeholder, "class", PLACEHOLDER_CLASS);
        tree.set_attribute(placeholder, "role", "img");
        tree.set_attribute(placeholder, "aria-label", &format!("Image: {label}"));
        tree.set_attribute(placeholder, "style", &placeholder_style(width, height));
        tree.set_text_content(placeholder, &label);

        if let Err(err) = tree.insert_after(image, placeholder) {
            tracing::warn!(%err, "could not place image placeholder");
            return;
        }
        tree.set_attribute(image, SAVED_MARKER, "true");
        tree.set_style_property(image, "display", "none");
        self.hidden.insert(image, HiddenImage { placeholder, ..saved });
    }

    /// Put every hidden image back; no-op when nothing is hidden
    pub fn restore_all(&mut self, doc: &mut Document) {
        if self.hidden.is_empty() {
            return;
        }
        let count = self.hidden.len();
        let tree = &mut doc.tree;
        for (image, saved) in self.hidden.drain() {
            tree.set_style_property(image, "display", &saved.display);
            tree.set_style_property(image, "width", &saved.width);
            tree.set_style_property(image, "height", &saved.height);
            tree.detach(saved.placeholder);
            tree.remove_attribute(image, SAVED_MARKER);
        }
        tracing::debug!(count, "images restored");
    }
}

fn placeholder_style(width: f64, height: f64) -> String {
    format!(
        "display: flex; align-items: center; justify-content: center; \
         width: {width}px; height: {height}px; box-sizing: border-box; \
         border: 2px dashed #9ca3af; border-radius: 4px; \
         background-color: #f3f4f6; color: #4b5563; \
         font-size: 14px; text-align: center; padding: 8px;"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_dom::ElementGeometry;

    fn doc_with_image(alt: Option<&str>) -> (Document, NodeId) {
        let mut doc = Document::default();
        let body = doc.body();
        let img = doc.tree.create_element("img");
        if let Some(alt) = alt {
            doc.tree.set_attribute(img, "alt", alt);
        }
        doc.tree.append_child(body, img).unwrap();
        (doc, img)
    }

    #[test]
    fn test_placeholder_uses_natural_size() {
        let (mut doc, img) = doc_with_image(Some("Cat"));
        doc.tree.set_geometry(
            img,
            ElementGeometry {
                natural_size: Some((300.0, 200.0)),
                ..Default::default()
            },
        );

        let mut images = ImageVisibility::new();
        images.apply(&mut doc, true);

        let placeholder = images.placeholder_for(img).unwrap();
        let tree = &doc.tree;
        assert_eq!(tree.text_content(placeholder), "Cat");
        assert_eq!(tree.get_attribute(placeholder, "aria-label"), Some("Image: Cat"));
        assert_eq!(tree.style_property(placeholder, "width"), "300px");
        assert_eq!(tree.style_property(placeholder, "height"), "200px");
        assert_eq!(tree.style_property(img, "display"), "none");
    }

    #[test]
    fn test_default_size_and_label() {
        let (mut doc, img) = doc_with_image(Some(""));
        let mut images = ImageVisibility::new();
        images.apply(&mut doc, true);

        let placeholder = images.placeholder_for(img).unwrap();
        assert_eq!(doc.tree.text_content(placeholder), "Image");
        assert_eq!(doc.tree.style_property(placeholder, "width"), "200px");
        assert_eq!(doc.tree.style_property(placeholder, "height"), "150px");
    }

    #[test]
    fn test_restore_original_inline_styles() {
        let (mut doc, img) = doc_with_image(Some("Dog"));
        doc.tree.set_attribute(img, "style", "display: inline-block; width: 50px;");

        let mut images = ImageVisibility::new();
        images.apply(&mut doc, true);
        images.apply(&mut doc, false);

        assert_eq!(doc.tree.style_property(img, "display"), "inline-block");
        assert_eq!(doc.tree.style_property(img, "width"), "50px");
        assert!(!doc.tree.has_attribute(img, SAVED_MARKER));
        assert!(doc.tree.query_selector(doc.body(), ".accessibility-image-placeholder").is_none());
    }

    #[test]
    fn test_repeat_enable_single_placeholder() {
        let (mut doc, _) = doc_with_image(Some("Cat"));
        let mut images = ImageVisibility::new();
        images.apply(&mut doc, true);
        images.apply(&mut doc, true);
        images.apply(&mut doc, false);
        images.apply(&mut doc, true);

        let body = doc.body();
        let count = doc.tree.query_selector_all(body, ".accessibility-image-placeholder").len();
        assert_eq!(count, 1);
        assert_eq!(images.hidden_count(), 1);
    }

    #[test]
    fn test_skips_aria_hidden_and_panel_images() {
        let mut doc = Document::default();
        let body = doc.body();
        let decorative = doc.tree.create_element("img");
        doc.tree.set_attribute(decorative, "aria-hidden", "true");
        let panel = doc.tree.create_element("div");
        doc.tree.set_attribute(panel, "data-accessibility-panel", "");
        let icon = doc.tree.create_element("img");
        doc.tree.append_child(body, decorative).unwrap();
        doc.tree.append_child(body, panel).unwrap();
        doc.tree.append_child(panel, icon).unwrap();

        let mut images = ImageVisibility::new();
        assert_eq!(images.hide_all(&mut doc), 0);
    }

    #[test]
    fn test_disable_when_nothing_hidden() {
        let (mut doc, img) = doc_with_image(None);
        let mut images = ImageVisibility::new();
        images.apply(&mut doc, false);
        assert!(!doc.tree.has_attribute(img, "style"));
    }
}
