//! Contrast palettes
//!
//! Each non-default level is one generated stylesheet plus a
//! `data-contrast` attribute on `<html>` that its selectors key on.

use lumen_dom::Document;

use crate::styles::{PANEL_EXCLUSION, inject_style, remove_style};
use crate::values::ContrastLevel;

pub const CONTRAST_STYLE_ID: &str = "accessibility-contrast-style";
pub const CONTRAST_ATTRIBUTE: &str = "data-contrast";

/// Colors for one contrast level
#[derive(Debug, Clone, Copy)]
struct Palette {
    background: &'static str,
    text: &'static str,
    border: &'static str,
    link: &'static str,
    link_visited: &'static str,
    link_hover: &'static str,
    control_background: &'static str,
    control_text: &'static str,
    control_hover: &'static str,
    focus_outline: &'static str,
    selection_background: &'static str,
    selection_text: &'static str,
    placeholder: &'static str,
    table_header: &'static str,
    image_filter: &'static str,
    /// (thumb, track)
    scrollbar: Option<(&'static str, &'static str)>,
}

const LOW: Palette = Palette {
    background: "#f4f4f4",
    text: "#4a4a4a",
    border: "#c4c4c4",
    link: "#4f6a8f",
    link_visited: "#6f5a8a",
    link_hover: "#364a66",
    control_background: "#fafafa",
    control_text: "#4a4a4a",
    control_hover: "#ececec",
    focus_outline: "2px solid #8a8a8a",
    selection_background: "#d6d6d6",
    selection_text: "#2e2e2e",
    placeholder: "#8c8c8c",
    table_header: "#e6e6e6",
    image_filter: "contrast(0.85)",
    scrollbar: None,
};

const HIGH: Palette = Palette {
    background: "#ffffff",
    text: "#000000",
    border: "#000000",
    link: "#0000ee",
    link_visited: "#551a8b",
    link_hover: "#000080",
    control_background: "#ffffff",
    control_text: "#000000",
    control_hover: "#e6e6e6",
    focus_outline: "3px solid #000000",
    selection_background: "#000000",
    selection_text: "#ffffff",
    placeholder: "#595959",
    table_header: "#f0f0f0",
    image_filter: "contrast(1.2)",
    scrollbar: None,
};

const DARK: Palette = Palette {
    background: "#121212",
    text: "#e8e8e8",
    border: "#3d3d3d",
    link: "#8ab4f8",
    link_visited: "#c58af9",
    link_hover: "#aecbfa",
    control_background: "#1f1f1f",
    control_text: "#e8e8e8",
    control_hover: "#2c2c2c",
    focus_outline: "2px solid #8ab4f8",
    selection_background: "#3a5f8f",
    selection_text: "#ffffff",
    placeholder: "#9e9e9e",
    table_header: "#1f1f1f",
    image_filter: "brightness(0.85)",
    scrollbar: Some(("#5f5f5f", "#1f1f1f")),
};

fn palette(level: ContrastLevel) -> Option<&'static Palette> {
    match level {
        ContrastLevel::Default => None,
        ContrastLevel::Low => Some(&LOW),
        ContrastLevel::High => Some(&HIGH),
        ContrastLevel::Dark => Some(&DARK),
    }
}

struct Rules {
    level: &'static str,
    css: String,
}

impl Rules {
    /// Emit one rule; each `parts` entry is scoped to the level and kept off the panel
    fn rule(&mut self, parts: &[&str], declarations: &[String]) {
        let selectors: Vec<String> = parts
            .iter()
            .map(|part| {
                let (element, pseudo) = match part.find("::") {
                    Some(at) => part.split_at(at),
                    None => (*part, ""),
                };
                format!(
                    "html[{CONTRAST_ATTRIBUTE}=\"{}\"] {element}{PANEL_EXCLUSION}{pseudo}",
                    self.level
                )
            })
            .collect();
        self.css.push_str(&selectors.join(",\n"));
        self.css.push_str(" {\n");
        for declaration in declarations {
            self.css.push_str("  ");
            self.css.push_str(declaration);
            self.css.push_str(" !important;\n");
        }
        self.css.push_str("}\n");
    }
}

/// Stylesheet for `level`; `None` for the default level
pub fn contrast_css(level: ContrastLevel) -> Option<String> {
    let p = palette(level)?;
    let mut rules = Rules {
        level: level.as_str(),
        css: String::new(),
    };

    rules.rule(
        &["body", "body *"],
        &[
            format!("background-color: {}", p.background),
            format!("color: {}", p.text),
            format!("border-color: {}", p.border),
        ],
    );
    rules.rule(&["a", "a *"], &[format!("color: {}", p.link)]);
    rules.rule(&["a:visited"], &[format!("color: {}", p.link_visited)]);
    rules.rule(
        &["a:hover", "a:focus"],
        &[
            format!("color: {}", p.link_hover),
            "text-decoration: underline".to_string(),
        ],
    );
    rules.rule(
        &["input", "select", "textarea", "button"],
        &[
            format!("background-color: {}", p.control_background),
            format!("color: {}", p.control_text),
            format!("border: 1px solid {}", p.border),
        ],
    );
    rules.rule(
        &["button:hover", "input:hover", "select:hover", "textarea:hover"],
        &[format!("background-color: {}", p.control_hover)],
    );
    rules.rule(
        &[
            "a:focus",
            "button:focus",
            "input:focus",
            "select:focus",
            "textarea:focus",
        ],
        &[
            format!("outline: {}", p.focus_outline),
            "outline-offset: 2px".to_string(),
        ],
    );
    rules.rule(&["img"], &[format!("filter: {}", p.image_filter)]);
    rules.rule(
        &["table", "th", "td"],
        &[format!("border: 1px solid {}", p.border)],
    );
    rules.rule(&["th"], &[format!("background-color: {}", p.table_header)]);
    rules.rule(
        &["*::selection"],
        &[
            format!("background-color: {}", p.selection_background),
            format!("color: {}", p.selection_text),
        ],
    );
    rules.rule(
        &["input::placeholder", "textarea::placeholder"],
        &[format!("color: {}", p.placeholder), "opacity: 1".to_string()],
    );

    if let Some((thumb, track)) = p.scrollbar {
        let level = rules.level;
        rules.css.push_str(&format!(
            "html[{CONTRAST_ATTRIBUTE}=\"{level}\"] {{\n  scrollbar-color: {thumb} {track};\n}}\n\
             html[{CONTRAST_ATTRIBUTE}=\"{level}\"] ::-webkit-scrollbar {{\n  width: 12px;\n  background-color: {track};\n}}\n\
             html[{CONTRAST_ATTRIBUTE}=\"{level}\"] ::-webkit-scrollbar-thumb {{\n  background-color: {thumb};\n  border-radius: 6px;\n}}\n"
        ));
    }

    Some(rules.css)
}

/// Replace the contrast stylesheet; `Default` removes it entirely
pub fn apply_contrast(doc: &mut Document, level: ContrastLevel) {
    let root = doc.document_element();
    remove_style(doc, CONTRAST_STYLE_ID);
    doc.tree.remove_attribute(root, CONTRAST_ATTRIBUTE);

    let Some(css) = contrast_css(level) else {
        tracing::debug!("contrast reset");
        return;
    };
    doc.tree.set_attribute(root, CONTRAST_ATTRIBUTE, level.as_str());
    inject_style(doc, CONTRAST_STYLE_ID, &css);
    tracing::debug!(%level, "contrast applied");
}
