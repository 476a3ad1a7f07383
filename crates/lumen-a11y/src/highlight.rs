//! Heading and link highlighting

use lumen_dom::Document;
use serde::{Deserialize, Serialize};

use crate::styles::{inject_style, remove_style};

pub const HIGHLIGHT_TITLES_STYLE_ID: &str = "accessibility-highlight-titles-style";
pub const HIGHLIGHT_LINKS_STYLE_ID: &str = "accessibility-highlight-links-style";

/// Used when an outline color cannot be converted
pub const FALLBACK_RGBA: &str = "rgba(13, 148, 136, 0.35)";
const FOCUS_ALPHA: f64 = 0.35;

/// Colors forced onto highlighted elements
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HighlightColors {
    pub background: String,
    pub text: String,
    pub outline: String,
}

impl Default for HighlightColors {
    fn default() -> Self {
        Self::titles()
    }
}

impl HighlightColors {
    pub fn new(background: &str, text: &str, outline: &str) -> Self {
        Self {
            background: background.to_string(),
            text: text.to_string(),
            outline: outline.to_string(),
        }
    }

    /// Yellow on black with a teal outline
    pub fn titles() -> Self {
        Self::new("#fef08a", "#000000", "#0d9488")
    }

    pub fn links() -> Self {
        Self::new("#ccfbf1", "#134e4a", "#0d9488")
    }
}

/// `#rgb` / `#rrggbb` to `rgba(r, g, b, alpha)`, teal on anything else
pub fn hex_to_rgba(hex: &str, alpha: f64) -> String {
    parse_hex(hex)
        .map(|(r, g, b)| format!("rgba({r}, {g}, {b}, {alpha})"))
        .unwrap_or_else(|| {
            tracing::debug!(hex, "malformed color, using fallback");
            FALLBACK_RGBA.to_string()
        })
}

fn parse_hex(hex: &str) -> Option<(u8, u8, u8)> {
    let digits = hex.trim().strip_prefix('#')?;
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    match digits.len() {
        3 => {
            let mut it = digits.chars().map(|c| channel(&format!("{c}{c}")));
            Some((it.next()??, it.next()??, it.next()??))
        }
        6 => Some((
            channel(&digits[0..2])?,
            channel(&digits[2..4])?,
            channel(&digits[4..6])?,
        )),
        _ => None,
    }
}

pub fn titles_css(colors: &HighlightColors) -> String {
    let HighlightColors {
        background,
        text,
        outline,
    } = colors;
    format!(
        "h1:not([aria-hidden=\"true\"]),\n\
         h2:not([aria-hidden=\"true\"]),\n\
         h3:not([aria-hidden=\"true\"]),\n\
         h4:not([aria-hidden=\"true\"]),\n\
         h5:not([aria-hidden=\"true\"]),\n\
         h6:not([aria-hidden=\"true\"]),\n\
         [role=\"heading\"]:not([aria-hidden=\"true\"]) {{\n  \
         background-color: {background} !important;\n  \
         color: {text} !important;\n  \
         outline: 2px solid {outline} !important;\n  \
         outline-offset: 2px !important;\n\
         }}\n"
    )
}

pub fn links_css(colors: &HighlightColors) -> String {
    let HighlightColors {
        background,
        text,
        outline,
    } = colors;
    let glow = hex_to_rgba(outline, FOCUS_ALPHA);
    let scope = ":not([aria-hidden=\"true\"]):not(.accessibility-panel-link)";
    format!(
        "a[href]{scope},\n[role=\"link\"]{scope} {{\n  \
         background-color: {background} !important;\n  \
         color: {text} !important;\n  \
         outline: 2px solid {outline} !important;\n  \
         outline-offset: 2px !important;\n  \
         text-decoration: underline !important;\n\
         }}\n\
         a[href]{scope}:hover,\n[role=\"link\"]{scope}:hover {{\n  \
         background-color: {text} !important;\n  \
         color: {background} !important;\n\
         }}\n\
         a[href]{scope}:focus,\n[role=\"link\"]{scope}:focus {{\n  \
         outline: 3px solid {outline} !important;\n\
         }}\n\
         a[href]{scope}:focus-visible,\n[role=\"link\"]{scope}:focus-visible {{\n  \
         box-shadow: 0 0 0 4px {glow} !important;\n\
         }}\n"
    )
}

/// Inject or remove the heading highlight stylesheet
pub fn apply_highlight_titles(doc: &mut Document, enabled: bool, colors: &HighlightColors) {
    if enabled {
        inject_style(doc, HIGHLIGHT_TITLES_STYLE_ID, &titles_css(colors));
    } else {
        remove_style(doc, HIGHLIGHT_TITLES_STYLE_ID);
    }
}

/// Inject or remove the link highlight stylesheet
pub fn apply_highlight_links(doc: &mut Document, enabled: bool, colors: &HighlightColors) {
    if enabled {
        inject_style(doc, HIGHLIGHT_LINKS_STYLE_ID, &links_css(colors));
    } else {
        remove_style(doc, HIGHLIGHT_LINKS_STYLE_ID);
    }
}
