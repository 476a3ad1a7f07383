//! Lumen HTML
//!
//! HTML5 parsing built on html5ever, plus a small serializer used for
//! debugging and snapshot comparisons.

mod parser;
mod serializer;

pub use parser::HtmlParser;
pub use serializer::HtmlSerializer;

use lumen_dom::Document;

/// Parse an HTML string into a Document
pub fn parse_document(html: &str) -> Document {
    HtmlParser::new().parse(html)
}
