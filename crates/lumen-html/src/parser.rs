//! HTML5 Parser implementation
//!
//! Parses with html5ever into its RcDom, then converts the result into
//! a `lumen_dom::Document`.

use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use lumen_dom::{Document, DomTree, NodeId};
use markup5ever_rcdom::{Handle, NodeData as RcNodeData, RcDom};

/// HTML5 parser
#[derive(Debug, Default, Clone, Copy)]
pub struct HtmlParser;

impl HtmlParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse HTML string into a Document
    pub fn parse(&self, html: &str) -> Document {
        self.parse_with_url(html, "about:blank")
    }

    /// Parse HTML with a document URL
    pub fn parse_with_url(&self, html: &str, url: &str) -> Document {
        tracing::debug!(url, "parsing HTML document");

        let dom = parse_document(RcDom::default(), Default::default()).one(html);
        let mut tree = DomTree::new();
        let root = tree.root();
        convert_node(&dom.document, &mut tree, root);

        let document = Document::from_tree(url, tree);
        tracing::debug!(nodes = document.tree().len(), "parsed HTML document");
        document
    }
}

/// Copy an RcDom node and its subtree under `parent`
fn convert_node(handle: &Handle, tree: &mut DomTree, parent: NodeId) {
    match &handle.data {
        RcNodeData::Document => {
            for child in handle.children.borrow().iter() {
                convert_node(child, tree, parent);
            }
        }
        RcNodeData::Text { contents } => {
            let text = contents.borrow();
            if !text.trim().is_empty() {
                let id = tree.create_text(&text);
                attach(tree, parent, id);
            }
        }
        RcNodeData::Element { name, attrs, .. } => {
            let id = tree.create_element(&name.local);
            for attr in attrs.borrow().iter() {
                tree.set_attribute(id, &attr.name.local, &attr.value);
            }
            attach(tree, parent, id);

            for child in handle.children.borrow().iter() {
                convert_node(child, tree, id);
            }
        }
        // Doctypes, comments and processing instructions carry nothing we use
        RcNodeData::Doctype { .. }
        | RcNodeData::Comment { .. }
        | RcNodeData::ProcessingInstruction { .. } => {}
    }
}

fn attach(tree: &mut DomTree, parent: NodeId, child: NodeId) {
    if let Err(err) = tree.append_child(parent, child) {
        tracing::warn!(%err, "dropping node that cannot be attached");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple() {
        let html = "<html><head><title>Test</title></head><body><p>Hello</p></body></html>";
        let doc = HtmlParser::new().parse(html);

        assert_eq!(doc.title(), "Test");
        let p = doc.tree().query_selector(doc.body(), "p").unwrap();
        assert_eq!(doc.tree().text_content(p), "Hello");
    }

    #[test]
    fn test_parse_fragment_gets_body() {
        // html5ever wraps fragments in html/head/body
        let doc = HtmlParser::new().parse("<div><span>Text</span></div>");
        let tree = doc.tree();
        let div = tree.query_selector(tree.root(), "div").unwrap();
        assert_eq!(tree.parent(div), Some(doc.body()));
    }

    #[test]
    fn test_whitespace_text_is_dropped() {
        let doc = HtmlParser::new().parse("<ul>\n  <li>One</li>\n  <li>Two</li>\n</ul>");
        let tree = doc.tree();
        let ul = tree.query_selector(tree.root(), "ul").unwrap();
        assert_eq!(tree.children(ul).count(), 2);
    }
}
