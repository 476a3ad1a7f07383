//! HTML Serialization (innerHTML/outerHTML)

use lumen_dom::{DomTree, NodeData, NodeId};

/// Void elements (no end tag)
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Raw text elements (content is not escaped)
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

/// HTML serializer
#[derive(Debug, Default, Clone, Copy)]
pub struct HtmlSerializer;

impl HtmlSerializer {
    pub fn new() -> Self {
        Self
    }

    /// Serialize innerHTML of a node (children only)
    pub fn serialize_inner(&self, tree: &DomTree, node_id: NodeId) -> String {
        if tree
            .tag_name(node_id)
            .is_some_and(|tag| RAW_TEXT_ELEMENTS.contains(&tag))
        {
            return tree.text_content(node_id);
        }
        let mut output = String::new();
        for child in tree.children(node_id) {
            self.serialize_node(tree, child, &mut output);
        }
        output
    }

    /// Serialize outerHTML of a node
    pub fn serialize_outer(&self, tree: &DomTree, node_id: NodeId) -> String {
        let mut output = String::new();
        self.serialize_node(tree, node_id, &mut output);
        output
    }

    fn serialize_node(&self, tree: &DomTree, node_id: NodeId, output: &mut String) {
        let Some(node) = tree.get(node_id) else {
            return;
        };

        match &node.data {
            NodeData::Document => {
                for child in tree.children(node_id) {
                    self.serialize_node(tree, child, output);
                }
            }
            NodeData::Element(elem) => {
                let tag = elem.tag.as_str();
                output.push('<');
                output.push_str(tag);
                for attr in elem.attrs.iter() {
                    output.push(' ');
                    output.push_str(&attr.name);
                    if !attr.value.is_empty() {
                        output.push_str("=\"");
                        escape_attribute(&attr.value, output);
                        output.push('"');
                    }
                }
                output.push('>');

                if VOID_ELEMENTS.contains(&tag) {
                    return;
                }
                if RAW_TEXT_ELEMENTS.contains(&tag) {
                    output.push_str(&tree.text_content(node_id));
                } else {
                    for child in tree.children(node_id) {
                        self.serialize_node(tree, child, output);
                    }
                }
                output.push_str("</");
                output.push_str(tag);
                output.push('>');
            }
            NodeData::Text(text) => escape_text(text, output),
            NodeData::Comment(text) => {
                output.push_str("<!--");
                output.push_str(text);
                output.push_str("-->");
            }
        }
    }
}

fn escape_text(text: &str, output: &mut String) {
    for c in text.chars() {
        match c {
            '&' => output.push_str("&amp;"),
            '<' => output.push_str("&lt;"),
            '>' => output.push_str("&gt;"),
            '\u{a0}' => output.push_str("&nbsp;"),
            _ => output.push(c),
        }
    }
}

fn escape_attribute(value: &str, output: &mut String) {
    for c in value.chars() {
        match c {
            '&' => output.push_str("&amp;"),
            '"' => output.push_str("&quot;"),
            '\u{a0}' => output.push_str("&nbsp;"),
            _ => output.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_void_and_escaping() {
        let mut tree = DomTree::new();
        let p = tree.create_element("p");
        let img = tree.create_element("img");
        let text = tree.create_text("a < b & c");
        tree.append_child(tree.root(), p).unwrap();
        tree.append_child(p, img).unwrap();
        tree.append_child(p, text).unwrap();
        tree.set_attribute(img, "alt", "say \"hi\"");
        tree.set_attribute(img, "hidden", "");

        assert_eq!(
            HtmlSerializer::new().serialize_outer(&tree, p),
            r#"<p><img alt="say &quot;hi&quot;" hidden>a &lt; b &amp; c</p>"#
        );
    }

    #[test]
    fn test_style_content_is_raw() {
        let mut tree = DomTree::new();
        let style = tree.create_element("style");
        tree.append_child(tree.root(), style).unwrap();
        tree.set_text_content(style, "a > b { color: red; }");

        assert_eq!(
            HtmlSerializer::new().serialize_inner(&tree, style),
            "a > b { color: red; }"
        );
        assert_eq!(
            HtmlSerializer::new().serialize_outer(&tree, style),
            "<style>a > b { color: red; }</style>"
        );
    }
}
