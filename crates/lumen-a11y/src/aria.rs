//! ARIA roles
//!
//! Explicit and implicit roles, and how each one is spoken.

use std::str::FromStr;

use lumen_dom::{DomTree, NodeId};

use crate::A11yError;

/// ARIA role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AriaRole {
    // Landmark roles
    Banner,
    Complementary,
    ContentInfo,
    Form,
    Main,
    Navigation,
    Region,
    Search,

    // Widget roles
    Alert,
    Button,
    Checkbox,
    ComboBox,
    Link,
    ListBox,
    MenuItem,
    Option,
    Radio,
    Slider,
    SpinButton,
    Status,
    Switch,
    Tab,
    TextBox,
    TreeItem,

    // Document structure
    Article,
    Cell,
    ColumnHeader,
    Heading,
    Img,
    List,
    ListItem,
    Row,
    RowHeader,
    Table,
    Presentation,
}

impl AriaRole {
    /// Parse from a `role` attribute (first recognised token wins)
    pub fn parse(s: &str) -> Option<Self> {
        s.split_whitespace().find_map(Self::parse_token)
    }

    fn parse_token(token: &str) -> Option<Self> {
        Some(match token.to_ascii_lowercase().as_str() {
            "banner" => Self::Banner,
            "complementary" => Self::Complementary,
            "contentinfo" => Self::ContentInfo,
            "form" => Self::Form,
            "main" => Self::Main,
            "navigation" => Self::Navigation,
            "region" => Self::Region,
            "search" => Self::Search,
            "alert" => Self::Alert,
            "button" => Self::Button,
            "checkbox" => Self::Checkbox,
            "combobox" => Self::ComboBox,
            "link" => Self::Link,
            "listbox" => Self::ListBox,
            "menuitem" => Self::MenuItem,
            "option" => Self::Option,
            "radio" => Self::Radio,
            "slider" => Self::Slider,
            "spinbutton" => Self::SpinButton,
            "status" => Self::Status,
            "switch" => Self::Switch,
            "tab" => Self::Tab,
            "textbox" => Self::TextBox,
            "treeitem" => Self::TreeItem,
            "article" => Self::Article,
            "cell" => Self::Cell,
            "columnheader" => Self::ColumnHeader,
            "heading" => Self::Heading,
            "img" | "image" => Self::Img,
            "list" => Self::List,
            "listitem" => Self::ListItem,
            "row" => Self::Row,
            "rowheader" => Self::RowHeader,
            "table" => Self::Table,
            "none" | "presentation" => Self::Presentation,
            _ => return None,
        })
    }

    /// Check if role is landmark
    pub fn is_landmark(&self) -> bool {
        matches!(
            self,
            Self::Banner
                | Self::Complementary
                | Self::ContentInfo
                | Self::Form
                | Self::Main
                | Self::Navigation
                | Self::Region
                | Self::Search
        )
    }

    /// Roles whose checked state is announced
    pub fn is_checkable(&self) -> bool {
        matches!(self, Self::Checkbox | Self::Radio | Self::Switch)
    }

    /// Role as read aloud, `None` for roles not worth announcing
    pub fn spoken(&self) -> Option<&'static str> {
        Some(match self {
            Self::Banner => "banner",
            Self::Complementary => "complementary",
            Self::ContentInfo => "content information",
            Self::Form => "form",
            Self::Main => "main",
            Self::Navigation => "navigation",
            Self::Region => "region",
            Self::Search => "search",
            Self::Alert => "alert",
            Self::Button => "button",
            Self::Checkbox => "checkbox",
            Self::ComboBox => "combo box",
            Self::Link => "link",
            Self::ListBox => "list box",
            Self::MenuItem => "menu item",
            Self::Option => "option",
            Self::Radio => "radio button",
            Self::Slider => "slider",
            Self::SpinButton => "spin button",
            Self::Switch => "switch",
            Self::Tab => "tab",
            Self::TextBox => "edit text",
            Self::TreeItem => "tree item",
            Self::Article => "article",
            Self::Heading => "heading",
            Self::Img => "image",
            Self::List => "list",
            Self::ListItem => "list item",
            Self::Table => "table",
            Self::Status
            | Self::Cell
            | Self::ColumnHeader
            | Self::Row
            | Self::RowHeader
            | Self::Presentation => return None,
        })
    }
}

impl FromStr for AriaRole {
    type Err = A11yError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| A11yError::InvalidRole(s.to_string()))
    }
}

/// `type` values whose input takes free text
pub const TEXT_INPUT_TYPES: &[&str] =
    &["text", "email", "search", "tel", "url", "number", "password"];

/// Explicit role if valid, otherwise the element's implicit role
pub fn role_of(tree: &DomTree, node: NodeId) -> Option<AriaRole> {
    if let Some(role) = tree.get_attribute(node, "role").and_then(AriaRole::parse) {
        return Some(role);
    }
    implicit_role(tree, node)
}

/// Role a user agent maps the element to without `role`
pub fn implicit_role(tree: &DomTree, node: NodeId) -> Option<AriaRole> {
    let tag = tree.tag_name(node)?;
    Some(match tag {
        "a" | "area" if tree.has_attribute(node, "href") => AriaRole::Link,
        "button" | "summary" => AriaRole::Button,
        "input" => match input_type(tree, node).as_str() {
            "checkbox" => AriaRole::Checkbox,
            "radio" => AriaRole::Radio,
            "range" => AriaRole::Slider,
            "button" | "submit" | "reset" | "image" => AriaRole::Button,
            "hidden" => return None,
            "number" => AriaRole::SpinButton,
            _ => AriaRole::TextBox,
        },
        "textarea" => AriaRole::TextBox,
        "select" => {
            if tree.has_attribute(node, "multiple") {
                AriaRole::ListBox
            } else {
                AriaRole::ComboBox
            }
        }
        "option" => AriaRole::Option,
        "img" => AriaRole::Img,
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => AriaRole::Heading,
        "nav" => AriaRole::Navigation,
        "main" => AriaRole::Main,
        "aside" => AriaRole::Complementary,
        "header" => AriaRole::Banner,
        "footer" => AriaRole::ContentInfo,
        "article" => AriaRole::Article,
        "ul" | "ol" => AriaRole::List,
        "li" => AriaRole::ListItem,
        "table" => AriaRole::Table,
        _ => return None,
    })
}

/// Lowercased `type` of an input, `text` when missing
pub fn input_type(tree: &DomTree, node: NodeId) -> String {
    tree.get_attribute(node, "type")
        .map(|t| t.trim().to_ascii_lowercase())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| "text".to_string())
}

/// Heading level from `h1`..`h6` or `aria-level`
pub fn heading_level(tree: &DomTree, node: NodeId) -> Option<u8> {
    if let Some(level) = tree
        .get_attribute(node, "aria-level")
        .and_then(|l| l.trim().parse::<u8>().ok())
    {
        return Some(level);
    }
    let tag = tree.tag_name(node)?;
    let digit = tag.strip_prefix('h')?;
    digit.parse::<u8>().ok().filter(|l| (1..=6).contains(l))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_role() {
        assert_eq!(AriaRole::parse("button"), Some(AriaRole::Button));
        assert_eq!(AriaRole::parse("bogus navigation"), Some(AriaRole::Navigation));
        assert_eq!("NONE".parse::<AriaRole>(), Ok(AriaRole::Presentation));
        assert_eq!(
            "widget".parse::<AriaRole>(),
            Err(A11yError::InvalidRole("widget".into()))
        );
        assert!(AriaRole::Navigation.is_landmark());
        assert!(AriaRole::Switch.is_checkable());
    }

    #[test]
    fn test_implicit_roles() {
        let mut tree = DomTree::new();
        let link = tree.create_element("a");
        let anchor = tree.create_element("a");
        let checkbox = tree.create_element("input");
        let text = tree.create_element("input");
        let h3 = tree.create_element("h3");
        tree.set_attribute(link, "href", "/");
        tree.set_attribute(checkbox, "type", "CHECKBOX");

        assert_eq!(role_of(&tree, link), Some(AriaRole::Link));
        assert_eq!(role_of(&tree, anchor), None);
        assert_eq!(role_of(&tree, checkbox), Some(AriaRole::Checkbox));
        assert_eq!(role_of(&tree, text), Some(AriaRole::TextBox));
        assert_eq!(heading_level(&tree, h3), Some(3));

        tree.set_attribute(text, "role", "switch");
        assert_eq!(role_of(&tree, text), Some(AriaRole::Switch));
    }
}
