//! Window
//!
//! The global environment: an optional document plus navigator strings.
//! A window without a document stands in for a non-browser host.

use crate::Document;

/// Navigator properties used for environment probing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Navigator {
    pub user_agent: String,
    pub platform: String,
    pub vendor: String,
}

impl Navigator {
    pub fn new(user_agent: &str) -> Self {
        Self {
            user_agent: user_agent.to_string(),
            ..Default::default()
        }
    }

    pub fn with_platform(mut self, platform: &str) -> Self {
        self.platform = platform.to_string();
        self
    }

    pub fn with_vendor(mut self, vendor: &str) -> Self {
        self.vendor = vendor.to_string();
        self
    }
}

/// Browser window
#[derive(Debug, Default)]
pub struct Window {
    document: Option<Document>,
    navigator: Navigator,
}

impl Window {
    pub fn new(document: Document, navigator: Navigator) -> Self {
        Self {
            document: Some(document),
            navigator,
        }
    }

    /// Window around `document` with an empty navigator
    pub fn with_document(document: Document) -> Self {
        Self::new(document, Navigator::default())
    }

    /// No document available
    pub fn headless() -> Self {
        Self::default()
    }

    pub fn document(&self) -> Option<&Document> {
        self.document.as_ref()
    }

    pub fn document_mut(&mut self) -> Option<&mut Document> {
        self.document.as_mut()
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn set_navigator(&mut self, navigator: Navigator) {
        self.navigator = navigator;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headless_has_no_document() {
        let mut window = Window::headless();
        assert!(window.document().is_none());
        assert!(window.document_mut().is_none());
    }

    #[test]
    fn test_navigator_builder() {
        let nav = Navigator::new("Mozilla/5.0")
            .with_platform("MacIntel")
            .with_vendor("Apple Computer, Inc.");
        let window = Window::new(Document::default(), nav.clone());
        assert_eq!(window.navigator(), &nav);
        assert!(window.document().is_some());
    }
}
