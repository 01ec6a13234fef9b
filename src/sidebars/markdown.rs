//! Markdown preview sidebar

use super::{DockArea, Sidebar};
use crate::markdown::{markdown_to_html, PreviewTheme};
use crate::model::{Document, DocumentId};

#[derive(Debug, Default)]
pub struct MarkdownSidebar {
    theme: PreviewTheme,
    html: String,
    /// Document and revision of the last render, if it was registered
    rendered: Option<(DocumentId, u64)>,
}

impl MarkdownSidebar {
    pub fn new(theme: PreviewTheme) -> Self {
        Self {
            theme,
            ..Self::default()
        }
    }

    /// Render `document` unless its current revision is already shown
    ///
    /// Unregistered documents cannot be told apart, so they always render.
    /// Returns whether a render happened.
    pub fn load(&mut self, document: &Document) -> bool {
        let key = document.id.map(|id| (id, document.revision));
        if key.is_some() && self.rendered == key {
            return false;
        }

        let source = document.buffer.to_string();
        self.html = markdown_to_html(&source, &self.theme);
        self.rendered = key;
        tracing::debug!(document = ?document.id, revision = document.revision, "Rendered markdown preview");
        true
    }

    pub fn set_theme(&mut self, theme: PreviewTheme) {
        self.theme = theme;
        self.rendered = None;
    }

    pub fn html(&self) -> &str {
        &self.html
    }
}

impl Sidebar for MarkdownSidebar {
    fn title(&self) -> &'static str {
        "Markdown preview"
    }

    fn initial_area(&self) -> DockArea {
        DockArea::Right
    }

    fn initially_visible(&self) -> bool {
        false
    }

    fn initial_width(&self) -> u32 {
        300
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_skips_unchanged_revision() {
        let mut doc = Document::with_text("# Title");
        doc.id = Some(DocumentId(1));
        let mut sidebar = MarkdownSidebar::default();

        assert!(sidebar.load(&doc));
        assert!(sidebar.html().contains("<h1>Title</h1>"));
        assert!(!sidebar.load(&doc));

        doc.set_text("*changed*");
        assert!(sidebar.load(&doc));
        assert!(sidebar.html().contains("<em>changed</em>"));
    }

    #[test]
    fn test_unregistered_documents_are_not_confused() {
        let mut sidebar = MarkdownSidebar::default();

        assert!(sidebar.load(&Document::with_text("# Alpha")));
        assert!(sidebar.html().contains("Alpha"));

        assert!(sidebar.load(&Document::with_text("# Beta")));
        assert!(sidebar.html().contains("Beta"));
        assert!(!sidebar.html().contains("Alpha"));
    }

    #[test]
    fn test_theme_change_forces_render() {
        let doc = Document::with_text("text");
        let mut sidebar = MarkdownSidebar::default();
        assert!(sidebar.load(&doc));
        sidebar.set_theme(PreviewTheme::light());
        assert!(sidebar.load(&doc));
    }
}
