//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use textdock::editor::hover::UrlOpener;
use textdock::editor::surface::{IndicatorStyle, TextSurface};
use textdock::editor::{CloseResponse, EditorDialogs};
use textdock::model::{Document, DocumentId, DocumentRegistry};
use textdock::sidebars::{ModelEvent, ResultsTree};

/// Register a document with `text` and return its id
pub fn add_doc(registry: &mut DocumentRegistry, text: &str) -> DocumentId {
    registry.insert(Document::with_text(text))
}

/// Collect every event the tree emits
pub fn record_events(tree: &mut ResultsTree) -> Rc<RefCell<Vec<ModelEvent>>> {
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);
    tree.subscribe(move |event| sink.borrow_mut().push(*event));
    events
}

/// Surface over plain text that panics on any out-of-range character read
#[derive(Debug, Default)]
pub struct StrictSurface {
    pub chars: Vec<char>,
    pub painted: Vec<(usize, usize)>,
    pub cleared: Vec<(usize, usize)>,
}

impl StrictSurface {
    pub fn new(text: &str) -> Self {
        Self {
            chars: text.chars().collect(),
            ..Self::default()
        }
    }

    /// Offset of the first occurrence of `needle`, in chars
    pub fn offset_of(&self, needle: &str) -> usize {
        let text: String = self.chars.iter().collect();
        let byte = text.find(needle).expect("needle present");
        text[..byte].chars().count()
    }
}

impl TextSurface for StrictSurface {
    fn len_chars(&self) -> usize {
        self.chars.len()
    }

    fn char_at(&self, offset: usize) -> Option<char> {
        assert!(
            offset < self.chars.len(),
            "read past document end: {offset} >= {}",
            self.chars.len()
        );
        Some(self.chars[offset])
    }

    fn text_range(&self, start: usize, end: usize) -> String {
        assert!(start <= end && end <= self.chars.len(), "bad range {start}..{end}");
        self.chars[start..end].iter().collect()
    }

    fn set_indicator_range(&mut self, start: usize, end: usize, style: IndicatorStyle) {
        assert_eq!(style, IndicatorStyle::HoverLink);
        self.painted.push((start, end));
    }

    fn clear_indicator_range(&mut self, start: usize, end: usize) {
        self.cleared.push((start, end));
    }

    fn position_from_point(&self, _x: f32, _y: f32) -> Option<usize> {
        None
    }
}

/// Records every URL it is asked to open
#[derive(Debug, Default)]
pub struct RecordingOpener {
    pub opened: Vec<String>,
}

impl UrlOpener for RecordingOpener {
    fn open_url(&mut self, url: &str) {
        self.opened.push(url.to_string());
    }
}

/// Scripted answers for close/save dialogs
#[derive(Debug)]
pub struct ScriptedDialogs {
    pub close_response: CloseResponse,
    pub save_path: Option<PathBuf>,
    pub confirm_calls: usize,
    pub save_calls: Vec<(Option<PathBuf>, String)>,
}

impl ScriptedDialogs {
    pub fn new(close_response: CloseResponse, save_path: Option<PathBuf>) -> Self {
        Self {
            close_response,
            save_path,
            confirm_calls: 0,
            save_calls: Vec::new(),
        }
    }
}

impl EditorDialogs for ScriptedDialogs {
    fn confirm_unsaved(&mut self, _document_name: &str) -> CloseResponse {
        self.confirm_calls += 1;
        self.close_response
    }

    fn save_file_path(&mut self, directory: Option<&Path>, file_name: &str) -> Option<PathBuf> {
        self.save_calls
            .push((directory.map(Path::to_path_buf), file_name.to_string()));
        self.save_path.clone()
    }
}
