//! Text editor widget state
//!
//! A `TextEditor` is the per-view half of an open document: hover links,
//! the line-number margin and view settings. The text itself lives in the
//! `Document` owned by the registry and is passed in by the caller, the
//! same split as a document and the editors viewing it.

pub mod hover;
pub mod margin;
pub mod surface;

use std::path::{Path, PathBuf};

use crate::config::EditorConfig;
use crate::model::{Document, DocumentError, DocumentId, EolMode};
use hover::{HoverLinkDetector, LinkModifier, Modifiers, UrlOpener};
use margin::{FontSpec, LineNumberMargin};
use surface::{BufferSurface, CharGrid, IndicatorLayer, TextSurface};

/// Answer to the "unsaved changes" question when closing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseResponse {
    Save,
    Discard,
    Cancel,
}

/// Dialogs the host shows on behalf of the editor
pub trait EditorDialogs {
    /// Ask whether to save a modified document before closing it
    fn confirm_unsaved(&mut self, document_name: &str) -> CloseResponse;

    /// Ask for a save target; `None` means the user cancelled
    fn save_file_path(&mut self, directory: Option<&Path>, file_name: &str) -> Option<PathBuf>;
}

/// Settings applied to the rendering component
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewSettings {
    pub indent_size: usize,
    pub tab_width: usize,
    pub use_tabs: bool,
    pub word_wrap: bool,
    pub view_eols: bool,
    pub view_whitespace: bool,
    pub extra_ascent: u32,
    pub extra_descent: u32,
}

impl ViewSettings {
    pub fn from_config(config: &EditorConfig) -> Self {
        Self {
            indent_size: config.indent_size,
            tab_width: config.tab_size,
            use_tabs: config.indent_with_tabs,
            word_wrap: config.word_wrap,
            view_eols: config.view_eols,
            view_whitespace: config.view_whitespace,
            extra_ascent: config.line_spacing / 2,
            extra_descent: config.line_spacing / 2,
        }
    }
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self::from_config(&EditorConfig::default())
    }
}

#[derive(Debug)]
pub struct TextEditor {
    pub document_id: DocumentId,
    /// Geometry used to resolve mouse positions, excluding the margin
    pub grid: CharGrid,
    indicators: IndicatorLayer,
    hover: HoverLinkDetector,
    margin: LineNumberMargin,
    view: ViewSettings,
    font: FontSpec,
    zoom: i32,
    line_numbers: bool,
    settings_dirty: bool,
}

impl TextEditor {
    pub fn new(document_id: DocumentId) -> Self {
        Self {
            document_id,
            grid: CharGrid::default(),
            indicators: IndicatorLayer::default(),
            hover: HoverLinkDetector::new(),
            margin: LineNumberMargin::default(),
            view: ViewSettings::default(),
            font: FontSpec::default(),
            zoom: 0,
            line_numbers: true,
            settings_dirty: true,
        }
    }

    // =========================================================================
    // Loading and editing
    // =========================================================================

    /// Replace `document` with the contents of `path`, keeping its id
    pub fn load_from_file(
        &mut self,
        document: &mut Document,
        path: &Path,
        encoding: Option<&str>,
        default_eol: EolMode,
    ) -> Result<(), DocumentError> {
        let mut loaded = Document::from_file(path, encoding, default_eol)?;
        loaded.id = document.id;
        // Revisions stay monotonic across reloads
        loaded.revision = document.revision + 1;
        *document = loaded;
        self.reset_view(document);
        Ok(())
    }

    pub fn load_from_string(&mut self, document: &mut Document, text: &str) {
        document.set_text(text);
        self.reset_view(document);
    }

    /// Apply an edit; the margin follows when the line count changes
    pub fn apply_edit(&mut self, document: &mut Document, start: usize, end: usize, text: &str) -> isize {
        let lines_added = document.replace(start, end, text);
        self.indicators = IndicatorLayer::default();
        self.hover = HoverLinkDetector::new();
        if lines_added != 0 {
            self.update_line_number_margin(document);
        }
        lines_added
    }

    fn reset_view(&mut self, document: &Document) {
        self.indicators = IndicatorLayer::default();
        self.hover = HoverLinkDetector::new();
        self.update_line_number_margin(document);
    }

    // =========================================================================
    // Settings and margin
    // =========================================================================

    pub fn settings_dirty(&self) -> bool {
        self.settings_dirty
    }

    pub fn set_settings_dirty(&mut self, dirty: bool) {
        self.settings_dirty = dirty;
    }

    /// Apply `config` if settings were marked dirty; returns whether anything was applied
    pub fn reload_settings(&mut self, document: &Document, config: &EditorConfig) -> bool {
        if !self.settings_dirty {
            return false;
        }

        self.view = ViewSettings::from_config(config);
        self.font.point_size = config.font_size;
        self.line_numbers = config.line_numbers;
        self.update_line_number_margin(document);
        self.settings_dirty = false;
        tracing::debug!(document = ?self.document_id, "Reloaded editor settings");
        true
    }

    pub fn set_zoom(&mut self, document: &Document, zoom: i32) {
        self.zoom = zoom;
        self.update_line_number_margin(document);
    }

    pub fn zoom(&self) -> i32 {
        self.zoom
    }

    pub fn update_line_number_margin(&mut self, document: &Document) {
        self.margin
            .update_visibility(self.line_numbers, self.zoom, &self.font, document.line_count());
    }

    pub fn margin(&self) -> &LineNumberMargin {
        &self.margin
    }

    pub fn view_settings(&self) -> &ViewSettings {
        &self.view
    }

    // =========================================================================
    // Saving and closing
    // =========================================================================

    pub fn save_to_file(
        &mut self,
        document: &mut Document,
        path: &Path,
        encoding: Option<&str>,
    ) -> Result<(), DocumentError> {
        document.save_to_file(path, encoding)
    }

    /// Save in place, or ask for a path when the document was never saved
    ///
    /// Returns `Ok(false)` when the user cancelled.
    pub fn save(
        &mut self,
        document: &mut Document,
        dialogs: &mut impl EditorDialogs,
        config: &mut EditorConfig,
    ) -> Result<bool, DocumentError> {
        match document.file_path.clone() {
            Some(path) => {
                self.save_to_file(document, &path, None)?;
                Ok(true)
            }
            None => self.save_as(document, dialogs, config, None),
        }
    }

    pub fn save_as(
        &mut self,
        document: &mut Document,
        dialogs: &mut impl EditorDialogs,
        config: &mut EditorConfig,
        encoding: Option<&str>,
    ) -> Result<bool, DocumentError> {
        let directory = match document.file_path.as_deref().and_then(Path::parent) {
            Some(dir) => Some(dir.to_path_buf()),
            None => config.load_save_directory.clone(),
        };

        let Some(path) = dialogs.save_file_path(directory.as_deref(), &document.display_name())
        else {
            return Ok(false);
        };

        config.remember_save_directory(&path);
        self.save_to_file(document, &path, encoding)?;
        Ok(true)
    }

    /// Returns whether the editor may close
    pub fn close(
        &mut self,
        document: &mut Document,
        dialogs: &mut impl EditorDialogs,
        config: &mut EditorConfig,
    ) -> Result<bool, DocumentError> {
        if !document.is_modified {
            return Ok(true);
        }

        match dialogs.confirm_unsaved(&document.display_name()) {
            CloseResponse::Save => self.save(document, dialogs, config),
            CloseResponse::Discard => Ok(true),
            CloseResponse::Cancel => Ok(false),
        }
    }

    // =========================================================================
    // Mouse
    // =========================================================================

    /// Geometry including the line-number margin
    pub fn effective_grid(&self) -> CharGrid {
        CharGrid {
            text_origin_x: self.grid.text_origin_x + self.margin.width() as f32,
            ..self.grid
        }
    }

    pub fn mouse_move(&mut self, document: &Document, x: f32, y: f32) {
        let grid = self.effective_grid();
        let surface = BufferSurface::new(document, &mut self.indicators, grid);
        let position = surface.position_from_point(x, y);
        self.mouse_move_to(document, position);
    }

    pub fn mouse_move_to(&mut self, document: &Document, position: Option<usize>) {
        let grid = self.effective_grid();
        let mut surface = BufferSurface::new(document, &mut self.indicators, grid);
        self.hover.on_mouse_move(&mut surface, position);
    }

    /// Returns whether a link was opened
    pub fn click(
        &mut self,
        document: &Document,
        modifiers: Modifiers,
        required: LinkModifier,
        opener: &mut impl UrlOpener,
    ) -> bool {
        let grid = self.effective_grid();
        let surface = BufferSurface::new(document, &mut self.indicators, grid);
        self.hover.on_click(&surface, modifiers, required, opener)
    }

    pub fn hover(&self) -> &HoverLinkDetector {
        &self.hover
    }

    pub fn indicators(&self) -> &IndicatorLayer {
        &self.indicators
    }
}
