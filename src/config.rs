//! Editor configuration persistence
//!
//! Stores user preferences in `~/.config/textdock/config.yaml`

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::editor::hover::LinkModifier;
use crate::markdown::PreviewTheme;
use crate::model::{Document, EolMode};

/// Editor configuration that persists across sessions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Show the line-number margin
    pub line_numbers: bool,
    /// Encoding label for new documents
    pub default_encoding: String,
    /// Line ending for new documents and files without any line break
    pub eol_mode: EolMode,
    pub tab_size: usize,
    pub indent_size: usize,
    pub indent_with_tabs: bool,
    pub word_wrap: bool,
    pub view_eols: bool,
    pub view_whitespace: bool,
    /// Extra pixels between lines, split evenly above and below
    pub line_spacing: u32,
    /// Base font size in points
    pub font_size: f32,
    /// Modifier that must be held to open a hovered link
    pub link_modifier: LinkModifier,
    /// Last directory used by "save as"
    pub load_save_directory: Option<PathBuf>,
    pub preview_theme: PreviewTheme,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            line_numbers: true,
            default_encoding: "UTF-8".to_string(),
            eol_mode: EolMode::default(),
            tab_size: 4,
            indent_size: 4,
            indent_with_tabs: false,
            word_wrap: false,
            view_eols: false,
            view_whitespace: false,
            line_spacing: 0,
            font_size: 10.0,
            link_modifier: LinkModifier::default(),
            load_save_directory: None,
            preview_theme: PreviewTheme::default(),
        }
    }
}

impl EditorConfig {
    /// Load config from disk, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = crate::config_paths::config_file() else {
            tracing::debug!("No config directory available, using defaults");
            return Self::default();
        };
        Self::load_from(&path)
    }

    /// Load config from an explicit path, falling back to defaults on any error
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            tracing::debug!(
                "Config file not found at {}, using defaults",
                path.display()
            );
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match serde_yaml::from_str(&content) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to parse config at {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read config at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Save config to disk
    pub fn save(&self) -> Result<(), String> {
        let path = crate::config_paths::config_file()
            .ok_or_else(|| "No config directory available".to_string())?;
        self.save_to(&path)
    }

    /// Save config to an explicit path, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create config directory: {}", e))?;
        }

        let content = serde_yaml::to_string(self)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;

        std::fs::write(path, content)
            .map_err(|e| format!("Failed to write config to {}: {}", path.display(), e))?;

        tracing::info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Empty untitled document using the configured encoding and line ending
    pub fn new_document(&self) -> Document {
        let mut document = Document::new();
        document.eol_mode = self.eol_mode;
        match crate::util::encoding::encoding_for_label(&self.default_encoding) {
            Some(encoding) => {
                document.encoding = encoding;
                document.has_bom = crate::util::encoding::is_utf16(encoding);
            }
            None => tracing::error!(
                "Unknown default encoding '{}', using {}",
                self.default_encoding,
                document.encoding.name()
            ),
        }
        document
    }

    /// Remember the directory of a path picked in a save dialog
    pub fn remember_save_directory(&mut self, file_path: &Path) {
        self.load_save_directory = file_path.parent().map(Path::to_path_buf);
    }
}
