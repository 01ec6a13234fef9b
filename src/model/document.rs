//! Document model - the text buffer and its file state

use std::fs;
use std::path::{Path, PathBuf};

use encoding_rs::Encoding;
use ropey::Rope;
use serde::{Deserialize, Serialize};

use super::registry::DocumentId;
use crate::util::encoding;

/// Maximum file size in bytes (50 MB)
pub const MAX_FILE_SIZE: u64 = 50 * 1024 * 1024;

/// Errors from loading or saving a document
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentError {
    NotFound,
    PermissionDenied,
    IsDirectory,
    TooLarge { size_mb: f64 },
    /// No encoding is known under this label
    UnknownEncoding(String),
    /// Saving an untitled document needs a target path
    NoFilePath,
    Io(String),
}

impl DocumentError {
    fn from_io(e: std::io::Error) -> Self {
        match e.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound,
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied,
            _ => Self::Io(e.to_string()),
        }
    }
}

impl std::fmt::Display for DocumentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound => write!(f, "file not found"),
            Self::PermissionDenied => write!(f, "permission denied"),
            Self::IsDirectory => write!(f, "is a directory"),
            Self::TooLarge { size_mb } => write!(
                f,
                "file too large ({:.1} MB, max {} MB)",
                size_mb,
                MAX_FILE_SIZE / (1024 * 1024)
            ),
            Self::UnknownEncoding(label) => write!(f, "unknown encoding '{}'", label),
            Self::NoFilePath => write!(f, "document has no file path"),
            Self::Io(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for DocumentError {}

/// Line ending used when inserting new lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EolMode {
    CrLf,
    Cr,
    #[default]
    Lf,
}

impl EolMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            EolMode::CrLf => "\r\n",
            EolMode::Cr => "\r",
            EolMode::Lf => "\n",
        }
    }

    /// Most frequent line ending in `text`, or `None` if it has no line breaks
    pub fn detect(text: &str) -> Option<EolMode> {
        let (mut crlf, mut cr, mut lf) = (0usize, 0usize, 0usize);
        let mut chars = text.chars().peekable();
        while let Some(ch) = chars.next() {
            match ch {
                '\r' if chars.peek() == Some(&'\n') => {
                    chars.next();
                    crlf += 1;
                }
                '\r' => cr += 1,
                '\n' => lf += 1,
                _ => {}
            }
        }

        if crlf == 0 && cr == 0 && lf == 0 {
            None
        } else if crlf >= lf && crlf >= cr {
            Some(EolMode::CrLf)
        } else if lf >= cr {
            Some(EolMode::Lf)
        } else {
            Some(EolMode::Cr)
        }
    }
}

/// Document state - the text buffer and associated file metadata
#[derive(Debug, Clone)]
pub struct Document {
    /// Unique identifier (set when added to a `DocumentRegistry`)
    pub id: Option<DocumentId>,
    pub buffer: Rope,
    /// Path to the file on disk (None for new/unsaved files)
    pub file_path: Option<PathBuf>,
    /// Encoding used for the next save
    pub encoding: &'static Encoding,
    /// Write a byte-order mark on save (the file had one when loaded)
    pub has_bom: bool,
    pub eol_mode: EolMode,
    /// Whether the buffer has changes since the last save point
    pub is_modified: bool,
    /// Incremented on each edit
    pub revision: u64,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        Self::with_text("")
    }

    pub fn with_text(text: &str) -> Self {
        Self {
            id: None,
            buffer: Rope::from_str(text),
            file_path: None,
            encoding: encoding::default_encoding(),
            has_bom: false,
            eol_mode: EolMode::detect(text).unwrap_or_default(),
            is_modified: false,
            revision: 0,
        }
    }

    /// Load a document from disk
    ///
    /// `encoding_label` forces a codec; `None` means detect. An unknown label
    /// falls back to the default encoding rather than failing the load.
    pub fn from_file(
        path: &Path,
        encoding_label: Option<&str>,
        default_eol: EolMode,
    ) -> Result<Self, DocumentError> {
        validate_for_opening(path)?;
        let bytes = fs::read(path).map_err(DocumentError::from_io)?;

        let requested = match encoding_label {
            Some(label) => encoding::encoding_for_label(label).unwrap_or_else(|| {
                tracing::error!(
                    "No codec for encoding '{}' when opening {}, using defaults",
                    label,
                    path.display()
                );
                encoding::default_encoding()
            }),
            None => encoding::detect_encoding(&bytes),
        };

        let decoded = encoding::decode(&bytes, requested);
        tracing::info!(
            "Loaded {} ({} bytes, {})",
            path.display(),
            bytes.len(),
            decoded.encoding.name()
        );

        Ok(Self {
            id: None,
            eol_mode: EolMode::detect(&decoded.text).unwrap_or(default_eol),
            buffer: Rope::from_str(&decoded.text),
            file_path: Some(path.to_path_buf()),
            encoding: decoded.encoding,
            has_bom: decoded.had_bom,
            is_modified: false,
            revision: 0,
        })
    }

    /// Write the buffer to `path`, optionally switching encoding first
    ///
    /// On success the path becomes the document's file path and the
    /// modified flag is cleared.
    pub fn save_to_file(
        &mut self,
        path: &Path,
        encoding_label: Option<&str>,
    ) -> Result<(), DocumentError> {
        let (target, with_bom) = match encoding_label.filter(|l| !l.trim().is_empty()) {
            Some(label) => {
                let target = encoding::encoding_for_label(label)
                    .ok_or_else(|| DocumentError::UnknownEncoding(label.to_string()))?;
                // A new UTF-16 target gets a BOM so it can be detected again
                let with_bom = if target == self.encoding {
                    self.has_bom
                } else {
                    encoding::is_utf16(target)
                };
                (target, with_bom)
            }
            None => (self.encoding, self.has_bom),
        };

        let text = self.buffer.to_string();
        let encoded = encoding::encode(&text, target, with_bom);
        if encoded.had_unmappable {
            tracing::warn!(
                "Characters not representable in {} were written as character references",
                encoded.encoding.name()
            );
        }
        fs::write(path, &encoded.bytes).map_err(DocumentError::from_io)?;

        self.encoding = encoded.encoding;
        self.has_bom = encoded.with_bom;
        self.file_path = Some(path.to_path_buf());
        self.is_modified = false;
        tracing::info!("Saved {} ({})", path.display(), self.encoding.name());
        Ok(())
    }

    /// File name if saved, otherwise "Untitled"
    pub fn display_name(&self) -> String {
        self.file_path
            .as_deref()
            .and_then(Path::file_name)
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| "Untitled".to_string())
    }

    pub fn len_chars(&self) -> usize {
        self.buffer.len_chars()
    }

    pub fn line_count(&self) -> usize {
        self.buffer.len_lines()
    }

    pub fn char_at(&self, offset: usize) -> Option<char> {
        self.buffer.get_char(offset)
    }

    /// Text of the char range `[start, end)`, clamped to the buffer
    pub fn text_range(&self, start: usize, end: usize) -> String {
        let len = self.buffer.len_chars();
        let end = end.min(len);
        let start = start.min(end);
        self.buffer.slice(start..end).to_string()
    }

    /// Line text without its trailing line break
    pub fn line_text(&self, line: usize) -> Option<String> {
        let slice = self.buffer.get_line(line)?;
        let text = slice.to_string();
        Some(text.trim_end_matches(['\n', '\r']).to_string())
    }

    /// Replace the char range `[start, end)` with `text`
    ///
    /// Returns the change in line count.
    pub fn replace(&mut self, start: usize, end: usize, text: &str) -> isize {
        let len = self.buffer.len_chars();
        let end = end.min(len);
        let start = start.min(end);
        let lines_before = self.buffer.len_lines() as isize;

        self.buffer.remove(start..end);
        self.buffer.insert(start, text);
        self.touch();

        self.buffer.len_lines() as isize - lines_before
    }

    pub fn set_text(&mut self, text: &str) {
        self.buffer = Rope::from_str(text);
        self.touch();
    }

    /// Rewrite every line ending to `mode`
    pub fn convert_eols(&mut self, mode: EolMode) {
        let text = self.buffer.to_string();
        let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
        let converted = match mode {
            EolMode::Lf => normalized,
            other => normalized.replace('\n', other.as_str()),
        };
        self.eol_mode = mode;
        if converted != text {
            self.set_text(&converted);
        }
    }

    fn touch(&mut self) {
        self.is_modified = true;
        self.revision += 1;
    }
}

fn validate_for_opening(path: &Path) -> Result<(), DocumentError> {
    let metadata = fs::metadata(path).map_err(DocumentError::from_io)?;
    if metadata.is_dir() {
        return Err(DocumentError::IsDirectory);
    }
    if metadata.len() > MAX_FILE_SIZE {
        return Err(DocumentError::TooLarge {
            size_mb: metadata.len() as f64 / (1024.0 * 1024.0),
        });
    }
    Ok(())
}
