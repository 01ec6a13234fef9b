//! textdock - editor widget and sidebar models
//!
//! Headless pieces of a desktop text editor: the find-results tree model,
//! the markdown preview sidebar, and the editor widget's file handling,
//! URL hover links and line-number margin. Rendering and docking belong to
//! the host toolkit, which plugs in through the traits in `editor::surface`
//! and `sidebars::find_results`.

pub mod config;
pub mod config_paths;
pub mod editor;
pub mod markdown;
pub mod model;
pub mod search;
pub mod sidebars;
pub mod tracing;
pub mod util;

// Re-export commonly used types
pub use config::EditorConfig;
pub use editor::TextEditor;
pub use model::{Document, DocumentId, DocumentRegistry};
pub use sidebars::{FindResultsSidebar, MarkdownSidebar, ResultsTree};
