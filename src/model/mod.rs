//! Document model
//!
//! Documents own their text and file state; the registry hands out the
//! `DocumentId` handles that sidebars and editors key on.

pub mod document;
pub mod registry;

pub use document::{Document, DocumentError, EolMode, MAX_FILE_SIZE};
pub use registry::{DocumentId, DocumentRegistry};
