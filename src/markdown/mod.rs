//! Markdown preview rendering

mod renderer;
mod theme;

pub use renderer::{markdown_to_fragment, markdown_to_html};
pub use theme::PreviewTheme;
