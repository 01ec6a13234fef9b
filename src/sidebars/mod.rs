//! Dockable sidebars
//!
//! The host owns docking and layout; a sidebar only says where it starts.

pub mod find_results;
pub mod markdown;

use serde::{Deserialize, Serialize};

pub use find_results::{
    DocumentGroup, ItemHandle, ItemRole, ItemValue, MatchLeaf, ModelEvent, NodeRef, ResultSource,
    ResultsSnapshot, ResultsTree, TreeModel,
};
pub use markdown::MarkdownSidebar;

/// Edge of the main window a sidebar docks to initially
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DockArea {
    Left,
    Right,
    Bottom,
}

pub trait Sidebar {
    fn title(&self) -> &'static str;

    fn initial_area(&self) -> DockArea;

    fn initially_visible(&self) -> bool;

    /// Width (or height for bottom docks) in pixels
    fn initial_width(&self) -> u32;
}

/// Sidebar listing "find all" results
#[derive(Debug, Default)]
pub struct FindResultsSidebar {
    pub model: ResultsTree,
}

impl FindResultsSidebar {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Sidebar for FindResultsSidebar {
    fn title(&self) -> &'static str {
        "Find results"
    }

    fn initial_area(&self) -> DockArea {
        DockArea::Bottom
    }

    fn initially_visible(&self) -> bool {
        false
    }

    fn initial_width(&self) -> u32 {
        400
    }
}
