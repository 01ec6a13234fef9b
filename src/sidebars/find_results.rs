//! Find-results tree model
//!
//! Root → one group per document → one leaf per match. Views walk it
//! through `TreeModel` or through opaque `ItemHandle`s, and observe changes
//! through `ModelEvent`s delivered synchronously after each mutation.

use std::collections::HashMap;
use std::path::PathBuf;

use serde::Serialize;

use crate::model::{Document, DocumentId};

/// Anything search results can be attributed to
pub trait ResultSource {
    /// `None` for documents that were never registered
    fn document_id(&self) -> Option<DocumentId>;

    fn display_name(&self) -> String;

    fn file_path(&self) -> Option<PathBuf>;

    /// Text shown for a match leaf
    fn match_label(&self, start: usize, end: usize) -> String;
}

impl ResultSource for Document {
    fn document_id(&self) -> Option<DocumentId> {
        self.id
    }

    fn display_name(&self) -> String {
        Document::display_name(self)
    }

    fn file_path(&self) -> Option<PathBuf> {
        self.file_path.clone()
    }

    /// `"<line>: <line text>"`, 1-based line of the match start
    fn match_label(&self, start: usize, _end: usize) -> String {
        let line = self.buffer.char_to_line(start.min(self.len_chars()));
        let text = self.line_text(line).unwrap_or_default();
        format!("{}: {}", line + 1, text.trim())
    }
}

/// Position of a node in the tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeRef {
    Root,
    Group(usize),
    Match { group: usize, row: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchLeaf {
    pub document: DocumentId,
    pub start: usize,
    pub end: usize,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentGroup {
    pub document: DocumentId,
    pub name: String,
    pub file_path: Option<PathBuf>,
    pub matches: Vec<MatchLeaf>,
}

/// What a view asks a node for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemRole {
    Display,
    Data,
    ToolTip,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemValue {
    Text(String),
    Document(DocumentId),
    Span {
        document: DocumentId,
        start: usize,
        end: usize,
    },
}

/// Change notifications, emitted after the tree already reflects the change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelEvent {
    Reset,
    RowsInserted {
        parent: NodeRef,
        first: usize,
        last: usize,
    },
    RowsRemoved {
        parent: NodeRef,
        first: usize,
        last: usize,
    },
}

/// Hierarchical query protocol consumed by tree views
pub trait TreeModel {
    fn child_count(&self, node: NodeRef) -> usize;

    fn child_at(&self, node: NodeRef, row: usize) -> Option<NodeRef>;

    /// `None` only for the root
    fn parent_of(&self, node: NodeRef) -> Option<NodeRef>;

    fn column_count(&self) -> usize;

    fn value_at(&self, node: NodeRef, column: usize, role: ItemRole) -> Option<ItemValue>;
}

/// Opaque view-side token for a node
///
/// Tokens minted before a `clear` or `remove_document` go stale and then
/// resolve to the root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemHandle {
    pub row: usize,
    pub column: usize,
    node: Option<NodeRef>,
    generation: u64,
}

impl ItemHandle {
    /// The null token, denoting the root
    pub const NULL: ItemHandle = ItemHandle {
        row: 0,
        column: 0,
        node: None,
        generation: 0,
    };

    pub fn is_valid(&self) -> bool {
        self.node.is_some()
    }
}

impl Default for ItemHandle {
    fn default() -> Self {
        Self::NULL
    }
}

type Observer = Box<dyn FnMut(&ModelEvent)>;

#[derive(Default)]
pub struct ResultsTree {
    groups: Vec<DocumentGroup>,
    by_document: HashMap<DocumentId, usize>,
    /// Bumped whenever existing rows move or vanish
    generation: u64,
    observers: Vec<Observer>,
}

impl std::fmt::Debug for ResultsTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResultsTree")
            .field("groups", &self.groups)
            .field("generation", &self.generation)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl ResultsTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, observer: impl FnMut(&ModelEvent) + 'static) {
        self.observers.push(Box::new(observer));
    }

    fn notify(&mut self, event: ModelEvent) {
        for observer in &mut self.observers {
            observer(&event);
        }
    }

    // =========================================================================
    // Mutation
    // =========================================================================

    /// Drop every group; the root stays
    pub fn clear(&mut self) {
        self.groups.clear();
        self.by_document.clear();
        self.generation += 1;
        tracing::debug!("Cleared find results");
        self.notify(ModelEvent::Reset);
    }

    /// Append `matches` under the group for `source`, creating it on first use
    ///
    /// An empty `matches` still creates the group for a new document and is a
    /// no-op for a document that already has one.
    pub fn add_results(&mut self, source: &impl ResultSource, matches: &[(usize, usize)]) {
        let Some(document) = source.document_id() else {
            tracing::warn!(
                "Ignoring {} results for unregistered document {}",
                matches.len(),
                source.display_name()
            );
            return;
        };

        let group_idx = match self.by_document.get(&document) {
            Some(&idx) => idx,
            None => {
                let idx = self.groups.len();
                self.groups.push(DocumentGroup {
                    document,
                    name: source.display_name(),
                    file_path: source.file_path(),
                    matches: Vec::new(),
                });
                self.by_document.insert(document, idx);
                self.notify(ModelEvent::RowsInserted {
                    parent: NodeRef::Root,
                    first: idx,
                    last: idx,
                });
                idx
            }
        };

        if matches.is_empty() {
            return;
        }

        let group = &mut self.groups[group_idx];
        let first = group.matches.len();
        group
            .matches
            .extend(matches.iter().map(|&(start, end)| MatchLeaf {
                document,
                start,
                end,
                label: source.match_label(start, end),
            }));
        let last = group.matches.len() - 1;

        tracing::debug!(?document, count = matches.len(), "Added find results");
        self.notify(ModelEvent::RowsInserted {
            parent: NodeRef::Group(group_idx),
            first,
            last,
        });
    }

    /// Drop the group of a closed document; returns whether it had one
    pub fn remove_document(&mut self, document: DocumentId) -> bool {
        let Some(idx) = self.by_document.remove(&document) else {
            return false;
        };

        self.groups.remove(idx);
        for later in self.by_document.values_mut() {
            if *later > idx {
                *later -= 1;
            }
        }
        self.generation += 1;

        tracing::debug!(?document, "Removed find results for closed document");
        self.notify(ModelEvent::RowsRemoved {
            parent: NodeRef::Root,
            first: idx,
            last: idx,
        });
        true
    }

    // =========================================================================
    // Lookup
    // =========================================================================

    pub fn groups(&self) -> &[DocumentGroup] {
        &self.groups
    }

    pub fn group_for_document(&self, document: DocumentId) -> Option<NodeRef> {
        self.by_document.get(&document).map(|&idx| NodeRef::Group(idx))
    }

    pub fn match_count(&self) -> usize {
        self.groups.iter().map(|g| g.matches.len()).sum()
    }

    pub fn leaf(&self, node: NodeRef) -> Option<&MatchLeaf> {
        match node {
            NodeRef::Match { group, row } => self.groups.get(group)?.matches.get(row),
            _ => None,
        }
    }

    /// Row of `node` under its parent (0 for the root)
    pub fn index_of(&self, node: NodeRef) -> usize {
        match node {
            NodeRef::Root => 0,
            NodeRef::Group(idx) => idx,
            NodeRef::Match { row, .. } => row,
        }
    }

    fn exists(&self, node: NodeRef) -> bool {
        match node {
            NodeRef::Root => true,
            NodeRef::Group(idx) => idx < self.groups.len(),
            NodeRef::Match { .. } => self.leaf(node).is_some(),
        }
    }

    // =========================================================================
    // Opaque handles
    // =========================================================================

    /// Token for the child at `row`/`column` under `parent`
    pub fn index(&self, row: usize, column: usize, parent: &ItemHandle) -> Option<ItemHandle> {
        if column >= self.column_count() {
            return None;
        }
        let node = self.child_at(self.item_for_handle(parent), row)?;
        Some(ItemHandle {
            row,
            column,
            node: Some(node),
            generation: self.generation,
        })
    }

    /// Token for the parent of `handle`; the null token for top-level rows
    pub fn parent(&self, handle: &ItemHandle) -> ItemHandle {
        match self.parent_of(self.item_for_handle(handle)) {
            Some(parent) => self.handle_for(parent),
            None => ItemHandle::NULL,
        }
    }

    pub fn handle_for(&self, node: NodeRef) -> ItemHandle {
        if node == NodeRef::Root || !self.exists(node) {
            return ItemHandle::NULL;
        }
        ItemHandle {
            row: self.index_of(node),
            column: 0,
            node: Some(node),
            generation: self.generation,
        }
    }

    /// Node a token denotes; null, stale or dangling tokens give the root
    pub fn item_for_handle(&self, handle: &ItemHandle) -> NodeRef {
        match handle.node {
            Some(node) if handle.generation == self.generation && self.exists(node) => node,
            _ => NodeRef::Root,
        }
    }

    pub fn snapshot(&self) -> ResultsSnapshot {
        ResultsSnapshot {
            groups: self.groups.clone(),
        }
    }
}

impl TreeModel for ResultsTree {
    fn child_count(&self, node: NodeRef) -> usize {
        match node {
            NodeRef::Root => self.groups.len(),
            NodeRef::Group(idx) => self.groups.get(idx).map_or(0, |g| g.matches.len()),
            NodeRef::Match { .. } => 0,
        }
    }

    fn child_at(&self, node: NodeRef, row: usize) -> Option<NodeRef> {
        if row >= self.child_count(node) {
            return None;
        }
        match node {
            NodeRef::Root => Some(NodeRef::Group(row)),
            NodeRef::Group(group) => Some(NodeRef::Match { group, row }),
            NodeRef::Match { .. } => None,
        }
    }

    fn parent_of(&self, node: NodeRef) -> Option<NodeRef> {
        match node {
            NodeRef::Root => None,
            NodeRef::Group(_) => Some(NodeRef::Root),
            NodeRef::Match { group, .. } => Some(NodeRef::Group(group)),
        }
    }

    fn column_count(&self) -> usize {
        1
    }

    fn value_at(&self, node: NodeRef, column: usize, role: ItemRole) -> Option<ItemValue> {
        if column >= self.column_count() {
            return None;
        }
        match node {
            NodeRef::Root => None,
            NodeRef::Group(idx) => {
                let group = self.groups.get(idx)?;
                match role {
                    ItemRole::Display => Some(ItemValue::Text(group.name.clone())),
                    ItemRole::Data => Some(ItemValue::Document(group.document)),
                    ItemRole::ToolTip => group
                        .file_path
                        .as_ref()
                        .map(|p| ItemValue::Text(p.display().to_string())),
                }
            }
            NodeRef::Match { .. } => {
                let leaf = self.leaf(node)?;
                match role {
                    ItemRole::Display => Some(ItemValue::Text(leaf.label.clone())),
                    ItemRole::Data => Some(ItemValue::Span {
                        document: leaf.document,
                        start: leaf.start,
                        end: leaf.end,
                    }),
                    ItemRole::ToolTip => None,
                }
            }
        }
    }
}

/// Serializable copy of the tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultsSnapshot {
    pub groups: Vec<DocumentGroup>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registered(id: u64, text: &str) -> Document {
        let mut doc = Document::with_text(text);
        doc.id = Some(DocumentId(id));
        doc
    }

    #[test]
    fn test_match_label_uses_line_of_start() {
        let doc = registered(1, "alpha\n  beta gamma\n");
        assert_eq!(doc.match_label(8, 12), "2: beta gamma");
        assert_eq!(doc.match_label(0, 5), "1: alpha");
    }

    #[test]
    fn test_unregistered_document_is_ignored() {
        let mut tree = ResultsTree::new();
        tree.add_results(&Document::with_text("x"), &[(0, 1)]);
        assert_eq!(tree.child_count(NodeRef::Root), 0);
    }

    #[test]
    fn test_remove_document_reindexes_later_groups() {
        let a = registered(1, "a");
        let b = registered(2, "b");
        let c = registered(3, "c");
        let mut tree = ResultsTree::new();
        tree.add_results(&a, &[(0, 1)]);
        tree.add_results(&b, &[(0, 1)]);
        tree.add_results(&c, &[(0, 1)]);

        assert!(tree.remove_document(DocumentId(2)));
        assert!(!tree.remove_document(DocumentId(2)));
        assert_eq!(tree.group_for_document(DocumentId(3)), Some(NodeRef::Group(1)));

        // Appending to a reindexed group must not resurrect the removed one
        tree.add_results(&c, &[(0, 1)]);
        assert_eq!(tree.child_count(NodeRef::Root), 2);
        assert_eq!(tree.child_count(NodeRef::Group(1)), 2);
    }

    #[test]
    fn test_value_at_out_of_range_column() {
        let doc = registered(1, "abc");
        let mut tree = ResultsTree::new();
        tree.add_results(&doc, &[(0, 1)]);
        assert_eq!(tree.value_at(NodeRef::Group(0), 1, ItemRole::Display), None);
        assert_eq!(tree.value_at(NodeRef::Root, 0, ItemRole::Display), None);
    }
}
