//! Registry of open documents
//!
//! Other components refer to documents only through `DocumentId`, so a
//! closed document leaves no dangling references behind: holders look the
//! id up and get `None`.

use std::collections::HashMap;

use super::document::Document;

/// Unique identifier for a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize)]
pub struct DocumentId(pub u64);

#[derive(Debug, Default)]
pub struct DocumentRegistry {
    documents: HashMap<DocumentId, Document>,
    /// Ids in the order documents were opened
    order: Vec<DocumentId>,
    next_document_id: u64,
}

impl DocumentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of `document` and assign it a fresh id
    pub fn insert(&mut self, mut document: Document) -> DocumentId {
        self.next_document_id += 1;
        let id = DocumentId(self.next_document_id);
        document.id = Some(id);
        self.documents.insert(id, document);
        self.order.push(id);
        tracing::debug!(?id, "Registered document");
        id
    }

    pub fn get(&self, id: DocumentId) -> Option<&Document> {
        self.documents.get(&id)
    }

    pub fn get_mut(&mut self, id: DocumentId) -> Option<&mut Document> {
        self.documents.get_mut(&id)
    }

    pub fn contains(&self, id: DocumentId) -> bool {
        self.documents.contains_key(&id)
    }

    /// Open documents in opening order
    pub fn ids(&self) -> &[DocumentId] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Remove a document; callers forward the id to anything keyed by it
    pub fn close(&mut self, id: DocumentId) -> Option<Document> {
        let document = self.documents.remove(&id)?;
        self.order.retain(|other| *other != id);
        tracing::debug!(?id, "Closed document");
        Some(document)
    }
}
