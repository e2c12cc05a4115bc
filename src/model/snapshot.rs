//! Snapshots — the set of documents a lookup runs against.

use rustc_hash::FxHashMap;
use std::sync::Arc;

use crate::base::FileId;
use crate::model::document::Document;

/// An immutable-during-lookup mapping from file identity to parsed
/// document.
///
/// The caller builds a snapshot before dispatching lookups and must not
/// mutate it while a [`LookupContext`](crate::lookup::LookupContext)
/// borrows it; re-parsing produces a fresh snapshot instead. Documents are
/// shared read-only, so cloning a snapshot is cheap.
#[derive(Clone, Debug, Default)]
pub struct Snapshot {
    documents: FxHashMap<FileId, Arc<Document>>,
}

impl Snapshot {
    /// Create an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a document, keyed by its file identity. Replaces any
    /// previous document for the same file.
    pub fn insert(&mut self, document: Arc<Document>) {
        self.documents.insert(document.file(), document);
    }

    /// The document for `file`, if present.
    pub fn get(&self, file: FileId) -> Option<&Arc<Document>> {
        self.documents.get(&file)
    }

    pub fn contains(&self, file: FileId) -> bool {
        self.documents.contains_key(&file)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Iterate over all documents, in no particular order.
    pub fn documents(&self) -> impl Iterator<Item = &Arc<Document>> {
        self.documents.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::Control;

    #[test]
    fn test_insert_and_get() {
        let control = Arc::new(Control::new());
        let file = control.file_id("a.cpp");
        let doc = Arc::new(Document::new(file, control.clone()));

        let mut snapshot = Snapshot::new();
        snapshot.insert(doc.clone());

        assert!(snapshot.contains(file));
        assert!(Arc::ptr_eq(snapshot.get(file).unwrap(), &doc));
        assert_eq!(snapshot.len(), 1);
    }

    #[test]
    fn test_replace_same_file() {
        let control = Arc::new(Control::new());
        let file = control.file_id("a.cpp");

        let mut snapshot = Snapshot::new();
        snapshot.insert(Arc::new(Document::new(file, control.clone())));
        let newer = Arc::new(Document::new(file, control.clone()));
        snapshot.insert(newer.clone());

        assert_eq!(snapshot.len(), 1);
        assert!(Arc::ptr_eq(snapshot.get(file).unwrap(), &newer));
    }
}
