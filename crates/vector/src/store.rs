use docsearch_common::{DocSearchError, Result};

use crate::types::DocumentRecord;

/// Append-only metadata store, addressed by insertion position
#[derive(Debug, Clone, Default)]
pub struct DocumentStore {
    records: Vec<DocumentRecord>,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append records in order
    pub fn append(&mut self, records: impl IntoIterator<Item = DocumentRecord>) {
        self.records.extend(records);
    }

    /// Record at `position`
    pub fn get(&self, position: usize) -> Result<&DocumentRecord> {
        self.records
            .get(position)
            .ok_or_else(|| DocSearchError::out_of_range(position, self.records.len()))
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn record(content: &str) -> DocumentRecord {
        DocumentRecord::new(content, "doc1.txt", Utc::now())
    }

    #[test]
    fn test_append_preserves_order() {
        let mut store = DocumentStore::new();
        store.append(vec![record("a"), record("b")]);
        store.append(vec![record("c")]);

        assert_eq!(store.len(), 3);
        assert_eq!(store.get(0).unwrap().content, "a");
        assert_eq!(store.get(2).unwrap().content, "c");
        assert_eq!(store.get(1).unwrap().content, "b");
    }

    #[test]
    fn test_get_out_of_range() {
        let mut store = DocumentStore::new();
        store.append(vec![record("a")]);

        let err = store.get(1).unwrap_err();
        assert!(matches!(err, DocSearchError::OutOfRange { position: 1, len: 1 }));
    }

    #[test]
    fn test_clear() {
        let mut store = DocumentStore::new();
        store.append(vec![record("a"), record("b")]);
        store.clear();

        assert!(store.is_empty());
        assert!(store.get(0).is_err());
    }
}
