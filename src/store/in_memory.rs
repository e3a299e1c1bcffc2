//! InMemoryDocumentStore - HashMap-backed document store for testing and development.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use serde_json::Value;

use super::{decode, encode, Document, DocumentStore, SearchResults, StoreError, DEFAULT_INDEX_PREFIX};
use crate::query::{matches_all, parse_clauses};

/// Internal stored representation of a document.
struct StoredDocument {
    bytes: Vec<u8>,
    /// Insertion sequence; search results come back in this order.
    seq: u64,
}

#[derive(Default)]
struct Documents {
    entries: HashMap<String, StoredDocument>,
    next_seq: u64,
}

impl Documents {
    fn insert_new(&mut self, key: &str, bytes: Vec<u8>) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.insert(key.to_string(), StoredDocument { bytes, seq });
    }
}

/// In-memory document store backed by a HashMap.
///
/// Each operation holds the lock for its whole duration, so `set_if_absent`
/// and `delete` are atomic. Replacing a document keeps its search position.
/// Clone-friendly via Arc.
#[derive(Clone)]
pub struct InMemoryDocumentStore {
    storage: Arc<RwLock<Documents>>,
    index_prefix: String,
}

impl Default for InMemoryDocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryDocumentStore {
    /// Create a new empty store indexing keys under `machine:`.
    pub fn new() -> Self {
        Self::with_index_prefix(DEFAULT_INDEX_PREFIX)
    }

    /// Create a new empty store whose search covers keys starting with `prefix`.
    pub fn with_index_prefix(prefix: impl Into<String>) -> Self {
        Self {
            storage: Arc::new(RwLock::new(Documents::default())),
            index_prefix: prefix.into(),
        }
    }

    pub fn index_prefix(&self) -> &str {
        &self.index_prefix
    }

    /// Number of stored documents, indexed or not.
    pub fn len(&self) -> Result<usize, StoreError> {
        let storage = self
            .storage
            .read()
            .map_err(|_| StoreError::LockPoisoned("len"))?;
        Ok(storage.entries.len())
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }
}

impl DocumentStore for InMemoryDocumentStore {
    fn set_if_absent(&self, key: &str, doc: &Value) -> Result<bool, StoreError> {
        let bytes = encode(doc)?;
        let mut storage = self
            .storage
            .write()
            .map_err(|_| StoreError::LockPoisoned("set_if_absent"))?;

        if storage.entries.contains_key(key) {
            return Ok(false);
        }
        storage.insert_new(key, bytes);
        Ok(true)
    }

    fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        let storage = self
            .storage
            .read()
            .map_err(|_| StoreError::LockPoisoned("get"))?;

        match storage.entries.get(key) {
            Some(stored) => Ok(Some(decode(key, &stored.bytes)?)),
            None => Ok(None),
        }
    }

    fn set(&self, key: &str, doc: &Value) -> Result<(), StoreError> {
        let bytes = encode(doc)?;
        let mut storage = self
            .storage
            .write()
            .map_err(|_| StoreError::LockPoisoned("set"))?;

        match storage.entries.get_mut(key) {
            Some(stored) => stored.bytes = bytes,
            None => storage.insert_new(key, bytes),
        }
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<Option<Value>, StoreError> {
        let mut storage = self
            .storage
            .write()
            .map_err(|_| StoreError::LockPoisoned("delete"))?;

        match storage.entries.remove(key) {
            Some(stored) => Ok(Some(decode(key, &stored.bytes)?)),
            None => Ok(None),
        }
    }

    fn search(
        &self,
        query: &str,
        offset: usize,
        limit: usize,
    ) -> Result<SearchResults, StoreError> {
        let clauses = parse_clauses(query)?;
        let storage = self
            .storage
            .read()
            .map_err(|_| StoreError::LockPoisoned("search"))?;

        let mut matched = Vec::new();
        for (key, stored) in storage.entries.iter() {
            if !key.starts_with(&self.index_prefix) {
                continue;
            }
            let json = decode(key, &stored.bytes)?;
            if matches_all(&clauses, &json) {
                matched.push((stored.seq, Document { id: key.clone(), json }));
            }
        }
        matched.sort_by_key(|(seq, _)| *seq);

        Ok(SearchResults {
            total: matched.len(),
            documents: matched
                .into_iter()
                .skip(offset)
                .take(limit)
                .map(|(_, doc)| doc)
                .collect(),
        })
    }
}
