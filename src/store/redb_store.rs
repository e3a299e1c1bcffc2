use std::path::Path;
use std::sync::Arc;

use redb::{Database, ReadableTable, TableDefinition};
use serde_json::Value;
use tracing::debug;

use super::{decode, encode, Document, DocumentStore, SearchResults, StoreError, DEFAULT_INDEX_PREFIX};
use crate::query::{matches_all, parse_clauses};

const TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("documents");

fn backend<E: std::fmt::Display>(e: E) -> StoreError {
    StoreError::Backend(e.to_string())
}

/// RedbDocumentStore is a DocumentStore backed by redb, a pure-Rust embedded
/// key-value database.
///
/// Conditional inserts and deletes run inside a single write transaction, so
/// concurrent writers never both observe a key as absent. Search scans the
/// index prefix in key order.
#[derive(Clone)]
pub struct RedbDocumentStore {
    db: Arc<Database>,
    index_prefix: String,
}

impl RedbDocumentStore {
    /// Open or create a redb database at the given path.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        Self::open_with_index_prefix(path, DEFAULT_INDEX_PREFIX)
    }

    pub fn open_with_index_prefix(
        path: &Path,
        prefix: impl Into<String>,
    ) -> Result<Self, StoreError> {
        let db = Database::create(path).map_err(backend)?;

        // Ensure the table exists by doing a write transaction.
        let write_txn = db.begin_write().map_err(backend)?;
        {
            let _table = write_txn.open_table(TABLE).map_err(backend)?;
        }
        write_txn.commit().map_err(backend)?;

        debug!(path = %path.display(), "opened redb document store");

        Ok(Self {
            db: Arc::new(db),
            index_prefix: prefix.into(),
        })
    }

    pub fn index_prefix(&self) -> &str {
        &self.index_prefix
    }
}

impl DocumentStore for RedbDocumentStore {
    fn set_if_absent(&self, key: &str, doc: &Value) -> Result<bool, StoreError> {
        let bytes = encode(doc)?;
        let write_txn = self.db.begin_write().map_err(backend)?;
        let inserted = {
            let mut table = write_txn.open_table(TABLE).map_err(backend)?;
            let exists = table.get(key).map_err(backend)?.is_some();
            if !exists {
                table.insert(key, bytes.as_slice()).map_err(backend)?;
            }
            !exists
        };
        if inserted {
            write_txn.commit().map_err(backend)?;
        } else {
            write_txn.abort().map_err(backend)?;
        }
        Ok(inserted)
    }

    fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        let read_txn = self.db.begin_read().map_err(backend)?;
        let table = read_txn.open_table(TABLE).map_err(backend)?;

        match table.get(key).map_err(backend)? {
            Some(guard) => Ok(Some(decode(key, guard.value())?)),
            None => Ok(None),
        }
    }

    fn set(&self, key: &str, doc: &Value) -> Result<(), StoreError> {
        let bytes = encode(doc)?;
        let write_txn = self.db.begin_write().map_err(backend)?;
        {
            let mut table = write_txn.open_table(TABLE).map_err(backend)?;
            table.insert(key, bytes.as_slice()).map_err(backend)?;
        }
        write_txn.commit().map_err(backend)?;
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<Option<Value>, StoreError> {
        let write_txn = self.db.begin_write().map_err(backend)?;
        let removed = {
            let mut table = write_txn.open_table(TABLE).map_err(backend)?;
            let removed = table.remove(key).map_err(backend)?;
            removed.map(|guard| guard.value().to_vec())
        };
        write_txn.commit().map_err(backend)?;

        match removed {
            Some(bytes) => Ok(Some(decode(key, &bytes)?)),
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
        let read_txn = self.db.begin_read().map_err(backend)?;
        let table = read_txn.open_table(TABLE).map_err(backend)?;

        let mut results = SearchResults::default();
        let iter = table
            .range(self.index_prefix.as_str()..)
            .map_err(backend)?;

        for entry in iter {
            let (key, value) = entry.map_err(backend)?;
            let key = key.value().to_string();
            if !key.starts_with(&self.index_prefix) {
                break;
            }
            let json = decode(&key, value.value())?;
            if !matches_all(&clauses, &json) {
                continue;
            }
            if results.total >= offset && results.documents.len() < limit {
                results.documents.push(Document { id: key, json });
            }
            results.total += 1;
        }

        Ok(results)
    }
}
