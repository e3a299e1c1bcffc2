//! Document store - key-addressed JSON documents with secondary-index search.
//!
//! The registry talks to persistence only through [`DocumentStore`]. Every
//! backend must provide:
//!
//! - an atomic conditional insert ([`DocumentStore::set_if_absent`])
//! - get, full replace and atomic delete by key
//! - search by query string (see [`crate::query`]) with offset/limit paging,
//!   over documents whose key starts with the backend's index prefix
//!
//! Two backends ship with the crate: [`InMemoryDocumentStore`] for tests and
//! development, and `RedbDocumentStore` (feature `redb`) for embedded
//! persistence.

mod any;
mod in_memory;
#[cfg(feature = "redb")]
mod redb_store;

use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;

use crate::query::QueryError;

pub use any::AnyStore;
pub use in_memory::InMemoryDocumentStore;
#[cfg(feature = "redb")]
pub use redb_store::RedbDocumentStore;

/// Key prefix covered by the machine search index.
pub const DEFAULT_INDEX_PREFIX: &str = "machine:";

/// Error type for document store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store lock poisoned during {0}")]
    LockPoisoned(&'static str),

    #[error("storage backend error: {0}")]
    Backend(String),

    #[error("document serialization error: {0}")]
    Serialization(String),

    #[error("corrupt document at {key}: {reason}")]
    Corrupt { key: String, reason: String },

    #[error("invalid search query: {0}")]
    Query(#[from] QueryError),
}

/// A document returned by a search.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Key the document is stored under.
    pub id: String,
    pub json: Value,
}

/// One page of search results.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchResults {
    /// Number of matching documents before paging.
    pub total: usize,
    pub documents: Vec<Document>,
}

/// Abstract JSON document storage with search.
pub trait DocumentStore: Send + Sync {
    /// Insert `doc` at `key` only if the key is absent. Returns `false`, and
    /// writes nothing, when a document already exists.
    fn set_if_absent(&self, key: &str, doc: &Value) -> Result<bool, StoreError>;

    /// Get the document at `key`.
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError>;

    /// Replace the document at `key`, creating it if needed.
    fn set(&self, key: &str, doc: &Value) -> Result<(), StoreError>;

    /// Remove the document at `key`, returning what was there.
    fn delete(&self, key: &str) -> Result<Option<Value>, StoreError>;

    /// Run a query string against the index and return one page of matches
    /// in the store's natural order.
    fn search(&self, query: &str, offset: usize, limit: usize)
        -> Result<SearchResults, StoreError>;
}

impl<S: DocumentStore + ?Sized> DocumentStore for Arc<S> {
    fn set_if_absent(&self, key: &str, doc: &Value) -> Result<bool, StoreError> {
        (**self).set_if_absent(key, doc)
    }

    fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, doc: &Value) -> Result<(), StoreError> {
        (**self).set(key, doc)
    }

    fn delete(&self, key: &str) -> Result<Option<Value>, StoreError> {
        (**self).delete(key)
    }

    fn search(
        &self,
        query: &str,
        offset: usize,
        limit: usize,
    ) -> Result<SearchResults, StoreError> {
        (**self).search(query, offset, limit)
    }
}

fn encode(doc: &Value) -> Result<Vec<u8>, StoreError> {
    serde_json::to_vec(doc).map_err(|e| StoreError::Serialization(e.to_string()))
}

fn decode(key: &str, bytes: &[u8]) -> Result<Value, StoreError> {
    serde_json::from_slice(bytes).map_err(|e| StoreError::Corrupt {
        key: key.to_string(),
        reason: e.to_string(),
    })
}
