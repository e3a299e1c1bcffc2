use serde_json::Value;

use super::{DocumentStore, InMemoryDocumentStore, SearchResults, StoreError};

#[cfg(feature = "redb")]
use super::RedbDocumentStore;

/// A store chosen at runtime from configuration.
#[derive(Clone)]
pub enum AnyStore {
    Memory(InMemoryDocumentStore),
    #[cfg(feature = "redb")]
    Redb(RedbDocumentStore),
}

impl AnyStore {
    /// Backend name, as used in configuration.
    pub fn backend(&self) -> &'static str {
        match self {
            AnyStore::Memory(_) => "memory",
            #[cfg(feature = "redb")]
            AnyStore::Redb(_) => "redb",
        }
    }

    /// Key prefix covered by search on the selected backend.
    pub fn index_prefix(&self) -> &str {
        match self {
            AnyStore::Memory(store) => store.index_prefix(),
            #[cfg(feature = "redb")]
            AnyStore::Redb(store) => store.index_prefix(),
        }
    }

    fn inner(&self) -> &dyn DocumentStore {
        match self {
            AnyStore::Memory(store) => store,
            #[cfg(feature = "redb")]
            AnyStore::Redb(store) => store,
        }
    }
}

impl DocumentStore for AnyStore {
    fn set_if_absent(&self, key: &str, doc: &Value) -> Result<bool, StoreError> {
        self.inner().set_if_absent(key, doc)
    }

    fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        self.inner().get(key)
    }

    fn set(&self, key: &str, doc: &Value) -> Result<(), StoreError> {
        self.inner().set(key, doc)
    }

    fn delete(&self, key: &str) -> Result<Option<Value>, StoreError> {
        self.inner().delete(key)
    }

    fn search(
        &self,
        query: &str,
        offset: usize,
        limit: usize,
    ) -> Result<SearchResults, StoreError> {
        self.inner().search(query, offset, limit)
    }
}

impl From<InMemoryDocumentStore> for AnyStore {
    fn from(store: InMemoryDocumentStore) -> Self {
        AnyStore::Memory(store)
    }
}

#[cfg(feature = "redb")]
impl From<RedbDocumentStore> for AnyStore {
    fn from(store: RedbDocumentStore) -> Self {
        AnyStore::Redb(store)
    }
}
