//! Persistence of visible column ids

use dashmap::DashMap;

/// Key/value storage for the visible column ids of a grid.
///
/// The grid loads the stored ids once at construction and saves them after
/// every visibility change. Storage failures are the store's concern: a
/// store that cannot load simply returns `None`.
pub trait VisibilityStore: Send + Sync {
    /// Returns the stored ids for `key`, if any.
    fn load(&self, key: &str) -> Option<Vec<String>>;

    /// Replaces the stored ids for `key`.
    fn save(&self, key: &str, ids: &[String]);
}

/// An in-memory store backed by a concurrent hash map.
///
/// # Example
///
/// ```
/// use datagrid_lib::visibility::{MemoryVisibilityStore, VisibilityStore};
///
/// let store = MemoryVisibilityStore::new();
/// store.save("grid", &["id".to_string()]);
/// assert_eq!(store.load("grid"), Some(vec!["id".to_string()]));
/// ```
#[derive(Debug, Default)]
pub struct MemoryVisibilityStore {
    store: DashMap<String, Vec<String>>,
}

impl MemoryVisibilityStore {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored keys.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Returns `true` if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }
}

impl VisibilityStore for MemoryVisibilityStore {
    fn load(&self, key: &str) -> Option<Vec<String>> {
        self.store.get(key).map(|entry| entry.value().clone())
    }

    fn save(&self, key: &str, ids: &[String]) {
        self.store.insert(key.to_string(), ids.to_vec());
    }
}
