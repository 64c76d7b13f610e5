//! FieldStore trait, pluggable storage backend
//!
//! Abstracts field record persistence so different backends can be swapped
//! without touching the service or API code:
//! - `InMemoryFieldStore`: In-memory store for testing and ephemeral runs
//! - `SledFieldStore`: embedded on-disk store (see `fields.rs`)

use crate::types::FieldRecord;

/// Trait for pluggable field record backends
///
/// Records are append/update only; there is no delete. Implementations must
/// be thread-safe (Send + Sync) for shared access across request handlers.
pub trait FieldStore: Send + Sync {
    /// Add a new record. Fails with `Duplicate` if the id is taken.
    fn insert(&self, field: &FieldRecord) -> Result<(), StoreError>;

    /// Find a record by id
    fn get(&self, id: &str) -> Result<Option<FieldRecord>, StoreError>;

    /// All records in insertion order
    fn list(&self) -> Result<Vec<FieldRecord>, StoreError>;

    /// Overwrite an existing record wholesale. Fails with `NotFound` if absent.
    fn update(&self, field: &FieldRecord) -> Result<(), StoreError>;

    /// Number of stored records
    fn count(&self) -> Result<usize, StoreError>;

    /// Backend name for logging
    fn backend_name(&self) -> &'static str;
}

/// Store errors
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(String),
    #[error("serialization error: {0}")]
    Serialization(String),
    #[error("field '{0}' not found")]
    NotFound(String),
    #[error("field '{0}' already exists")]
    Duplicate(String),
    #[error("store lock poisoned")]
    Poisoned,
}

impl From<sled::Error> for StoreError {
    fn from(err: sled::Error) -> Self {
        StoreError::Database(err.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serialization(err.to_string())
    }
}

/// In-memory field store
///
/// Thread-safe via `RwLock`. Not durable, data is lost on restart.
#[derive(Default)]
pub struct InMemoryFieldStore {
    fields: std::sync::RwLock<Vec<FieldRecord>>,
}

impl InMemoryFieldStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FieldStore for InMemoryFieldStore {
    fn insert(&self, field: &FieldRecord) -> Result<(), StoreError> {
        let mut store = self.fields.write().map_err(|_| StoreError::Poisoned)?;

        if store.iter().any(|f| f.id == field.id) {
            return Err(StoreError::Duplicate(field.id.clone()));
        }
        store.push(field.clone());
        Ok(())
    }

    fn get(&self, id: &str) -> Result<Option<FieldRecord>, StoreError> {
        let store = self.fields.read().map_err(|_| StoreError::Poisoned)?;
        Ok(store.iter().find(|f| f.id == id).cloned())
    }

    fn list(&self) -> Result<Vec<FieldRecord>, StoreError> {
        let store = self.fields.read().map_err(|_| StoreError::Poisoned)?;
        Ok(store.clone())
    }

    fn update(&self, field: &FieldRecord) -> Result<(), StoreError> {
        let mut store = self.fields.write().map_err(|_| StoreError::Poisoned)?;

        let slot = store
            .iter_mut()
            .find(|f| f.id == field.id)
            .ok_or_else(|| StoreError::NotFound(field.id.clone()))?;
        *slot = field.clone();
        Ok(())
    }

    fn count(&self) -> Result<usize, StoreError> {
        let store = self.fields.read().map_err(|_| StoreError::Poisoned)?;
        Ok(store.len())
    }

    fn backend_name(&self) -> &'static str {
        "InMemory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn make_field(id: &str, name: &str) -> FieldRecord {
        FieldRecord::new(id, name, "Plot A", Utc::now())
    }

    #[test]
    fn test_in_memory_insert_and_get() {
        let store = InMemoryFieldStore::new();
        store.insert(&make_field("1", "North Field")).unwrap();

        let retrieved = store.get("1").unwrap();
        assert_eq!(retrieved.unwrap().name, "North Field");
        assert!(store.get("missing").unwrap().is_none());
    }

    #[test]
    fn test_in_memory_list_keeps_insertion_order() {
        let store = InMemoryFieldStore::new();
        store.insert(&make_field("300", "C")).unwrap();
        store.insert(&make_field("100", "A")).unwrap();
        store.insert(&make_field("200", "B")).unwrap();

        let names: Vec<_> = store.list().unwrap().into_iter().map(|f| f.name).collect();
        assert_eq!(names, ["C", "A", "B"]);
    }

    #[test]
    fn test_in_memory_duplicate_rejected() {
        let store = InMemoryFieldStore::new();
        store.insert(&make_field("1", "A")).unwrap();
        assert!(matches!(
            store.insert(&make_field("1", "B")),
            Err(StoreError::Duplicate(id)) if id == "1"
        ));
        assert_eq!(store.count().unwrap(), 1);
    }

    #[test]
    fn test_in_memory_update_overwrites() {
        let store = InMemoryFieldStore::new();
        store.insert(&make_field("1", "A")).unwrap();

        let mut changed = make_field("1", "A");
        changed.has_images = true;
        store.update(&changed).unwrap();
        assert!(store.get("1").unwrap().unwrap().has_images);
    }

    #[test]
    fn test_in_memory_update_missing_fails() {
        let store = InMemoryFieldStore::new();
        assert!(matches!(
            store.update(&make_field("9", "Ghost")),
            Err(StoreError::NotFound(_))
        ));
    }

    #[test]
    fn test_trait_object() {
        let store: Box<dyn FieldStore> = Box::new(InMemoryFieldStore::new());
        assert_eq!(store.backend_name(), "InMemory");
        store.insert(&make_field("42", "X")).unwrap();
        assert_eq!(store.list().unwrap().len(), 1);
    }
}
