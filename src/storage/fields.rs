//! Sled-backed field store
//!
//! Two trees:
//! - `fields`: big-endian u64 sequence -> JSON `FieldRecord` (iterates in insertion order)
//! - `field_index`: field id -> sequence key

use std::path::Path;
use std::sync::Arc;

use sled::transaction::{abort, ConflictableTransactionError, TransactionError};
use sled::Transactional;

use super::persistence::{FieldStore, StoreError};
use crate::types::FieldRecord;

const FIELDS_TREE: &str = "fields";
const INDEX_TREE: &str = "field_index";

/// Field store persisted to an embedded sled database
#[derive(Clone)]
pub struct SledFieldStore {
    db: Arc<sled::Db>,
    fields: sled::Tree,
    index: sled::Tree,
}

impl SledFieldStore {
    /// Open or create the store at the specified path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path_ref = path.as_ref();
        let db = sled::open(path_ref)?;
        let fields = db.open_tree(FIELDS_TREE)?;
        let index = db.open_tree(INDEX_TREE)?;

        tracing::info!(
            path = %path_ref.display(),
            records = fields.len(),
            size_bytes = db.size_on_disk().unwrap_or(0),
            "Field store opened"
        );

        Ok(Self {
            db: Arc::new(db),
            fields,
            index,
        })
    }

    /// Flush pending writes to disk
    pub fn flush(&self) -> Result<(), StoreError> {
        self.db.flush()?;
        Ok(())
    }

    fn sequence_key(&self, id: &str) -> Result<Option<sled::IVec>, StoreError> {
        Ok(self.index.get(id.as_bytes())?)
    }
}

impl FieldStore for SledFieldStore {
    fn insert(&self, field: &FieldRecord) -> Result<(), StoreError> {
        let key = self.db.generate_id()?.to_be_bytes();
        let value = serde_json::to_vec(field)?;

        // Index entry and record are written together or not at all
        (&self.index, &self.fields)
            .transaction(|(index, fields)| {
                if index.get(field.id.as_bytes())?.is_some() {
                    return abort(StoreError::Duplicate(field.id.clone()));
                }
                index.insert(field.id.as_bytes(), &key[..])?;
                fields.insert(&key[..], value.as_slice())?;
                Ok::<_, ConflictableTransactionError<StoreError>>(())
            })
            .map_err(|e| match e {
                TransactionError::Abort(e) => e,
                TransactionError::Storage(e) => StoreError::from(e),
            })?;
        self.db.flush()?;

        tracing::debug!(field_id = %field.id, "Inserted field record");
        Ok(())
    }

    fn get(&self, id: &str) -> Result<Option<FieldRecord>, StoreError> {
        let Some(key) = self.sequence_key(id)? else {
            return Ok(None);
        };
        match self.fields.get(key)? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    fn list(&self) -> Result<Vec<FieldRecord>, StoreError> {
        let mut records = Vec::with_capacity(self.fields.len());
        for item in self.fields.iter() {
            let (_key, value) = item?;
            match serde_json::from_slice::<FieldRecord>(&value) {
                Ok(record) => records.push(record),
                Err(e) => tracing::warn!(error = %e, "Skipping unreadable field record"),
            }
        }
        Ok(records)
    }

    fn update(&self, field: &FieldRecord) -> Result<(), StoreError> {
        let key = self
            .sequence_key(&field.id)?
            .ok_or_else(|| StoreError::NotFound(field.id.clone()))?;
        let value = serde_json::to_vec(field)?;

        self.fields.insert(key, value)?;
        self.db.flush()?;

        tracing::debug!(field_id = %field.id, "Updated field record");
        Ok(())
    }

    fn count(&self) -> Result<usize, StoreError> {
        Ok(self.fields.len())
    }

    fn backend_name(&self) -> &'static str {
        "Sled"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SoilReading;
    use chrono::Utc;

    fn make_field(id: &str, name: &str) -> FieldRecord {
        FieldRecord::new(id, name, "Plot B", Utc::now())
    }

    #[test]
    fn test_insert_get_update() {
        let dir = tempfile::tempdir().unwrap();
        let store = SledFieldStore::open(dir.path().join("fields.db")).unwrap();

        store.insert(&make_field("1", "North Field")).unwrap();
        let mut record = store.get("1").unwrap().unwrap();
        assert_eq!(record.name, "North Field");

        record.soil_data = Some(SoilReading::default());
        record.has_soil_data = true;
        store.update(&record).unwrap();

        let reloaded = store.get("1").unwrap().unwrap();
        assert_eq!(reloaded.soil_data, Some(SoilReading::default()));
        assert_eq!(store.count().unwrap(), 1);
    }

    #[test]
    fn test_list_in_insertion_order_not_id_order() {
        let dir = tempfile::tempdir().unwrap();
        let store = SledFieldStore::open(dir.path().join("fields.db")).unwrap();

        store.insert(&make_field("2", "South Field")).unwrap();
        store.insert(&make_field("1700000000000", "East Field")).unwrap();
        store.insert(&make_field("1", "North Field")).unwrap();

        let names: Vec<_> = store.list().unwrap().into_iter().map(|f| f.name).collect();
        assert_eq!(names, ["South Field", "East Field", "North Field"]);
    }

    #[test]
    fn test_duplicate_and_missing() {
        let dir = tempfile::tempdir().unwrap();
        let store = SledFieldStore::open(dir.path().join("fields.db")).unwrap();

        store.insert(&make_field("1", "A")).unwrap();
        assert!(matches!(store.insert(&make_field("1", "B")), Err(StoreError::Duplicate(_))));
        assert!(matches!(store.update(&make_field("7", "C")), Err(StoreError::NotFound(_))));
        assert!(store.get("7").unwrap().is_none());
        assert_eq!(store.count().unwrap(), 1);
    }

    #[test]
    fn test_index_and_records_stay_consistent() {
        let dir = tempfile::tempdir().unwrap();
        let store = SledFieldStore::open(dir.path().join("fields.db")).unwrap();

        store.insert(&make_field("1", "North Field")).unwrap();
        store.insert(&make_field("2", "South Field")).unwrap();
        assert!(store.insert(&make_field("2", "Other South")).is_err());
        assert!(store.insert(&make_field("1", "Other North")).is_err());
        store.insert(&make_field("3", "East Field")).unwrap();

        assert_eq!(store.index.len(), 3);
        assert_eq!(store.fields.len(), 3);
        for entry in store.index.iter() {
            let (id, key) = entry.unwrap();
            let bytes = store.fields.get(&key).unwrap().expect("index points at a record");
            let record: FieldRecord = serde_json::from_slice(&bytes).unwrap();
            assert_eq!(record.id.as_bytes(), &id[..]);
        }
        assert_eq!(store.get("2").unwrap().unwrap().name, "South Field");
    }

    #[test]
    fn test_records_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fields.db");
        {
            let store = SledFieldStore::open(&path).unwrap();
            store.insert(&make_field("1", "North Field")).unwrap();
            store.insert(&make_field("2", "South Field")).unwrap();
            store.flush().unwrap();
        }
        let store = SledFieldStore::open(&path).unwrap();
        assert_eq!(store.count().unwrap(), 2);
        assert_eq!(store.get("2").unwrap().unwrap().name, "South Field");
    }
}
