//! Record store: the primary owner → record mapping.
//!
//! All methods mutate plain in-memory state and are only ever invoked while
//! the registry facade holds its exclusive lock, so every precondition they
//! check still holds when the corresponding write lands.

use crate::errors::{RegistryError, Result};
use didreg_types::{clock, DidRecord, Identity};
use std::collections::HashMap;

#[derive(Debug, Default)]
pub(crate) struct RecordStore {
    records: HashMap<Identity, DidRecord>,
}

impl RecordStore {
    pub(crate) fn contains(&self, owner: &Identity) -> bool {
        self.records.contains_key(owner)
    }

    /// Raw accessor; visibility filtering is the caller's job.
    pub(crate) fn record(&self, owner: &Identity) -> Option<&DidRecord> {
        self.records.get(owner)
    }

    /// Insert a freshly created record. The owner must not already hold one,
    /// active or not.
    pub(crate) fn insert_new(&mut self, record: DidRecord) -> Result<()> {
        if self.records.contains_key(&record.owner) {
            return Err(RegistryError::AlreadyExists {
                owner: record.owner.to_string(),
            });
        }
        self.records.insert(record.owner.clone(), record);
        Ok(())
    }

    /// Replace both documents of an active record and stamp `updated_at`.
    ///
    /// Owner, handle, and `created_at` are never touched by an update.
    pub(crate) fn apply_update(
        &mut self,
        owner: &Identity,
        private_document: String,
        public_document: String,
    ) -> Result<&DidRecord> {
        let record = self.records.get_mut(owner).ok_or(RegistryError::NotFound)?;
        if !record.is_active {
            return Err(RegistryError::Inactive);
        }
        record.private_document = private_document;
        record.public_document = public_document;
        record.updated_at = clock::now_micros();
        Ok(record)
    }

    /// Flip an active record to deactivated. Deactivating an already
    /// deactivated record is an error so that callers must check state
    /// first; the flip is irreversible.
    pub(crate) fn apply_deactivate(&mut self, owner: &Identity) -> Result<&DidRecord> {
        let record = self.records.get_mut(owner).ok_or(RegistryError::NotFound)?;
        if !record.is_active {
            return Err(RegistryError::Inactive);
        }
        record.is_active = false;
        record.updated_at = clock::now_micros();
        Ok(record)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &DidRecord> {
        self.records.values()
    }

    pub(crate) fn len(&self) -> usize {
        self.records.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use didreg_types::Handle;

    fn new_record(owner: &str, handle: &str) -> DidRecord {
        let now = clock::now_micros();
        DidRecord {
            owner: Identity::new(owner).unwrap(),
            private_document: "private".to_string(),
            public_document: "public".to_string(),
            handle: Handle::new(handle).unwrap(),
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn insert_rejects_duplicate_owner() {
        let mut store = RecordStore::default();
        store.insert_new(new_record("owner-a", "ab12")).unwrap();
        let err = store.insert_new(new_record("owner-a", "cd34")).unwrap_err();
        assert!(matches!(err, RegistryError::AlreadyExists { .. }));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn update_replaces_documents_and_advances_timestamp() {
        let mut store = RecordStore::default();
        store.insert_new(new_record("owner-a", "ab12")).unwrap();
        let owner = Identity::new("owner-a").unwrap();
        let before = store.record(&owner).unwrap().clone();

        let updated = store
            .apply_update(&owner, "private2".to_string(), "public2".to_string())
            .unwrap();
        assert_eq!(updated.private_document, "private2");
        assert_eq!(updated.public_document, "public2");
        assert!(updated.updated_at > before.updated_at);
        assert_eq!(updated.created_at, before.created_at);
        assert_eq!(updated.handle, before.handle);
    }

    #[test]
    fn update_requires_active_record() {
        let mut store = RecordStore::default();
        store.insert_new(new_record("owner-a", "ab12")).unwrap();
        let owner = Identity::new("owner-a").unwrap();
        store.apply_deactivate(&owner).unwrap();

        let err = store
            .apply_update(&owner, "p".to_string(), "q".to_string())
            .unwrap_err();
        assert_eq!(err, RegistryError::Inactive);
    }

    #[test]
    fn deactivate_is_terminal_and_not_idempotent() {
        let mut store = RecordStore::default();
        store.insert_new(new_record("owner-a", "ab12")).unwrap();
        let owner = Identity::new("owner-a").unwrap();

        let record = store.apply_deactivate(&owner).unwrap();
        assert!(!record.is_active);
        assert_eq!(store.apply_deactivate(&owner).unwrap_err(), RegistryError::Inactive);
    }

    #[test]
    fn missing_owner_is_not_found() {
        let mut store = RecordStore::default();
        let owner = Identity::new("owner-a").unwrap();
        assert_eq!(
            store
                .apply_update(&owner, "p".to_string(), "q".to_string())
                .unwrap_err(),
            RegistryError::NotFound
        );
        assert_eq!(store.apply_deactivate(&owner).unwrap_err(), RegistryError::NotFound);
    }
}
