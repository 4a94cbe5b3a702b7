//! The registry facade.
//!
//! `DidRegistry` wires the record store, ownership guard, handle index, and
//! visibility splitter behind the operations exposed to callers. One
//! `RwLock` guards the combined store + index state: every mutation runs in
//! a single exclusive critical section, so the two structures can never
//! disagree and a failed call leaves no partial writes. Reads share the
//! lock and never hold it past a single lookup.

use crate::errors::{RegistryError, Result};
use crate::guard;
use crate::index::HandleIndex;
use crate::store::RecordStore;
use crate::visibility::{self, PrivateView};
use didreg_types::{clock, DidRecord, Handle, Identity, RecordMetadata};
use parking_lot::RwLock;
use tracing::debug;

#[derive(Debug, Default)]
struct RegistryState {
    store: RecordStore,
    index: HandleIndex,
}

/// Authoritative, process-wide store of DID records.
#[derive(Debug, Default)]
pub struct DidRegistry {
    state: RwLock<RegistryState>,
}

impl DidRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a registry from previously stored records.
    ///
    /// The handle index is reconstructed from the records themselves;
    /// a snapshot carrying a duplicate owner or a handle bound to two
    /// different owners is rejected rather than loaded inconsistently.
    pub fn from_records(records: impl IntoIterator<Item = DidRecord>) -> Result<Self> {
        let registry = Self::new();
        {
            let mut state = registry.state.write();
            for record in records {
                if state.store.contains(&record.owner) {
                    return Err(RegistryError::AlreadyExists {
                        owner: record.owner.to_string(),
                    });
                }
                state.index.reserve(&record.handle, &record.owner)?;
                state.store.insert_new(record)?;
            }
        }
        Ok(registry)
    }

    /// Register a new record for `caller`.
    ///
    /// Fails with `AlreadyExists` if the caller already holds a record,
    /// active or deactivated (deactivation is terminal and does not free
    /// the owner slot), and with `HandleTaken` if `handle` is bound to a
    /// different owner.
    pub fn create(
        &self,
        caller: &Identity,
        private_document: impl Into<String>,
        public_document: impl Into<String>,
        handle: &Handle,
    ) -> Result<()> {
        let mut state = self.state.write();

        if state.store.contains(caller) {
            return Err(RegistryError::AlreadyExists {
                owner: caller.to_string(),
            });
        }
        state.index.reserve(handle, caller)?;

        let now = clock::now_micros();
        let record = DidRecord {
            owner: caller.clone(),
            private_document: private_document.into(),
            public_document: public_document.into(),
            handle: handle.clone(),
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        state.store.insert_new(record)?;

        debug!(owner = %caller, %handle, "record created");
        Ok(())
    }

    /// Replace both documents of the caller's record.
    pub fn update(
        &self,
        caller: &Identity,
        private_document: impl Into<String>,
        public_document: impl Into<String>,
    ) -> Result<()> {
        let mut state = self.state.write();

        if let Some(record) = state.store.record(caller) {
            guard::authorize(caller, &record.owner)?;
        }
        let record =
            state
                .store
                .apply_update(caller, private_document.into(), public_document.into())?;

        debug!(owner = %caller, updated_at = record.updated_at, "record updated");
        Ok(())
    }

    /// Deactivate the caller's record. Terminal: there is no reactivation
    /// and no re-registration for the same owner.
    pub fn deactivate(&self, caller: &Identity) -> Result<()> {
        let mut state = self.state.write();

        if let Some(record) = state.store.record(caller) {
            guard::authorize(caller, &record.owner)?;
        }
        state.store.apply_deactivate(caller)?;

        debug!(owner = %caller, "record deactivated");
        Ok(())
    }

    /// Whether `owner` currently holds an active record. Unknown owners
    /// answer `false`.
    pub fn is_active(&self, owner: &Identity) -> bool {
        let state = self.state.read();
        state
            .store
            .record(owner)
            .map(|record| record.is_active)
            .unwrap_or(false)
    }

    /// Owner-only read of the private document plus audit metadata.
    pub fn private_document(&self, caller: &Identity, owner: &Identity) -> Result<PrivateView> {
        let state = self.state.read();
        visibility::private_view(&state.store, caller, owner)
    }

    /// Anonymous read of the public document behind `handle`.
    pub fn public_document(&self, handle: &Handle) -> Result<String> {
        let state = self.state.read();
        visibility::public_document(&state.store, &state.index, handle)
    }

    /// Resolve `handle` to the owning identity. Deactivated records answer
    /// `NotFound`, indistinguishable from a handle never registered.
    pub fn resolve_owner(&self, handle: &Handle) -> Result<Identity> {
        let state = self.state.read();
        visibility::resolve_owner(&state.store, &state.index, handle)
    }

    /// Non-document state of `owner`'s record. Answers for deactivated
    /// records too, so callers can check state before mutating.
    pub fn record_metadata(&self, owner: &Identity) -> Result<RecordMetadata> {
        let state = self.state.read();
        state
            .store
            .record(owner)
            .map(DidRecord::metadata)
            .ok_or(RegistryError::NotFound)
    }

    /// Snapshot of every record, active and deactivated. Used by the
    /// persistence collaborator; not a caller-facing read.
    pub fn records(&self) -> Vec<DidRecord> {
        let state = self.state.read();
        state.store.iter().cloned().collect()
    }

    /// Number of records held, active and deactivated.
    pub fn len(&self) -> usize {
        self.state.read().store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owner(s: &str) -> Identity {
        Identity::new(s).unwrap()
    }

    fn handle(s: &str) -> Handle {
        Handle::new(s).unwrap()
    }

    fn registry_with_alice() -> (DidRegistry, Identity, Handle) {
        let registry = DidRegistry::new();
        let alice = owner("owner-alice");
        let h = handle("ab12");
        registry
            .create(&alice, r#"{"name":"Alice"}"#, r#"{"org":"Acme"}"#, &h)
            .unwrap();
        (registry, alice, h)
    }

    #[test]
    fn create_then_read_back_both_tiers() {
        let (registry, alice, h) = registry_with_alice();

        assert!(registry.is_active(&alice));
        let view = registry.private_document(&alice, &alice).unwrap();
        assert_eq!(view.document, r#"{"name":"Alice"}"#);
        assert_eq!(view.metadata.handle, h);
        assert!(view.metadata.is_active);
        assert_eq!(view.metadata.created_at, view.metadata.updated_at);
        assert_eq!(registry.public_document(&h).unwrap(), r#"{"org":"Acme"}"#);
    }

    #[test]
    fn duplicate_create_fails_and_leaves_first_record_unchanged() {
        let (registry, alice, h) = registry_with_alice();

        let err = registry
            .create(&alice, "other-private", "other-public", &handle("zz99"))
            .unwrap_err();
        assert!(matches!(err, RegistryError::AlreadyExists { .. }));

        // First record untouched, second handle never reserved.
        assert_eq!(registry.public_document(&h).unwrap(), r#"{"org":"Acme"}"#);
        assert_eq!(
            registry.resolve_owner(&handle("zz99")).unwrap_err(),
            RegistryError::NotFound
        );
    }

    #[test]
    fn colliding_handle_fails_handle_taken() {
        let (registry, alice, h) = registry_with_alice();
        let bob = owner("owner-bob");

        let err = registry
            .create(&bob, "bob-private", "bob-public", &h)
            .unwrap_err();
        assert_eq!(
            err,
            RegistryError::HandleTaken {
                handle: "ab12".to_string()
            }
        );

        // The loser holds no record and the handle still resolves to Alice.
        assert!(!registry.is_active(&bob));
        assert_eq!(registry.resolve_owner(&h).unwrap(), alice);
    }

    #[test]
    fn update_replaces_documents_and_advances_updated_at_only() {
        let (registry, alice, h) = registry_with_alice();
        let before = registry.record_metadata(&alice).unwrap();

        registry
            .update(&alice, r#"{"name":"Alice","email":"a@acme.io"}"#, r#"{"org":"Acme Corp"}"#)
            .unwrap();

        let view = registry.private_document(&alice, &alice).unwrap();
        assert_eq!(view.document, r#"{"name":"Alice","email":"a@acme.io"}"#);
        assert_eq!(registry.public_document(&h).unwrap(), r#"{"org":"Acme Corp"}"#);

        let after = view.metadata;
        assert_eq!(after.handle, before.handle);
        assert_eq!(after.created_at, before.created_at);
        assert!(after.updated_at > before.updated_at);
    }

    #[test]
    fn update_without_record_is_not_found() {
        let registry = DidRegistry::new();
        let err = registry
            .update(&owner("owner-nobody"), "p", "q")
            .unwrap_err();
        assert_eq!(err, RegistryError::NotFound);
    }

    #[test]
    fn deactivation_hides_record_from_every_lookup_path() {
        let (registry, alice, h) = registry_with_alice();

        registry.deactivate(&alice).unwrap();

        assert!(!registry.is_active(&alice));
        assert_eq!(registry.update(&alice, "p", "q").unwrap_err(), RegistryError::Inactive);
        assert_eq!(registry.public_document(&h).unwrap_err(), RegistryError::NotFound);
        assert_eq!(registry.resolve_owner(&h).unwrap_err(), RegistryError::NotFound);
        assert_eq!(
            registry.private_document(&alice, &alice).unwrap_err(),
            RegistryError::Inactive
        );
    }

    #[test]
    fn deactivating_twice_is_an_error_but_metadata_still_answers() {
        let (registry, alice, _) = registry_with_alice();

        registry.deactivate(&alice).unwrap();
        assert_eq!(registry.deactivate(&alice).unwrap_err(), RegistryError::Inactive);

        let meta = registry.record_metadata(&alice).unwrap();
        assert!(!meta.is_active);
        assert!(meta.updated_at >= meta.created_at);
    }

    #[test]
    fn deactivated_owner_cannot_register_again() {
        let (registry, alice, _) = registry_with_alice();
        registry.deactivate(&alice).unwrap();

        let err = registry
            .create(&alice, "p", "q", &handle("fresh1"))
            .unwrap_err();
        assert!(matches!(err, RegistryError::AlreadyExists { .. }));
    }

    #[test]
    fn dead_handle_stays_reserved() {
        let (registry, alice, h) = registry_with_alice();
        registry.deactivate(&alice).unwrap();

        let err = registry
            .create(&owner("owner-bob"), "p", "q", &h)
            .unwrap_err();
        assert_eq!(
            err,
            RegistryError::HandleTaken {
                handle: "ab12".to_string()
            }
        );
    }

    #[test]
    fn private_read_by_non_owner_is_denied_regardless_of_state() {
        let (registry, alice, _) = registry_with_alice();
        let mallory = owner("owner-mallory");

        assert_eq!(
            registry.private_document(&mallory, &alice).unwrap_err(),
            RegistryError::Denied
        );

        // Denied also for records that do not exist: a non-owner cannot
        // probe for existence.
        assert_eq!(
            registry
                .private_document(&mallory, &owner("owner-ghost"))
                .unwrap_err(),
            RegistryError::Denied
        );

        // And unchanged after deactivation.
        registry.deactivate(&alice).unwrap();
        assert_eq!(
            registry.private_document(&mallory, &alice).unwrap_err(),
            RegistryError::Denied
        );
    }

    #[test]
    fn registration_scenario_end_to_end() {
        let registry = DidRegistry::new();
        let a = owner("owner-a");
        let b = owner("owner-b");
        let h = handle("ab12");

        registry
            .create(&a, r#"{"name":"Alice"}"#, r#"{"org":"Acme"}"#, &h)
            .unwrap();
        assert!(registry.is_active(&a));

        let err = registry.create(&b, "bob-priv", "bob-pub", &h).unwrap_err();
        assert!(matches!(err, RegistryError::HandleTaken { .. }));
        assert_eq!(registry.resolve_owner(&h).unwrap(), a);
    }

    #[test]
    fn from_records_roundtrips_snapshot() {
        let (registry, alice, h) = registry_with_alice();
        registry
            .create(
                &owner("owner-bob"),
                "bob-priv",
                "bob-pub",
                &handle("cd34"),
            )
            .unwrap();
        registry.deactivate(&alice).unwrap();

        let snapshot = registry.records();
        let restored = DidRegistry::from_records(snapshot.clone()).unwrap();

        assert_eq!(restored.len(), 2);
        assert!(!restored.is_active(&alice));
        assert!(restored.is_active(&owner("owner-bob")));
        assert_eq!(restored.public_document(&h).unwrap_err(), RegistryError::NotFound);
        assert_eq!(
            restored.public_document(&handle("cd34")).unwrap(),
            "bob-pub"
        );

        let mut original = snapshot;
        let mut reloaded = restored.records();
        original.sort_by(|a, b| a.owner.cmp(&b.owner));
        reloaded.sort_by(|a, b| a.owner.cmp(&b.owner));
        assert_eq!(original, reloaded);
    }

    #[test]
    fn from_records_rejects_conflicting_snapshots() {
        let (registry, _, _) = registry_with_alice();
        let record = registry.records().pop().unwrap();

        // Same owner twice.
        let err = DidRegistry::from_records(vec![record.clone(), record.clone()]).unwrap_err();
        assert!(matches!(err, RegistryError::AlreadyExists { .. }));

        // Same handle bound to two different owners.
        let mut clashing = record.clone();
        clashing.owner = owner("owner-impostor");
        let err = DidRegistry::from_records(vec![record, clashing]).unwrap_err();
        assert!(matches!(err, RegistryError::HandleTaken { .. }));
    }

    #[test]
    fn metadata_answers_for_unknown_owner_with_not_found() {
        let registry = DidRegistry::new();
        assert_eq!(
            registry.record_metadata(&owner("owner-ghost")).unwrap_err(),
            RegistryError::NotFound
        );
    }
}
