//! Handle index: reverse mapping from public handle to owner identity.
//!
//! Kept consistent with the record store by the facade, which updates both
//! under one exclusive lock. A handle bound to a deactivated record stays
//! reserved: records are never physically deleted, and recycling a dead
//! handle would let a different owner be mistaken for the old identity.

use crate::errors::{RegistryError, Result};
use didreg_types::{Handle, Identity};
use std::collections::HashMap;

#[derive(Debug, Default)]
pub(crate) struct HandleIndex {
    owners: HashMap<Handle, Identity>,
}

impl HandleIndex {
    /// Bind `handle` to `owner`. Re-reserving a handle for the owner it is
    /// already bound to is a no-op, so an interrupted create can be retried.
    pub(crate) fn reserve(&mut self, handle: &Handle, owner: &Identity) -> Result<()> {
        match self.owners.get(handle) {
            Some(bound) if bound != owner => Err(RegistryError::HandleTaken {
                handle: handle.to_string(),
            }),
            Some(_) => Ok(()),
            None => {
                self.owners.insert(handle.clone(), owner.clone());
                Ok(())
            }
        }
    }

    pub(crate) fn resolve(&self, handle: &Handle) -> Option<&Identity> {
        self.owners.get(handle)
    }

    pub(crate) fn len(&self) -> usize {
        self.owners.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handle(s: &str) -> Handle {
        Handle::new(s).unwrap()
    }

    fn owner(s: &str) -> Identity {
        Identity::new(s).unwrap()
    }

    #[test]
    fn reserve_and_resolve() {
        let mut index = HandleIndex::default();
        index.reserve(&handle("ab12"), &owner("owner-a")).unwrap();
        assert_eq!(index.resolve(&handle("ab12")), Some(&owner("owner-a")));
        assert_eq!(index.resolve(&handle("cd34")), None);
    }

    #[test]
    fn reserve_rejects_other_owner() {
        let mut index = HandleIndex::default();
        index.reserve(&handle("ab12"), &owner("owner-a")).unwrap();
        let err = index.reserve(&handle("ab12"), &owner("owner-b")).unwrap_err();
        assert_eq!(
            err,
            RegistryError::HandleTaken {
                handle: "ab12".to_string()
            }
        );
        // The original binding survives the rejected attempt.
        assert_eq!(index.resolve(&handle("ab12")), Some(&owner("owner-a")));
    }

    #[test]
    fn reserve_is_idempotent_for_same_owner() {
        let mut index = HandleIndex::default();
        index.reserve(&handle("ab12"), &owner("owner-a")).unwrap();
        index.reserve(&handle("ab12"), &owner("owner-a")).unwrap();
        assert_eq!(index.len(), 1);
    }
}
