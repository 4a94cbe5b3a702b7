//! Visibility splitter: serves the document tier matching the caller's
//! authorization.
//!
//! Private reads go through the ownership guard before anything else, so a
//! non-owner learns nothing about a record's existence. Public reads carry
//! no caller at all; a deactivated record's handle answers exactly like a
//! handle that was never registered.

use crate::errors::{RegistryError, Result};
use crate::guard;
use crate::index::HandleIndex;
use crate::store::RecordStore;
use didreg_types::{Handle, Identity, RecordMetadata};

/// Owner-tier view of a record: the full private document plus the metadata
/// needed to audit the record's state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrivateView {
    pub document: String,
    pub metadata: RecordMetadata,
}

/// Owner-only read of the private document.
///
/// `Denied` takes precedence over `NotFound` and `Inactive`.
pub(crate) fn private_view(
    store: &RecordStore,
    caller: &Identity,
    owner: &Identity,
) -> Result<PrivateView> {
    guard::authorize(caller, owner)?;
    let record = store.record(owner).ok_or(RegistryError::NotFound)?;
    if !record.is_active {
        return Err(RegistryError::Inactive);
    }
    Ok(PrivateView {
        document: record.private_document.clone(),
        metadata: record.metadata(),
    })
}

/// Anonymous read of the public document behind `handle`.
pub(crate) fn public_document(
    store: &RecordStore,
    index: &HandleIndex,
    handle: &Handle,
) -> Result<String> {
    let record = active_record(store, index, handle)?;
    Ok(record.public_document.clone())
}

/// Resolve `handle` to the owning identity. Same visibility rules as the
/// public document read.
pub(crate) fn resolve_owner(
    store: &RecordStore,
    index: &HandleIndex,
    handle: &Handle,
) -> Result<Identity> {
    let record = active_record(store, index, handle)?;
    Ok(record.owner.clone())
}

fn active_record<'a>(
    store: &'a RecordStore,
    index: &HandleIndex,
    handle: &Handle,
) -> Result<&'a didreg_types::DidRecord> {
    let owner = index.resolve(handle).ok_or(RegistryError::NotFound)?;
    let record = store.record(owner).ok_or(RegistryError::NotFound)?;
    if !record.is_active {
        return Err(RegistryError::NotFound);
    }
    Ok(record)
}
