//! The stored unit of identity state.

use crate::handle::Handle;
use crate::identity::Identity;
use serde::{Deserialize, Serialize};

/// One DID record, owned by exactly one identity.
///
/// The two documents are opaque text blobs: the registry imposes no schema,
/// size, or format constraints on them. `owner`, `handle`, and `created_at`
/// are fixed at creation; `is_active` can only ever flip from true to false.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DidRecord {
    /// Identity that created the record and exclusively controls it.
    pub owner: Identity,
    /// Full document, readable only by the owner.
    pub private_document: String,
    /// Reduced document, readable by anyone holding the handle.
    pub public_document: String,
    /// Public lookup key, globally unique across all records.
    pub handle: Handle,
    /// False once the record has been deactivated; deactivation is terminal.
    pub is_active: bool,
    /// Creation timestamp, microseconds since the Unix epoch.
    pub created_at: u64,
    /// Timestamp of the last successful mutation; `>= created_at` always.
    pub updated_at: u64,
}

impl DidRecord {
    /// Audit projection of the record's non-document state.
    pub fn metadata(&self) -> RecordMetadata {
        RecordMetadata {
            handle: self.handle.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
            is_active: self.is_active,
        }
    }
}

/// Record state without the documents, for owner-side auditing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordMetadata {
    pub handle: Handle,
    pub created_at: u64,
    pub updated_at: u64,
    pub is_active: bool,
}
