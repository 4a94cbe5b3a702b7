//! Disk-backed snapshot store for DID records.
//!
//! The registry core is a pure in-memory store; surviving between process
//! runs is a collaborator concern and lives here. `RegistryDb` holds one
//! sled tree of JSON-encoded records keyed by owner identity: load
//! everything at startup, rehydrate the registry, and write a record back
//! after each successful mutation.

use didreg_types::DidRecord;
use sled::{Db, Tree};
use std::path::Path;
use tracing::debug;

/// Store errors
#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sled::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Sled-backed record snapshot store.
pub struct RegistryDb {
    db: Db,
    records: Tree,
}

impl RegistryDb {
    /// Open (or create) the database at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let db = sled::open(path)?;
        let records = db.open_tree("records")?;
        Ok(Self { db, records })
    }

    /// Load every stored record, in unspecified order.
    pub fn load_records(&self) -> Result<Vec<DidRecord>> {
        let mut records = Vec::with_capacity(self.records.len());
        for entry in self.records.iter() {
            let (_, value) = entry?;
            records.push(serde_json::from_slice(&value)?);
        }
        Ok(records)
    }

    /// Write one record's current state, replacing any previous snapshot of
    /// the same owner, and flush to disk.
    pub fn save_record(&self, record: &DidRecord) -> Result<()> {
        let data = serde_json::to_vec(record)?;
        self.records.insert(record.owner.as_str().as_bytes(), data)?;
        self.db.flush()?;
        debug!(owner = %record.owner, "record snapshot persisted");
        Ok(())
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
