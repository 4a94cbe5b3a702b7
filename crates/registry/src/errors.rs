//! Error types for the DID registry core.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("a record already exists for owner: {owner}")]
    AlreadyExists { owner: String },

    #[error("handle already taken: {handle}")]
    HandleTaken { handle: String },

    #[error("record not found")]
    NotFound,

    #[error("record is deactivated")]
    Inactive,

    #[error("caller is not the record owner")]
    Denied,
}

pub type Result<T> = std::result::Result<T, RegistryError>;
