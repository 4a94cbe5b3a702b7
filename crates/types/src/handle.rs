use rand::RngCore;
use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a public handle.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum HandleError {
    #[error("handle must not be empty")]
    Empty,
    #[error("handle must be at most {max} bytes, got {actual}")]
    TooLong { max: usize, actual: usize },
    #[error("handle must contain only printable ASCII characters without spaces")]
    InvalidCharacters,
}

/// Maximum accepted length of a handle, in bytes.
pub const HANDLE_MAX_BYTES: usize = 64;

/// Number of random bytes behind a generated handle (8 hex characters).
pub const HANDLE_RANDOM_BYTES: usize = 4;

/// Short public identifier used for anonymous lookup of a record's public
/// document. Distinct from the owner's private identity key and safe to
/// share widely.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Handle(String);

impl Handle {
    /// Parse a handle, validating its format.
    pub fn new(handle: impl Into<String>) -> Result<Self, HandleError> {
        let handle = handle.into();
        if handle.is_empty() {
            return Err(HandleError::Empty);
        }
        if handle.len() > HANDLE_MAX_BYTES {
            return Err(HandleError::TooLong {
                max: HANDLE_MAX_BYTES,
                actual: handle.len(),
            });
        }
        if !handle.chars().all(|c| c.is_ascii_graphic()) {
            return Err(HandleError::InvalidCharacters);
        }
        Ok(Self(handle))
    }

    /// Generate a fresh random handle (8 lowercase hex characters).
    pub fn generate<R: RngCore>(rng: &mut R) -> Self {
        let mut bytes = [0u8; HANDLE_RANDOM_BYTES];
        rng.fill_bytes(&mut bytes);
        Self(hex::encode(bytes))
    }

    /// Get the handle as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Handle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Handle {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Handle {
    type Error = HandleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Handle> for String {
    fn from(value: Handle) -> Self {
        value.0
    }
}
