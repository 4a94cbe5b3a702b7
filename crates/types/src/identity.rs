use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing an owner identity key.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum IdentityError {
    #[error("identity key must not be empty")]
    Empty,
    #[error("identity key must be at most {max} bytes, got {actual}")]
    TooLong { max: usize, actual: usize },
    #[error("identity key must not contain whitespace or control characters")]
    InvalidCharacters,
}

/// Maximum accepted length of an identity key, in bytes.
pub const IDENTITY_MAX_BYTES: usize = 256;

/// Opaque owner identity key.
///
/// The value itself is trusted: it names an externally-authenticated
/// principal handed in by the calling environment. Keys that would be
/// unusable as map keys or log fields (empty, oversized, embedded
/// whitespace/control bytes) are rejected at the boundary.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Identity(String);

impl Identity {
    /// Parse an identity key, validating its structure.
    pub fn new(key: impl Into<String>) -> Result<Self, IdentityError> {
        let key = key.into();
        if key.is_empty() {
            return Err(IdentityError::Empty);
        }
        if key.len() > IDENTITY_MAX_BYTES {
            return Err(IdentityError::TooLong {
                max: IDENTITY_MAX_BYTES,
                actual: key.len(),
            });
        }
        if key.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(IdentityError::InvalidCharacters);
        }
        Ok(Self(key))
    }

    /// Get the identity key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Identity {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Identity {
    type Error = IdentityError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Identity> for String {
    fn from(value: Identity) -> Self {
        value.0
    }
}
