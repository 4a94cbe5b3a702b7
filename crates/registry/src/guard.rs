//! Ownership guard.
//!
//! Single contract: a caller may act on a record iff the caller is the
//! record's owner. The check is side-effect free and must run before any
//! state is touched, so a denied call leaves no partial writes behind.

use crate::errors::{RegistryError, Result};
use didreg_types::Identity;

/// Allow the call iff `caller == owner`.
pub(crate) fn authorize(caller: &Identity, owner: &Identity) -> Result<()> {
    if caller == owner {
        Ok(())
    } else {
        Err(RegistryError::Denied)
    }
}
