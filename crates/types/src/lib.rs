//! Shared domain types for the DIDReg identity registry.
//!
//! Everything the registry core and its collaborators exchange lives here:
//! owner identity keys, public handles, the DID record itself, and the
//! monotonic clock that stamps record mutations.

pub mod clock;
pub mod handle;
pub mod identity;
pub mod record;

pub use handle::{Handle, HandleError};
pub use identity::{Identity, IdentityError};
pub use record::{DidRecord, RecordMetadata};
