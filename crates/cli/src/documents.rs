//! Assembly of the two document tiers.
//!
//! The registry stores documents as opaque text; these shapes are purely a
//! CLI convention. The private document carries the full profile, the
//! public document only the fields safe to hand to anyone with the handle.

use anyhow::Result;
use serde_json::json;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

pub const DID_CONTEXT: &str = "https://www.w3.org/ns/did/v1";

/// Full profile, readable only by the owner.
pub fn private_document(name: &str, email: &str, organization: &str, role: &str) -> Result<String> {
    let created = OffsetDateTime::now_utc().format(&Rfc3339)?;
    let doc = json!({
        "@context": DID_CONTEXT,
        "metadata": {
            "name": name,
            "email": email,
            "organization": organization,
            "role": role,
            "created": created,
        }
    });
    Ok(serde_json::to_string_pretty(&doc)?)
}

/// Reduced profile, readable by anyone holding the handle.
pub fn public_document(name: &str, organization: &str) -> Result<String> {
    let doc = json!({
        "@context": DID_CONTEXT,
        "metadata": {
            "name": name,
            "organization": organization,
        }
    });
    Ok(serde_json::to_string_pretty(&doc)?)
}
