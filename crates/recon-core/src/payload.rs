//! Identity extraction from encoded configuration payloads.
//!
//! A profile payload arrives as base64 of an Apple property list. The
//! embedded `PayloadUUID` is the version token: it changes with every
//! revision of the configuration, so comparing UUIDs is enough to tell
//! whether a device runs the current revision.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::Deserialize;

use crate::error::ReconError;

/// Stable identity embedded in a configuration payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileIdentity {
    /// Version token for this revision of the payload
    pub uuid: String,
    /// Human-readable description, used only for logs
    pub description: String,
}

#[derive(Deserialize)]
struct PayloadInfo {
    #[serde(rename = "PayloadUUID")]
    uuid: String,
    #[serde(rename = "PayloadDescription")]
    description: String,
}

/// Decode a base64 mobileconfig and extract its UUID and description.
///
/// Pure function of the input bytes: equal payloads always yield equal
/// identities. Malformed base64, a malformed plist, or a missing
/// required key is a configuration-integrity failure and surfaces as
/// `MalformedPayload`.
pub fn extract(mobileconfig_b64: &str) -> Result<ProfileIdentity, ReconError> {
    let raw = STANDARD
        .decode(mobileconfig_b64.trim())
        .map_err(|e| ReconError::MalformedPayload(format!("base64: {e}")))?;

    let info: PayloadInfo = plist::from_bytes(&raw)
        .map_err(|e| ReconError::MalformedPayload(format!("plist: {e}")))?;

    Ok(ProfileIdentity {
        uuid: info.uuid,
        description: info.description,
    })
}
