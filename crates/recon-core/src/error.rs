//! Unified Error Model
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReconError {
    /// Undecodable or structurally invalid input, either a device
    /// acknowledgement or a profile payload.
    #[error("PAYLOAD/{0}")]
    MalformedPayload(String),

    /// Desired-state construction could not complete; no partial
    /// catalog is ever published.
    #[error("CATALOG/{0}")]
    CatalogBuildFailed(String),

    /// A remediation command could not be delivered.
    #[error("DISPATCH/{0}")]
    DispatchFailed(String),

    /// A desired profile identifier has no known version. Warning
    /// level; skipped per profile, never fatal to a request.
    #[error("PROFILE/unresolved: {0}")]
    UnresolvedProfile(String),
}
