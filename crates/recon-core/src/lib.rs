//! Recon Core: desired-state catalog, snapshot parsing, reconciliation
//!
//! Pure reconciliation engine with no I/O. The MDM client and the webhook
//! service build on top of this crate.

pub mod catalog;
pub mod error;
pub mod payload;
pub mod reconcile;
pub mod snapshot;

pub use catalog::{CatalogEntry, DesiredStateCatalog, ProfileEntry};
pub use error::ReconError;
pub use payload::{extract, ProfileIdentity};
pub use reconcile::{reconcile, Decision};
pub use snapshot::{parse_acknowledgement, AckEvent, DeviceSnapshot};

/// Version of the reconciliation engine
pub const RECON_VERSION: &str = "0.1.0";
