//! Recon MDM: management-server integration
//!
//! Talks the management server's REST contract (blueprints, profiles,
//! commands), builds the Desired-State Catalog from it and dispatches
//! remediation commands. The `CatalogSource` and `ProfileInstaller`
//! traits keep both sides testable without a server.

pub mod builder;
pub mod client;
pub mod dispatch;

pub use builder::{build_catalog, BuildReport, CatalogSource};
pub use client::{Blueprint, MdmClient, ProfileRecord};
pub use dispatch::{remediate, ProfileInstaller, RemediationSummary};
