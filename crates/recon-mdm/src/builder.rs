//! Catalog Builder
//!
//! Derives the Desired-State Catalog from the management server's
//! blueprint definitions. All-or-nothing: any source failure or
//! unidentifiable payload aborts the build, so a stale-but-complete
//! catalog is never replaced by a partial one.

use std::collections::BTreeSet;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{info, warn};

use recon_core::{extract, DesiredStateCatalog, ProfileEntry, ReconError};

use crate::client::{Blueprint, ProfileRecord};

/// Where blueprint and profile definitions come from.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn blueprints(&self) -> Result<Vec<Blueprint>, ReconError>;

    /// Profile records matching an identifier. May return a superset;
    /// the builder filters for the exact identifier itself.
    async fn profiles(&self, id: &str) -> Result<Vec<ProfileRecord>, ReconError>;
}

/// Summary of one catalog build, for the refresh caller and the logs.
#[derive(Debug, Clone, Serialize)]
pub struct BuildReport {
    pub blueprints: usize,
    pub resolved: usize,
    pub unresolved: Vec<String>,
}

/// Build the Desired-State Catalog from a source.
///
/// Profile identifiers referenced by any blueprint form the candidate
/// set (de-duplicated). Candidates with no exact-match record stay in
/// the catalog as unresolved so they are never mistaken for "profile
/// not required".
pub async fn build_catalog(
    source: &dyn CatalogSource,
) -> Result<(DesiredStateCatalog, BuildReport), ReconError> {
    let blueprints = source.blueprints().await?;

    let mut candidates = BTreeSet::new();
    for blueprint in &blueprints {
        info!(
            uuid = %blueprint.uuid,
            name = %blueprint.name,
            profiles = blueprint.profile_ids.len(),
            "blueprint lists profiles"
        );
        for id in &blueprint.profile_ids {
            info!(profile = %id, "referenced by blueprint");
            candidates.insert(id.clone());
        }
    }

    let mut catalog = DesiredStateCatalog::new();
    let mut resolved = 0;

    for id in &candidates {
        let records = source.profiles(id).await?;
        // The source may return superset results; only an exact
        // identifier match counts as the definition.
        match records.into_iter().find(|r| r.identifier == *id) {
            Some(record) => {
                let identity = extract(&record.mobileconfig)?;
                info!(
                    profile = %id,
                    uuid = %identity.uuid,
                    description = %identity.description,
                    "resolved profile"
                );
                catalog.insert_resolved(
                    id.clone(),
                    ProfileEntry {
                        mobileconfig: record.mobileconfig,
                        uuid: identity.uuid,
                    },
                );
                resolved += 1;
            }
            None => {
                warn!(profile = %id, "blueprint references a profile with no resolvable definition");
                catalog.insert_unresolved(id.clone());
            }
        }
    }

    let report = BuildReport {
        blueprints: blueprints.len(),
        resolved,
        unresolved: catalog.unresolved_ids().iter().map(|s| s.to_string()).collect(),
    };
    Ok((catalog, report))
}
