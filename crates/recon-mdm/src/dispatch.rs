//! Command Dispatcher and the remediation workflow.
//!
//! The reconciler only compares; acting on its decisions happens here.
//! One `InstallProfile` command per decision that needs it, failures
//! isolated per (device, profile) pair.

use async_trait::async_trait;
use serde::Serialize;
use tracing::{info, warn};

use recon_core::{
    reconcile, CatalogEntry, Decision, DesiredStateCatalog, DeviceSnapshot, ProfileEntry,
    ReconError,
};

/// Sink for remediation commands.
///
/// Implementations issue exactly one request per call and never batch
/// or de-duplicate; that is caller policy if ever wanted.
#[async_trait]
pub trait ProfileInstaller: Send + Sync {
    async fn install_profile(&self, udid: &str, entry: &ProfileEntry) -> Result<(), ReconError>;
}

/// What one remediation pass did for one device.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RemediationSummary {
    pub decisions: usize,
    pub dispatched: usize,
    /// Profile identifiers whose dispatch failed
    pub failed: Vec<String>,
}

/// Reconcile a device snapshot and dispatch corrective installs.
///
/// Every decision is processed even when a dispatch fails; a failed
/// install for one profile never blocks remediation of the rest. The
/// dispatched payload is always the desired one from the catalog,
/// never anything derived from the device's report.
pub async fn remediate(
    snapshot: &DeviceSnapshot,
    catalog: &DesiredStateCatalog,
    installer: &dyn ProfileInstaller,
) -> RemediationSummary {
    info!(udid = %snapshot.udid, "checking ProfileList");

    let decisions = reconcile(snapshot, catalog);
    let mut summary = RemediationSummary {
        decisions: decisions.len(),
        ..Default::default()
    };

    for (id, decision) in &decisions {
        let Some(CatalogEntry::Resolved(desired)) = catalog.get(id) else {
            continue;
        };

        match decision {
            Decision::Matched => {
                info!(profile = %id, "already installed, version is correct");
                continue;
            }
            Decision::VersionMismatch { installed } => {
                info!(
                    profile = %id,
                    installed = %installed,
                    required = %desired.uuid,
                    "already installed, version mismatch"
                );
            }
            Decision::Missing => {
                info!(profile = %id, "not installed");
            }
        }

        match installer.install_profile(&snapshot.udid, desired).await {
            Ok(()) => summary.dispatched += 1,
            Err(e) => {
                warn!(udid = %snapshot.udid, profile = %id, error = %e, "remediation dispatch failed");
                summary.failed.push(id.clone());
            }
        }
    }

    summary
}
