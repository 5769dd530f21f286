//! Per-device comparison against the Desired-State Catalog.

use tracing::warn;

use crate::catalog::{CatalogEntry, DesiredStateCatalog};
use crate::snapshot::DeviceSnapshot;

/// Outcome for one (device, profile) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Installed version equals the desired version
    Matched,
    /// Profile installed but at the wrong version
    VersionMismatch { installed: String },
    /// Profile not present in the device snapshot
    Missing,
}

impl Decision {
    /// Whether this decision calls for a corrective install.
    pub fn needs_remediation(&self) -> bool {
        !matches!(self, Decision::Matched)
    }
}

/// Compare a device snapshot against the catalog.
///
/// Emits exactly one decision per resolved catalog entry, in catalog
/// order, so repeated calls over the same inputs produce identical
/// sequences. Unresolved entries are skipped with a warning: without a
/// known desired version there is nothing to compare or install.
///
/// Comparison only; issuing remediation commands is the caller's job.
pub fn reconcile(
    snapshot: &DeviceSnapshot,
    catalog: &DesiredStateCatalog,
) -> Vec<(String, Decision)> {
    let mut decisions = Vec::new();

    for (id, entry) in catalog.iter() {
        let desired = match entry {
            CatalogEntry::Resolved(profile) => profile,
            CatalogEntry::Unresolved => {
                warn!(profile = %id, "no resolved desired version, skipping");
                continue;
            }
        };

        let decision = match snapshot.installed.get(id.as_str()) {
            None => Decision::Missing,
            Some(installed) if installed != &desired.uuid => Decision::VersionMismatch {
                installed: installed.clone(),
            },
            Some(_) => Decision::Matched,
        };

        decisions.push((id.clone(), decision));
    }

    decisions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ProfileEntry;
    use std::collections::HashMap;

    fn entry(uuid: &str) -> ProfileEntry {
        ProfileEntry {
            mobileconfig: "cGF5bG9hZA==".to_string(),
            uuid: uuid.to_string(),
        }
    }

    fn snapshot(installed: &[(&str, &str)]) -> DeviceSnapshot {
        DeviceSnapshot {
            udid: "DEVICE-1".to_string(),
            installed: installed
                .iter()
                .map(|(id, uuid)| (id.to_string(), uuid.to_string()))
                .collect::<HashMap<_, _>>(),
        }
    }

    #[test]
    fn test_matched_when_versions_equal() {
        let mut catalog = DesiredStateCatalog::new();
        catalog.insert_resolved("com.org.wifi", entry("V1"));
        let device = snapshot(&[("com.org.wifi", "V1")]);

        let decisions = reconcile(&device, &catalog);
        assert_eq!(decisions, vec![("com.org.wifi".to_string(), Decision::Matched)]);
    }

    #[test]
    fn test_mismatch_when_versions_differ() {
        let mut catalog = DesiredStateCatalog::new();
        catalog.insert_resolved("com.org.wifi", entry("V2"));
        let device = snapshot(&[("com.org.wifi", "V1")]);

        let decisions = reconcile(&device, &catalog);
        assert_eq!(
            decisions,
            vec![(
                "com.org.wifi".to_string(),
                Decision::VersionMismatch {
                    installed: "V1".to_string()
                }
            )]
        );
    }

    #[test]
    fn test_missing_when_absent_from_snapshot() {
        let mut catalog = DesiredStateCatalog::new();
        catalog.insert_resolved("com.org.vpn", entry("V1"));
        let device = snapshot(&[]);

        let decisions = reconcile(&device, &catalog);
        assert_eq!(decisions, vec![("com.org.vpn".to_string(), Decision::Missing)]);
    }

    #[test]
    fn test_one_decision_per_resolved_entry() {
        let mut catalog = DesiredStateCatalog::new();
        catalog.insert_resolved("com.org.wifi", entry("V1"));
        catalog.insert_resolved("com.org.vpn", entry("V2"));
        catalog.insert_unresolved("com.org.ghost");

        // Profiles installed on the device but absent from the catalog
        // never produce a decision.
        let device = snapshot(&[("com.org.wifi", "V1"), ("com.personal.extra", "X")]);

        let decisions = reconcile(&device, &catalog);
        assert_eq!(decisions.len(), 2);
        assert!(decisions.iter().all(|(id, _)| id != "com.org.ghost"));
    }

    #[test]
    fn test_reconcile_is_idempotent() {
        let mut catalog = DesiredStateCatalog::new();
        catalog.insert_resolved("com.org.wifi", entry("V2"));
        catalog.insert_resolved("com.org.vpn", entry("V1"));
        let device = snapshot(&[("com.org.wifi", "V1")]);

        let first = reconcile(&device, &catalog);
        let second = reconcile(&device, &catalog);
        assert_eq!(first, second);
    }

    #[test]
    fn test_all_matched_yields_no_remediation() {
        let mut catalog = DesiredStateCatalog::new();
        catalog.insert_resolved("com.org.wifi", entry("V1"));
        catalog.insert_resolved("com.org.vpn", entry("V9"));
        let device = snapshot(&[("com.org.wifi", "V1"), ("com.org.vpn", "V9")]);

        let decisions = reconcile(&device, &catalog);
        assert!(decisions.iter().all(|(_, d)| !d.needs_remediation()));
    }
}
