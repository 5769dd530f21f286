//! Desired-State Catalog
//!
//! The resolved mapping from profile identifier to its required payload
//! and version. Built once at startup (or on an explicit refresh) and
//! then read by many webhook handlers; a refresh replaces the whole
//! catalog, never patches it in place.

use std::collections::BTreeMap;

/// One resolved profile the fleet is expected to have installed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileEntry {
    /// Original base64 mobileconfig, kept verbatim for re-installation
    pub mobileconfig: String,
    /// Version token extracted from the payload
    pub uuid: String,
}

/// Catalog slot for a profile identifier referenced by some blueprint.
///
/// `Unresolved` means a blueprint references the identifier but no
/// definition could be resolved from the server. That is a degraded
/// state, distinct from the identifier being absent from the catalog
/// (absent means the profile is simply not required).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogEntry {
    Resolved(ProfileEntry),
    Unresolved,
}

/// Mapping from profile identifier to its desired entry.
///
/// Backed by a `BTreeMap` so iteration order is deterministic, which
/// keeps reconciliation logs and tests reproducible.
#[derive(Debug, Clone, Default)]
pub struct DesiredStateCatalog {
    entries: BTreeMap<String, CatalogEntry>,
}

impl DesiredStateCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a candidate identifier with no resolved definition yet.
    /// Never downgrades an already-resolved entry.
    pub fn insert_unresolved(&mut self, id: impl Into<String>) {
        self.entries
            .entry(id.into())
            .or_insert(CatalogEntry::Unresolved);
    }

    pub fn insert_resolved(&mut self, id: impl Into<String>, entry: ProfileEntry) {
        self.entries.insert(id.into(), CatalogEntry::Resolved(entry));
    }

    pub fn get(&self, id: &str) -> Option<&CatalogEntry> {
        self.entries.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &CatalogEntry)> {
        self.entries.iter()
    }

    /// Entries with a known desired version.
    pub fn resolved(&self) -> impl Iterator<Item = (&String, &ProfileEntry)> {
        self.entries.iter().filter_map(|(id, entry)| match entry {
            CatalogEntry::Resolved(profile) => Some((id, profile)),
            CatalogEntry::Unresolved => None,
        })
    }

    /// Identifiers referenced by a blueprint but never resolved.
    pub fn unresolved_ids(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|(_, entry)| matches!(entry, CatalogEntry::Unresolved))
            .map(|(id, _)| id.as_str())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(uuid: &str) -> ProfileEntry {
        ProfileEntry {
            mobileconfig: "cGF5bG9hZA==".to_string(),
            uuid: uuid.to_string(),
        }
    }

    #[test]
    fn test_unresolved_is_distinct_from_absent() {
        let mut catalog = DesiredStateCatalog::new();
        catalog.insert_unresolved("com.org.vpn");

        assert!(matches!(
            catalog.get("com.org.vpn"),
            Some(CatalogEntry::Unresolved)
        ));
        assert!(catalog.get("com.org.wifi").is_none());
    }

    #[test]
    fn test_resolve_overwrites_unresolved_but_not_vice_versa() {
        let mut catalog = DesiredStateCatalog::new();
        catalog.insert_unresolved("com.org.wifi");
        catalog.insert_resolved("com.org.wifi", entry("V1"));
        // A repeated blueprint reference must not lose the resolution
        catalog.insert_unresolved("com.org.wifi");

        match catalog.get("com.org.wifi") {
            Some(CatalogEntry::Resolved(profile)) => assert_eq!(profile.uuid, "V1"),
            other => panic!("unexpected entry: {other:?}"),
        }
    }

    #[test]
    fn test_iteration_order_is_deterministic() {
        let mut catalog = DesiredStateCatalog::new();
        catalog.insert_resolved("com.org.wifi", entry("V1"));
        catalog.insert_resolved("com.org.ad", entry("V2"));
        catalog.insert_unresolved("com.org.vpn");

        let ids: Vec<_> = catalog.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(ids, vec!["com.org.ad", "com.org.vpn", "com.org.wifi"]);
    }

    #[test]
    fn test_resolved_filters_unresolved() {
        let mut catalog = DesiredStateCatalog::new();
        catalog.insert_resolved("com.org.wifi", entry("V1"));
        catalog.insert_unresolved("com.org.vpn");

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.resolved().count(), 1);
        assert_eq!(catalog.unresolved_ids(), vec!["com.org.vpn"]);
    }
}
