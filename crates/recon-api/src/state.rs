//! Shared application state.

use std::sync::{Arc, RwLock};

use recon_core::DesiredStateCatalog;
use recon_mdm::{CatalogSource, ProfileInstaller};

/// State shared by all in-flight webhook handlers.
///
/// The catalog is an immutable snapshot behind a swappable `Arc`:
/// readers clone the `Arc` and keep the snapshot they started with even
/// while a refresh publishes a new one. Readers never observe a
/// partially built catalog.
#[derive(Clone)]
pub struct AppState {
    catalog: Arc<RwLock<Arc<DesiredStateCatalog>>>,
    pub source: Arc<dyn CatalogSource>,
    pub installer: Arc<dyn ProfileInstaller>,
}

impl AppState {
    pub fn new(
        catalog: DesiredStateCatalog,
        source: Arc<dyn CatalogSource>,
        installer: Arc<dyn ProfileInstaller>,
    ) -> Self {
        Self {
            catalog: Arc::new(RwLock::new(Arc::new(catalog))),
            source,
            installer,
        }
    }

    /// Current catalog snapshot.
    pub fn catalog(&self) -> Arc<DesiredStateCatalog> {
        self.catalog.read().expect("catalog lock poisoned").clone()
    }

    /// Atomically publish a freshly built catalog.
    pub fn publish(&self, catalog: DesiredStateCatalog) {
        *self.catalog.write().expect("catalog lock poisoned") = Arc::new(catalog);
    }
}
