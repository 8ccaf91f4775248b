//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::sync::Arc;

use crate::application::services::{CatalogService, SessionService};
use crate::application::ApplicationResult;
use crate::config::Settings;
use crate::domain::{Taxonomy, TaxonomyKind};
use crate::infrastructure::traits::{FileSystem, RealFileSystem, Selector, SkimSelector};

/// Container holding all application services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,

    /// Interactive selector
    pub selector: Arc<dyn Selector>,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        Self::with_deps(settings, Arc::new(RealFileSystem), Arc::new(SkimSelector))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(
        settings: Settings,
        fs: Arc<dyn FileSystem>,
        selector: Arc<dyn Selector>,
    ) -> Self {
        let settings = Arc::new(settings);

        Self {
            settings,
            fs,
            selector,
        }
    }

    pub fn catalog(&self) -> CatalogService {
        CatalogService::new(Arc::clone(&self.fs))
    }

    pub fn session(&self) -> SessionService {
        SessionService::new(Arc::clone(&self.fs), self.settings.session_file.clone())
    }

    /// Taxonomy for `kind`, honoring a configured override file.
    pub fn taxonomy(&self, kind: TaxonomyKind) -> ApplicationResult<Arc<Taxonomy>> {
        self.catalog()
            .load(kind, self.settings.taxonomy_file(kind).as_deref())
    }
}
