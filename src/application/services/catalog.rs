//! Taxonomy catalog service
//!
//! Supplies the static tree for each picker, either the built-in catalog
//! or a TOML file named in settings.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::{Taxonomy, TaxonomyKind};
use crate::infrastructure::traits::FileSystem;

const BUILTIN_EXPERTISE: &str = include_str!("../../../data/expertise.toml");
const BUILTIN_LOCATIONS: &str = include_str!("../../../data/locations.toml");

/// Raw TOML of the built-in taxonomy for `kind`.
pub fn builtin_source(kind: TaxonomyKind) -> &'static str {
    match kind {
        TaxonomyKind::Expertise => BUILTIN_EXPERTISE,
        TaxonomyKind::Location => BUILTIN_LOCATIONS,
    }
}

/// Service for loading taxonomies.
pub struct CatalogService {
    fs: Arc<dyn FileSystem>,
}

impl CatalogService {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    /// Parse the built-in taxonomy for `kind`.
    pub fn builtin(kind: TaxonomyKind) -> ApplicationResult<Taxonomy> {
        Taxonomy::parse(kind, builtin_source(kind)).map_err(|e| ApplicationError::Taxonomy {
            source_name: format!("built-in {kind}"),
            message: e.to_string(),
        })
    }

    /// Load the taxonomy for `kind`, preferring `path` when given.
    #[instrument(level = "debug", skip(self))]
    pub fn load(
        &self,
        kind: TaxonomyKind,
        path: Option<&Path>,
    ) -> ApplicationResult<Arc<Taxonomy>> {
        let taxonomy = match path {
            Some(path) => self.load_file(kind, path)?,
            None => Self::builtin(kind)?,
        };
        debug!(
            "load: {} taxonomy with {} nodes",
            kind,
            taxonomy.node_count()
        );
        Ok(Arc::new(taxonomy))
    }

    /// Load a taxonomy from a TOML file.
    pub fn load_file(&self, kind: TaxonomyKind, path: &Path) -> ApplicationResult<Taxonomy> {
        if !self.fs.exists(path) {
            return Err(ApplicationError::Taxonomy {
                source_name: path.display().to_string(),
                message: "file not found".to_string(),
            });
        }
        let content = self
            .fs
            .read_to_string(path)
            .with_path_context("read taxonomy", path)?;
        Taxonomy::parse(kind, &content).map_err(|e| ApplicationError::Taxonomy {
            source_name: path.display().to_string(),
            message: e.to_string(),
        })
    }
}
