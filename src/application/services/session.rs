//! Session persistence for the CLI
//!
//! The selection model never persists itself. The CLI is the caller that
//! keeps picker state between invocations, so it reads the state out and
//! stores it here as TOML.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::application::services::picker::TreePicker;
use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::{ExpansionState, KeySelection, Taxonomy, TaxonomyKind};
use crate::infrastructure::traits::FileSystem;

/// Captured state of one picker.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PickerSession {
    /// Fingerprint of the taxonomy the state was recorded against
    pub fingerprint: Option<String>,
    pub selection: KeySelection,
    pub expansion: ExpansionState,
}

impl PickerSession {
    pub fn capture(picker: &TreePicker) -> Self {
        Self {
            fingerprint: Some(picker.taxonomy().fingerprint()),
            selection: (*picker.state()).clone(),
            expansion: picker.expansion().clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionFile {
    pub saved_at: Option<DateTime<Utc>>,
    pub expertise: PickerSession,
    pub location: PickerSession,
}

impl SessionFile {
    pub fn picker(&self, kind: TaxonomyKind) -> &PickerSession {
        match kind {
            TaxonomyKind::Expertise => &self.expertise,
            TaxonomyKind::Location => &self.location,
        }
    }

    pub fn picker_mut(&mut self, kind: TaxonomyKind) -> &mut PickerSession {
        match kind {
            TaxonomyKind::Expertise => &mut self.expertise,
            TaxonomyKind::Location => &mut self.location,
        }
    }
}

pub struct SessionService {
    fs: Arc<dyn FileSystem>,
    path: PathBuf,
}

impl SessionService {
    pub fn new(fs: Arc<dyn FileSystem>, path: PathBuf) -> Self {
        Self { fs, path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the session file; a missing file is an empty session.
    #[instrument(level = "debug", skip(self), fields(path = %self.path.display()))]
    pub fn load(&self) -> ApplicationResult<SessionFile> {
        if !self.fs.exists(&self.path) {
            debug!("load: no session file, starting empty");
            return Ok(SessionFile::default());
        }
        let content = self
            .fs
            .read_to_string(&self.path)
            .with_path_context("read session", &self.path)?;
        toml::from_str(&content).map_err(|e| ApplicationError::Session {
            path: self.path.clone(),
            message: e.to_string(),
        })
    }

    #[instrument(level = "debug", skip(self, session), fields(path = %self.path.display()))]
    pub fn save(&self, session: &SessionFile) -> ApplicationResult<()> {
        let mut session = session.clone();
        session.saved_at = Some(Utc::now());
        let content = toml::to_string_pretty(&session).map_err(|e| ApplicationError::Session {
            path: self.path.clone(),
            message: e.to_string(),
        })?;
        self.fs
            .ensure_parent(&self.path)
            .with_path_context("create session directory", &self.path)?;
        self.fs
            .write(&self.path, &content)
            .with_path_context("write session", &self.path)?;
        Ok(())
    }

    /// Rebuild a picker from stored state.
    ///
    /// A fingerprint mismatch is only logged: stale keys are harmless dead
    /// entries in the selection model.
    pub fn restore(&self, session: &SessionFile, taxonomy: Arc<Taxonomy>) -> TreePicker {
        let stored = session.picker(taxonomy.kind);
        if let Some(fingerprint) = &stored.fingerprint {
            if *fingerprint != taxonomy.fingerprint() {
                warn!(
                    "{} taxonomy changed since the session was saved; keeping stored selection",
                    taxonomy.kind
                );
            }
        }
        TreePicker::with_state(taxonomy, stored.selection.clone(), stored.expansion.clone())
    }

    /// Store the picker's current state into `session`.
    pub fn record(&self, session: &mut SessionFile, picker: &TreePicker) {
        *session.picker_mut(picker.kind()) = PickerSession::capture(picker);
    }

    /// Drop stored state for `kind`, or for both pickers when None.
    pub fn clear(&self, session: &mut SessionFile, kind: Option<TaxonomyKind>) {
        match kind {
            Some(kind) => *session.picker_mut(kind) = PickerSession::default(),
            None => {
                session.expertise = PickerSession::default();
                session.location = PickerSession::default();
            }
        }
    }
}
