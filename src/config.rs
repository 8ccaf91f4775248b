//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/treepick/treepick.toml`
//! 3. Local config: `<project_dir>/.treepick.toml`
//! 4. Environment variables: `TREEPICK_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::domain::TaxonomyKind;

/// Raw settings for intermediate parsing (every field optional to detect "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub expertise_file: Option<PathBuf>,
    pub location_file: Option<PathBuf>,
    pub session_file: Option<PathBuf>,
    pub strict: Option<bool>,
}

/// Unified configuration for treepick.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Custom expertise taxonomy (default: built-in)
    pub expertise_file: Option<PathBuf>,
    /// Custom location taxonomy (default: built-in)
    pub location_file: Option<PathBuf>,
    /// Where the CLI keeps picker state between runs
    pub session_file: PathBuf,
    /// Reject toggles of nodes that are not in the taxonomy
    pub strict: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            expertise_file: None,
            location_file: None,
            session_file: default_session_file(),
            strict: true,
        }
    }
}

/// Default session location (`<data_dir>/session.toml`).
fn default_session_file() -> PathBuf {
    ProjectDirs::from("", "", "treepick")
        .map(|dirs| dirs.data_dir().join("session.toml"))
        .unwrap_or_else(|| PathBuf::from("~/.treepick/session.toml"))
}

/// Get the XDG config directory for treepick.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "treepick").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("treepick.toml"))
}

/// Get the path to the local config file in a project directory.
pub fn local_config_path(project_dir: &Path) -> PathBuf {
    project_dir.join(".treepick.toml")
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

/// Expand `~`, `$VAR` and `${VAR}` in a path string.
pub fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}

fn expand_path(path: &Path) -> PathBuf {
    PathBuf::from(expand_env_vars(path.to_string_lossy().as_ref()))
}

impl Settings {
    /// Configured taxonomy file for `kind`, if any.
    pub fn taxonomy_file(&self, kind: TaxonomyKind) -> Option<PathBuf> {
        match kind {
            TaxonomyKind::Expertise => self.expertise_file.clone(),
            TaxonomyKind::Location => self.location_file.clone(),
        }
    }

    /// Expand shell variables and tilde in path-like fields.
    fn expand_paths(&mut self) {
        self.expertise_file = self.expertise_file.as_deref().map(expand_path);
        self.location_file = self.location_file.as_deref().map(expand_path);
        self.session_file = expand_path(&self.session_file);
    }

    /// Overlay wins for every field it specifies.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            expertise_file: overlay
                .expertise_file
                .clone()
                .or_else(|| self.expertise_file.clone()),
            location_file: overlay
                .location_file
                .clone()
                .or_else(|| self.location_file.clone()),
            session_file: overlay
                .session_file
                .clone()
                .unwrap_or_else(|| self.session_file.clone()),
            strict: overlay.strict.unwrap_or(self.strict),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `project_dir` - Optional project directory for local config
    ///
    /// # Precedence (lowest to highest)
    /// 1. Compiled defaults
    /// 2. Global config: `$XDG_CONFIG_HOME/treepick/treepick.toml`
    /// 3. Local config: `<project_dir>/.treepick.toml`
    /// 4. Environment variables: `TREEPICK_*` prefix
    ///
    /// Relative taxonomy paths in the local config resolve against `project_dir`.
    pub fn load(project_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.merge_with(&raw);
            }
        }

        if let Some(project) = project_dir {
            let local_path = local_config_path(project);
            if local_path.exists() {
                let mut raw = load_raw_settings(&local_path)?;
                raw.expertise_file = raw.expertise_file.map(|p| anchor(project, p));
                raw.location_file = raw.location_file.map(|p| anchor(project, p));
                current = current.merge_with(&raw);
            }
        }

        current = Self::apply_env_overrides(current)?;
        current.expand_paths();

        Ok(current)
    }

    /// Apply TREEPICK_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(Environment::with_prefix("TREEPICK").separator("__"))
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("expertise_file") {
            settings.expertise_file = Some(PathBuf::from(val));
        }
        if let Ok(val) = config.get_string("location_file") {
            settings.location_file = Some(PathBuf::from(val));
        }
        if let Ok(val) = config.get_string("session_file") {
            settings.session_file = PathBuf::from(val);
        }
        if let Ok(val) = config.get_bool("strict") {
            settings.strict = val;
        }

        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# treepick configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/treepick/treepick.toml
#   Local:  <project_dir>/.treepick.toml
#   Env:    TREEPICK_* environment variables

# Custom expertise taxonomy (domains -> categories -> skills)
# expertise_file = "~/taxonomies/expertise.toml"

# Custom location taxonomy (countries -> states -> lgas)
# location_file = "~/taxonomies/locations.toml"

# Where picker state is kept between runs
# session_file = "~/.local/share/treepick/session.toml"

# Reject toggles of nodes not present in the taxonomy
# strict = true
"#
        .to_string()
    }
}

fn anchor(base: &Path, path: PathBuf) -> PathBuf {
    let expanded = expand_path(&path);
    if expanded.is_absolute() {
        expanded
    } else {
        base.join(expanded)
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_default_settings_when_created_then_strict_and_builtin_taxonomies() {
        let settings = Settings::default();
        assert!(settings.strict);
        assert!(settings.expertise_file.is_none());
        assert!(settings.location_file.is_none());
        assert!(settings
            .session_file
            .to_string_lossy()
            .ends_with("session.toml"));
    }

    #[test]
    fn given_overlay_with_some_fields_when_merging_then_only_those_change() {
        let base = Settings::default();
        let overlay = RawSettings {
            location_file: Some(PathBuf::from("/srv/geo.toml")),
            strict: Some(false),
            ..RawSettings::default()
        };

        let merged = base.merge_with(&overlay);

        assert_eq!(merged.location_file, Some(PathBuf::from("/srv/geo.toml")));
        assert!(!merged.strict);
        assert_eq!(merged.expertise_file, None);
        assert_eq!(merged.session_file, base.session_file);
    }

    #[test]
    fn given_tilde_in_session_file_when_expand_paths_then_expands_to_home() {
        let mut settings = Settings {
            session_file: PathBuf::from("~/.treepick/session.toml"),
            expertise_file: Some(PathBuf::from("~/tax/expertise.toml")),
            ..Settings::default()
        };

        settings.expand_paths();

        let home = std::env::var("HOME").expect("HOME should be set");
        let session = settings.session_file.to_string_lossy();
        assert!(session.starts_with(&home), "session_file: {}", session);
        assert!(!session.contains('~'));
        let expertise = settings.expertise_file.expect("expertise_file kept");
        assert!(expertise.to_string_lossy().starts_with(&home));
    }

    #[test]
    fn given_relative_path_when_anchoring_then_joins_project_dir() {
        let anchored = anchor(Path::new("/work/project"), PathBuf::from("tax/geo.toml"));
        assert_eq!(anchored, PathBuf::from("/work/project/tax/geo.toml"));

        let absolute = anchor(Path::new("/work/project"), PathBuf::from("/etc/geo.toml"));
        assert_eq!(absolute, PathBuf::from("/etc/geo.toml"));
    }

    #[test]
    fn given_settings_when_to_toml_then_contains_fields() {
        let settings = Settings {
            expertise_file: Some(PathBuf::from("/tax/expertise.toml")),
            ..Settings::default()
        };
        let rendered = settings.to_toml().expect("serialize");
        assert!(rendered.contains("expertise_file"));
        assert!(rendered.contains("strict = true"));
    }
}
