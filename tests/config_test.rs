//! Integration tests for Settings config loading with layered merge semantics.
//!
//! Note: These tests run without a global config (temp directories only),
//! so they effectively test local config merging with defaults.

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

use treepick::config::{local_config_path, Settings};
use treepick::domain::TaxonomyKind;

#[test]
fn given_no_local_config_when_load_then_uses_defaults() {
    let project = TempDir::new().unwrap();

    let settings = Settings::load(Some(project.path())).expect("load settings");

    assert_eq!(settings.expertise_file, None);
    assert_eq!(settings.location_file, None);
    assert!(settings.strict);
}

#[test]
fn given_local_config_with_relative_taxonomy_when_load_then_anchored_to_project() {
    // Arrange
    let project = TempDir::new().unwrap();
    let local = r#"
expertise_file = "taxonomies/expertise.toml"
strict = false
"#;
    fs::write(local_config_path(project.path()), local).unwrap();

    // Act
    let settings = Settings::load(Some(project.path())).expect("load settings");

    // Assert
    assert_eq!(
        settings.taxonomy_file(TaxonomyKind::Expertise),
        Some(project.path().join("taxonomies/expertise.toml"))
    );
    assert_eq!(settings.taxonomy_file(TaxonomyKind::Location), None);
    assert!(!settings.strict);
}

#[test]
fn given_local_config_with_absolute_session_file_when_load_then_used_verbatim() {
    let project = TempDir::new().unwrap();
    let session = project.path().join("state").join("session.toml");
    fs::write(
        local_config_path(project.path()),
        format!("session_file = {:?}\n", session.display().to_string()),
    )
    .unwrap();

    let settings = Settings::load(Some(project.path())).expect("load settings");

    assert_eq!(settings.session_file, session);
}

#[test]
fn given_malformed_local_config_when_load_then_returns_config_error() {
    let project = TempDir::new().unwrap();
    fs::write(local_config_path(project.path()), "strict = [not toml").unwrap();

    let result = Settings::load(Some(project.path()));

    let err = result.expect_err("malformed config must fail");
    assert!(err.to_string().contains(".treepick.toml"), "{err}");
}

#[test]
fn given_template_when_parsed_then_is_valid_toml_with_defaults() {
    let project = TempDir::new().unwrap();
    fs::write(local_config_path(project.path()), Settings::template()).unwrap();

    let settings = Settings::load(Some(project.path())).expect("template must parse");

    assert!(settings.strict);
    assert_ne!(settings.session_file, PathBuf::new());
}
