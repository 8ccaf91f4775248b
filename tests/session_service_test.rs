//! Tests for persisting picker state between CLI runs

use std::fs;
use std::sync::Arc;

use tempfile::TempDir;

use treepick::application::services::{
    CatalogService, PickerSession, SessionFile, SessionService, TreePicker,
};
use treepick::application::ApplicationError;
use treepick::domain::{KeyPath, Taxonomy, TaxonomyKind};
use treepick::infrastructure::traits::RealFileSystem;
use treepick::util::testing;

fn service(temp: &TempDir) -> SessionService {
    SessionService::new(
        Arc::new(RealFileSystem),
        temp.path().join("state").join("session.toml"),
    )
}

fn taxonomy(kind: TaxonomyKind) -> Arc<Taxonomy> {
    Arc::new(CatalogService::builtin(kind).unwrap())
}

#[test]
fn given_no_session_file_when_load_then_empty_session() {
    testing::init_test_setup();
    let temp = TempDir::new().unwrap();

    let session = service(&temp).load().unwrap();

    assert_eq!(session, SessionFile::default());
}

#[test]
fn given_picker_state_when_saved_and_restored_then_selection_and_expansion_survive() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let service = service(&temp);
    let mut picker = TreePicker::new(taxonomy(TaxonomyKind::Location));
    picker.toggle(&KeyPath::Leaf("Nigeria".into(), "Ogun".into(), "Ado-Odo/Ota".into()));
    picker.toggle(&KeyPath::Root("Ghana".into()));
    picker.toggle_expand("Nigeria");
    let mut session = SessionFile::default();

    // Act
    service.record(&mut session, &picker);
    service.save(&session).unwrap();
    let loaded = service.load().unwrap();
    let restored = service.restore(&loaded, taxonomy(TaxonomyKind::Location));

    // Assert
    assert!(loaded.saved_at.is_some());
    assert_eq!(*restored.state(), *picker.state());
    assert!(restored.expansion().is_expanded("Nigeria"));
    assert_eq!(
        loaded.location.fingerprint,
        Some(picker.taxonomy().fingerprint())
    );
    assert_eq!(loaded.expertise, PickerSession::default());
}

#[test]
fn given_saved_session_when_clearing_one_kind_then_other_kept() {
    let temp = TempDir::new().unwrap();
    let service = service(&temp);
    let expertise = TreePicker::new(taxonomy(TaxonomyKind::Expertise));
    let location = TreePicker::new(taxonomy(TaxonomyKind::Location));
    expertise.toggle(&KeyPath::Root("education".into()));
    location.toggle(&KeyPath::Root("Kenya".into()));
    let mut session = SessionFile::default();
    service.record(&mut session, &expertise);
    service.record(&mut session, &location);

    service.clear(&mut session, Some(TaxonomyKind::Expertise));

    assert!(session.expertise.selection.is_empty());
    assert!(!session.location.selection.is_empty());

    service.clear(&mut session, None);
    assert!(session.location.selection.is_empty());
}

#[test]
fn given_stale_fingerprint_when_restoring_then_selection_still_restored() {
    let temp = TempDir::new().unwrap();
    let service = service(&temp);
    let mut session = SessionFile::default();
    session.expertise.fingerprint = Some("stale".to_string());
    session.expertise.selection = session
        .expertise
        .selection
        .toggled(&KeyPath::Root("retired_domain".into()));

    let picker = service.restore(&session, taxonomy(TaxonomyKind::Expertise));

    assert!(picker.state().is_checked(&KeyPath::Root("retired_domain".into())));
}

#[test]
fn given_corrupt_session_file_when_load_then_session_error() {
    let temp = TempDir::new().unwrap();
    let service = service(&temp);
    fs::create_dir_all(temp.path().join("state")).unwrap();
    fs::write(service.path(), "expertise = 42").unwrap();

    let result = service.load();

    assert!(matches!(result, Err(ApplicationError::Session { .. })));
}
