//! Tests for the three-level toggle rules

use std::rc::Rc;

use rstest::rstest;

use treepick::domain::{DomainError, KeyPath, KeySelection, Level, RootSelection, SelectionStore};
use treepick::util::testing;

fn leaf(r: &str, b: &str, l: &str) -> KeyPath {
    KeyPath::Leaf(r.into(), b.into(), l.into())
}

fn branch(r: &str, b: &str) -> KeyPath {
    KeyPath::Branch(r.into(), b.into())
}

fn root(r: &str) -> KeyPath {
    KeyPath::Root(r.into())
}

// ============================================================
// Upward propagation
// ============================================================

#[test]
fn given_empty_state_when_toggling_leaf_then_ancestors_are_synthesized_and_checked() {
    testing::init_test_setup();
    let state = KeySelection::new();

    let next = state.toggled(&leaf(
        "information_technology",
        "software_development",
        "front_end",
    ));

    let domain = next
        .root(&"information_technology".into())
        .expect("root entry");
    assert!(domain.checked);
    let category = next
        .branch(
            &"information_technology".into(),
            &"software_development".into(),
        )
        .expect("branch entry");
    assert!(category.checked);
    assert_eq!(
        next.leaf(
            &"information_technology".into(),
            &"software_development".into(),
            &"front_end".into(),
        ),
        Some(true)
    );
}

#[test]
fn given_unchecked_ancestors_when_toggling_leaf_then_ancestors_forced_true() {
    // Arrange: root and branch toggled off explicitly
    let state = KeySelection::new()
        .toggled(&branch("healthcare", "clinical"))
        .toggled(&branch("healthcare", "clinical"));
    assert_eq!(state.lookup(&branch("healthcare", "clinical")), Some(false));

    // Act
    let next = state.toggled(&leaf("healthcare", "clinical", "nursing"));

    // Assert
    assert_eq!(next.lookup(&root("healthcare")), Some(true));
    assert_eq!(next.lookup(&branch("healthcare", "clinical")), Some(true));
}

#[test]
fn given_unchecking_branch_when_toggled_then_root_still_forced_true() {
    // branch toggle forces the root on, one direct toggle turns it off and clears branches
    let state = KeySelection::new()
        .toggled(&branch("education", "teaching"))
        .toggled(&root("education"));
    assert_eq!(state.lookup(&root("education")), Some(false));
    assert_eq!(state.lookup(&branch("education", "teaching")), None);

    let next = state.toggled(&branch("education", "training"));

    assert_eq!(next.lookup(&root("education")), Some(true));
    assert_eq!(next.lookup(&branch("education", "training")), Some(true));
}

// ============================================================
// No downward propagation, destructive resets
// ============================================================

#[test]
fn given_selected_skills_when_toggling_root_then_branches_are_discarded() {
    let state = KeySelection::new()
        .toggled(&leaf(
            "information_technology",
            "software_development",
            "front_end",
        ))
        .toggled(&leaf("information_technology", "data", "machine_learning"));

    let next = state.toggled(&root("information_technology"));

    // root was checked by propagation, so a direct toggle turns it off
    let entry = next
        .root(&"information_technology".into())
        .expect("entry kept");
    assert!(!entry.checked);
    assert!(entry.branches.is_empty());
}

#[test]
fn given_untouched_root_when_toggled_then_checked_with_no_children() {
    let next = KeySelection::new().toggled(&root("engineering"));

    assert_eq!(
        next.root(&"engineering".into()),
        Some(&RootSelection {
            checked: true,
            branches: Default::default(),
        })
    );
    assert_eq!(next.lookup(&branch("engineering", "civil")), None);
}

#[test]
fn given_selected_skills_when_toggling_branch_then_its_leaves_are_discarded() {
    let state = KeySelection::new()
        .toggled(&leaf("engineering", "energy", "solar"))
        .toggled(&leaf("engineering", "civil", "water_resources"));

    let next = state.toggled(&branch("engineering", "energy"));

    let energy = next
        .branch(&"engineering".into(), &"energy".into())
        .expect("branch entry");
    assert!(!energy.checked);
    assert!(energy.leaves.is_empty());
    // sibling branch untouched
    assert_eq!(
        next.lookup(&leaf("engineering", "civil", "water_resources")),
        Some(true)
    );
}

#[test]
fn given_unchecked_branch_when_checked_then_no_leaf_is_set() {
    let next = KeySelection::new().toggled(&branch("healthcare", "public_health"));

    let entry = next
        .branch(&"healthcare".into(), &"public_health".into())
        .expect("branch entry");
    assert!(entry.checked);
    assert!(entry.leaves.is_empty());
    assert_eq!(
        next.lookup(&leaf("healthcare", "public_health", "epidemiology")),
        None
    );
}

// ============================================================
// Double toggle
// ============================================================

#[test]
fn given_leaf_toggled_twice_when_inspecting_then_leaf_false_and_ancestors_true() {
    let path = leaf("Nigeria", "Lagos", "Ikeja");

    let next = KeySelection::new().toggled(&path).toggled(&path);

    assert_eq!(next.lookup(&path), Some(false));
    assert_eq!(next.lookup(&root("Nigeria")), Some(true));
    assert_eq!(next.lookup(&branch("Nigeria", "Lagos")), Some(true));
}

#[test]
fn given_toggle_when_applied_then_previous_state_is_untouched() {
    let before = KeySelection::new().toggled(&root("Ghana"));
    let snapshot = before.clone();

    let _after = before.toggled(&leaf("Ghana", "Ashanti", "Ejisu"));

    assert_eq!(before, snapshot);
}

// ============================================================
// Loose call shape
// ============================================================

#[rstest]
#[case(Level::Root, None, None, true)]
#[case(Level::Branch, Some("software_development"), None, true)]
#[case(Level::Branch, None, None, false)]
#[case(Level::Leaf, Some("software_development"), Some("back_end"), true)]
#[case(Level::Leaf, Some("software_development"), None, false)]
fn given_level_and_parts_when_set_checked_then_requires_parts_for_level(
    #[case] level: Level,
    #[case] l2: Option<&str>,
    #[case] l3: Option<&str>,
    #[case] accepted: bool,
) {
    let result = KeySelection::new().set_checked(
        level,
        "information_technology".to_string(),
        l2.map(str::to_string),
        l3.map(str::to_string),
    );

    match result {
        Ok(state) => {
            assert!(accepted, "expected rejection for {level}");
            assert_eq!(
                state.lookup(&KeyPath::Root("information_technology".into())),
                Some(true)
            );
        }
        Err(e) => {
            assert!(!accepted, "unexpected error: {e}");
            assert_eq!(e, DomainError::IncompletePath { level });
        }
    }
}

#[test]
fn given_unknown_keys_when_toggling_then_dead_entries_are_created() {
    let next = KeySelection::new().toggled(&leaf("atlantis", "nowhere", "ghost"));

    assert_eq!(
        next.lookup(&leaf("atlantis", "nowhere", "ghost")),
        Some(true)
    );
}

// ============================================================
// Store identity
// ============================================================

#[test]
fn given_store_when_toggling_then_state_identity_and_revision_change() {
    let mut store = SelectionStore::<String, String, String>::new();
    let before = store.state();

    let after = store.toggle(&root("Kenya"));

    assert!(!Rc::ptr_eq(&before, &after));
    assert_eq!(store.revision(), 1);
    assert!(before.is_empty());
    assert_eq!(after.lookup(&root("Kenya")), Some(true));
}

#[test]
fn given_store_when_reset_then_empty_with_new_identity() {
    let mut store = SelectionStore::<String, String, String>::new();
    store.toggle(&leaf("Kenya", "Nairobi", "Westlands"));
    let before = store.state();

    let after = store.reset();

    assert!(after.is_empty());
    assert!(!Rc::ptr_eq(&before, &after));
    assert_eq!(store.revision(), 2);
}

#[test]
fn given_integer_keys_when_toggling_then_model_is_generic() {
    let mut store = SelectionStore::<u32, u32, u32>::new();

    store.toggle(&treepick::domain::NodePath::Leaf(1, 10, 100));

    let state = store.state();
    assert_eq!(state.leaf(&1, &10, &100), Some(true));
    assert_eq!(state.root(&1).map(|r| r.checked), Some(true));
}
