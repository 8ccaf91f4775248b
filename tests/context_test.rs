//! Tests for provider-scoped access to the shared selection

use std::sync::Arc;

use treepick::application::services::{
    use_expertise, use_location, use_picker, CatalogService, TreePicker,
};
use treepick::domain::{
    use_selected, DomainError, KeyHandle, KeyPath, Scope, SelectionHandle, TaxonomyKind,
};
use treepick::util::testing;

fn picker(kind: TaxonomyKind) -> TreePicker {
    TreePicker::new(Arc::new(CatalogService::builtin(kind).unwrap()))
}

#[test]
fn given_no_provider_when_use_selected_then_provider_missing() {
    testing::init_test_setup();
    let scope = Scope::root();

    let result = use_selected::<String, String, String>(&scope);

    let err = result.expect_err("must fail outside a provider");
    assert!(matches!(err, DomainError::ProviderMissing { .. }));
    assert!(
        err.to_string().contains("must be used within a Provider"),
        "{err}"
    );
}

#[test]
fn given_no_provider_when_use_context_then_names_type() {
    let err = Scope::root().use_context::<KeyHandle>().unwrap_err();

    assert_eq!(
        err.to_string(),
        "use_context::<SelectionHandle> must be used within a Provider"
    );
}

#[test]
fn given_provider_when_use_selected_then_shares_store() {
    let handle = KeyHandle::new();
    let scope = Scope::root().provide(handle.clone());

    let used = use_selected::<String, String, String>(&scope).unwrap();
    used.toggle(&KeyPath::Root("Ghana".into()));

    assert!(used.same_store(&handle));
    assert!(handle.state().is_checked(&KeyPath::Root("Ghana".into())));
    assert_eq!(handle.revision(), 1);
}

#[test]
fn given_nested_providers_when_use_selected_then_innermost_wins() {
    let outer = KeyHandle::new();
    let inner = KeyHandle::new();
    let outer_scope = Scope::root().provide(outer.clone());
    let inner_scope = outer_scope.provide(inner.clone());

    let from_inner = use_selected::<String, String, String>(&inner_scope).unwrap();
    let from_outer = use_selected::<String, String, String>(&outer_scope).unwrap();

    assert!(from_inner.same_store(&inner));
    assert!(from_outer.same_store(&outer));
    assert_eq!(inner_scope.depth(), 2);
}

#[test]
fn given_provider_of_other_key_types_when_use_selected_then_provider_missing() {
    let scope = Scope::root().provide(SelectionHandle::<u32, u32, u32>::new());

    let result = use_selected::<String, String, String>(&scope);

    assert!(result.is_err());
    assert!(use_selected::<u32, u32, u32>(&scope).is_ok());
}

#[test]
fn given_dropped_child_scope_when_using_parent_then_value_not_visible() {
    let parent = Scope::root();
    {
        let child = parent.provide(KeyHandle::new());
        assert!(use_selected::<String, String, String>(&child).is_ok());
    }

    assert!(use_selected::<String, String, String>(&parent).is_err());
}

#[test]
fn given_mounted_pickers_when_using_kind_accessors_then_each_gets_its_own_store() {
    let expertise = picker(TaxonomyKind::Expertise);
    let location = picker(TaxonomyKind::Location);
    let scope = location.mount(&expertise.mount(&Scope::root()));

    let e = use_expertise(&scope).unwrap();
    let l = use_location(&scope).unwrap();

    assert!(e.same_store(&expertise.handle()));
    assert!(l.same_store(&location.handle()));
    assert!(!e.same_store(&l));
    let picked = use_picker(&scope, TaxonomyKind::Location).unwrap();
    assert!(picked.same_store(&l));
}

#[test]
fn given_only_expertise_mounted_when_use_location_then_provider_missing() {
    let expertise = picker(TaxonomyKind::Expertise);
    let scope = expertise.mount(&Scope::root());

    let err = use_location(&scope).unwrap_err();

    assert_eq!(
        err,
        DomainError::ProviderMissing {
            context: "use_location".to_string(),
        }
    );
}

#[test]
fn given_toggle_through_context_when_reading_picker_then_change_visible() {
    let location = picker(TaxonomyKind::Location);
    let scope = location.mount(&Scope::root());
    let before = location.state();

    use_location(&scope)
        .unwrap()
        .toggle(&KeyPath::Leaf("Nigeria".into(), "Lagos".into(), "Ikeja".into()));

    assert!(!std::rc::Rc::ptr_eq(&before, &location.state()));
    assert_eq!(location.selected_flat().roots, vec!["Nigeria".to_string()]);
}
