//! Tree picker service
//!
//! Binds one static taxonomy to its expansion state and a shared selection
//! handle. This is the model behind both the expertise and the location
//! pickers.

use std::collections::HashMap;
use std::rc::Rc;
use std::sync::Arc;

use termtree::Tree;
use tracing::{debug, instrument};

use crate::application::ApplicationResult;
use crate::domain::{
    branch_key, root_key, DomainError, DomainResult, ExpansionState, KeyFlat, KeyGroup,
    KeyHandle, KeyPath, KeySelection, Level, NodeData, Scope, Taxonomy, TaxonomyArena,
    TaxonomyKind,
};

/// Context value published by a mounted expertise picker.
#[derive(Debug, Clone)]
pub struct ExpertiseContext(pub KeyHandle);

/// Context value published by a mounted location picker.
#[derive(Debug, Clone)]
pub struct LocationContext(pub KeyHandle);

/// Selection handle of the nearest mounted expertise picker.
pub fn use_expertise(scope: &Scope) -> DomainResult<KeyHandle> {
    scope
        .try_use::<ExpertiseContext>()
        .map(|ctx| ctx.0.clone())
        .ok_or_else(|| DomainError::ProviderMissing {
            context: "use_expertise".to_string(),
        })
}

/// Selection handle of the nearest mounted location picker.
pub fn use_location(scope: &Scope) -> DomainResult<KeyHandle> {
    scope
        .try_use::<LocationContext>()
        .map(|ctx| ctx.0.clone())
        .ok_or_else(|| DomainError::ProviderMissing {
            context: "use_location".to_string(),
        })
}

/// Selection handle of the nearest mounted picker of `kind`.
pub fn use_picker(scope: &Scope, kind: TaxonomyKind) -> DomainResult<KeyHandle> {
    match kind {
        TaxonomyKind::Expertise => use_expertise(scope),
        TaxonomyKind::Location => use_location(scope),
    }
}

/// One rendered line of the picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickerRow {
    pub path: KeyPath,
    pub label: String,
    pub checked: bool,
    pub expanded: bool,
    pub has_children: bool,
    /// Leaves marked true at or below this node
    pub selected_below: usize,
}

impl PickerRow {
    pub fn level(&self) -> Level {
        self.path.level()
    }
}

/// Expansion key of a node, None for leaves.
pub fn expansion_key(path: &KeyPath) -> Option<String> {
    match path {
        KeyPath::Root(r) => Some(root_key(r)),
        KeyPath::Branch(r, b) => Some(branch_key(r, b)),
        KeyPath::Leaf(..) => None,
    }
}

pub struct TreePicker {
    taxonomy: Arc<Taxonomy>,
    arena: TaxonomyArena,
    expansion: ExpansionState,
    selection: KeyHandle,
}

impl TreePicker {
    pub fn new(taxonomy: Arc<Taxonomy>) -> Self {
        Self::with_state(taxonomy, KeySelection::default(), ExpansionState::default())
    }

    /// Picker restored from previously captured state.
    pub fn with_state(
        taxonomy: Arc<Taxonomy>,
        selection: KeySelection,
        expansion: ExpansionState,
    ) -> Self {
        let arena = TaxonomyArena::from_taxonomy(&taxonomy);
        Self {
            taxonomy,
            arena,
            expansion,
            selection: KeyHandle::from_state(selection),
        }
    }

    pub fn kind(&self) -> TaxonomyKind {
        self.taxonomy.kind
    }

    pub fn taxonomy(&self) -> &Arc<Taxonomy> {
        &self.taxonomy
    }

    pub fn arena(&self) -> &TaxonomyArena {
        &self.arena
    }

    pub fn expansion(&self) -> &ExpansionState {
        &self.expansion
    }

    pub fn toggle_expand(&mut self, key: &str) {
        debug!("toggle_expand: {}={}", self.kind(), key);
        self.expansion.toggle_expand(key);
    }

    /// Expand every root and branch.
    pub fn expand_all(&mut self) {
        for path in self.arena.node_paths() {
            if let Some(key) = expansion_key(&path) {
                self.expansion.set(&key, true);
            }
        }
    }

    pub fn collapse_all(&mut self) {
        self.expansion.clear();
    }

    /// Shared handle onto this picker's selection.
    pub fn handle(&self) -> KeyHandle {
        self.selection.clone()
    }

    pub fn state(&self) -> Rc<KeySelection> {
        self.selection.state()
    }

    /// Toggle without checking the path against the taxonomy.
    pub fn toggle(&self, path: &KeyPath) -> Rc<KeySelection> {
        debug!("toggle: {} {}", self.kind(), path);
        self.selection.toggle(path)
    }

    /// Toggle only paths the taxonomy contains.
    #[instrument(level = "debug", skip(self), fields(kind = %self.kind()))]
    pub fn toggle_strict(&self, path: &KeyPath) -> ApplicationResult<Rc<KeySelection>> {
        if !self.arena.contains(path) {
            return Err(DomainError::UnknownNode(path.to_string()).into());
        }
        Ok(self.selection.toggle(path))
    }

    pub fn set_checked(
        &self,
        level: Level,
        l1: String,
        l2: Option<String>,
        l3: Option<String>,
    ) -> DomainResult<Rc<KeySelection>> {
        self.selection.set_checked(level, l1, l2, l3)
    }

    pub fn reset(&mut self) {
        self.selection.reset();
        self.expansion.clear();
    }

    pub fn selected(&self) -> Vec<KeyGroup> {
        self.selection.selected()
    }

    pub fn selected_flat(&self) -> KeyFlat {
        self.selection.selected_flat()
    }

    /// Child scope in which this picker's selection is reachable through
    /// [`use_expertise`]/[`use_location`] and the generic `use_selected`.
    pub fn mount(&self, parent: &Scope) -> Scope {
        let scope = parent.provide(self.selection.clone());
        match self.kind() {
            TaxonomyKind::Expertise => scope.provide(ExpertiseContext(self.selection.clone())),
            TaxonomyKind::Location => scope.provide(LocationContext(self.selection.clone())),
        }
    }

    fn is_open(&self, path: &KeyPath) -> bool {
        expansion_key(path)
            .map(|key| self.expansion.is_expanded(&key))
            .unwrap_or(false)
    }

    /// Count of true leaves per arena node, computed bottom-up.
    fn selected_counts(&self, state: &KeySelection) -> HashMap<KeyPath, usize> {
        let mut by_index = HashMap::new();
        let mut by_path = HashMap::new();
        for (idx, node) in self.arena.iter_postorder() {
            let own = match &node.data.path {
                Some(path @ KeyPath::Leaf(..)) if state.is_checked(path) => 1,
                _ => 0,
            };
            let below: usize = node
                .children
                .iter()
                .filter_map(|child| by_index.get(child))
                .sum();
            by_index.insert(idx, own + below);
            if let Some(path) = &node.data.path {
                by_path.insert(path.clone(), own + below);
            }
        }
        by_path
    }

    /// Rows currently visible given the expansion state, in taxonomy order.
    ///
    /// Roots are always visible; a node's children are visible when the
    /// node's expansion key is set.
    pub fn visible_rows(&self) -> Vec<PickerRow> {
        self.rows(false)
    }

    /// Every row regardless of expansion.
    pub fn all_rows(&self) -> Vec<PickerRow> {
        self.rows(true)
    }

    fn rows(&self, show_all: bool) -> Vec<PickerRow> {
        let state = self.selection.state();
        let counts = self.selected_counts(&state);
        let mut rows = Vec::new();
        let mut stack: Vec<_> = self.arena.top_level().into_iter().rev().collect();

        while let Some(idx) = stack.pop() {
            let Some(node) = self.arena.get_node(idx) else {
                continue;
            };
            let Some(path) = node.data.path.clone() else {
                continue;
            };
            let expanded = self.is_open(&path);
            if show_all || expanded {
                stack.extend(node.children.iter().rev().copied());
            }
            rows.push(PickerRow {
                checked: state.is_checked(&path),
                selected_below: counts.get(&path).copied().unwrap_or(0),
                label: node.data.label.clone(),
                has_children: !node.children.is_empty(),
                expanded,
                path,
            });
        }
        rows
    }

    /// Checkbox tree for terminal display.
    pub fn render(&self, show_all: bool) -> Tree<String> {
        let state = self.selection.state();
        let counts = self.selected_counts(&state);
        let label = |data: &NodeData| match &data.path {
            Some(path) => {
                let mark = if state.is_checked(path) { "[x]" } else { "[ ]" };
                match counts.get(path).copied().unwrap_or(0) {
                    0 => format!("{mark} {}", data.label),
                    n if path.level() != Level::Leaf => format!("{mark} {} ({n})", data.label),
                    _ => format!("{mark} {}", data.label),
                }
            }
            None => data.label.clone(),
        };
        let descend = |data: &NodeData| match &data.path {
            None => true,
            Some(path) => show_all || self.is_open(path),
        };
        self.arena.render(label, descend)
    }
}
