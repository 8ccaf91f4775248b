//! Display-only selection processor
//!
//! Lists the current selection as individual items. What an item's action
//! does is decided entirely by the parent; without a supplied action,
//! activating an item does nothing.

use std::fmt;

use crate::application::services::picker::use_picker;
use crate::domain::{DomainResult, KeyFlat, KeyPath, Level, Scope, Taxonomy, TaxonomyKind};

/// Callback attached by the parent for one level of items.
pub type ProcessorAction = Box<dyn Fn(&ProcessorItem)>;

/// Per-level actions supplied by the parent.
#[derive(Default)]
pub struct ProcessorActions {
    pub on_root: Option<ProcessorAction>,
    pub on_branch: Option<ProcessorAction>,
    pub on_leaf: Option<ProcessorAction>,
}

impl ProcessorActions {
    fn for_level(&self, level: Level) -> Option<&ProcessorAction> {
        match level {
            Level::Root => self.on_root.as_ref(),
            Level::Branch => self.on_branch.as_ref(),
            Level::Leaf => self.on_leaf.as_ref(),
        }
    }
}

impl fmt::Debug for ProcessorActions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProcessorActions")
            .field("on_root", &self.on_root.is_some())
            .field("on_branch", &self.on_branch.is_some())
            .field("on_leaf", &self.on_leaf.is_some())
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessorItem {
    pub path: KeyPath,
    pub label: String,
}

#[derive(Debug)]
pub struct SelectionProcessor {
    kind: TaxonomyKind,
    items: Vec<ProcessorItem>,
    actions: ProcessorActions,
}

impl SelectionProcessor {
    /// Items from a flat projection; labels come from `taxonomy` when the
    /// node is known there, else the raw key is shown.
    pub fn new(kind: TaxonomyKind, flat: &KeyFlat, taxonomy: Option<&Taxonomy>) -> Self {
        let paths = flat
            .roots
            .iter()
            .map(|r| KeyPath::Root(r.clone()))
            .chain(
                flat.branches
                    .iter()
                    .map(|(r, b)| KeyPath::Branch(r.clone(), b.clone())),
            )
            .chain(
                flat.leaves
                    .iter()
                    .map(|(r, b, l)| KeyPath::Leaf(r.clone(), b.clone(), l.clone())),
            );
        let items = paths
            .map(|path| {
                let label = taxonomy
                    .and_then(|t| t.label_of(&path))
                    .map(str::to_string)
                    .unwrap_or_else(|| last_segment(&path).to_string());
                ProcessorItem { path, label }
            })
            .collect();
        Self {
            kind,
            items,
            actions: ProcessorActions::default(),
        }
    }

    /// Processor over the selection of the nearest mounted picker of `kind`.
    pub fn from_scope(
        scope: &Scope,
        kind: TaxonomyKind,
        taxonomy: Option<&Taxonomy>,
    ) -> DomainResult<Self> {
        let handle = use_picker(scope, kind)?;
        Ok(Self::new(kind, &handle.selected_flat(), taxonomy))
    }

    pub fn with_actions(mut self, actions: ProcessorActions) -> Self {
        self.actions = actions;
        self
    }

    pub fn items(&self) -> &[ProcessorItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Run the parent's action for the item at `index`.
    ///
    /// Returns false when the index is out of range or no action was supplied
    /// for that item's level.
    pub fn activate(&self, index: usize) -> bool {
        let Some(item) = self.items.get(index) else {
            return false;
        };
        match self.actions.for_level(item.path.level()) {
            Some(action) => {
                action(item);
                true
            }
            None => false,
        }
    }

    /// `"<level name>: <label>"` for each item.
    pub fn lines(&self) -> Vec<String> {
        self.items
            .iter()
            .map(|item| {
                format!(
                    "{}: {}",
                    self.kind.level_name(item.path.level()),
                    item.label
                )
            })
            .collect()
    }
}

fn last_segment(path: &KeyPath) -> &str {
    match path {
        KeyPath::Root(r) => r,
        KeyPath::Branch(_, b) => b,
        KeyPath::Leaf(_, _, l) => l,
    }
}
