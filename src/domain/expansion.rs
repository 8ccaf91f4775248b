//! Disclosure (expand/collapse) state, independent of selection.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Composite key for a level-1 node: its bare id.
pub fn root_key(root: &str) -> String {
    root.to_string()
}

/// Composite key for a level-2 node: `"<level1>-<level2>"`.
pub fn branch_key(root: &str, branch: &str) -> String {
    format!("{root}-{branch}")
}

/// Mapping from composite node key to expanded flag.
///
/// A missing key means collapsed. Keys are not checked against any
/// taxonomy; unknown keys simply become dead entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExpansionState {
    entries: BTreeMap<String, bool>,
}

impl ExpansionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip the flag at `key`; the first call on a missing key expands it.
    pub fn toggle_expand(&mut self, key: &str) {
        let current = self.entries.get(key).copied().unwrap_or(false);
        self.entries.insert(key.to_string(), !current);
    }

    pub fn is_expanded(&self, key: &str) -> bool {
        self.entries.get(key).copied().unwrap_or(false)
    }

    /// Raw entry, None when the key was never toggled.
    pub fn get(&self, key: &str) -> Option<bool> {
        self.entries.get(key).copied()
    }

    pub fn set(&mut self, key: &str, expanded: bool) {
        self.entries.insert(key.to_string(), expanded);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), *v))
    }
}
