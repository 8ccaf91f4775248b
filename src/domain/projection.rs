//! Flattening a [`SelectionState`] into what forms consume.
//!
//! Projections are recomputed on every call.

use serde::{Deserialize, Serialize};

use crate::domain::selection::SelectionState;

/// One selected level-1 node with its checked branches and true leaves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedGroup<R, B, L> {
    pub root: R,
    pub branches: Vec<B>,
    pub leaves: Vec<L>,
}

/// Three parallel flat lists: roots, `(root, branch)` pairs and
/// `(root, branch, leaf)` triples.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlatSelection<R, B, L> {
    pub roots: Vec<R>,
    pub branches: Vec<(R, B)>,
    pub leaves: Vec<(R, B, L)>,
}

impl<R, B, L> Default for FlatSelection<R, B, L> {
    fn default() -> Self {
        Self {
            roots: Vec::new(),
            branches: Vec::new(),
            leaves: Vec::new(),
        }
    }
}

impl<R, B, L> SelectionState<R, B, L>
where
    R: Ord + Clone,
    B: Ord + Clone,
    L: Ord + Clone,
{
    /// Nested projection.
    ///
    /// A root is skipped only when it is unchecked and has no branch
    /// entries at all. Branches are those with `checked == true`. Leaves are
    /// collected from every branch entry, checked or not.
    pub fn selected(&self) -> Vec<SelectedGroup<R, B, L>> {
        self.roots()
            .filter(|(_, entry)| entry.checked || !entry.branches.is_empty())
            .map(|(root, entry)| SelectedGroup {
                root: root.clone(),
                branches: entry
                    .branches
                    .iter()
                    .filter(|(_, b)| b.checked)
                    .map(|(k, _)| k.clone())
                    .collect(),
                leaves: entry
                    .branches
                    .values()
                    .flat_map(|b| b.leaves.iter())
                    .filter(|(_, on)| **on)
                    .map(|(k, _)| k.clone())
                    .collect(),
            })
            .collect()
    }

    /// Flat projection with the same inclusion rules as [`Self::selected`],
    /// keeping each item's ancestors.
    pub fn selected_flat(&self) -> FlatSelection<R, B, L> {
        let mut flat = FlatSelection::default();
        for (root, entry) in self.roots() {
            if !entry.checked && entry.branches.is_empty() {
                continue;
            }
            flat.roots.push(root.clone());
            for (branch, b) in &entry.branches {
                if b.checked {
                    flat.branches.push((root.clone(), branch.clone()));
                }
                for (leaf, on) in &b.leaves {
                    if *on {
                        flat.leaves
                            .push((root.clone(), branch.clone(), leaf.clone()));
                    }
                }
            }
        }
        flat
    }
}

/// Projection group with string keys.
pub type KeyGroup = SelectedGroup<String, String, String>;

/// Flat projection with string keys.
pub type KeyFlat = FlatSelection<String, String, String>;
