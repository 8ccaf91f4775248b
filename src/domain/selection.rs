//! Three-level checkbox state.
//!
//! The toggle rules are asymmetric:
//! - checking below a node forces every ancestor to `checked = true`
//! - nothing ever propagates downward
//! - ancestors are never unchecked as a side effect
//! - toggling a root or branch directly discards that node's recorded children
//!
//! Every toggle returns a fresh [`SelectionState`]; the previous value is
//! left untouched.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::error::DomainResult;
use crate::domain::path::{Level, NodePath};

/// Level-2 entry: its own flag plus leaf flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound(serialize = "L: Serialize", deserialize = "L: Deserialize<'de> + Ord"))]
pub struct BranchSelection<L> {
    pub checked: bool,
    #[serde(default)]
    pub leaves: BTreeMap<L, bool>,
}

impl<L> Default for BranchSelection<L> {
    fn default() -> Self {
        Self {
            checked: false,
            leaves: BTreeMap::new(),
        }
    }
}

/// Level-1 entry: its own flag plus branch entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound(
    serialize = "B: Serialize, L: Serialize",
    deserialize = "B: Deserialize<'de> + Ord, L: Deserialize<'de> + Ord"
))]
pub struct RootSelection<B, L> {
    pub checked: bool,
    #[serde(default)]
    pub branches: BTreeMap<B, BranchSelection<L>>,
}

impl<B, L> Default for RootSelection<B, L> {
    fn default() -> Self {
        Self {
            checked: false,
            branches: BTreeMap::new(),
        }
    }
}

/// Selection tree keyed by level-1 id. A root appears only after some
/// interaction at or below it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
#[serde(bound(
    serialize = "R: Serialize, B: Serialize, L: Serialize",
    deserialize = "R: Deserialize<'de> + Ord, B: Deserialize<'de> + Ord, L: Deserialize<'de> + Ord"
))]
pub struct SelectionState<R, B, L> {
    roots: BTreeMap<R, RootSelection<B, L>>,
}

impl<R, B, L> Default for SelectionState<R, B, L> {
    fn default() -> Self {
        Self {
            roots: BTreeMap::new(),
        }
    }
}

impl<R, B, L> SelectionState<R, B, L>
where
    R: Ord + Clone,
    B: Ord + Clone,
    L: Ord + Clone,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// New state with the node at `path` toggled.
    pub fn toggled(&self, path: &NodePath<R, B, L>) -> Self {
        let mut next = self.clone();
        next.apply(path);
        next
    }

    /// Toggle using the loose `(level, l1, l2?, l3?)` call shape.
    ///
    /// Fails with `IncompletePath` when a part required by `level` is
    /// missing; see [`NodePath::from_parts`].
    pub fn set_checked(
        &self,
        level: Level,
        l1: R,
        l2: Option<B>,
        l3: Option<L>,
    ) -> DomainResult<Self> {
        let path = NodePath::from_parts(level, l1, l2, l3)?;
        Ok(self.toggled(&path))
    }

    fn apply(&mut self, path: &NodePath<R, B, L>) {
        match path {
            NodePath::Root(r) => {
                let previous = self.roots.get(r).map(|e| e.checked).unwrap_or(false);
                self.roots.insert(
                    r.clone(),
                    RootSelection {
                        checked: !previous,
                        branches: BTreeMap::new(),
                    },
                );
            }
            NodePath::Branch(r, b) => {
                let root = self.roots.entry(r.clone()).or_default();
                root.checked = true;
                let previous = root.branches.get(b).map(|e| e.checked).unwrap_or(false);
                root.branches.insert(
                    b.clone(),
                    BranchSelection {
                        checked: !previous,
                        leaves: BTreeMap::new(),
                    },
                );
            }
            NodePath::Leaf(r, b, l) => {
                let root = self.roots.entry(r.clone()).or_default();
                root.checked = true;
                let branch = root.branches.entry(b.clone()).or_default();
                branch.checked = true;
                let previous = branch.leaves.get(l).copied().unwrap_or(false);
                branch.leaves.insert(l.clone(), !previous);
            }
        }
    }

    pub fn root(&self, r: &R) -> Option<&RootSelection<B, L>> {
        self.roots.get(r)
    }

    pub fn branch(&self, r: &R, b: &B) -> Option<&BranchSelection<L>> {
        self.roots.get(r).and_then(|e| e.branches.get(b))
    }

    pub fn leaf(&self, r: &R, b: &B, l: &L) -> Option<bool> {
        self.branch(r, b).and_then(|e| e.leaves.get(l).copied())
    }

    /// Recorded flag for the node at `path`, None when never touched.
    pub fn lookup(&self, path: &NodePath<R, B, L>) -> Option<bool> {
        match path {
            NodePath::Root(r) => self.root(r).map(|e| e.checked),
            NodePath::Branch(r, b) => self.branch(r, b).map(|e| e.checked),
            NodePath::Leaf(r, b, l) => self.leaf(r, b, l),
        }
    }

    pub fn is_checked(&self, path: &NodePath<R, B, L>) -> bool {
        self.lookup(path).unwrap_or(false)
    }

    pub fn roots(&self) -> impl Iterator<Item = (&R, &RootSelection<B, L>)> {
        self.roots.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Insert a raw root entry, bypassing the toggle rules.
    ///
    /// Only needed to rebuild states from storage or to construct
    /// combinations the toggles cannot reach.
    pub fn insert_root(&mut self, r: R, entry: RootSelection<B, L>) {
        self.roots.insert(r, entry);
    }
}

/// Selection state with string keys at every level.
pub type KeySelection = SelectionState<String, String, String>;
