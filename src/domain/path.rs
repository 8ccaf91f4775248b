//! Node addressing inside a three-level tree.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::error::{DomainError, DomainResult};

/// Depth of a node: root (domain/country), branch (category/state) or leaf (skill/LGA).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Root,
    Branch,
    Leaf,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Level::Root => "root",
            Level::Branch => "branch",
            Level::Leaf => "leaf",
        };
        f.write_str(name)
    }
}

/// Full address of a node, carrying every ancestor key.
///
/// Generic over the key type of each level so the same model serves
/// domain/category/skill and country/state/LGA.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NodePath<R, B, L> {
    Root(R),
    Branch(R, B),
    Leaf(R, B, L),
}

impl<R, B, L> NodePath<R, B, L> {
    pub fn level(&self) -> Level {
        match self {
            NodePath::Root(_) => Level::Root,
            NodePath::Branch(..) => Level::Branch,
            NodePath::Leaf(..) => Level::Leaf,
        }
    }

    pub fn root(&self) -> &R {
        match self {
            NodePath::Root(r) | NodePath::Branch(r, _) | NodePath::Leaf(r, _, _) => r,
        }
    }

    /// Build a path from the loose `(level, l1, l2?, l3?)` call shape.
    ///
    /// Extra parts beyond the requested level are ignored. A missing part
    /// required by the level is an error: unlike every other input to the
    /// selection model, an incomplete call is rejected with
    /// [`DomainError::IncompletePath`] rather than accepted permissively.
    pub fn from_parts(level: Level, l1: R, l2: Option<B>, l3: Option<L>) -> DomainResult<Self> {
        match (level, l2, l3) {
            (Level::Root, _, _) => Ok(NodePath::Root(l1)),
            (Level::Branch, Some(b), _) => Ok(NodePath::Branch(l1, b)),
            (Level::Leaf, Some(b), Some(l)) => Ok(NodePath::Leaf(l1, b, l)),
            (level, _, _) => Err(DomainError::IncompletePath { level }),
        }
    }
}

impl NodePath<String, String, String> {
    /// Build a path from one to three string segments.
    pub fn from_segments<S: AsRef<str>>(segments: &[S]) -> DomainResult<Self> {
        match segments {
            [r] => Ok(NodePath::Root(r.as_ref().to_string())),
            [r, b] => Ok(NodePath::Branch(
                r.as_ref().to_string(),
                b.as_ref().to_string(),
            )),
            [r, b, l] => Ok(NodePath::Leaf(
                r.as_ref().to_string(),
                b.as_ref().to_string(),
                l.as_ref().to_string(),
            )),
            _ => Err(DomainError::InvalidKey {
                key: segments
                    .iter()
                    .map(|s| s.as_ref())
                    .collect::<Vec<_>>()
                    .join(" "),
                reason: format!("expected 1 to 3 path segments, got {}", segments.len()),
            }),
        }
    }
}

impl<R: fmt::Display, B: fmt::Display, L: fmt::Display> fmt::Display for NodePath<R, B, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodePath::Root(r) => write!(f, "{r}"),
            NodePath::Branch(r, b) => write!(f, "{r} > {b}"),
            NodePath::Leaf(r, b, l) => write!(f, "{r} > {b} > {l}"),
        }
    }
}

/// Path with string keys at every level, as used by both built-in pickers.
pub type KeyPath = NodePath<String, String, String>;
