//! Domain layer: the three-level selection model
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod context;
pub mod error;
pub mod expansion;
pub mod path;
pub mod projection;
pub mod selection;
pub mod store;
pub mod taxonomy;

pub use arena::{NodeData, TaxonomyArena, TreeNode};
pub use context::{use_selected, Scope};
pub use error::{DomainError, DomainResult};
pub use expansion::{branch_key, root_key, ExpansionState};
pub use path::{KeyPath, Level, NodePath};
pub use projection::{FlatSelection, KeyFlat, KeyGroup, SelectedGroup};
pub use selection::{BranchSelection, KeySelection, RootSelection, SelectionState};
pub use store::{KeyHandle, SelectionHandle, SelectionStore};
pub use taxonomy::{BranchNode, LeafNode, RootNode, Taxonomy, TaxonomyKind};
