use std::collections::HashMap;
use std::fmt;

use generational_arena::{Arena, Index};
use termtree::Tree;
use tracing::instrument;

use crate::domain::path::{KeyPath, Level};
use crate::domain::taxonomy::{Taxonomy, TaxonomyKind};

/// Data payload for arena nodes.
#[derive(Debug, Clone)]
pub struct NodeData {
    /// Display label
    pub label: String,
    /// Full address, None for the synthetic catalog root
    pub path: Option<KeyPath>,
}

impl NodeData {
    pub fn level(&self) -> Option<Level> {
        self.path.as_ref().map(|p| p.level())
    }
}

impl fmt::Display for NodeData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label)
    }
}

/// Tree node in the arena-based hierarchy structure.
#[derive(Debug)]
pub struct TreeNode {
    pub data: NodeData,
    /// Index of parent node in the arena, None for the catalog root
    pub parent: Option<Index>,
    /// Indices of child nodes in taxonomy order
    pub children: Vec<Index>,
}

/// Arena index over a static taxonomy.
///
/// A synthetic catalog root sits above the level-1 nodes so the whole
/// taxonomy is a single tree. Every real node is reachable by its
/// [`KeyPath`] in O(1).
#[derive(Debug)]
pub struct TaxonomyArena {
    kind: TaxonomyKind,
    arena: Arena<TreeNode>,
    root: Option<Index>,
    index: HashMap<KeyPath, Index>,
}

impl TaxonomyArena {
    pub fn new(kind: TaxonomyKind) -> Self {
        Self {
            kind,
            arena: Arena::new(),
            root: None,
            index: HashMap::new(),
        }
    }

    #[instrument(level = "debug", skip(taxonomy), fields(kind = %taxonomy.kind))]
    pub fn from_taxonomy(taxonomy: &Taxonomy) -> Self {
        let mut tree = Self::new(taxonomy.kind);
        let catalog = tree.insert_node(
            NodeData {
                label: taxonomy.kind.to_string(),
                path: None,
            },
            None,
        );
        for root in &taxonomy.roots {
            let root_idx = tree.insert_node(
                NodeData {
                    label: root.label.clone(),
                    path: Some(KeyPath::Root(root.id.clone())),
                },
                Some(catalog),
            );
            for branch in &root.branches {
                let branch_idx = tree.insert_node(
                    NodeData {
                        label: branch.label.clone(),
                        path: Some(KeyPath::Branch(root.id.clone(), branch.id.clone())),
                    },
                    Some(root_idx),
                );
                for leaf in &branch.leaves {
                    tree.insert_node(
                        NodeData {
                            label: leaf.label.clone(),
                            path: Some(KeyPath::Leaf(
                                root.id.clone(),
                                branch.id.clone(),
                                leaf.id.clone(),
                            )),
                        },
                        Some(branch_idx),
                    );
                }
            }
        }
        tree
    }

    pub fn kind(&self) -> TaxonomyKind {
        self.kind
    }

    #[instrument(level = "trace", skip(self, data))]
    pub fn insert_node(&mut self, data: NodeData, parent: Option<Index>) -> Index {
        let path = data.path.clone();
        let node = TreeNode {
            data,
            parent,
            children: Vec::new(),
        };
        let node_idx = self.arena.insert(node);

        if let Some(parent_idx) = parent {
            if let Some(parent) = self.arena.get_mut(parent_idx) {
                parent.children.push(node_idx);
            }
        } else {
            self.root = Some(node_idx);
        }
        if let Some(path) = path {
            self.index.insert(path, node_idx);
        }

        node_idx
    }

    pub fn get_node(&self, idx: Index) -> Option<&TreeNode> {
        self.arena.get(idx)
    }

    pub fn root(&self) -> Option<Index> {
        self.root
    }

    pub fn find(&self, path: &KeyPath) -> Option<Index> {
        self.index.get(path).copied()
    }

    pub fn contains(&self, path: &KeyPath) -> bool {
        self.index.contains_key(path)
    }

    /// Level-1 node indices in taxonomy order.
    pub fn top_level(&self) -> Vec<Index> {
        self.root
            .and_then(|r| self.get_node(r))
            .map(|n| n.children.clone())
            .unwrap_or_default()
    }

    pub fn iter(&self) -> TreeIterator<'_> {
        TreeIterator::new(self)
    }

    pub fn iter_postorder(&self) -> PostOrderIterator<'_> {
        PostOrderIterator::new(self)
    }

    /// Paths of all real nodes in pre-order.
    pub fn node_paths(&self) -> Vec<KeyPath> {
        self.iter()
            .filter_map(|(_, node)| node.data.path.clone())
            .collect()
    }

    /// Render as a `termtree` tree.
    ///
    /// `label` formats each node; children are only rendered when
    /// `descend` returns true for their parent.
    pub fn render<F, D>(&self, label: F, descend: D) -> Tree<String>
    where
        F: Fn(&NodeData) -> String,
        D: Fn(&NodeData) -> bool,
    {
        fn build<F, D>(
            arena: &TaxonomyArena,
            node_idx: Index,
            parent_tree: &mut Tree<String>,
            label: &F,
            descend: &D,
        ) where
            F: Fn(&NodeData) -> String,
            D: Fn(&NodeData) -> bool,
        {
            if let Some(node) = arena.get_node(node_idx) {
                if !descend(&node.data) {
                    return;
                }
                for &child_idx in &node.children {
                    if let Some(child) = arena.get_node(child_idx) {
                        let mut child_tree = Tree::new(label(&child.data));
                        build(arena, child_idx, &mut child_tree, label, descend);
                        parent_tree.push(child_tree);
                    }
                }
            }
        }

        match self.root.and_then(|r| self.get_node(r).map(|n| (r, n))) {
            Some((root_idx, root)) => {
                let mut tree = Tree::new(root.data.label.clone());
                build(self, root_idx, &mut tree, &label, &descend);
                tree
            }
            None => Tree::new("Empty taxonomy".to_string()),
        }
    }
}

pub struct TreeIterator<'a> {
    arena: &'a TaxonomyArena,
    stack: Vec<Index>,
}

impl<'a> TreeIterator<'a> {
    fn new(arena: &'a TaxonomyArena) -> Self {
        let mut stack = Vec::new();
        if let Some(root) = arena.root() {
            stack.push(root);
        }
        Self { arena, stack }
    }
}

impl<'a> Iterator for TreeIterator<'a> {
    type Item = (Index, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(current_idx) = self.stack.pop() {
            if let Some(node) = self.arena.get_node(current_idx) {
                // Push children in reverse order for left-to-right traversal
                for &child in node.children.iter().rev() {
                    self.stack.push(child);
                }
                return Some((current_idx, node));
            }
        }
        None
    }
}

pub struct PostOrderIterator<'a> {
    arena: &'a TaxonomyArena,
    stack: Vec<(Index, bool)>,
}

impl<'a> PostOrderIterator<'a> {
    fn new(arena: &'a TaxonomyArena) -> Self {
        let mut stack = Vec::new();
        if let Some(root) = arena.root() {
            stack.push((root, false));
        }
        Self { arena, stack }
    }
}

impl<'a> Iterator for PostOrderIterator<'a> {
    type Item = (Index, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current_idx, visited)) = self.stack.pop() {
            if let Some(node) = self.arena.get_node(current_idx) {
                if !visited {
                    self.stack.push((current_idx, true));
                    for &child in node.children.iter().rev() {
                        self.stack.push((child, false));
                    }
                } else {
                    return Some((current_idx, node));
                }
            }
        }
        None
    }
}
