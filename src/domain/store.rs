//! Owner of the current selection value.
//!
//! Each toggle swaps in a new `Rc<SelectionState>`, so consumers can detect
//! change by pointer identity or by the revision counter.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::trace;

use crate::domain::error::DomainResult;
use crate::domain::path::{Level, NodePath};
use crate::domain::projection::{FlatSelection, SelectedGroup};
use crate::domain::selection::SelectionState;

#[derive(Debug)]
pub struct SelectionStore<R, B, L> {
    current: Rc<SelectionState<R, B, L>>,
    revision: u64,
}

impl<R, B, L> Default for SelectionStore<R, B, L> {
    fn default() -> Self {
        Self {
            current: Rc::new(SelectionState::default()),
            revision: 0,
        }
    }
}

impl<R, B, L> SelectionStore<R, B, L>
where
    R: Ord + Clone,
    B: Ord + Clone,
    L: Ord + Clone,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_state(state: SelectionState<R, B, L>) -> Self {
        Self {
            current: Rc::new(state),
            revision: 0,
        }
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> Rc<SelectionState<R, B, L>> {
        Rc::clone(&self.current)
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn toggle(&mut self, path: &NodePath<R, B, L>) -> Rc<SelectionState<R, B, L>> {
        let next = self.current.toggled(path);
        self.replace(next)
    }

    pub fn set_checked(
        &mut self,
        level: Level,
        l1: R,
        l2: Option<B>,
        l3: Option<L>,
    ) -> DomainResult<Rc<SelectionState<R, B, L>>> {
        let path = NodePath::from_parts(level, l1, l2, l3)?;
        Ok(self.toggle(&path))
    }

    /// Swap in `state` as the new current value.
    pub fn replace(&mut self, state: SelectionState<R, B, L>) -> Rc<SelectionState<R, B, L>> {
        self.current = Rc::new(state);
        self.revision += 1;
        trace!(revision = self.revision, "selection replaced");
        Rc::clone(&self.current)
    }

    pub fn reset(&mut self) -> Rc<SelectionState<R, B, L>> {
        self.replace(SelectionState::default())
    }
}

/// Shared, single-threaded handle onto a [`SelectionStore`].
///
/// This is what providers hand out to components outside the tree.
#[derive(Debug)]
pub struct SelectionHandle<R, B, L> {
    store: Rc<RefCell<SelectionStore<R, B, L>>>,
}

impl<R, B, L> Clone for SelectionHandle<R, B, L> {
    fn clone(&self) -> Self {
        Self {
            store: Rc::clone(&self.store),
        }
    }
}

impl<R, B, L> Default for SelectionHandle<R, B, L> {
    fn default() -> Self {
        Self {
            store: Rc::new(RefCell::new(SelectionStore::default())),
        }
    }
}

impl<R, B, L> SelectionHandle<R, B, L>
where
    R: Ord + Clone,
    B: Ord + Clone,
    L: Ord + Clone,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_state(state: SelectionState<R, B, L>) -> Self {
        Self {
            store: Rc::new(RefCell::new(SelectionStore::from_state(state))),
        }
    }

    pub fn state(&self) -> Rc<SelectionState<R, B, L>> {
        self.store.borrow().state()
    }

    pub fn revision(&self) -> u64 {
        self.store.borrow().revision()
    }

    pub fn toggle(&self, path: &NodePath<R, B, L>) -> Rc<SelectionState<R, B, L>> {
        self.store.borrow_mut().toggle(path)
    }

    pub fn set_checked(
        &self,
        level: Level,
        l1: R,
        l2: Option<B>,
        l3: Option<L>,
    ) -> DomainResult<Rc<SelectionState<R, B, L>>> {
        self.store.borrow_mut().set_checked(level, l1, l2, l3)
    }

    pub fn replace(&self, state: SelectionState<R, B, L>) -> Rc<SelectionState<R, B, L>> {
        self.store.borrow_mut().replace(state)
    }

    pub fn reset(&self) -> Rc<SelectionState<R, B, L>> {
        self.store.borrow_mut().reset()
    }

    /// Nested projection of the current state.
    pub fn selected(&self) -> Vec<SelectedGroup<R, B, L>> {
        self.state().selected()
    }

    /// Flat projection of the current state.
    pub fn selected_flat(&self) -> FlatSelection<R, B, L> {
        self.state().selected_flat()
    }

    /// True when both handles share one store.
    pub fn same_store(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.store, &other.store)
    }
}

pub type KeyHandle = SelectionHandle<String, String, String>;
