//! Provider-scoped context.
//!
//! A [`Scope`] is an immutable chain of provided values passed down the
//! ownership tree. Providing a value yields a child scope; the parent is
//! unaffected. Lookups walk from the innermost provider outward, so an inner
//! provider of the same type shadows an outer one. Dropping the child scope
//! (and every clone of it) ends the provided value's lifetime.

use std::any::{type_name, Any};
use std::fmt;
use std::rc::Rc;

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::store::SelectionHandle;

struct Frame {
    value: Rc<dyn Any>,
    type_name: &'static str,
    parent: Option<Rc<Frame>>,
}

#[derive(Clone, Default)]
pub struct Scope {
    head: Option<Rc<Frame>>,
}

impl Scope {
    /// Scope with nothing provided.
    pub fn root() -> Self {
        Self::default()
    }

    /// Child scope that additionally provides `value`.
    pub fn provide<T: 'static>(&self, value: T) -> Scope {
        Scope {
            head: Some(Rc::new(Frame {
                value: Rc::new(value),
                type_name: type_name::<T>(),
                parent: self.head.clone(),
            })),
        }
    }

    /// Innermost provided value of type `T`, if any.
    pub fn try_use<T: 'static>(&self) -> Option<Rc<T>> {
        let mut current = self.head.as_ref();
        while let Some(frame) = current {
            if let Ok(value) = Rc::clone(&frame.value).downcast::<T>() {
                return Some(value);
            }
            current = frame.parent.as_ref();
        }
        None
    }

    /// Innermost provided value of type `T`, or a configuration error.
    pub fn use_context<T: 'static>(&self) -> DomainResult<Rc<T>> {
        self.try_use::<T>()
            .ok_or_else(|| DomainError::ProviderMissing {
                context: format!("use_context::<{}>", short_type_name::<T>()),
            })
    }

    /// Number of providers between this scope and the root.
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut current = self.head.as_ref();
        while let Some(frame) = current {
            depth += 1;
            current = frame.parent.as_ref();
        }
        depth
    }
}

impl fmt::Debug for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names = Vec::new();
        let mut current = self.head.as_ref();
        while let Some(frame) = current {
            names.push(frame.type_name);
            current = frame.parent.as_ref();
        }
        f.debug_struct("Scope").field("provided", &names).finish()
    }
}

fn short_type_name<T>() -> &'static str {
    let full = type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

/// Current selection handle from the nearest selection provider.
///
/// Fails when no provider of this handle type is in scope.
pub fn use_selected<R, B, L>(scope: &Scope) -> DomainResult<SelectionHandle<R, B, L>>
where
    R: 'static,
    B: 'static,
    L: 'static,
{
    scope
        .try_use::<SelectionHandle<R, B, L>>()
        .map(|handle| (*handle).clone())
        .ok_or_else(|| DomainError::ProviderMissing {
            context: "use_selected".to_string(),
        })
}
