//! Declared type hierarchy
//!
//! Rust has no implicit inheritance, so "subclass of a registered type" is
//! made explicit: a fixture author declares that `Sub` has parent `Parent`
//! and supplies an upcast `fn(&Sub) -> &Parent`. Resolution then walks these
//! edges, and dispatch applies the upcasts along the way so an ancestor's
//! converter always receives a value of the ancestor's type.
//!
//! ```ignore
//! struct Employee { .. }
//! struct Manager { employee: Employee, reports: Vec<Employee> }
//!
//! registry.declare_subtype::<Manager, Employee>(|m| &m.employee);
//! ```
//!
//! A type may have several parents; they are walked depth first in
//! declaration order. `Object` is the implicit last ancestor of every type
//! and is never stored as an edge.

use std::any::{Any, TypeId};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use waferslim_core::TypeKey;

/// Type-erased upcast from a subtype value to its parent
pub trait Upcast: Send + Sync {
    /// View `value` as the parent type, or `None` if it is not the subtype
    fn upcast<'a>(&self, value: &'a dyn Any) -> Option<&'a dyn Any>;
}

/// Upcast backed by a plain function pointer
struct FnUpcast<S, P> {
    cast: fn(&S) -> &P,
}

impl<S: Any, P: Any> Upcast for FnUpcast<S, P> {
    fn upcast<'a>(&self, value: &'a dyn Any) -> Option<&'a dyn Any> {
        value.downcast_ref::<S>().map(|s| (self.cast)(s) as &dyn Any)
    }
}

/// One declared parent of a type
#[derive(Clone)]
pub(crate) struct ParentEdge {
    pub(crate) parent: TypeKey,
    pub(crate) upcast: Arc<dyn Upcast>,
}

/// Parent edges keyed by child type
#[derive(Default)]
pub(crate) struct TypeHierarchy {
    parents: HashMap<TypeId, Vec<ParentEdge>>,
}

impl TypeHierarchy {
    /// Declare `S` a subtype of `P`
    ///
    /// Re-declaring an existing edge replaces its upcast in place, keeping
    /// the existing walk order. Returns `false` for a self edge, which is
    /// ignored.
    pub(crate) fn declare<S: Any, P: Any>(&mut self, cast: fn(&S) -> &P) -> bool {
        let child = TypeKey::of::<S>();
        let parent = TypeKey::of::<P>();
        if child == parent {
            return false;
        }
        let edge = ParentEdge {
            parent,
            upcast: Arc::new(FnUpcast { cast }),
        };
        let edges = self.parents.entry(child.id()).or_default();
        match edges.iter_mut().find(|e| e.parent == parent) {
            Some(existing) => *existing = edge,
            None => edges.push(edge),
        }
        true
    }

    /// Declared parents of a type, in declaration order
    pub(crate) fn parents_of(&self, child: TypeId) -> &[ParentEdge] {
        self.parents.get(&child).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Depth-first search for the nearest ancestor satisfying `is_target`
    ///
    /// Each parent is tested before its own ancestors. Returns the ancestor
    /// and the upcasts leading to it from `start`. Cycles in the declared
    /// edges are tolerated.
    pub(crate) fn find_ancestor(
        &self,
        start: TypeId,
        is_target: impl Fn(TypeId) -> bool,
    ) -> Option<(TypeKey, Vec<Arc<dyn Upcast>>)> {
        let mut path = Vec::new();
        let mut seen = HashSet::new();
        seen.insert(start);
        self.walk(start, &is_target, &mut path, &mut seen)
            .map(|found| (found, path))
    }

    fn walk(
        &self,
        current: TypeId,
        is_target: &impl Fn(TypeId) -> bool,
        path: &mut Vec<Arc<dyn Upcast>>,
        seen: &mut HashSet<TypeId>,
    ) -> Option<TypeKey> {
        for edge in self.parents_of(current) {
            if !seen.insert(edge.parent.id()) {
                continue;
            }
            path.push(Arc::clone(&edge.upcast));
            if is_target(edge.parent.id()) {
                return Some(edge.parent);
            }
            if let Some(found) = self.walk(edge.parent.id(), is_target, path, seen) {
                return Some(found);
            }
            path.pop();
        }
        None
    }
}
