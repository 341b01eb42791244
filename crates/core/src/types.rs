//! Runtime type identity for conversion
//!
//! This module defines:
//! - TypeKey: stable identifier for a Rust type, used to key the converter registry
//! - DynValue: owned value whose concrete type is only known at runtime
//! - Object: the universal base type every other type implicitly descends from
//!
//! ## Why TypeKey carries a name
//!
//! `TypeId` alone is opaque. Diagnostics (`NoConverterFound`, conversion
//! errors) and the universal fallback converter need a readable type name, so
//! the name captured by `std::any::type_name` travels with the id. Equality
//! and hashing use the id only.
//!
//! A `TypeId` found inside a `DynValue` cannot be turned back into a name,
//! so every key built through [`dyn_value`] or [`TypeKey::remember`] is kept
//! in a process-wide table that [`TypeKey::lookup`] reads.

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Owned value of a type known only at runtime
///
/// Heterogeneous list elements, fixture arguments and the results of untyped
/// deserialization are carried as `DynValue`. Dispatch looks through the box
/// to the value inside it.
pub type DynValue = Box<dyn Any + Send + Sync>;

/// The universal base type
///
/// Every type implicitly has `Object` as its last ancestor. The converter
/// registered for `Object` serializes values nothing else claims.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Object;

/// Names of every type seen by `TypeKey::remember`
static TYPE_NAMES: Lazy<RwLock<HashMap<TypeId, TypeKey>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

/// Stable identity of a Rust type
#[derive(Clone, Copy)]
pub struct TypeKey {
    id: TypeId,
    name: &'static str,
}

impl TypeKey {
    /// Key for type `T`
    pub fn of<T: Any + ?Sized>() -> Self {
        TypeKey {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// Key for the universal base type
    pub fn object() -> Self {
        Self::of::<Object>()
    }

    /// Underlying `TypeId`
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Fully qualified type name
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Type name without module path, e.g. `Employee` for `my_fixture::Employee`
    ///
    /// Generic arguments keep their own short names: `Vec<alloc::string::String>`
    /// becomes `Vec<String>`.
    pub fn short_name(&self) -> String {
        short_type_name(self.name)
    }

    /// Whether this is the universal base type
    pub fn is_object(&self) -> bool {
        self.id == TypeId::of::<Object>()
    }

    /// Record this key so [`TypeKey::lookup`] can find it by id
    pub fn remember(self) -> Self {
        if !TYPE_NAMES.read().contains_key(&self.id) {
            TYPE_NAMES.write().insert(self.id, self);
        }
        self
    }

    /// Key for a type id recorded earlier, if any
    pub fn lookup(id: TypeId) -> Option<TypeKey> {
        TYPE_NAMES.read().get(&id).copied()
    }
}

impl PartialEq for TypeKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeKey {}

impl Hash for TypeKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TypeKey").field(&self.name).finish()
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.short_name())
    }
}

/// Strip module paths from every path segment of a type name
fn short_type_name(full: &str) -> String {
    let mut out = String::with_capacity(full.len());
    let mut segment = String::new();
    for c in full.chars() {
        if c.is_alphanumeric() || c == '_' || c == ':' {
            segment.push(c);
        } else {
            out.push_str(segment.rsplit("::").next().unwrap_or(&segment));
            segment.clear();
            out.push(c);
        }
    }
    out.push_str(segment.rsplit("::").next().unwrap_or(&segment));
    out
}

/// Box a value as a `DynValue`, recording its type name
pub fn dyn_value<T: Any + Send + Sync>(value: T) -> DynValue {
    TypeKey::of::<T>().remember();
    Box::new(value)
}
