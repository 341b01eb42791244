//! Converter Registry
//!
//! Maps value types to the converters that serialize and parse them.
//!
//! ## Lifecycle
//!
//! A registry is created with the built-in converters already inserted and
//! lives as long as any handle to it. `ConverterRegistry` is a cheap `Clone`
//! handle; all clones share one map. The process-wide instance returned by
//! [`ConverterRegistry::global`] is created on first use and never torn down.
//! Tests build isolated registries with [`ConverterRegistry::new`] so they do
//! not interfere with each other.
//!
//! ## Resolution
//!
//! 1. Exact match on the requested type.
//! 2. Declared ancestors, depth first, nearest first (see [`crate::hierarchy`]).
//! 3. The universal base [`Object`].
//!
//! `NoConverterFound` is only possible once `Object` has been unregistered.
//!
//! ## Thread Safety
//!
//! State sits behind a `parking_lot::RwLock`. Lookups share the read lock;
//! registration takes the write lock, so a registration is visible to every
//! lookup that starts after it returns. The lock is released before any
//! converter runs, which lets converters re-enter the registry and makes
//! registration during active dispatch safe. A composite conversion already
//! in progress may see converters from before and after such a registration.

use crate::builtin;
use crate::composite::{ListConverter, MapConverter, PairConverter};
use crate::converter::{Converter, Typed, TypedConverter};
use crate::hierarchy::{TypeHierarchy, Upcast};
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, trace, warn};
use waferslim_core::{ConversionConfig, Error, Object, Result, TypeKey};

/// One registered converter
#[derive(Clone)]
struct Registration {
    key: TypeKey,
    converter: Arc<dyn Converter>,
}

#[derive(Default)]
struct RegistryState {
    converters: HashMap<TypeId, Registration>,
    hierarchy: TypeHierarchy,
}

struct RegistryInner {
    config: ConversionConfig,
    state: RwLock<RegistryState>,
}

/// Outcome of resolving a type
pub(crate) struct Resolution {
    /// Type whose converter was found
    pub(crate) key: TypeKey,
    pub(crate) converter: Arc<dyn Converter>,
    /// Upcasts from the requested type to `key`; empty for exact matches and
    /// the `Object` fallback
    pub(crate) path: Vec<Arc<dyn Upcast>>,
}

/// Handle to a converter registry
#[derive(Clone)]
pub struct ConverterRegistry {
    inner: Arc<RegistryInner>,
}

impl ConverterRegistry {
    // =========================================================================
    // Construction
    // =========================================================================

    /// Create an isolated registry with the built-in converters and default settings
    pub fn new() -> Self {
        Self::build(ConversionConfig::default())
    }

    /// Create an isolated registry with the built-in converters
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if `config` fails validation.
    pub fn with_config(config: ConversionConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: ConversionConfig) -> Self {
        let registry = ConverterRegistry {
            inner: Arc::new(RegistryInner {
                config,
                state: RwLock::new(RegistryState::default()),
            }),
        };
        builtin::register_builtins(&registry);
        registry
    }

    /// The process-wide registry
    ///
    /// Created with default settings on first use.
    pub fn global() -> &'static ConverterRegistry {
        &GLOBAL_REGISTRY
    }

    /// Settings this registry was built with
    pub fn config(&self) -> &ConversionConfig {
        &self.inner.config
    }

    // =========================================================================
    // Registration
    // =========================================================================

    /// Register a converter for a type, replacing any existing one
    ///
    /// Returns the converter previously registered for `key`.
    pub fn register<C: Converter + 'static>(
        &self,
        key: TypeKey,
        converter: C,
    ) -> Option<Arc<dyn Converter>> {
        self.register_shared(key, Arc::new(converter))
    }

    /// Register a shared converter instance for a type
    pub fn register_shared(
        &self,
        key: TypeKey,
        converter: Arc<dyn Converter>,
    ) -> Option<Arc<dyn Converter>> {
        let previous = self.inner.state.write().insert(key, converter);
        self.remember(key);
        previous
    }

    /// Register a typed converter for its value type
    ///
    /// Also registers the list converter for `Vec<C::Value>` unless that type
    /// already has a converter, so sequences of the new type dispatch without
    /// further setup.
    pub fn register_typed<C: TypedConverter>(&self, converter: C) -> Option<Arc<dyn Converter>> {
        let key = TypeKey::of::<C::Value>();
        let list_key = TypeKey::of::<Vec<C::Value>>();
        let previous = {
            let mut state = self.inner.state.write();
            let previous = state.insert(key, Arc::new(Typed(converter)));
            if !state.converters.contains_key(&list_key.id()) {
                state.insert(list_key, Arc::new(Typed(ListConverter::<C::Value>::new())));
            }
            previous
        };
        self.remember(key);
        self.remember(list_key);
        previous
    }

    /// Register the list converter for `Vec<E>`
    pub fn register_list<E: Any + Send + Sync>(&self) {
        self.register_typed(ListConverter::<E>::new());
    }

    /// Register the pair converter for `(A, B)` and its list form
    pub fn register_pair<A, B>(&self)
    where
        A: Any + Send + Sync,
        B: Any + Send + Sync,
    {
        self.register_typed(PairConverter::<A, B>::new());
    }

    /// Register the map converter for `BTreeMap<String, V>` and its list form
    pub fn register_map<V: Any + Send + Sync>(&self) {
        self.register_typed(MapConverter::<V>::new());
    }

    /// Declare `S` a subtype of `P`
    ///
    /// Values of `S` without their own converter are then serialized by the
    /// nearest registered ancestor's converter, after upcasting with `cast`.
    pub fn declare_subtype<S: Any, P: Any>(&self, cast: fn(&S) -> &P) {
        let child = TypeKey::of::<S>();
        let parent = TypeKey::of::<P>();
        let declared = self.inner.state.write().hierarchy.declare(cast);
        self.remember(child);
        self.remember(parent);
        if declared {
            debug!(child = child.name(), parent = parent.name(), "Declared subtype");
        }
    }

    /// Remove the converter for a type
    ///
    /// Mainly useful for diagnostics: removing the `Object` converter makes
    /// `NoConverterFound` reachable.
    pub fn unregister(&self, key: TypeKey) -> Option<Arc<dyn Converter>> {
        let removed = self
            .inner
            .state
            .write()
            .converters
            .remove(&key.id())
            .map(|r| r.converter);
        if removed.is_some() {
            debug!(type_name = key.name(), "Unregistered converter");
        }
        removed
    }

    // =========================================================================
    // Lookup
    // =========================================================================

    /// Whether a converter is registered for exactly this type
    pub fn contains(&self, key: TypeKey) -> bool {
        self.inner.state.read().converters.contains_key(&key.id())
    }

    /// All types with a registered converter
    pub fn registered_types(&self) -> Vec<TypeKey> {
        self.inner
            .state
            .read()
            .converters
            .values()
            .map(|r| r.key)
            .collect()
    }

    /// Number of registered converters
    pub fn len(&self) -> usize {
        self.inner.state.read().converters.len()
    }

    /// Whether no converters are registered
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Converter for a type: exact match, else nearest registered ancestor,
    /// else the `Object` fallback
    ///
    /// # Errors
    ///
    /// Returns `Error::NoConverterFound` if nothing applies, which requires
    /// the `Object` converter to have been unregistered.
    pub fn resolve(&self, key: TypeKey) -> Result<Arc<dyn Converter>> {
        self.remember(key);
        self.resolution(key.id()).map(|r| r.converter)
    }

    pub(crate) fn resolution(&self, id: TypeId) -> Result<Resolution> {
        let state = self.inner.state.read();
        if let Some(reg) = state.converters.get(&id) {
            return Ok(Resolution {
                key: reg.key,
                converter: Arc::clone(&reg.converter),
                path: Vec::new(),
            });
        }
        let ancestor = state
            .hierarchy
            .find_ancestor(id, |candidate| state.converters.contains_key(&candidate));
        if let Some((found, path)) = ancestor {
            if let Some(reg) = state.converters.get(&found.id()) {
                trace!(
                    type_name = self.describe(id).as_str(),
                    ancestor = found.name(),
                    "Resolved converter through ancestor"
                );
                return Ok(Resolution {
                    key: reg.key,
                    converter: Arc::clone(&reg.converter),
                    path,
                });
            }
        }
        if let Some(reg) = state.converters.get(&TypeId::of::<Object>()) {
            let type_name = self.describe(id);
            if is_composite_name(&type_name) {
                warn!(
                    type_name = type_name.as_str(),
                    "Composite type has no converter, serializing as an opaque object"
                );
            } else {
                trace!(
                    type_name = type_name.as_str(),
                    "No converter registered, using universal fallback"
                );
            }
            return Ok(Resolution {
                key: reg.key,
                converter: Arc::clone(&reg.converter),
                path: Vec::new(),
            });
        }
        Err(Error::no_converter(self.describe(id)))
    }

    // =========================================================================
    // Type names
    // =========================================================================

    /// Record a type's name so diagnostics and the fallback can show it
    ///
    /// Names are shared process-wide, so a type seen through any registry or
    /// boxed with `dyn_value` is known to all of them.
    pub fn remember(&self, key: TypeKey) {
        key.remember();
    }

    /// Key for a type id seen earlier
    pub fn type_name_of(&self, id: TypeId) -> Option<TypeKey> {
        TypeKey::lookup(id)
    }

    /// Short name of a type id, or a placeholder if never seen
    pub(crate) fn describe(&self, id: TypeId) -> String {
        self.type_name_of(id)
            .map(|k| k.short_name())
            .unwrap_or_else(|| "<unknown type>".to_string())
    }
}

/// Lists, options and tuples are expected to have a shape converter
fn is_composite_name(short_name: &str) -> bool {
    short_name.starts_with("Vec<") || short_name.starts_with("Option<") || short_name.starts_with('(')
}

impl RegistryState {
    fn insert(&mut self, key: TypeKey, converter: Arc<dyn Converter>) -> Option<Arc<dyn Converter>> {
        let name = converter.name();
        let previous = self
            .converters
            .insert(key.id(), Registration { key, converter })
            .map(|r| r.converter);
        match &previous {
            Some(old) => debug!(
                type_name = key.name(),
                converter = name,
                replaced = old.name(),
                "Overrode converter"
            ),
            None => debug!(type_name = key.name(), converter = name, "Registered converter"),
        }
        previous
    }
}

impl Default for ConverterRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ConverterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConverterRegistry")
            .field("converters", &self.len())
            .field("config", &self.inner.config)
            .finish()
    }
}

// =============================================================================
// Process-wide registry
// =============================================================================

static GLOBAL_REGISTRY: Lazy<ConverterRegistry> = Lazy::new(|| {
    let registry = ConverterRegistry::new();
    info!(converters = registry.len(), "Created process-wide converter registry");
    registry
});

/// Register a typed converter with the process-wide registry
///
/// This should be called during fixture setup, before the fixtures it
/// serves are exercised.
pub fn register_converter<C: TypedConverter>(converter: C) -> Option<Arc<dyn Converter>> {
    ConverterRegistry::global().register_typed(converter)
}

/// Declare a subtype in the process-wide registry
pub fn declare_subtype<S: Any, P: Any>(cast: fn(&S) -> &P) {
    ConverterRegistry::global().declare_subtype(cast)
}
