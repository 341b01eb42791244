//! Composite converters
//!
//! Ordered sequences and their relatives, all in the nested list encoding of
//! [`waferslim_core::wire`]:
//!
//! - [`ListConverter<E>`]: `Vec<E>`. Each element is serialized through
//!   dispatch, so its own runtime type picks its converter and heterogeneous
//!   `Vec<DynValue>` lists work. Parsing decodes each item as `E`.
//! - [`PairConverter<A, B>`]: `(A, B)` as a two-item list. This is how a
//!   caller declares the shape of a list of key/value pairs.
//! - [`MapConverter<V>`]: `BTreeMap<String, V>` as a list of `[key, value]`
//!   lists in key order.
//! - [`OptionConverter<T>`]: `None` as the null sentinel, `Some(v)` as the
//!   wire string of `v` itself.
//! - [`DynListConverter`] / [`DynValueConverter`]: lists whose shape is not
//!   declared. Nested lists are recovered as nested `Vec<DynValue>`; every
//!   other item stays a `String` (or `()` for the null sentinel). Nesting
//!   depth is capped by `max_nesting_depth`.

use crate::converter::{Marker, TypedConverter};
use crate::registry::ConverterRegistry;
use std::any::Any;
use std::collections::BTreeMap;
use std::marker::PhantomData;
use waferslim_core::wire::{self, WireNode};
use waferslim_core::{DynValue, Error, Result, TypeKey};

// ============================================================================
// Typed lists
// ============================================================================

/// `Vec<E>` as a wire list
pub struct ListConverter<E>(Marker<E>);

impl<E> ListConverter<E> {
    /// Create a list converter for element type `E`
    pub fn new() -> Self {
        ListConverter(PhantomData)
    }
}

impl<E> Default for ListConverter<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Any + Send + Sync> TypedConverter for ListConverter<E> {
    type Value = Vec<E>;

    fn to_wire(&self, value: &Vec<E>, registry: &ConverterRegistry) -> Result<String> {
        encode_elements(value.iter().map(|e| e as &dyn Any), registry)
    }

    fn from_wire(&self, wire: &str, registry: &ConverterRegistry) -> Result<Vec<E>> {
        wire::decode_list(wire)?
            .iter()
            .map(|item| registry.from_wire::<E>(item))
            .collect()
    }
}

fn encode_elements<'a, I>(elements: I, registry: &ConverterRegistry) -> Result<String>
where
    I: Iterator<Item = &'a dyn Any>,
{
    let items = elements
        .map(|e| registry.convert_value(e))
        .collect::<Result<Vec<String>>>()?;
    Ok(wire::encode_list(items))
}

// ============================================================================
// Pairs and maps
// ============================================================================

/// `(A, B)` as a two-item wire list
pub struct PairConverter<A, B>(Marker<(A, B)>);

impl<A, B> PairConverter<A, B> {
    /// Create a pair converter
    pub fn new() -> Self {
        PairConverter(PhantomData)
    }
}

impl<A, B> Default for PairConverter<A, B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A, B> TypedConverter for PairConverter<A, B>
where
    A: Any + Send + Sync,
    B: Any + Send + Sync,
{
    type Value = (A, B);

    fn to_wire(&self, value: &(A, B), registry: &ConverterRegistry) -> Result<String> {
        encode_elements([&value.0 as &dyn Any, &value.1 as &dyn Any].into_iter(), registry)
    }

    fn from_wire(&self, wire: &str, registry: &ConverterRegistry) -> Result<(A, B)> {
        let items = wire::decode_list(wire)?;
        match items.as_slice() {
            [first, second] => Ok((registry.from_wire::<A>(first)?, registry.from_wire::<B>(second)?)),
            _ => Err(Error::conversion(
                TypeKey::of::<(A, B)>().short_name(),
                wire,
                format!("expected a list of 2 items, found {}", items.len()),
            )),
        }
    }
}

/// `BTreeMap<String, V>` as a list of `[key, value]` lists
pub struct MapConverter<V>(Marker<V>);

impl<V> MapConverter<V> {
    /// Create a map converter
    pub fn new() -> Self {
        MapConverter(PhantomData)
    }
}

impl<V> Default for MapConverter<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Any + Send + Sync> TypedConverter for MapConverter<V> {
    type Value = BTreeMap<String, V>;

    fn to_wire(&self, value: &BTreeMap<String, V>, registry: &ConverterRegistry) -> Result<String> {
        let entries = value
            .iter()
            .map(|(k, v)| encode_elements([k as &dyn Any, v as &dyn Any].into_iter(), registry))
            .collect::<Result<Vec<String>>>()?;
        Ok(wire::encode_list(entries))
    }

    fn from_wire(&self, wire: &str, registry: &ConverterRegistry) -> Result<BTreeMap<String, V>> {
        let pair = PairConverter::<String, V>::new();
        wire::decode_list(wire)?
            .iter()
            .map(|entry| pair.from_wire(entry, registry))
            .collect()
    }
}

// ============================================================================
// Optional values
// ============================================================================

/// `Option<T>` with `None` as the null sentinel
///
/// `Some(v)` is dispatched on `v`, so it reads exactly like a bare `T`. A
/// `Some` whose own wire string would equal the sentinel cannot be told
/// apart from `None`; the string converter refuses to emit it.
pub struct OptionConverter<T>(Marker<T>);

impl<T> OptionConverter<T> {
    /// Create an option converter for `T`
    pub fn new() -> Self {
        OptionConverter(PhantomData)
    }
}

impl<T> Default for OptionConverter<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Any + Send + Sync> TypedConverter for OptionConverter<T> {
    type Value = Option<T>;

    fn to_wire(&self, value: &Option<T>, registry: &ConverterRegistry) -> Result<String> {
        match value {
            Some(v) => registry.convert_value(v),
            None => Ok(registry.config().null_sentinel.clone()),
        }
    }

    fn from_wire(&self, wire: &str, registry: &ConverterRegistry) -> Result<Option<T>> {
        if wire == registry.config().null_sentinel {
            Ok(None)
        } else {
            registry.from_wire::<T>(wire).map(Some)
        }
    }
}

// ============================================================================
// Undeclared shapes
// ============================================================================

/// `Vec<DynValue>` with nested lists recovered structurally
#[derive(Debug, Clone, Copy, Default)]
pub struct DynListConverter;

impl TypedConverter for DynListConverter {
    type Value = Vec<DynValue>;

    fn to_wire(&self, value: &Vec<DynValue>, registry: &ConverterRegistry) -> Result<String> {
        encode_elements(value.iter().map(|e| e as &dyn Any), registry)
    }

    fn from_wire(&self, wire: &str, registry: &ConverterRegistry) -> Result<Vec<DynValue>> {
        let node = wire::decode_nested(wire, registry.config().max_nesting_depth)?;
        match node {
            WireNode::List(items) => Ok(items
                .into_iter()
                .map(|item| node_to_value(item, registry))
                .collect()),
            WireNode::Item(_) => Err(Error::conversion("Vec<DynValue>", wire, "expected a list")),
        }
    }
}

/// A single value of undeclared type
///
/// Serialization looks through the box to the value inside. Parsing yields
/// a nested `Vec<DynValue>` for a well-formed list, `()` for the null
/// sentinel, and a `String` otherwise.
#[derive(Debug, Clone, Copy, Default)]
pub struct DynValueConverter;

impl TypedConverter for DynValueConverter {
    type Value = DynValue;

    fn to_wire(&self, value: &DynValue, registry: &ConverterRegistry) -> Result<String> {
        registry.convert_value(&**value)
    }

    fn from_wire(&self, wire: &str, registry: &ConverterRegistry) -> Result<DynValue> {
        if wire::is_list(wire) {
            let node = wire::decode_nested(wire, registry.config().max_nesting_depth)?;
            Ok(node_to_value(node, registry))
        } else {
            Ok(node_to_value(WireNode::Item(wire.to_string()), registry))
        }
    }
}

fn node_to_value(node: WireNode, registry: &ConverterRegistry) -> DynValue {
    match node {
        WireNode::Item(s) if s == registry.config().null_sentinel => Box::new(()),
        WireNode::Item(s) => Box::new(s),
        WireNode::List(items) => Box::new(
            items
                .into_iter()
                .map(|item| node_to_value(item, registry))
                .collect::<Vec<DynValue>>(),
        ),
    }
}
