//! Value dispatch
//!
//! `convert_value` turns any value into its wire string by resolving the
//! value's runtime type against the registry and invoking that converter.
//!
//! - A [`DynValue`] is looked through to the value it carries.
//! - A subtype without its own converter is upcast along the declared
//!   hierarchy to the nearest registered ancestor.
//! - Sequences registered for composite conversion (every `Vec<T>` whose `T`
//!   was registered with `register_typed`) recurse element by element.
//! - Anything else falls back to the universal `Object` converter.
//!
//! The typed helpers [`ConverterRegistry::to_wire`] and
//! [`ConverterRegistry::from_wire`] wrap both directions for statically known
//! types.

use crate::registry::ConverterRegistry;
use std::any::Any;
use waferslim_core::{DynValue, Error, Result, TypeKey};

impl ConverterRegistry {
    /// Serialize a value of any type to its wire string
    pub fn convert_value(&self, value: &dyn Any) -> Result<String> {
        let mut value = value;
        while let Some(inner) = value.downcast_ref::<DynValue>() {
            value = &**inner;
        }

        let resolution = self.resolution(value.type_id())?;
        let mut current = value;
        for step in &resolution.path {
            current = step.upcast(current).ok_or_else(|| {
                Error::conversion(
                    resolution.key.short_name(),
                    "",
                    format!("cannot upcast {} value", self.describe(value.type_id())),
                )
            })?;
        }
        resolution.converter.to_wire(current, self)
    }

    /// Serialize a value of a statically known type
    pub fn to_wire<T: Any>(&self, value: &T) -> Result<String> {
        self.remember(TypeKey::of::<T>());
        self.convert_value(value)
    }

    /// Parse a wire string into a boxed value of the given type
    ///
    /// The box holds whatever the resolved converter produces; for a type
    /// resolved through an ancestor that is the ancestor's type.
    pub fn from_wire_dyn(&self, key: TypeKey, wire: &str) -> Result<DynValue> {
        self.resolve(key)?.from_wire(wire, self)
    }

    /// Parse a wire string into a `T`
    ///
    /// # Errors
    ///
    /// Returns `Error::Conversion` if the wire string is malformed, or if the
    /// converter resolved for `T` (an ancestor's, or the `Object` fallback)
    /// produces some other type.
    pub fn from_wire<T: Any>(&self, wire: &str) -> Result<T> {
        let key = TypeKey::of::<T>();
        let resolution = self.resolution(key.id())?;
        let value = resolution.converter.from_wire(wire, self)?;
        match value.downcast::<T>() {
            Ok(v) => Ok(*v),
            Err(_) => Err(Error::conversion(
                key.short_name(),
                wire,
                format!(
                    "no converter produces {}; nearest is for {}",
                    key.short_name(),
                    resolution.key.short_name()
                ),
            )),
        }
    }
}

/// Serialize a value with the process-wide registry
pub fn convert_value(value: &dyn Any) -> Result<String> {
    ConverterRegistry::global().convert_value(value)
}
