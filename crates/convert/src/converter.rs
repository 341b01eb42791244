//! Converter capability
//!
//! A converter is a bidirectional string transform for one value type.
//! Two traits describe it:
//!
//! - [`Converter`]: the type-erased form the registry stores. Values arrive as
//!   `&dyn Any` and parsed values leave as [`DynValue`].
//! - [`TypedConverter`]: the form fixture authors implement. It names its
//!   value type, and [`Typed`] adapts it to [`Converter`] by downcasting.
//!
//! Both directions receive the registry handle so composite and custom
//! converters can recurse through dispatch:
//!
//! ```ignore
//! struct EmployeeConverter;
//!
//! impl TypedConverter for EmployeeConverter {
//!     type Value = Employee;
//!
//!     fn to_wire(&self, employee: &Employee, registry: &ConverterRegistry) -> Result<String> {
//!         registry.convert_value(&employee.as_fields())
//!     }
//! }
//!
//! registry.register_typed(EmployeeConverter);
//! ```

use crate::registry::ConverterRegistry;
use std::any::Any;
use std::marker::PhantomData;
use waferslim_core::{DynValue, Error, Result, TypeKey};

/// Type-erased converter stored by the registry
pub trait Converter: Send + Sync {
    /// Serialize a value to its wire string
    fn to_wire(&self, value: &dyn Any, registry: &ConverterRegistry) -> Result<String>;

    /// Parse a wire string into a boxed value
    fn from_wire(&self, wire: &str, registry: &ConverterRegistry) -> Result<DynValue>;

    /// Human-readable converter name for logging
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Converter for one statically known value type
pub trait TypedConverter: Send + Sync + 'static {
    /// The type this converter serializes and produces
    type Value: Any + Send + Sync;

    /// Serialize a value to its wire string
    fn to_wire(&self, value: &Self::Value, registry: &ConverterRegistry) -> Result<String>;

    /// Parse a wire string
    ///
    /// Serialization-only converters can keep the default, which rejects
    /// every input.
    fn from_wire(&self, wire: &str, registry: &ConverterRegistry) -> Result<Self::Value> {
        let _ = registry;
        Err(Error::conversion(
            TypeKey::of::<Self::Value>().short_name(),
            wire,
            "converter does not parse wire strings",
        ))
    }
}

/// Adapts a [`TypedConverter`] to the type-erased [`Converter`]
pub struct Typed<C>(pub C);

impl<C: TypedConverter> Converter for Typed<C> {
    fn to_wire(&self, value: &dyn Any, registry: &ConverterRegistry) -> Result<String> {
        match value.downcast_ref::<C::Value>() {
            Some(v) => self.0.to_wire(v, registry),
            None => Err(Error::conversion(
                TypeKey::of::<C::Value>().short_name(),
                "",
                format!("{} was handed a value of another type", self.name()),
            )),
        }
    }

    fn from_wire(&self, wire: &str, registry: &ConverterRegistry) -> Result<DynValue> {
        let value = self.0.from_wire(wire, registry)?;
        Ok(Box::new(value))
    }

    fn name(&self) -> &'static str {
        std::any::type_name::<C>()
    }
}

/// Zero-sized marker for converters generic over their value type
///
/// `PhantomData<fn() -> T>` keeps the converter `Send + Sync` for any `T`.
pub(crate) type Marker<T> = PhantomData<fn() -> T>;
