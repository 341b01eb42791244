//! Boolean and numeric converters

use crate::converter::{Marker, TypedConverter};
use crate::registry::ConverterRegistry;
use std::any::Any;
use std::fmt::Display;
use std::marker::PhantomData;
use std::str::FromStr;
use waferslim_core::{Error, Result, TypeKey};

/// `bool` as `"true"` / `"false"`
///
/// Parsing is case-insensitive but otherwise exact: surrounding whitespace
/// or any other word is a `ConversionError`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoolConverter;

impl TypedConverter for BoolConverter {
    type Value = bool;

    fn to_wire(&self, value: &bool, _registry: &ConverterRegistry) -> Result<String> {
        Ok(if *value { "true" } else { "false" }.to_string())
    }

    fn from_wire(&self, wire: &str, _registry: &ConverterRegistry) -> Result<bool> {
        if wire.eq_ignore_ascii_case("true") {
            Ok(true)
        } else if wire.eq_ignore_ascii_case("false") {
            Ok(false)
        } else {
            Err(Error::conversion("bool", wire, "expected true or false"))
        }
    }
}

/// `bool` as `"yes"` / `"no"`
///
/// Not registered by default. Accepts `yes`, `no`, `true` and `false` in any
/// case. Use it per parameter through `convert_arg(..).using(YesNoConverter)`
/// or register it to change the wire form globally.
#[derive(Debug, Clone, Copy, Default)]
pub struct YesNoConverter;

impl TypedConverter for YesNoConverter {
    type Value = bool;

    fn to_wire(&self, value: &bool, _registry: &ConverterRegistry) -> Result<String> {
        Ok(if *value { "yes" } else { "no" }.to_string())
    }

    fn from_wire(&self, wire: &str, _registry: &ConverterRegistry) -> Result<bool> {
        if wire.eq_ignore_ascii_case("yes") || wire.eq_ignore_ascii_case("true") {
            Ok(true)
        } else if wire.eq_ignore_ascii_case("no") || wire.eq_ignore_ascii_case("false") {
            Ok(false)
        } else {
            Err(Error::conversion("bool", wire, "expected yes or no"))
        }
    }
}

/// Integers as plain decimal
///
/// Output never has leading zeros; negatives carry a leading `-`.
/// Parsing accepts a plain decimal only: whitespace, overflow or any other
/// character is a `ConversionError`.
pub struct IntConverter<T>(Marker<T>);

impl<T> IntConverter<T> {
    /// Create a converter for integer type `T`
    pub fn new() -> Self {
        IntConverter(PhantomData)
    }
}

impl<T> Default for IntConverter<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TypedConverter for IntConverter<T>
where
    T: Any + Send + Sync + Display + FromStr,
    T::Err: Display,
{
    type Value = T;

    fn to_wire(&self, value: &T, _registry: &ConverterRegistry) -> Result<String> {
        Ok(value.to_string())
    }

    fn from_wire(&self, wire: &str, _registry: &ConverterRegistry) -> Result<T> {
        wire.parse::<T>()
            .map_err(|e| Error::conversion(TypeKey::of::<T>().short_name(), wire, e.to_string()))
    }
}

/// Float types handled by [`FloatConverter`]
pub trait FloatValue: Any + Send + Sync + Display + FromStr {
    /// Neither NaN nor infinite
    fn is_finite_value(&self) -> bool;
}

impl FloatValue for f32 {
    fn is_finite_value(&self) -> bool {
        self.is_finite()
    }
}

impl FloatValue for f64 {
    fn is_finite_value(&self) -> bool {
        self.is_finite()
    }
}

/// Floats as decimal with a fractional part
///
/// Output never uses scientific notation. With `float_precision` unset the
/// shortest form that parses back to the same value is written, so the
/// round-trip is exact; with a precision set the value is rounded to that
/// many fraction digits. A `.0` suffix is added when the textual form has no
/// fractional part.
///
/// NaN and the infinities have no decimal form and are rejected in both
/// directions with a `ConversionError`. Parsing accepts a plain decimal
/// only, without surrounding whitespace.
pub struct FloatConverter<T>(Marker<T>);

impl<T> FloatConverter<T> {
    /// Create a converter for float type `T`
    pub fn new() -> Self {
        FloatConverter(PhantomData)
    }
}

impl<T> Default for FloatConverter<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TypedConverter for FloatConverter<T>
where
    T: FloatValue,
    T::Err: Display,
{
    type Value = T;

    fn to_wire(&self, value: &T, registry: &ConverterRegistry) -> Result<String> {
        if !value.is_finite_value() {
            return Err(Error::conversion(
                TypeKey::of::<T>().short_name(),
                &value.to_string(),
                "not a finite number",
            ));
        }
        let mut text = match registry.config().float_precision {
            Some(precision) => format!("{:.*}", precision, value),
            None => value.to_string(),
        };
        if text.bytes().all(|b| b.is_ascii_digit() || b == b'-') {
            text.push_str(".0");
        }
        Ok(text)
    }

    fn from_wire(&self, wire: &str, _registry: &ConverterRegistry) -> Result<T> {
        let value = wire
            .parse::<T>()
            .map_err(|e| Error::conversion(TypeKey::of::<T>().short_name(), wire, e.to_string()))?;
        if value.is_finite_value() {
            Ok(value)
        } else {
            Err(Error::conversion(
                TypeKey::of::<T>().short_name(),
                wire,
                "not a finite number",
            ))
        }
    }
}

/// Any type with `Display` and `FromStr`
///
/// Lets fixture authors register their own scalar types in one line:
///
/// ```ignore
/// registry.register_typed(DisplayConverter::<Ipv4Addr>::new());
/// ```
pub struct DisplayConverter<T>(Marker<T>);

impl<T> DisplayConverter<T> {
    /// Create a converter for `T`
    pub fn new() -> Self {
        DisplayConverter(PhantomData)
    }
}

impl<T> Default for DisplayConverter<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TypedConverter for DisplayConverter<T>
where
    T: Any + Send + Sync + Display + FromStr,
    T::Err: Display,
{
    type Value = T;

    fn to_wire(&self, value: &T, _registry: &ConverterRegistry) -> Result<String> {
        Ok(value.to_string())
    }

    fn from_wire(&self, wire: &str, _registry: &ConverterRegistry) -> Result<T> {
        wire.parse::<T>()
            .map_err(|e| Error::conversion(TypeKey::of::<T>().short_name(), wire, e.to_string()))
    }
}
