//! String and null converters
//!
//! Strings are identity-converted, with one exception: the configured null
//! sentinel is a reserved token. Serializing a string equal to it would make
//! the string indistinguishable from null on the wire, so it is refused.

use crate::converter::TypedConverter;
use crate::registry::ConverterRegistry;
use waferslim_core::{Error, Result};

fn check_not_sentinel(value: &str, registry: &ConverterRegistry) -> Result<()> {
    if value == registry.config().null_sentinel {
        return Err(Error::conversion(
            "String",
            value,
            "string equals the reserved null sentinel",
        ));
    }
    Ok(())
}

/// `String` as itself
#[derive(Debug, Clone, Copy, Default)]
pub struct StringConverter;

impl TypedConverter for StringConverter {
    type Value = String;

    fn to_wire(&self, value: &String, registry: &ConverterRegistry) -> Result<String> {
        check_not_sentinel(value, registry)?;
        Ok(value.clone())
    }

    fn from_wire(&self, wire: &str, _registry: &ConverterRegistry) -> Result<String> {
        Ok(wire.to_string())
    }
}

/// `&'static str` as itself
///
/// Serialization only: a wire string cannot be borrowed for `'static`, so
/// parse into `String` instead.
#[derive(Debug, Clone, Copy, Default)]
pub struct StrConverter;

impl TypedConverter for StrConverter {
    type Value = &'static str;

    fn to_wire(&self, value: &&'static str, registry: &ConverterRegistry) -> Result<String> {
        check_not_sentinel(value, registry)?;
        Ok(value.to_string())
    }
}

/// `()` as the reserved null sentinel
#[derive(Debug, Clone, Copy, Default)]
pub struct NullConverter;

impl TypedConverter for NullConverter {
    type Value = ();

    fn to_wire(&self, _value: &(), registry: &ConverterRegistry) -> Result<String> {
        Ok(registry.config().null_sentinel.clone())
    }

    fn from_wire(&self, wire: &str, registry: &ConverterRegistry) -> Result<()> {
        if wire == registry.config().null_sentinel {
            Ok(())
        } else {
            Err(Error::conversion("()", wire, "expected the null sentinel"))
        }
    }
}
