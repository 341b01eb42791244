//! Universal fallback converter
//!
//! Registered for [`Object`](waferslim_core::Object), the implicit last
//! ancestor of every type. It serializes values no other converter claims as
//! `<TypeName object>`, using the process-wide record of type names. It is a
//! serialization fallback only: parsing hands the wire string back unchanged,
//! so asking for any other type through it fails the final downcast.

use crate::converter::Converter;
use crate::registry::ConverterRegistry;
use std::any::Any;
use waferslim_core::{DynValue, Result};

/// Default textual form for otherwise unconvertible values
#[derive(Debug, Clone, Copy, Default)]
pub struct ObjectConverter;

impl Converter for ObjectConverter {
    fn to_wire(&self, value: &dyn Any, registry: &ConverterRegistry) -> Result<String> {
        Ok(match registry.type_name_of(value.type_id()) {
            Some(key) => format!("<{} object>", key.short_name()),
            None => "<object>".to_string(),
        })
    }

    fn from_wire(&self, wire: &str, _registry: &ConverterRegistry) -> Result<DynValue> {
        Ok(Box::new(wire.to_string()))
    }
}
