//! Value conversion for waferslim fixtures
//!
//! This crate turns fixture values into Slim wire strings and back:
//! - ConverterRegistry: type-to-converter mapping with ancestor resolution
//! - builtin: converters for bool, integers, floats, `()`, dates and strings
//! - composite: lists, pairs, maps and options in the nested wire list encoding
//! - dispatch: `convert_value`, serializing any value by its runtime type
//! - coerce: `convert_arg` / `convert_result`, wrapping fixture callables
//!
//! A process-wide registry is available through [`ConverterRegistry::global`];
//! independent registries can be created with [`ConverterRegistry::new`].

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod builtin;
pub mod coerce;
pub mod composite;
pub mod converter;
mod dispatch;
pub mod hierarchy;
pub mod registry;

pub use builtin::{
    BoolConverter, DateConverter, DisplayConverter, FloatConverter, FloatValue, IntConverter,
    NullConverter, ObjectConverter, StrConverter, StringConverter, YesNoConverter,
};
pub use coerce::{convert_arg, convert_result, Arguments, ConvertArg, ConvertResult, Param};
pub use composite::{
    DynListConverter, DynValueConverter, ListConverter, MapConverter, OptionConverter,
    PairConverter,
};
pub use converter::{Converter, Typed, TypedConverter};
pub use dispatch::convert_value;
pub use hierarchy::Upcast;
pub use registry::{declare_subtype, register_converter, ConverterRegistry};

pub use waferslim_core::{
    dyn_value, ConversionConfig, DynValue, Error, Object, Result, TypeKey,
};
