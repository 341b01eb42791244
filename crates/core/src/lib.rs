//! Core types for waferslim value conversion
//!
//! This crate defines the foundational pieces shared by the converter
//! registry and anything embedding it:
//! - Error: error kinds raised by conversion (`NoConverterFound`, `Conversion`, `Config`)
//! - TypeKey / DynValue / Object: runtime type identity and type-erased values
//! - wire: the nested, count-prefixed list encoding of the Slim protocol
//! - ConversionConfig: settings loaded from `waferslim.toml`

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod types;
pub mod wire;

pub use config::{ConversionConfig, CONFIG_FILE_NAME};
pub use error::{Error, Result};
pub use types::{dyn_value, DynValue, Object, TypeKey};
pub use wire::{decode_list, decode_nested, encode_list, is_list, WireNode};
