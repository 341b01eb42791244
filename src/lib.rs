//! waferslim - value conversion for a Slim test server
//!
//! Converts between the strings exchanged with a remote Slim test runner and
//! the typed values fixture code works with.
//!
//! # Quick Start
//!
//! ```ignore
//! use waferslim::{convert_arg, convert_value, Arguments, ConverterRegistry};
//! use chrono::NaiveDate;
//!
//! // Serialize anything with a registered converter
//! assert_eq!(convert_value(&vec![1i64, 2])?, "[000002:000001:1:000001:2:]");
//!
//! // Coerce a wire argument before a fixture constructor runs
//! let registry = ConverterRegistry::global();
//! let new_fixture = convert_arg::<NaiveDate>(registry).wrap(|args: Arguments| {
//!     EmployeesHiredBefore::from_args(args)
//! });
//! let fixture = new_fixture(Arguments::from_wire(["1974-10-10"]))?;
//! ```
//!
//! # Architecture
//!
//! Core types (errors, type identity, the wire list codec and settings) live
//! in `waferslim-core`. The registry, converters, dispatch and coercion live
//! in `waferslim-convert`. This crate re-exports both.

pub use waferslim_convert::*;
pub use waferslim_core::{config, wire, CONFIG_FILE_NAME};
