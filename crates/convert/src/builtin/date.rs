//! Calendar date converter
//!
//! Dates use the configured `chrono` format (`%Y-%m-%d` by default) in both
//! directions. There is no time-of-day or timezone component.

use crate::converter::TypedConverter;
use crate::registry::ConverterRegistry;
use chrono::NaiveDate;
use std::fmt::Write;
use waferslim_core::{Error, Result};

/// `chrono::NaiveDate` in a fixed calendar format
#[derive(Debug, Clone, Copy, Default)]
pub struct DateConverter;

impl TypedConverter for DateConverter {
    type Value = NaiveDate;

    fn to_wire(&self, value: &NaiveDate, registry: &ConverterRegistry) -> Result<String> {
        let format = &registry.config().date_format;
        let mut text = String::new();
        write!(text, "{}", value.format(format)).map_err(|_| {
            Error::conversion("NaiveDate", &value.to_string(), "date format is invalid")
        })?;
        Ok(text)
    }

    fn from_wire(&self, wire: &str, registry: &ConverterRegistry) -> Result<NaiveDate> {
        NaiveDate::parse_from_str(wire, &registry.config().date_format)
            .map_err(|e| Error::conversion("NaiveDate", wire, e.to_string()))
    }
}
