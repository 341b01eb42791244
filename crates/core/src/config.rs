//! Conversion settings via `waferslim.toml`
//!
//! Every registry is built from a `ConversionConfig`. The process-wide
//! registry uses the defaults; a server that wants different settings loads
//! them from a file and builds its own registry from the result.

use crate::error::{Error, Result};
use crate::wire;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt::Write;
use std::path::Path;

/// Config file name looked up by servers embedding this crate.
pub const CONFIG_FILE_NAME: &str = "waferslim.toml";

/// Default reserved wire token for null/none
pub const DEFAULT_NULL_SENTINEL: &str = "__slim_null__";

/// Default `chrono` format for dates
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";

/// Default limit on list nesting when decoding
pub const DEFAULT_MAX_NESTING_DEPTH: usize = 64;

/// Conversion settings loaded from `waferslim.toml`.
///
/// # Example
///
/// ```toml
/// # Reserved wire token for null/none. Strings equal to it cannot be sent.
/// null_sentinel = "__slim_null__"
///
/// # chrono format used for dates in both directions
/// date_format = "%Y-%m-%d"
///
/// # Fixed number of fraction digits for floats (default: shortest exact form)
/// # float_precision = 6
///
/// # Maximum list nesting accepted when decoding
/// max_nesting_depth = 64
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionConfig {
    /// Wire token standing for null/none
    #[serde(default = "default_null_sentinel")]
    pub null_sentinel: String,
    /// `chrono` strftime format for `NaiveDate`
    #[serde(default = "default_date_format")]
    pub date_format: String,
    /// Fixed fraction digits for floats; `None` writes the shortest exact form
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub float_precision: Option<usize>,
    /// Maximum list nesting depth accepted by decoders
    #[serde(default = "default_max_nesting_depth")]
    pub max_nesting_depth: usize,
}

fn default_null_sentinel() -> String {
    DEFAULT_NULL_SENTINEL.to_string()
}

fn default_date_format() -> String {
    DEFAULT_DATE_FORMAT.to_string()
}

fn default_max_nesting_depth() -> usize {
    DEFAULT_MAX_NESTING_DEPTH
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            null_sentinel: default_null_sentinel(),
            date_format: default_date_format(),
            float_precision: None,
            max_nesting_depth: default_max_nesting_depth(),
        }
    }
}

impl ConversionConfig {
    /// Parse and validate a config from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: ConversionConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and validate a config file.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the file cannot be read, is not valid TOML,
    /// or fails [`validate`](Self::validate).
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::config(format!("cannot read {}: {}", path.display(), e)))?;
        Self::from_toml_str(&text)
    }

    /// Check the settings are usable.
    ///
    /// Rejects an empty null sentinel, a sentinel that is itself a wire list,
    /// a zero nesting depth, and a date format that does not round-trip.
    pub fn validate(&self) -> Result<()> {
        if self.null_sentinel.is_empty() {
            return Err(Error::config("null_sentinel must not be empty"));
        }
        if wire::is_list(&self.null_sentinel) {
            return Err(Error::config("null_sentinel must not be a wire list"));
        }
        if self.max_nesting_depth == 0 {
            return Err(Error::config("max_nesting_depth must be at least 1"));
        }
        let sample = NaiveDate::from_ymd_opt(1974, 10, 10)
            .ok_or_else(|| Error::config("sample date out of range"))?;
        let mut text = String::new();
        write!(text, "{}", sample.format(&self.date_format)).map_err(|_| {
            Error::config(format!("date_format {:?} is not a valid format", self.date_format))
        })?;
        match NaiveDate::parse_from_str(&text, &self.date_format) {
            Ok(parsed) if parsed == sample => Ok(()),
            _ => Err(Error::config(format!(
                "date_format {:?} does not round-trip dates",
                self.date_format
            ))),
        }
    }

    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# waferslim conversion settings
#
# Reserved wire token for null/none. Strings equal to it cannot be sent.
null_sentinel = "__slim_null__"

# chrono format used for dates in both directions
date_format = "%Y-%m-%d"

# Fixed number of fraction digits for floats (default: shortest exact form)
# float_precision = 6

# Maximum list nesting accepted when decoding
max_nesting_depth = 64
"#
    }
}
