//! Renderer configuration
//!
//! The two historical layouts of the vararg record disagree on where the
//! unsigned value and the reference target live. Both are selectable here.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

use crate::errors::ConfigError;

/// Environment variable holding the path of a TOML config file
pub const CONFIG_ENV: &str = "VARARG_NATIVE_CONFIG";

/// Stream default for floating point output
pub const DEFAULT_FLOAT_PRECISION: usize = 6;

/// Upper bound on significant digits, enough to round-trip an `f64`
pub const MAX_FLOAT_PRECISION: usize = 17;

/// Record slot a value is read from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PayloadSlot {
    /// `long_value`, reinterpreted as unsigned
    Signed,
    /// `ulong_value`
    Unsigned,
    /// `pointer_value` as a numeric address
    Pointer,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Slot holding the `ULONG` value
    pub unsigned_source: PayloadSlot,

    /// Slot holding the second field of `REFERENCE:<id>@<target>`
    pub reference_source: PayloadSlot,

    /// Significant digits for `FLOAT` and `DOUBLE`
    pub float_precision: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            unsigned_source: PayloadSlot::Unsigned,
            reference_source: PayloadSlot::Unsigned,
            float_precision: DEFAULT_FLOAT_PRECISION,
        }
    }
}

impl RenderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_unsigned_source(mut self, slot: PayloadSlot) -> Self {
        self.unsigned_source = slot;
        self
    }

    pub fn with_reference_source(mut self, slot: PayloadSlot) -> Self {
        self.reference_source = slot;
        self
    }

    pub fn with_float_precision(mut self, precision: usize) -> Self {
        self.float_precision = precision;
        self
    }

    /// Precision actually used when formatting
    #[inline]
    pub fn precision(&self) -> usize {
        self.float_precision.clamp(1, MAX_FLOAT_PRECISION)
    }

    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        Self::parse(&content)
    }

    /// Parse configuration from a TOML string
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load from the file named by `VARARG_NATIVE_CONFIG`, or defaults
    pub fn from_env() -> Self {
        let Some(path) = std::env::var_os(CONFIG_ENV) else {
            return Self::default();
        };

        match Self::load(Path::new(&path)) {
            Ok(config) => {
                debug!(path = ?path, config = ?config, "loaded render config");
                config
            }
            Err(error) => {
                warn!(path = ?path, %error, "falling back to default render config");
                Self::default()
            }
        }
    }

    /// Default configuration as TOML
    pub fn generate_default() -> String {
        toml::to_string_pretty(&Self::default())
            .unwrap_or_else(|_| String::from("# Failed to generate config"))
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;

        fs::write(path, content).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}
