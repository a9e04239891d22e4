//! Profiling configuration.
//!
//! Deserialized from JSON with serde; every field has a default, so an empty
//! document yields a fully-enabled SIMPLE/AOP configuration. The JSON field
//! spellings (`logType`, upper-case enum values) are stable and treated as an
//! external contract.

use std::path::Path;

use serde_derive::Deserialize;

use crate::error::ProfilingError;
use crate::marker::LogStyle;

/// How decorators are matched to services at installation time. Both modes
/// produce the same observable profiling behavior.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum InstallMode {
    #[default]
    #[serde(rename = "AOP")]
    Aop,
    #[serde(rename = "LEGACY")]
    Legacy,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ProfilingConfig {
    /// Master switch. When false, installers leave every service untouched.
    pub enabled: bool,
    /// Layout used for all records emitted by decorators built from this
    /// configuration.
    #[serde(rename = "logType")]
    pub log_type: LogStyle,
    pub mode: InstallMode,
}

impl Default for ProfilingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            log_type: LogStyle::Simple,
            mode: InstallMode::Aop,
        }
    }
}

impl ProfilingConfig {
    /// Parses a configuration from a JSON document. Unknown fields are
    /// ignored; missing fields take their defaults.
    pub fn from_json_str(text: &str) -> Result<Self, ProfilingError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Reads and parses a JSON configuration file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ProfilingError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }
}
