//! Registry configuration.
//!
//! Everything has a default, so a configuration file only needs the keys it
//! changes:
//!
//! ```yaml
//! prefixes:
//!   partial: "_"
//! engine:
//!   strict_undefined: false
//! ```

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::prefix::Prefixes;

/// Options for the MiniJinja engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineOptions {
    /// Treat undefined variables as render errors. Default `true`.
    pub strict_undefined: bool,
    /// Keep a single trailing newline at the end of sources. Default `false`.
    pub keep_trailing_newline: bool,
    /// HTML-escape every `{{ }}` output, whatever the template name.
    /// Default `true`.
    pub auto_escape: bool,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            strict_undefined: true,
            keep_trailing_newline: false,
            auto_escape: true,
        }
    }
}

/// Configuration for a [`Registry`](crate::Registry).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub prefixes: Prefixes,
    pub engine: EngineOptions,
}

impl Config {
    /// Parses a configuration from YAML.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Parses a configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
