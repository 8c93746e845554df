#[cfg(feature = "cli")]
pub mod cli;

use crate::utils::error::{Result, WriterError};
use crate::utils::validation::{validate_range, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_INDENT: usize = 4;
pub const MAX_INDENT: usize = 16;

/// What to emit for NaN and infinite floats, which strict JSON cannot hold.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NonFinitePolicy {
    /// `NaN`, `Infinity` and `-Infinity` tokens, as JavaScript and Python read them.
    #[default]
    Literal,
    Null,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WriterConfig {
    /// Spaces per nesting level.
    pub indent: usize,
    pub ensure_ascii: bool,
    pub non_finite: NonFinitePolicy,
    /// Replace the target through a temporary file and rename.
    pub atomic: bool,
    pub trailing_newline: bool,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            indent: DEFAULT_INDENT,
            ensure_ascii: true,
            non_finite: NonFinitePolicy::Literal,
            atomic: false,
            trailing_newline: false,
        }
    }
}

impl WriterConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| WriterError::io(path, e))?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(|e| WriterError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn indent_string(&self) -> String {
        " ".repeat(self.indent)
    }
}

impl Validate for WriterConfig {
    fn validate(&self) -> Result<()> {
        validate_range("indent", self.indent, 1, MAX_INDENT)
    }
}
