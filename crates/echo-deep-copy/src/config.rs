// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Copy configuration (serde-backed, JSON on disk).

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default nesting limit for [`Strategy::Recursive`].
pub const DEFAULT_MAX_DEPTH: usize = 1024;

/// How the engine walks the input graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Native recursion, bounded by [`CopyConfig::max_depth`].
    #[default]
    Recursive,
    /// Explicit work stack; no depth bound.
    Iterative,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Recursive => "recursive",
            Self::Iterative => "iterative",
        })
    }
}

/// Error type for config loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Malformed JSON or unknown fields.
    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),
    /// Well-formed but unusable settings.
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Settings for a [`DeepCopier`](crate::DeepCopier).
///
/// Missing fields take their defaults; unknown fields are rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CopyConfig {
    /// Traversal strategy.
    pub strategy: Strategy,
    /// Maximum number of nested nodes on any path (recursive strategy only).
    pub max_depth: usize,
}

impl Default for CopyConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::Recursive,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl CopyConfig {
    /// Defaults, switched to the iterative strategy.
    pub fn iterative() -> Self {
        Self {
            strategy: Strategy::Iterative,
            ..Self::default()
        }
    }

    /// Same config with a different depth limit.
    pub fn with_max_depth(self, max_depth: usize) -> Self {
        Self { max_depth, ..self }
    }

    /// Reject settings the engine cannot honour.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_depth == 0 {
            return Err(ConfigError::Invalid("max_depth must be at least 1".into()));
        }
        Ok(())
    }

    /// Parse and validate a JSON config blob. Empty input yields the defaults.
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self, ConfigError> {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        let config: Self = serde_json::from_slice(bytes)?;
        config.validate()?;
        Ok(config)
    }

    /// [`from_json_slice`](Self::from_json_slice) for string input.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Self::from_json_slice(json.as_bytes())
    }

    /// Serialize as pretty JSON.
    pub fn to_json_vec(&self) -> Result<Vec<u8>, ConfigError> {
        Ok(serde_json::to_vec_pretty(self)?)
    }
}
