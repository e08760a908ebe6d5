// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Copy failures.

use echo_value::Value;

/// Errors that abort a deep copy.
///
/// Neither variant is recovered internally. Because the engine never writes
/// to the input graph, the input is unchanged after either error.
#[derive(Debug, Clone, thiserror::Error)]
pub enum CopyError {
    /// A reachable value is outside the copyable categories.
    #[error("[COPY_UNSUPPORTED_TYPE] unable to copy value of kind `{kind}`")]
    UnsupportedType {
        /// Kind name of the offending value.
        kind: &'static str,
        /// The offending value itself, for diagnostics.
        value: Value,
    },
    /// The recursive strategy nested deeper than `max_depth` nodes.
    #[error("[COPY_DEPTH_LIMIT] graph nesting exceeds the configured limit of {limit}")]
    DepthLimitExceeded {
        /// The configured limit.
        limit: usize,
    },
}

impl CopyError {
    pub(crate) fn unsupported(value: &Value) -> Self {
        Self::UnsupportedType {
            kind: value.kind(),
            value: value.clone(),
        }
    }

    /// The value that caused the failure, when there is one.
    pub fn offending_value(&self) -> Option<&Value> {
        match self {
            Self::UnsupportedType { value, .. } => Some(value),
            Self::DepthLimitExceeded { .. } => None,
        }
    }
}
