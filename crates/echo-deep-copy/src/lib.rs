// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Cycle-safe, identity-preserving deep copy for Echo value graphs.
//!
//! [`deep_copy`] duplicates an [`echo_value::Value`] graph so that the result
//! is node-disjoint from the input but has the same shape:
//!
//! - every array, record and callable reachable in the result is a new
//!   allocation;
//! - two references to one input node become two references to one cloned
//!   node, so shared substructure and cycles survive;
//! - primitives are copied by value and dates into independent handles;
//! - record keys keep their insertion order, array elements their index order.
//!
//! # Identity Tracking
//!
//! A per-call [`VisitedTable`] maps each original node's [`NodeId`] to its
//! clone. A node's clone is registered before its children are visited, which
//! is what makes self-referential graphs terminate. The input graph is only
//! read, never tagged, so it is unchanged after success *and* after failure.
//!
//! # Callables
//!
//! Callables are wrapped, not cloned: the copy is a new callable node with
//! copied fields whose invocation forwards `this` and the arguments to the
//! original. Whatever the original closure captured is shared.
//!
//! # Depth
//!
//! [`Strategy::Recursive`] recurses once per nested node and is bounded by
//! [`CopyConfig::max_depth`]. [`Strategy::Iterative`] keeps pending nodes on
//! an explicit stack and has no bound beyond memory.
//!
//! [`NodeId`]: echo_value::NodeId
#![forbid(unsafe_code)]

mod config;
mod engine;
mod error;
mod observer;
mod table;

pub use config::{ConfigError, CopyConfig, Strategy, DEFAULT_MAX_DEPTH};
pub use error::CopyError;
pub use observer::{CopyObserver, CopyStats, NoopObserver, TracingObserver};
pub use table::{Token, VisitedTable};

use echo_value::Value;
use engine::Traversal;

/// Deep-copy `value` with the default config, reporting through `tracing`.
pub fn deep_copy(value: &Value) -> Result<Value, CopyError> {
    DeepCopier::default().copy(value)
}

/// Configured entry point.
///
/// A copier holds no per-call state and may be reused; each call gets its own
/// visited table.
pub struct DeepCopier<'o> {
    config: CopyConfig,
    observer: &'o dyn CopyObserver,
}

impl Default for DeepCopier<'_> {
    fn default() -> Self {
        Self {
            config: CopyConfig::default(),
            observer: &TracingObserver,
        }
    }
}

impl<'o> DeepCopier<'o> {
    /// Copier with `config`, reporting through [`TracingObserver`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if `config` fails
    /// [`CopyConfig::validate`].
    pub fn new(config: CopyConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            observer: &TracingObserver,
        })
    }

    /// Same copier reporting to `observer` instead.
    pub fn with_observer<'p>(self, observer: &'p dyn CopyObserver) -> DeepCopier<'p> {
        DeepCopier {
            config: self.config,
            observer,
        }
    }

    /// Active configuration.
    pub fn config(&self) -> &CopyConfig {
        &self.config
    }

    /// Deep-copy `value`.
    pub fn copy(&self, value: &Value) -> Result<Value, CopyError> {
        self.copy_with_stats(value).map(|(copy, _)| copy)
    }

    /// Deep-copy `value` and report what the traversal did.
    pub fn copy_with_stats(&self, value: &Value) -> Result<(Value, CopyStats), CopyError> {
        let span = tracing::debug_span!(
            "deep_copy",
            strategy = %self.config.strategy,
            kind = value.kind()
        );
        let _guard = span.enter();

        let mut traversal = Traversal::new(self.observer, self.config.max_depth);
        let copy = match self.config.strategy {
            Strategy::Recursive => traversal.copy_recursive(value)?,
            Strategy::Iterative => traversal.copy_iterative(value)?,
        };
        let stats = traversal.stats();
        self.observer.finished(&stats);
        Ok((copy, stats))
    }
}
