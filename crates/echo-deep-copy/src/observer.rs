// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Diagnostic hooks around a copy.

use echo_value::{Category, Value};

use crate::table::Token;

/// Counters for one completed copy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CopyStats {
    /// Distinct nodes cloned.
    pub nodes: usize,
    /// References resolved through the visited table instead of cloning.
    pub shared_hits: usize,
    /// Date leaves duplicated.
    pub dates: usize,
}

/// Callbacks invoked by the engine. Every method defaults to a no-op.
///
/// The engine never depends on an observer for correctness; observers only
/// watch.
pub trait CopyObserver {
    /// An unsupported value was reached. Called before the error propagates.
    fn unsupported(&self, value: &Value) {
        let _ = value;
    }

    /// A node was registered in the visited table.
    fn node_cloned(&self, token: Token, category: Category) {
        let _ = (token, category);
    }

    /// The copy completed successfully.
    fn finished(&self, stats: &CopyStats) {
        let _ = stats;
    }
}

/// Observer that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl CopyObserver for NoopObserver {}

/// Observer that reports through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl CopyObserver for TracingObserver {
    fn unsupported(&self, value: &Value) {
        tracing::warn!(kind = value.kind(), ?value, "unable to copy value, unsupported type");
    }

    fn node_cloned(&self, token: Token, category: Category) {
        tracing::trace!(%token, %category, "node cloned");
    }

    fn finished(&self, stats: &CopyStats) {
        tracing::debug!(
            nodes = stats.nodes,
            shared_hits = stats.shared_hits,
            dates = stats.dates,
            "deep copy finished"
        );
    }
}
