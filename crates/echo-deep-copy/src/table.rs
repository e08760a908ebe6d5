// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Visited-identity table: original node → clone.

use std::collections::HashMap;
use std::fmt;

use echo_value::{NodeId, Value};

/// Registration order of a cloned node within one copy (1, 2, 3, ...).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Token(u64);

impl Token {
    /// Raw counter value.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

struct Entry {
    token: Token,
    // Keeps the original allocation alive so its address cannot be reused
    // by another node while the table exists.
    _source: Value,
    clone: Value,
}

/// Map from an original node's identity to its clone.
///
/// Keyed by [`NodeId`], never by value: two structurally equal nodes are two
/// entries. Registration stores the identity and the clone in one step, so a
/// visited node always has a clone to return.
#[derive(Default)]
pub struct VisitedTable {
    entries: HashMap<NodeId, Entry>,
    issued: u64,
}

impl VisitedTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered nodes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing has been registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The clone registered for `id`.
    pub fn lookup(&self, id: NodeId) -> Option<&Value> {
        self.entries.get(&id).map(|entry| &entry.clone)
    }

    /// The token issued to `id`.
    pub fn token_of(&self, id: NodeId) -> Option<Token> {
        self.entries.get(&id).map(|entry| entry.token)
    }

    /// Record `clone` as the copy of `source` and issue the next token.
    ///
    /// Registering an id twice keeps the first clone and returns its token.
    pub fn register(&mut self, id: NodeId, source: &Value, clone: Value) -> Token {
        if let Some(entry) = self.entries.get(&id) {
            return entry.token;
        }
        self.issued += 1;
        let token = Token(self.issued);
        self.entries.insert(
            id,
            Entry {
                token,
                _source: source.clone(),
                clone,
            },
        );
        token
    }
}
