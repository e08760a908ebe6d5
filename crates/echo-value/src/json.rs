// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Bridge between `serde_json` trees and value graphs.

use std::collections::HashSet;

use serde_json::{Map, Number};
use thiserror::Error;

use crate::fields::Fields;
use crate::value::{ArrayRef, Keyed, NodeId, ObjectRef, Value};

/// Reasons a value graph cannot be rendered as JSON.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JsonError {
    /// A node is reachable from itself.
    #[error("[JSON_CYCLE] value graph contains a cycle")]
    Cycle,
    /// The value has no JSON form (callables, symbols, `undefined`, NaN, ...).
    #[error("[JSON_UNREPRESENTABLE] {kind} has no JSON form")]
    Unrepresentable {
        /// Kind name of the offending value.
        kind: &'static str,
    },
}

impl From<serde_json::Value> for Value {
    /// Builds a fresh tree; every JSON object/array becomes a new node.
    /// Object keys keep their source order (`serde_json/preserve_order`).
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => Self::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Self::String(s),
            serde_json::Value::Array(items) => Self::Array(ArrayRef::from_vec(
                items.into_iter().map(Self::from).collect(),
            )),
            serde_json::Value::Object(map) => Self::Object(ObjectRef::from_fields(
                map.into_iter().map(|(k, v)| (k, Self::from(v))).collect::<Fields>(),
            )),
        }
    }
}

impl Value {
    /// Render as JSON.
    ///
    /// Shared (acyclic) substructure is written once per reference. Dates
    /// become RFC 3339 strings.
    pub fn to_json(&self) -> Result<serde_json::Value, JsonError> {
        let mut path = HashSet::new();
        to_json_in(self, &mut path)
    }
}

fn to_json_in(value: &Value, path: &mut HashSet<NodeId>) -> Result<serde_json::Value, JsonError> {
    let unrepresentable = || JsonError::Unrepresentable { kind: value.kind() };
    let out = match value {
        Value::Null => serde_json::Value::Null,
        Value::Bool(b) => serde_json::Value::Bool(*b),
        Value::Number(n) => {
            serde_json::Value::Number(Number::from_f64(*n).ok_or_else(unrepresentable)?)
        }
        Value::String(s) => serde_json::Value::String(s.clone()),
        Value::Date(d) => serde_json::Value::String(d.get().to_rfc3339()),
        Value::Array(a) => {
            if !path.insert(a.id()) {
                return Err(JsonError::Cycle);
            }
            let items = a
                .snapshot()
                .iter()
                .map(|item| to_json_in(item, path))
                .collect::<Result<Vec<_>, _>>()?;
            path.remove(&a.id());
            serde_json::Value::Array(items)
        }
        Value::Object(o) => {
            if !path.insert(o.id()) {
                return Err(JsonError::Cycle);
            }
            let mut map = Map::new();
            for (key, field) in o.entries() {
                map.insert(key, to_json_in(&field, path)?);
            }
            path.remove(&o.id());
            serde_json::Value::Object(map)
        }
        Value::Undefined | Value::Function(_) | Value::Symbol(_) | Value::BigInt(_) => {
            return Err(unrepresentable());
        }
    };
    Ok(out)
}
