// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Structural comparison and reachability over value graphs.

use std::collections::HashSet;

use crate::value::{Keyed, NodeId, Value};

/// Structural equality that terminates on cycles.
///
/// - Primitives compare by value; `NaN` equals `NaN`.
/// - Dates compare by instant.
/// - Arrays compare element-wise in order.
/// - Records and callables compare key sequences in order, then values
///   pairwise. Callable bodies are not compared.
/// - Symbols compare by identity.
///
/// A pair of nodes already under comparison is assumed equal, so
/// `a.self = a` and `b.self = b` are equal. Sharing patterns are not compared;
/// use [`Value::same_node`] for that.
pub fn deep_eq(a: &Value, b: &Value) -> bool {
    let mut assumed = HashSet::new();
    eq_in(a, b, &mut assumed)
}

#[allow(clippy::float_cmp)]
fn eq_in(a: &Value, b: &Value, assumed: &mut HashSet<(NodeId, NodeId)>) -> bool {
    match (a, b) {
        (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Number(x), Value::Number(y)) => x == y || (x.is_nan() && y.is_nan()),
        (Value::String(x), Value::String(y)) => x == y,
        (Value::Date(x), Value::Date(y)) => x.get() == y.get(),
        (Value::Symbol(x), Value::Symbol(y)) => x == y,
        (Value::BigInt(x), Value::BigInt(y)) => x == y,
        (Value::Array(x), Value::Array(y)) => {
            if !assumed.insert((x.id(), y.id())) {
                return true;
            }
            let (xs, ys) = (x.snapshot(), y.snapshot());
            xs.len() == ys.len() && xs.iter().zip(&ys).all(|(p, q)| eq_in(p, q, assumed))
        }
        (Value::Object(x), Value::Object(y)) => {
            !assumed.insert((x.id(), y.id()))
                || entries_eq(&x.entries(), &y.entries(), assumed)
        }
        (Value::Function(x), Value::Function(y)) => {
            !assumed.insert((x.id(), y.id()))
                || entries_eq(&x.entries(), &y.entries(), assumed)
        }
        _ => false,
    }
}

fn entries_eq(
    xs: &[(String, Value)],
    ys: &[(String, Value)],
    assumed: &mut HashSet<(NodeId, NodeId)>,
) -> bool {
    xs.len() == ys.len()
        && xs
            .iter()
            .zip(ys)
            .all(|((kx, vx), (ky, vy))| kx == ky && eq_in(vx, vy, assumed))
}

fn children(value: &Value) -> Vec<Value> {
    match value {
        Value::Array(a) => a.snapshot(),
        Value::Object(o) => o.entries().into_iter().map(|(_, v)| v).collect(),
        Value::Function(f) => f.entries().into_iter().map(|(_, v)| v).collect(),
        _ => Vec::new(),
    }
}

/// Ids of every array, record and callable reachable from `root`
/// (including `root` itself).
///
/// Walks with an explicit stack, so arbitrarily deep graphs are fine.
pub fn reachable_nodes(root: &Value) -> HashSet<NodeId> {
    let mut seen = HashSet::new();
    let mut stack = vec![root.clone()];
    while let Some(value) = stack.pop() {
        let Some(id) = value.node_id() else {
            continue;
        };
        if seen.insert(id) {
            stack.extend(children(&value));
        }
    }
    seen
}

/// Returns `true` if any node reachable from `a` is also reachable from `b`.
pub fn shares_nodes(a: &Value, b: &Value) -> bool {
    let from_a = reachable_nodes(a);
    reachable_nodes(b).iter().any(|id| from_a.contains(id))
}
