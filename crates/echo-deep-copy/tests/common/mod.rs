// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![allow(dead_code)]

use echo_deep_copy::{CopyConfig, CopyError, DeepCopier, NoopObserver};
use echo_value::{ArrayRef, Keyed, ObjectRef, Value};

/// Record with the given fields, in order.
pub fn record(pairs: Vec<(&str, Value)>) -> Value {
    let obj = ObjectRef::new();
    for (key, value) in pairs {
        obj.insert(key, value);
    }
    Value::Object(obj)
}

/// Array holding `items`.
pub fn seq(items: Vec<Value>) -> Value {
    Value::Array(ArrayRef::from_vec(items))
}

/// Both traversal strategies with a generous depth limit.
pub fn configs() -> [CopyConfig; 2] {
    [CopyConfig::default(), CopyConfig::iterative()]
}

/// Copy without tracing output.
pub fn copy_with(config: &CopyConfig, value: &Value) -> Result<Value, CopyError> {
    DeepCopier::new(config.clone())
        .expect("valid config")
        .with_observer(&NoopObserver)
        .copy(value)
}

/// Field of a record or callable; panics when absent.
pub fn field(value: &Value, key: &str) -> Value {
    value
        .field(key)
        .unwrap_or_else(|| panic!("missing field `{key}` on {value:?}"))
}

/// Element of an array; panics when absent.
pub fn elem(value: &Value, index: usize) -> Value {
    value
        .as_array()
        .and_then(|a| a.get(index))
        .unwrap_or_else(|| panic!("missing element {index} on {value:?}"))
}

/// Keys (and shallow values rendered with `Debug`) of every node reachable
/// from `root`, sorted by node id. Used to prove the input was not touched.
pub fn fingerprint(root: &Value) -> Vec<String> {
    let mut ids: Vec<_> = echo_value::reachable_nodes(root).into_iter().collect();
    ids.sort();
    let mut out = Vec::new();
    let mut stack = vec![root.clone()];
    let mut seen = std::collections::HashSet::new();
    while let Some(value) = stack.pop() {
        let Some(id) = value.node_id() else { continue };
        if !seen.insert(id) {
            continue;
        }
        let children: Vec<(String, Value)> = match &value {
            Value::Array(a) => a
                .snapshot()
                .into_iter()
                .enumerate()
                .map(|(i, v)| (i.to_string(), v))
                .collect(),
            Value::Object(o) => o.entries(),
            Value::Function(f) => f.entries(),
            _ => Vec::new(),
        };
        let rendered: Vec<String> = children
            .iter()
            .map(|(k, v)| format!("{k}={v:?}"))
            .collect();
        let rank = ids.iter().position(|x| *x == id).unwrap_or(usize::MAX);
        out.push(format!("{rank}:{}", rendered.join(",")));
        stack.extend(children.into_iter().map(|(_, v)| v));
    }
    out.sort();
    out
}
