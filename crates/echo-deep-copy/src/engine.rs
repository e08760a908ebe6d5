// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Traversal engine.
//!
//! Both strategies share one step function. Visiting a node allocates its
//! empty clone and registers it *before* any child is touched, so a reference
//! back to the node (a cycle) resolves to the registered clone instead of
//! descending again. Because clones are handles, a child's clone is attached
//! to its parent immediately and filled in later; this is what lets the
//! iterative strategy run without recursion.

use std::vec;

use echo_value::{ArrayRef, Fields, FunctionRef, Keyed, ObjectRef, Value};

use crate::error::CopyError;
use crate::observer::{CopyObserver, CopyStats};
use crate::table::VisitedTable;

/// Children of a freshly cloned node that still have to be copied.
enum Frame {
    Elements {
        items: vec::IntoIter<Value>,
        target: ArrayRef,
    },
    Fields {
        entries: vec::IntoIter<(String, Value)>,
        target: FieldTarget,
    },
}

enum FieldTarget {
    Object(ObjectRef),
    Function(FunctionRef),
}

impl FieldTarget {
    fn insert(&self, key: String, value: Value) {
        match self {
            Self::Object(o) => o.insert(key, value),
            Self::Function(f) => f.insert(key, value),
        };
    }
}

enum Visit {
    /// Leaf copy, or a clone that was already registered.
    Ready(Value),
    /// Newly registered clone; its children still need copying.
    Fresh { clone: Value, frame: Frame },
}

enum Step {
    Exhausted,
    Continue,
    Descend(Frame),
}

/// Per-call traversal state. Dropped when the call returns, on every path.
pub(crate) struct Traversal<'o> {
    table: VisitedTable,
    observer: &'o dyn CopyObserver,
    stats: CopyStats,
    max_depth: usize,
}

impl<'o> Traversal<'o> {
    pub(crate) fn new(observer: &'o dyn CopyObserver, max_depth: usize) -> Self {
        Self {
            table: VisitedTable::new(),
            observer,
            stats: CopyStats::default(),
            max_depth,
        }
    }

    pub(crate) fn stats(&self) -> CopyStats {
        self.stats
    }

    /// Depth-first copy using native recursion, one level per nested node.
    pub(crate) fn copy_recursive(&mut self, root: &Value) -> Result<Value, CopyError> {
        match self.visit(root)? {
            Visit::Ready(value) => Ok(value),
            Visit::Fresh { clone, frame } => {
                self.descend(frame, 1)?;
                Ok(clone)
            }
        }
    }

    fn descend(&mut self, mut frame: Frame, level: usize) -> Result<(), CopyError> {
        if level > self.max_depth {
            return Err(CopyError::DepthLimitExceeded {
                limit: self.max_depth,
            });
        }
        loop {
            match self.step(&mut frame)? {
                Step::Exhausted => return Ok(()),
                Step::Continue => {}
                Step::Descend(child) => self.descend(child, level + 1)?,
            }
        }
    }

    /// Depth-first copy driven by an explicit stack of pending frames.
    pub(crate) fn copy_iterative(&mut self, root: &Value) -> Result<Value, CopyError> {
        let (clone, frame) = match self.visit(root)? {
            Visit::Ready(value) => return Ok(value),
            Visit::Fresh { clone, frame } => (clone, frame),
        };
        let mut stack = vec![frame];
        while let Some(frame) = stack.last_mut() {
            match self.step(frame)? {
                Step::Exhausted => {
                    stack.pop();
                }
                Step::Continue => {}
                Step::Descend(child) => stack.push(child),
            }
        }
        Ok(clone)
    }

    /// Copy the next child of `frame` and attach it to the frame's target.
    fn step(&mut self, frame: &mut Frame) -> Result<Step, CopyError> {
        match frame {
            Frame::Elements { items, target } => {
                let Some(item) = items.next() else {
                    return Ok(Step::Exhausted);
                };
                Ok(match self.visit(&item)? {
                    Visit::Ready(value) => {
                        target.push(value);
                        Step::Continue
                    }
                    Visit::Fresh { clone, frame } => {
                        target.push(clone);
                        Step::Descend(frame)
                    }
                })
            }
            Frame::Fields { entries, target } => {
                let Some((key, field)) = entries.next() else {
                    return Ok(Step::Exhausted);
                };
                Ok(match self.visit(&field)? {
                    Visit::Ready(value) => {
                        target.insert(key, value);
                        Step::Continue
                    }
                    Visit::Fresh { clone, frame } => {
                        target.insert(key, clone);
                        Step::Descend(frame)
                    }
                })
            }
        }
    }

    fn visit(&mut self, value: &Value) -> Result<Visit, CopyError> {
        match value {
            Value::Undefined
            | Value::Null
            | Value::Bool(_)
            | Value::Number(_)
            | Value::String(_) => Ok(Visit::Ready(value.clone())),
            Value::Date(date) => {
                self.stats.dates += 1;
                Ok(Visit::Ready(Value::Date(date.duplicate())))
            }
            Value::Array(source) => {
                if let Some(clone) = self.registered(value) {
                    return Ok(Visit::Ready(clone));
                }
                let target = ArrayRef::with_capacity(source.len());
                let frame = Frame::Elements {
                    items: source.snapshot().into_iter(),
                    target: target.clone(),
                };
                Ok(self.fresh(value, Value::Array(target), frame))
            }
            Value::Object(source) => {
                if let Some(clone) = self.registered(value) {
                    return Ok(Visit::Ready(clone));
                }
                let target = ObjectRef::from_fields(Fields::with_capacity(source.field_count()));
                let frame = Frame::Fields {
                    entries: source.entries().into_iter(),
                    target: FieldTarget::Object(target.clone()),
                };
                Ok(self.fresh(value, Value::Object(target), frame))
            }
            Value::Function(source) => {
                if let Some(clone) = self.registered(value) {
                    return Ok(Visit::Ready(clone));
                }
                let target = FunctionRef::delegate_to(source);
                let frame = Frame::Fields {
                    entries: source.entries().into_iter(),
                    target: FieldTarget::Function(target.clone()),
                };
                Ok(self.fresh(value, Value::Function(target), frame))
            }
            Value::Symbol(_) | Value::BigInt(_) => {
                self.observer.unsupported(value);
                Err(CopyError::unsupported(value))
            }
        }
    }

    fn registered(&mut self, source: &Value) -> Option<Value> {
        let clone = self.table.lookup(source.node_id()?)?.clone();
        self.stats.shared_hits += 1;
        Some(clone)
    }

    fn fresh(&mut self, source: &Value, clone: Value, frame: Frame) -> Visit {
        if let Some(id) = source.node_id() {
            let token = self.table.register(id, source, clone.clone());
            self.stats.nodes += 1;
            self.observer.node_cloned(token, source.category());
        }
        Visit::Fresh { clone, frame }
    }
}
