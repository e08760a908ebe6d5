// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Callable nodes: native closures and call-forwarding delegates.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use thiserror::Error;

use crate::fields::Fields;
use crate::value::{release, Keyed, NodeId, Value};

/// Host closure signature: `(this, args) -> result`.
pub type NativeFn = dyn Fn(&Value, &[Value]) -> Result<Value, CallError>;

/// Failure raised by a native callable body.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("[CALL_FAILED] {function}: {message}")]
pub struct CallError {
    /// Name of the native body that failed.
    pub function: String,
    /// Failure description.
    pub message: String,
}

impl CallError {
    /// Build an error attributed to `function`.
    pub fn new(function: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            function: function.into(),
            message: message.into(),
        }
    }
}

enum Body {
    Native { name: String, func: Box<NativeFn> },
    Delegate(FunctionRef),
}

struct FunctionNode {
    body: Body,
    fields: RefCell<Fields>,
}

/// Shared handle to a callable node.
///
/// A callable is a record that can also be invoked. Its body is either a
/// native closure or a *delegate*: a wrapper whose invocation forwards the
/// receiver and arguments, unchanged, to another callable. Delegates share
/// the target's captured environment; nothing behind the closure is copied.
#[derive(Clone)]
pub struct FunctionRef(Rc<FunctionNode>);

impl FunctionRef {
    /// Wrap a host closure.
    pub fn native<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&Value, &[Value]) -> Result<Value, CallError> + 'static,
    {
        Self(Rc::new(FunctionNode {
            body: Body::Native {
                name: name.into(),
                func: Box::new(func),
            },
            fields: RefCell::new(Fields::new()),
        }))
    }

    /// Allocate a new callable with no fields that forwards every call to
    /// `target`.
    pub fn delegate_to(target: &Self) -> Self {
        Self(Rc::new(FunctionNode {
            body: Body::Delegate(target.clone()),
            fields: RefCell::new(Fields::new()),
        }))
    }

    /// Identity of this callable.
    pub fn id(&self) -> NodeId {
        NodeId::of(&self.0)
    }

    /// Returns `true` if both handles point at the same callable.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// The callable this one forwards to, if it is a delegate.
    pub fn target(&self) -> Option<&Self> {
        match &self.0.body {
            Body::Delegate(target) => Some(target),
            Body::Native { .. } => None,
        }
    }

    /// Returns `true` if invoking this callable forwards to another.
    pub fn is_delegate(&self) -> bool {
        self.target().is_some()
    }

    /// The native callable at the end of the delegate chain.
    pub fn resolve(&self) -> &Self {
        let mut current = self;
        while let Some(next) = current.target() {
            current = next;
        }
        current
    }

    /// Name of the native body that ultimately runs.
    pub fn name(&self) -> &str {
        let mut current = self;
        loop {
            match &current.0.body {
                Body::Native { name, .. } => return name,
                Body::Delegate(target) => current = target,
            }
        }
    }

    /// Invoke with receiver `this` and `args`.
    ///
    /// Delegates pass `this` and `args` through untouched, so a delegate and
    /// its target observe identical calls.
    pub fn call(&self, this: &Value, args: &[Value]) -> Result<Value, CallError> {
        let mut current = self;
        loop {
            match &current.0.body {
                Body::Native { func, .. } => return func(this, args),
                Body::Delegate(target) => current = target,
            }
        }
    }
}

impl FunctionRef {
    pub(crate) fn detach_into(&self, pending: &mut Vec<Value>) {
        if Rc::strong_count(&self.0) != 1 {
            return;
        }
        if let Ok(mut fields) = self.0.fields.try_borrow_mut() {
            pending.extend(fields.take_values());
        }
    }
}

// Field values only; a delegate's target is dropped by the node's glue.
impl Drop for FunctionRef {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        self.detach_into(&mut pending);
        release(pending);
    }
}

impl Keyed for FunctionRef {
    fn fields(&self) -> &RefCell<Fields> {
        &self.0.fields
    }
}

impl fmt::Debug for FunctionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = if self.is_delegate() { "delegate" } else { "native" };
        write!(
            f,
            "Function({}; {kind} {}; {:?})",
            self.id(),
            self.name(),
            self.0.fields.borrow()
        )
    }
}
