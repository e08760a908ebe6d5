// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Identity-bearing value graph for Echo tools.
//!
//! A [`Value`] is either an atomic leaf (primitives, dates) or a handle to a
//! *node*: an [`ArrayRef`], [`ObjectRef`] or [`FunctionRef`]. Node handles are
//! reference-counted, so cloning a `Value` shares the node rather than copying
//! it. Graphs built from these handles may share substructure and contain
//! cycles; [`NodeId`] gives each live node a stable identity key.
//!
//! # Identity vs. Equality
//!
//! [`Value::same_node`] answers "is this the same allocation?".
//! [`deep_eq`] answers "do these graphs have the same shape and leaves?" and
//! terminates on cycles. Neither is exposed through `PartialEq` on node
//! handles, because the two questions have different answers for cloned
//! graphs and callers must pick one explicitly.
//!
//! # Threading
//!
//! Handles are `Rc`-based and therefore `!Send`. A graph belongs to exactly
//! one thread.
#![forbid(unsafe_code)]

mod callable;
mod compare;
mod fields;
mod json;
mod value;

pub use callable::{CallError, FunctionRef, NativeFn};
pub use compare::{deep_eq, reachable_nodes, shares_nodes};
pub use fields::Fields;
pub use json::JsonError;
pub use value::{ArrayRef, Category, DateRef, Keyed, NodeId, ObjectRef, Symbol, Value};
