// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Value enum, node handles and identity keys.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use chrono::{DateTime, TimeZone, Utc};

use crate::callable::FunctionRef;
use crate::fields::Fields;

/// Identity of a live node (array, object or function).
///
/// Derived from the node's allocation address, so two structurally equal nodes
/// have different ids. An id is only meaningful while the node is alive; once
/// the last handle drops, the address may be reused by a new allocation.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct NodeId(usize);

impl NodeId {
    pub(crate) fn of<T>(rc: &Rc<T>) -> Self {
        Self(Rc::as_ptr(rc).cast::<()>().addr())
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node@{:#x}", self.0)
    }
}

/// Coarse classification of a [`Value`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Category {
    /// `undefined`, `null`, booleans, numbers, strings.
    Primitive,
    /// Date-time instants.
    Temporal,
    /// Ordered arrays.
    Sequence,
    /// Plain keyed records.
    Record,
    /// Invocable records.
    Callable,
    /// Anything the graph can hold but tools are not expected to process.
    Unsupported,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Primitive => "primitive",
            Self::Temporal => "temporal",
            Self::Sequence => "sequence",
            Self::Record => "record",
            Self::Callable => "callable",
            Self::Unsupported => "unsupported",
        };
        f.write_str(name)
    }
}

/// Mutable handle to a UTC instant.
///
/// Dates are leaves, but like their host-language counterparts they are
/// mutable objects: two handles cloned from one another see each other's
/// [`set`](DateRef::set). Use [`duplicate`](DateRef::duplicate) for an
/// independent instant.
#[derive(Clone)]
pub struct DateRef(Rc<Cell<DateTime<Utc>>>);

impl DateRef {
    /// Wrap an instant in a fresh handle.
    pub fn new(instant: DateTime<Utc>) -> Self {
        Self(Rc::new(Cell::new(instant)))
    }

    /// The current wall-clock instant.
    pub fn now() -> Self {
        Self::new(Utc::now())
    }

    /// Instant from milliseconds since the Unix epoch. `None` if out of range.
    pub fn from_timestamp_millis(millis: i64) -> Option<Self> {
        Utc.timestamp_millis_opt(millis).single().map(Self::new)
    }

    /// Read the instant.
    pub fn get(&self) -> DateTime<Utc> {
        self.0.get()
    }

    /// Overwrite the instant (visible through every clone of this handle).
    pub fn set(&self, instant: DateTime<Utc>) {
        self.0.set(instant);
    }

    /// Milliseconds since the Unix epoch.
    pub fn timestamp_millis(&self) -> i64 {
        self.get().timestamp_millis()
    }

    /// A new handle holding the same instant.
    pub fn duplicate(&self) -> Self {
        Self::new(self.get())
    }

    /// Returns `true` if both handles share one cell.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for DateRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Date({})", self.get().to_rfc3339())
    }
}

/// Shared handle to an ordered array of values.
#[derive(Clone, Default)]
pub struct ArrayRef(Rc<RefCell<Vec<Value>>>);

impl ArrayRef {
    /// Allocate an empty array.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate an empty array with room for `capacity` elements.
    pub fn with_capacity(capacity: usize) -> Self {
        Self(Rc::new(RefCell::new(Vec::with_capacity(capacity))))
    }

    /// Allocate an array owning `items`.
    pub fn from_vec(items: Vec<Value>) -> Self {
        Self(Rc::new(RefCell::new(items)))
    }

    /// Identity of this array.
    pub fn id(&self) -> NodeId {
        NodeId::of(&self.0)
    }

    /// Returns `true` if both handles point at the same array.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    /// Returns `true` if the array has no elements.
    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    /// Element at `index` (a shared handle for nodes).
    pub fn get(&self, index: usize) -> Option<Value> {
        self.0.borrow().get(index).cloned()
    }

    /// Append an element.
    pub fn push(&self, value: Value) {
        self.0.borrow_mut().push(value);
    }

    /// Replace the element at `index`. Returns the old element, or `None` if
    /// `index` is out of bounds (the array is unchanged).
    pub fn set(&self, index: usize, value: Value) -> Option<Value> {
        let mut items = self.0.borrow_mut();
        let slot = items.get_mut(index)?;
        Some(std::mem::replace(slot, value))
    }

    /// Copy of the element handles, taken without holding a borrow afterwards.
    pub fn snapshot(&self) -> Vec<Value> {
        self.0.borrow().clone()
    }

    fn detach_into(&self, pending: &mut Vec<Value>) {
        if Rc::strong_count(&self.0) != 1 {
            return;
        }
        if let Ok(mut items) = self.0.try_borrow_mut() {
            pending.append(&mut items);
        }
    }
}

impl Drop for ArrayRef {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        self.detach_into(&mut pending);
        release(pending);
    }
}

impl fmt::Debug for ArrayRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Array({}; len={})", self.id(), self.len())
    }
}

/// Keyed access shared by records and callables.
///
/// Implementors expose their field cell; every other method is provided.
/// Borrows are released before each method returns, so callers may freely
/// re-enter the same node.
pub trait Keyed {
    /// The node's field storage.
    fn fields(&self) -> &RefCell<Fields>;

    /// Value under `key` (a shared handle for nodes).
    fn get(&self, key: &str) -> Option<Value> {
        self.fields().borrow().get(key).cloned()
    }

    /// Insert or replace `key`, returning the previous value.
    fn insert<K: Into<String>>(&self, key: K, value: Value) -> Option<Value>
    where
        Self: Sized,
    {
        self.fields().borrow_mut().insert(key.into(), value)
    }

    /// Remove `key`, returning its value.
    fn remove(&self, key: &str) -> Option<Value> {
        self.fields().borrow_mut().remove(key)
    }

    /// Returns `true` if `key` is present.
    fn contains_key(&self, key: &str) -> bool {
        self.fields().borrow().contains_key(key)
    }

    /// Keys in insertion order.
    fn keys(&self) -> Vec<String> {
        self.fields().borrow().keys().map(str::to_owned).collect()
    }

    /// Number of fields.
    fn field_count(&self) -> usize {
        self.fields().borrow().len()
    }

    /// Copy of the `(key, value)` pairs in insertion order.
    fn entries(&self) -> Vec<(String, Value)> {
        self.fields()
            .borrow()
            .iter()
            .map(|(k, v)| (k.to_owned(), v.clone()))
            .collect()
    }
}

/// Shared handle to a plain keyed record.
#[derive(Clone, Default)]
pub struct ObjectRef(Rc<RefCell<Fields>>);

impl ObjectRef {
    /// Allocate an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a record owning `fields`.
    pub fn from_fields(fields: Fields) -> Self {
        Self(Rc::new(RefCell::new(fields)))
    }

    /// Identity of this record.
    pub fn id(&self) -> NodeId {
        NodeId::of(&self.0)
    }

    /// Returns `true` if both handles point at the same record.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    fn detach_into(&self, pending: &mut Vec<Value>) {
        if Rc::strong_count(&self.0) != 1 {
            return;
        }
        if let Ok(mut fields) = self.0.try_borrow_mut() {
            pending.extend(fields.take_values());
        }
    }
}

impl Drop for ObjectRef {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        self.detach_into(&mut pending);
        release(pending);
    }
}

impl Keyed for ObjectRef {
    fn fields(&self) -> &RefCell<Fields> {
        &self.0
    }
}

impl fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Object({}; {:?})", self.id(), self.0.borrow())
    }
}

/// Drops `pending` without recursing once per nesting level.
///
/// A handle that is the last owner of its node gives up the node's children
/// to `pending` before it is dropped, so the drop glue only ever sees empty
/// nodes. Nodes still owned elsewhere (including every node on a cycle) are
/// left alone.
pub(crate) fn release(mut pending: Vec<Value>) {
    while let Some(value) = pending.pop() {
        match &value {
            Value::Array(a) => a.detach_into(&mut pending),
            Value::Object(o) => o.detach_into(&mut pending),
            Value::Function(f) => f.detach_into(&mut pending),
            _ => {}
        }
    }
}

/// Unique token compared by identity, never by description.
#[derive(Clone)]
pub struct Symbol(Rc<Option<String>>);

impl Symbol {
    /// Mint a new symbol.
    pub fn new(description: Option<&str>) -> Self {
        Self(Rc::new(description.map(str::to_owned)))
    }

    /// Human-readable description, if one was given.
    pub fn description(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Symbol {}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({})", self.description().unwrap_or(""))
    }
}

/// A value in an Echo value graph.
#[derive(Clone, Debug)]
pub enum Value {
    /// Absent value.
    Undefined,
    /// Explicit null.
    Null,
    /// Boolean.
    Bool(bool),
    /// IEEE-754 double.
    Number(f64),
    /// UTF-8 string.
    String(String),
    /// Date-time instant.
    Date(DateRef),
    /// Ordered array node.
    Array(ArrayRef),
    /// Keyed record node.
    Object(ObjectRef),
    /// Invocable record node.
    Function(FunctionRef),
    /// Unique symbolic token.
    Symbol(Symbol),
    /// Arbitrary-precision integer (bounded to `i128` here).
    BigInt(i128),
}

impl Value {
    /// A fresh, empty record.
    pub fn object() -> Self {
        Self::Object(ObjectRef::new())
    }

    /// A fresh, empty array.
    pub fn array() -> Self {
        Self::Array(ArrayRef::new())
    }

    /// Classification used by traversals.
    pub fn category(&self) -> Category {
        match self {
            Self::Undefined | Self::Null | Self::Bool(_) | Self::Number(_) | Self::String(_) => {
                Category::Primitive
            }
            Self::Date(_) => Category::Temporal,
            Self::Array(_) => Category::Sequence,
            Self::Object(_) => Category::Record,
            Self::Function(_) => Category::Callable,
            Self::Symbol(_) | Self::BigInt(_) => Category::Unsupported,
        }
    }

    /// Runtime kind name, as a host `typeof`-style label.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Undefined => "undefined",
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::Date(_) => "date",
            Self::Array(_) => "array",
            Self::Object(_) => "object",
            Self::Function(_) => "function",
            Self::Symbol(_) => "symbol",
            Self::BigInt(_) => "bigint",
        }
    }

    /// Identity of the node behind this value; `None` for leaves.
    pub fn node_id(&self) -> Option<NodeId> {
        match self {
            Self::Array(a) => Some(a.id()),
            Self::Object(o) => Some(o.id()),
            Self::Function(f) => Some(f.id()),
            _ => None,
        }
    }

    /// Returns `true` if both values reference the same node.
    ///
    /// Leaves are never "the same node"; dates count only when they share a
    /// handle.
    pub fn same_node(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Date(a), Self::Date(b)) => a.ptr_eq(b),
            _ => match (self.node_id(), other.node_id()) {
                (Some(a), Some(b)) => a == b,
                _ => false,
            },
        }
    }

    /// Returns `true` for `undefined`.
    pub fn is_undefined(&self) -> bool {
        matches!(self, Self::Undefined)
    }

    /// Returns `true` for `null`.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Numeric payload.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Boolean payload.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// String payload.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Date handle.
    pub fn as_date(&self) -> Option<&DateRef> {
        match self {
            Self::Date(d) => Some(d),
            _ => None,
        }
    }

    /// Array handle.
    pub fn as_array(&self) -> Option<&ArrayRef> {
        match self {
            Self::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Record handle.
    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Self::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Callable handle.
    pub fn as_function(&self) -> Option<&FunctionRef> {
        match self {
            Self::Function(f) => Some(f),
            _ => None,
        }
    }

    /// Field lookup on records and callables; `None` for anything else.
    pub fn field(&self, key: &str) -> Option<Value> {
        match self {
            Self::Object(o) => o.get(key),
            Self::Function(f) => f.get(key),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Self::Number(f64::from(n))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<DateRef> for Value {
    fn from(d: DateRef) -> Self {
        Self::Date(d)
    }
}

impl From<ArrayRef> for Value {
    fn from(a: ArrayRef) -> Self {
        Self::Array(a)
    }
}

impl From<ObjectRef> for Value {
    fn from(o: ObjectRef) -> Self {
        Self::Object(o)
    }
}

impl From<FunctionRef> for Value {
    fn from(f: FunctionRef) -> Self {
        Self::Function(f)
    }
}

impl From<Symbol> for Value {
    fn from(s: Symbol) -> Self {
        Self::Symbol(s)
    }
}

impl FromIterator<Value> for Value {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self::Array(ArrayRef::from_vec(iter.into_iter().collect()))
    }
}
