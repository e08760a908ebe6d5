// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Callable nodes are wrapped and forward calls to the original.
#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use common::{configs, copy_with, field, record};
use echo_deep_copy::deep_copy;
use echo_value::{deep_eq, CallError, FunctionRef, Keyed, Value};

#[test]
fn cloned_callable_forwards_this_and_arguments() {
    let seen: Rc<RefCell<Vec<(Value, Vec<Value>)>>> = Rc::default();
    let log = Rc::clone(&seen);
    let original = FunctionRef::native("greet", move |this, args| {
        log.borrow_mut().push((this.clone(), args.to_vec()));
        let who = args.first().and_then(Value::as_str).unwrap_or("nobody");
        Ok(Value::from(format!("hello {who}")))
    });

    let out = deep_copy(&Value::Function(original.clone())).unwrap();
    let copy = out.as_function().unwrap();
    assert!(!copy.ptr_eq(&original));

    let receiver = record(vec![("id", Value::from(9))]);
    let result = copy
        .call(&receiver, &[Value::from("echo"), Value::from(2)])
        .unwrap();

    assert_eq!(result.as_str(), Some("hello echo"));
    let calls = seen.borrow();
    assert_eq!(calls.len(), 1);
    assert!(calls[0].0.same_node(&receiver));
    assert!(deep_eq(
        &Value::from_iter(calls[0].1.clone()),
        &Value::from_iter([Value::from("echo"), Value::from(2)])
    ));
}

#[test]
fn callable_environment_is_shared_not_cloned() {
    let counter = Rc::new(Cell::new(0));
    let captured = Rc::clone(&counter);
    let original = FunctionRef::native("bump", move |_, _| {
        captured.set(captured.get() + 1);
        Ok(Value::Number(f64::from(captured.get())))
    });

    let out = deep_copy(&Value::Function(original.clone())).unwrap();
    let copy = out.as_function().unwrap();
    original.call(&Value::Undefined, &[]).unwrap();
    let second = copy.call(&Value::Undefined, &[]).unwrap();

    assert_eq!(second.as_number(), Some(2.0));
    assert_eq!(counter.get(), 2);
}

#[test]
fn callable_fields_are_deep_copied() {
    let original = FunctionRef::native("f", |_, _| Ok(Value::Null));
    let meta = record(vec![("arity", Value::from(0))]);
    original.insert("meta", meta.clone());
    original.insert("version", Value::from("1"));

    for config in configs() {
        let out = copy_with(&config, &Value::Function(original.clone())).unwrap();
        let copy = out.as_function().unwrap();
        assert_eq!(copy.keys(), ["meta", "version"]);
        assert!(!field(&out, "meta").same_node(&meta));
        assert!(deep_eq(&field(&out, "meta"), &meta));
        copy.insert("extra", Value::Null);
        assert!(!original.contains_key("extra"));
    }
}

#[test]
fn callable_referencing_itself_terminates() {
    let original = FunctionRef::native("rec", |_, _| Ok(Value::Undefined));
    original.insert("self", Value::Function(original.clone()));
    let holder = record(vec![
        ("f", Value::Function(original.clone())),
        ("g", Value::Function(original)),
    ]);

    for config in configs() {
        let out = copy_with(&config, &holder).unwrap();
        let f = field(&out, "f");
        assert!(f.same_node(&field(&out, "g")));
        assert!(field(&f, "self").same_node(&f));
    }
}

#[test]
fn errors_from_the_original_surface_through_the_copy() {
    let original = FunctionRef::native("fail", |_, _| Err(CallError::new("fail", "refused")));
    let out = deep_copy(&Value::Function(original)).unwrap();
    let err = out
        .as_function()
        .unwrap()
        .call(&Value::Undefined, &[])
        .unwrap_err();
    assert_eq!(err.message, "refused");
}

#[test]
fn copying_a_copy_still_reaches_the_original_body() {
    let original = FunctionRef::native("id", |_, args| {
        Ok(args.first().cloned().unwrap_or(Value::Undefined))
    });
    let once = deep_copy(&Value::Function(original.clone())).unwrap();
    let twice = deep_copy(&once).unwrap();
    let f = twice.as_function().unwrap();
    assert!(f.resolve().ptr_eq(&original));
    assert_eq!(f.call(&Value::Null, &[Value::from(4)]).unwrap().as_number(), Some(4.0));
}
