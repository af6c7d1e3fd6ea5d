//! End-to-end contract enforcement.
//!
//! These tests exercise the full pipeline (decorate, bind, check
//! arguments, execute, check the return) through the public API only.

#![allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]

use pedant::{
    BindingEnv, CallArgs, CallFailure, ClassDef, ContractBuilder, ContractError,
    ContractErrorKind, DocstringRecord, ErrorCode, FunctionValue, InstanceValue, Param, Scope,
    TypeExpr, TypeVarRef, Value,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// `def total(values: Sequence[int | float]) -> int | float`, plus a call
/// counter so tests can observe whether the body actually ran.
fn total_fn(calls: Arc<AtomicUsize>) -> FunctionValue {
    let body: pedant::CallBody = Arc::new(move |args| {
        calls.fetch_add(1, Ordering::SeqCst);
        let Value::List(items) = &args[0].1 else {
            return Err("expected a list".to_owned());
        };
        let total = items.iter().fold(0.0, |acc, v| match v {
            Value::Int(n) => acc + *n as f64,
            Value::Float(x) => acc + x,
            _ => acc,
        });
        Ok(Value::float(total))
    });
    let numeric = TypeExpr::union(vec![TypeExpr::int(), TypeExpr::float()]);
    FunctionValue::new(
        "total",
        vec![Param::new("values", TypeExpr::sequence_of(numeric.clone()))],
        Some(numeric),
        body,
    )
}

fn expect_contract(failure: CallFailure) -> ContractError {
    match failure {
        CallFailure::Contract(err) => err,
        CallFailure::Execution { detail, .. } => panic!("body failed instead: {detail}"),
    }
}

#[test]
fn conforming_call_runs_and_returns() {
    let calls = Arc::new(AtomicUsize::new(0));
    let contract = ContractBuilder::new(total_fn(calls.clone())).build().unwrap();
    let values = Value::list(vec![Value::int(1), Value::float(2.5), Value::int(3)]);
    let out = contract
        .call(CallArgs::named(vec![("values", values)]))
        .unwrap();
    assert_eq!(out, Value::float(6.5));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn offending_element_is_pinpointed() {
    let calls = Arc::new(AtomicUsize::new(0));
    let contract = ContractBuilder::new(total_fn(calls.clone())).build().unwrap();
    let values = Value::list(vec![Value::int(1), Value::string("x")]);
    let err = expect_contract(
        contract
            .call(CallArgs::named(vec![("values", values)]))
            .unwrap_err(),
    );
    assert_eq!(err.code(), ErrorCode::P0003);
    assert_eq!(err.path, "values[1]");
    assert_eq!(err.expected, "int | float");
    assert_eq!(err.actual, "str");
    assert!(err.to_string().starts_with("[P0003]"), "got: {err}");
    // The argument check failed, so the body never ran.
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn bool_does_not_satisfy_a_numeric_union() {
    let calls = Arc::new(AtomicUsize::new(0));
    let contract = ContractBuilder::new(total_fn(calls)).build().unwrap();
    let values = Value::list(vec![Value::bool(true)]);
    let err = expect_contract(
        contract
            .call(CallArgs::named(vec![("values", values)]))
            .unwrap_err(),
    );
    assert_eq!(err.path, "values[0]");
    assert_eq!(err.actual, "bool");
}

#[test]
fn positional_call_never_reaches_the_body() {
    let calls = Arc::new(AtomicUsize::new(0));
    let contract = ContractBuilder::new(total_fn(calls.clone())).build().unwrap();
    let err = expect_contract(
        contract
            .call(CallArgs::positional(vec![Value::list(vec![Value::int(1)])]))
            .unwrap_err(),
    );
    assert_eq!(err.code(), ErrorCode::P0002);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn mapping_failures_name_the_key() {
    let body: pedant::CallBody = Arc::new(|_| Ok(Value::None));
    let f = FunctionValue::new(
        "configure",
        vec![Param::new(
            "cfg",
            TypeExpr::mapping_of(TypeExpr::string(), TypeExpr::int()),
        )],
        Some(TypeExpr::None),
        body,
    );
    let contract = ContractBuilder::new(f).build().unwrap();
    let cfg = Value::map(vec![
        (Value::string("host"), Value::int(1)),
        (Value::string("port"), Value::string("8080")),
    ]);
    let err = expect_contract(
        contract
            .call(CallArgs::named(vec![("cfg", cfg)]))
            .unwrap_err(),
    );
    assert_eq!(err.path, "cfg['port']");
    assert_eq!(err.actual, "str");
}

#[test]
fn forward_reference_resolves_against_the_call_scope() {
    let node = ClassDef::new("Node");
    let instance = Value::instance(InstanceValue::new(node));
    let returned = instance.clone();
    let body: pedant::CallBody = Arc::new(move |_| Ok(returned.clone()));
    let f = FunctionValue::new(
        "clone_node",
        vec![Param::new("node", TypeExpr::forward_ref("Node"))],
        Some(TypeExpr::forward_ref("Node")),
        body,
    );
    let contract = ContractBuilder::new(f).build().unwrap();

    let mut scope = Scope::module("graph");
    scope.bind("Node", TypeExpr::class("Node"));
    let env = BindingEnv::new();

    let out = contract
        .call_in(
            CallArgs::named(vec![("node", instance.clone())]),
            &scope,
            &env,
        )
        .unwrap();
    assert_eq!(out, instance);

    // The same call without the binding is a declaration defect, not a
    // value mismatch.
    let empty = Scope::module("empty");
    let err = expect_contract(
        contract
            .call_in(CallArgs::named(vec![("node", instance)]), &empty, &env)
            .unwrap_err(),
    );
    assert_eq!(err.code(), ErrorCode::P0004);
    assert_eq!(
        err.kind,
        ContractErrorKind::UnresolvedForwardReference {
            name: "Node".to_owned()
        }
    );
    assert!(err.message.contains("module 'empty'"));
}

#[test]
fn type_variable_takes_its_binding_from_the_environment() {
    let body: pedant::CallBody = Arc::new(|args| Ok(args[0].1.clone()));
    let t = TypeVarRef::new("T");
    let f = FunctionValue::new(
        "identity",
        vec![Param::new("x", TypeExpr::var(t.clone()))],
        Some(TypeExpr::var(t)),
        body,
    );
    let contract = ContractBuilder::new(f).build().unwrap();
    let scope = Scope::module("m");

    let mut env = BindingEnv::new();
    env.bind("T", TypeExpr::int());
    assert!(contract
        .call_in(CallArgs::named(vec![("x", Value::int(1))]), &scope, &env)
        .is_ok());
    let err = expect_contract(
        contract
            .call_in(
                CallArgs::named(vec![("x", Value::string("s"))]),
                &scope,
                &env,
            )
            .unwrap_err(),
    );
    assert_eq!(err.path, "x");

    // Unbound and unconstrained, the variable degrades to Any.
    let unbound = BindingEnv::new();
    assert!(contract
        .call_in(
            CallArgs::named(vec![("x", Value::string("s"))]),
            &scope,
            &unbound,
        )
        .is_ok());
}

#[test]
fn optional_accepts_none_and_the_inner_type() {
    let body: pedant::CallBody = Arc::new(|args| Ok(args[0].1.clone()));
    let f = FunctionValue::new(
        "lookup",
        vec![Param::new("key", TypeExpr::optional(TypeExpr::string()))],
        Some(TypeExpr::optional(TypeExpr::string())),
        body,
    );
    let contract = ContractBuilder::new(f).build().unwrap();
    assert!(contract
        .call(CallArgs::named(vec![("key", Value::None)]))
        .is_ok());
    assert!(contract
        .call(CallArgs::named(vec![("key", Value::string("k"))]))
        .is_ok());
    assert!(contract
        .call(CallArgs::named(vec![("key", Value::int(3))]))
        .is_err());
}

#[test]
fn docstring_checked_at_decoration_end_to_end() {
    let calls = Arc::new(AtomicUsize::new(0));
    let ok = ContractBuilder::new(total_fn(calls.clone()))
        .docstring(
            DocstringRecord::new()
                .param("values", "Sequence[int | float]")
                .returns("int | float"),
        )
        .build();
    assert!(ok.is_ok());

    let drift = ContractBuilder::new(total_fn(calls))
        .docstring(
            DocstringRecord::new()
                .param("values", "list[int]")
                .returns("int | float"),
        )
        .build()
        .unwrap_err();
    assert_eq!(drift.code(), ErrorCode::P0006);
}
