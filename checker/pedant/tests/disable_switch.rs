//! The process-wide enforcement switch.
//!
//! The flag is process-global state, so everything lives in one test
//! function; this file runs as its own process and cannot race the other
//! integration suites.

#![allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]

use pedant::{
    disable, enable, is_enabled, CallArgs, ContractBuilder, FunctionValue, Param, TypeExpr, Value,
};
use std::sync::Arc;

#[test]
fn disabling_skips_every_check_and_reenabling_restores_them() {
    // Default is on (PEDANT_ENABLE unset in the test environment).
    assert!(is_enabled());

    disable();

    // While disabled, decoration does not introspect: a signature with no
    // annotations at all builds fine.
    let body: pedant::CallBody = Arc::new(|args| Ok(args[0].1.clone()));
    let untyped = FunctionValue::new("untyped", vec![Param::untyped("x")], None, body);
    let contract = ContractBuilder::new(untyped).build().unwrap();

    // And calls run unchecked: positional arguments, any value type.
    let out = contract
        .call(CallArgs::positional(vec![Value::string("anything")]))
        .unwrap();
    assert_eq!(out, Value::string("anything"));

    enable();

    // Back on, the deferred introspection failure surfaces at the first
    // enforced call.
    let err = contract
        .call(CallArgs::named(vec![("x", Value::int(1))]))
        .unwrap_err();
    assert!(err.to_string().contains("[P0001]"), "got: {err}");

    // A well-typed contract enforces again.
    let body: pedant::CallBody = Arc::new(|args| Ok(args[0].1.clone()));
    let typed = FunctionValue::new(
        "typed",
        vec![Param::new("x", TypeExpr::int())],
        Some(TypeExpr::int()),
        body,
    );
    let contract = ContractBuilder::new(typed).build().unwrap();
    assert!(contract
        .call(CallArgs::named(vec![("x", Value::string("no"))]))
        .is_err());
    assert!(contract
        .call(CallArgs::named(vec![("x", Value::int(5))]))
        .is_ok());
}
