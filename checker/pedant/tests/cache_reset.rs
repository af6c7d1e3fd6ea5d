//! The shared signature cache.
//!
//! The cache is process-global, so this file holds a single test and runs
//! as its own process.

#![allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]

use pedant::{
    reset_signature_cache, signature_cache, CallArgs, ContractBuilder, FunctionValue, Param,
    TypeExpr, Value,
};
use std::sync::Arc;

#[test]
fn signatures_are_introspected_once_and_reset_clears_them() {
    reset_signature_cache();
    assert!(signature_cache().is_empty());

    let body: pedant::CallBody = Arc::new(|args| Ok(args[0].1.clone()));
    let f = FunctionValue::new(
        "echo",
        vec![Param::new("x", TypeExpr::int())],
        Some(TypeExpr::int()),
        body,
    );
    let contract = ContractBuilder::new(f).build().unwrap();
    assert_eq!(signature_cache().len(), 1);

    // Repeated calls reuse the cached record.
    contract.call(CallArgs::named(vec![("x", Value::int(1))])).unwrap();
    contract.call(CallArgs::named(vec![("x", Value::int(2))])).unwrap();
    assert_eq!(signature_cache().len(), 1);

    reset_signature_cache();
    assert!(signature_cache().is_empty());

    // The next call repopulates transparently.
    contract.call(CallArgs::named(vec![("x", Value::int(3))])).unwrap();
    assert_eq!(signature_cache().len(), 1);
}
