//! Runtime type-contract enforcement for dynamically-typed calls.
//!
//! A [`Contract`] wraps a callable value and enforces, at every call:
//!
//! - arguments are supplied by name (positional calls are rejected),
//! - each bound argument conforms to its declared type,
//! - the return value conforms to the declared return type,
//! - attached documentation stays in sync with the signature.
//!
//! Argument failures abort the call before the wrapped body runs. A return
//! failure necessarily surfaces *after* the body ran, when side effects have
//! already happened and cannot be undone; this is documented behavior, not
//! a bug.
//!
//! # Main Entry Points
//!
//! - [`ContractBuilder`] / [`Contract`]: decoration and call enforcement
//! - [`enable`] / [`disable`] / [`is_enabled`]: the process-wide switch
//! - [`signature_cache`] / [`reset_signature_cache`]: the shared cache
//!
//! # Example
//!
//! ```
//! use pedant::{CallArgs, ContractBuilder};
//! use pedant_types::TypeExpr;
//! use pedant_value::{FunctionValue, Param, Value};
//! use std::sync::Arc;
//!
//! let body: pedant_value::CallBody = Arc::new(|args| {
//!     let Value::List(items) = &args[0].1 else {
//!         return Err("expected a list".to_owned());
//!     };
//!     let total = items.iter().fold(0.0, |acc, v| match v {
//!         Value::Int(n) => acc + *n as f64,
//!         Value::Float(x) => acc + x,
//!         _ => acc,
//!     });
//!     Ok(Value::float(total))
//! });
//! let func = FunctionValue::new(
//!     "total",
//!     vec![Param::new(
//!         "values",
//!         TypeExpr::sequence_of(TypeExpr::union(vec![TypeExpr::int(), TypeExpr::float()])),
//!     )],
//!     Some(TypeExpr::union(vec![TypeExpr::int(), TypeExpr::float()])),
//!     body,
//! );
//! let contract = ContractBuilder::new(func).build().unwrap();
//! let values = Value::list(vec![Value::int(1), Value::float(2.5), Value::int(3)]);
//! let result = contract.call(CallArgs::named(vec![("values", values)])).unwrap();
//! assert_eq!(result, Value::float(6.5));
//! ```

mod contract;
mod docstring;
mod flag;

pub use contract::{CallArgs, CallFailure, CallState, Contract, ContractBuilder};
pub use docstring::{check_docstring, DocstringRecord};
pub use flag::{disable, enable, is_enabled};

// Re-export the pieces embedders need to build annotations and values.
pub use pedant_check::{assignable, check, CheckContext};
pub use pedant_diagnostic::{ContractError, ContractErrorKind, ErrorCode};
pub use pedant_resolve::{BindingEnv, Scope};
pub use pedant_sig::{ContractFlags, SignatureCache, SignatureRecord};
pub use pedant_types::{TypeExpr, TypeVarRef, ValuePath, Verdict};
pub use pedant_value::{
    CallBody, ClassDef, FunctionKind, FunctionValue, InstanceValue, Param, Value,
};

use std::sync::OnceLock;

static CACHE: OnceLock<SignatureCache> = OnceLock::new();

/// The process-wide signature cache shared by every contract.
pub fn signature_cache() -> &'static SignatureCache {
    CACHE.get_or_init(SignatureCache::new)
}

/// Clear every cached signature. Test-teardown hook; running calls that
/// already fetched their record are unaffected.
pub fn reset_signature_cache() {
    signature_cache().reset();
}
