//! Signature introspection for pedant.
//!
//! A callable's declared parameter and return types are extracted once
//! into a [`SignatureRecord`] and cached for the lifetime of the process,
//! keyed by callable identity. The checker never inspects callables
//! directly; it consumes only the record, which keeps the engine
//! independent of how callables are represented.

mod cache;
mod lint;
mod record;

pub use cache::SignatureCache;
pub use lint::{declaration_lints, ContractFlags};
pub use record::{introspect, ParamRecord, SignatureRecord};
