//! Runtime values checked by pedant.
//!
//! # Heap Enforcement
//!
//! All heap allocations go through factory methods on `Value`. The
//! `Heap<T>` wrapper has a private constructor, so external code cannot
//! build heap-backed variants directly:
//!
//! ```text
//! let s = Value::string("hello");        // OK
//! let xs = Value::list(vec![]);          // OK
//! let s = Value::Str(Heap::new(...));    // won't compile outside the crate
//! ```
//!
//! # Thread Safety
//!
//! Heap values use `Arc` internally; callable bodies are `Send + Sync`.
//! Values are immutable once constructed; the checker never mutates what
//! it inspects.

mod class;
mod function;
mod heap;
mod value;

pub use class::{ClassDef, InstanceValue};
pub use function::{CallBody, FunctionId, FunctionKind, FunctionValue, Param};
pub use heap::Heap;
pub use value::Value;
