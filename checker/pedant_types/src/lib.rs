//! Type-expression model for pedant.
//!
//! This crate provides the normalized in-memory representation of a type
//! annotation (`TypeExpr`), the result of a single conformance check
//! (`Verdict`), and the structural path used in error messages
//! (`ValuePath`).
//!
//! # Design
//!
//! `TypeExpr` is a closed tagged union: the checker dispatches on it
//! exhaustively, so adding a new kind of annotation means updating one
//! central `match`, not scattered instance checks. Trees are immutable and
//! value-owned; they are built once per signature inspection and shared
//! from the signature cache afterwards.

mod expr;
mod path;
mod verdict;

pub use expr::{ClassRef, ContainerKind, LiteralValue, TypeExpr, TypeVarRef};
pub use path::{PathSegment, ValuePath};
pub use verdict::{FailInfo, FailKind, Verdict};
