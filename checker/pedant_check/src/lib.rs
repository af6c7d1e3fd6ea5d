//! Structural conformance checking.
//!
//! The engine is one pure function: [`check`] takes a runtime value and a
//! type expression and returns a [`Verdict`]. No mutation, no I/O; forward
//! references and type variables are resolved through the context's scope
//! and binding environment.
//!
//! # Main Entry Points
//!
//! - [`check`]: value-against-type conformance
//! - [`assignable`]: the type-to-type relation used for `Callable` matching
//! - [`CheckContext`]: scope + binding environment handed in per check

mod assign;
mod check;

#[cfg(test)]
mod prop_tests;

pub use assign::assignable;
pub use check::{check, CheckContext};
