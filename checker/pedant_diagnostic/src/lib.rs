//! Error taxonomy for pedant.
//!
//! Every contract violation surfaces as one structured [`ContractError`]
//! carrying a message, the structural path, and the expected/actual type
//! renderings. Errors are returned synchronously at the call site and are
//! never logged-and-swallowed by the core; deciding what to log is the
//! embedding application's concern.

mod error;
mod error_code;

pub use error::{ContractError, ContractErrorKind, ContractResult};
pub use error_code::ErrorCode;
