//! The result of one conformance check.

use crate::path::ValuePath;
use std::fmt;

/// Why a check failed.
///
/// Most failures are plain mismatches; resolution failures get their own
/// kinds so the call wrapper can map them onto the error taxonomy instead
/// of parsing reason strings.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FailKind {
    /// The value does not conform to the type expression.
    Mismatch,
    /// A forward reference could not be resolved in any enclosing scope.
    UnresolvedForwardRef,
    /// A forward-reference chain resolved back to itself.
    ForwardRefCycle,
}

/// Details of a failed check.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FailInfo {
    pub kind: FailKind,
    /// Where in the value structure the failure occurred.
    pub path: ValuePath,
    /// Rendering of the expected type expression.
    pub expected: String,
    /// Rendering of the offending value's runtime type.
    pub actual: String,
    /// Human-readable explanation.
    pub reason: String,
}

/// Pass/Fail outcome of a single `check` call.
///
/// Failures are boxed: the pass path is the hot path and stays one word.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Verdict {
    Pass,
    Fail(Box<FailInfo>),
}

impl Verdict {
    /// A plain mismatch failure.
    pub fn mismatch(
        path: ValuePath,
        expected: impl Into<String>,
        actual: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Verdict::Fail(Box::new(FailInfo {
            kind: FailKind::Mismatch,
            path,
            expected: expected.into(),
            actual: actual.into(),
            reason: reason.into(),
        }))
    }

    /// An unresolved forward-reference failure.
    pub fn unresolved(path: ValuePath, name: &str, scopes: &str) -> Self {
        Verdict::Fail(Box::new(FailInfo {
            kind: FailKind::UnresolvedForwardRef,
            path,
            expected: format!("'{name}'"),
            actual: String::new(),
            reason: format!("forward reference '{name}' could not be resolved (searched {scopes})"),
        }))
    }

    /// A cyclic forward-reference failure.
    pub fn ref_cycle(path: ValuePath, name: &str) -> Self {
        Verdict::Fail(Box::new(FailInfo {
            kind: FailKind::ForwardRefCycle,
            path,
            expected: format!("'{name}'"),
            actual: String::new(),
            reason: format!("forward reference '{name}' is part of a resolution cycle"),
        }))
    }

    pub fn is_pass(&self) -> bool {
        matches!(self, Verdict::Pass)
    }

    pub fn is_fail(&self) -> bool {
        !self.is_pass()
    }

    /// The failure details, if any.
    pub fn fail_info(&self) -> Option<&FailInfo> {
        match self {
            Verdict::Pass => None,
            Verdict::Fail(info) => Some(info),
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Pass => f.write_str("Pass"),
            Verdict::Fail(info) => {
                write!(f, "Fail at {}: {}", info.path, info.reason)
            }
        }
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn mismatch_carries_path_and_types() {
        let v = Verdict::mismatch(
            ValuePath::arg("values").index(1),
            "int | float",
            "str",
            "value 'x' does not match int | float",
        );
        let info = v.fail_info().unwrap();
        assert_eq!(info.kind, FailKind::Mismatch);
        assert_eq!(info.path.to_string(), "values[1]");
        assert_eq!(info.expected, "int | float");
        assert_eq!(info.actual, "str");
    }

    #[test]
    fn pass_has_no_info() {
        assert!(Verdict::Pass.is_pass());
        assert!(Verdict::Pass.fail_info().is_none());
    }

    #[test]
    fn display_includes_path() {
        let v = Verdict::mismatch(ValuePath::arg("n"), "int", "str", "not an int");
        assert_eq!(v.to_string(), "Fail at n: not an int");
    }
}
