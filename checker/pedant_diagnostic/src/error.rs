//! The structured contract error.

use crate::error_code::ErrorCode;
use std::fmt;

/// Result alias used across the contract-checking crates.
pub type ContractResult<T> = Result<T, ContractError>;

/// Category of a contract violation.
///
/// Variants carry the structured data for their condition; the owning
/// [`ContractError`] adds the rendered message and path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ContractErrorKind {
    /// A parameter or the return position has no type annotation.
    MissingAnnotation { name: String },
    /// The call supplied arguments positionally instead of by name.
    PositionalArgumentRejected { count: usize },
    /// A value failed its declared type at the recorded path.
    TypeMismatch,
    /// A forward reference could not be resolved by name lookup.
    UnresolvedForwardReference { name: String },
    /// A forward-reference chain resolved back into itself.
    ForwardReferenceCycle { name: String },
    /// Documented parameter or return disagrees with the signature.
    DocstringDrift {
        subject: String,
        declared: String,
        documented: String,
    },
    /// A method was introspected before its owning instance was bound.
    AmbiguousSelf { function: String },
    /// Named-argument binding failed (unknown, missing, or duplicate).
    ArgumentBinding { detail: String },
    /// Strict-mode declaration lint: a container annotation without
    /// type arguments.
    StrictDeclaration { name: String, annotation: String },
}

impl ContractErrorKind {
    pub fn code(&self) -> ErrorCode {
        match self {
            ContractErrorKind::MissingAnnotation { .. } => ErrorCode::P0001,
            ContractErrorKind::PositionalArgumentRejected { .. } => ErrorCode::P0002,
            ContractErrorKind::TypeMismatch => ErrorCode::P0003,
            ContractErrorKind::UnresolvedForwardReference { .. } => ErrorCode::P0004,
            ContractErrorKind::ForwardReferenceCycle { .. } => ErrorCode::P0005,
            ContractErrorKind::DocstringDrift { .. } => ErrorCode::P0006,
            ContractErrorKind::AmbiguousSelf { .. } => ErrorCode::P0007,
            ContractErrorKind::ArgumentBinding { .. } => ErrorCode::P0008,
            ContractErrorKind::StrictDeclaration { .. } => ErrorCode::P0009,
        }
    }
}

/// A single structured contract violation.
///
/// `path`, `expected`, and `actual` are populated for type mismatches and
/// resolution failures; other kinds leave them empty.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("[{}] {}", self.kind.code(), self.message)]
pub struct ContractError {
    pub kind: ContractErrorKind,
    pub message: String,
    /// Rendered structural path (`values[1]`), empty when not applicable.
    pub path: String,
    /// Rendered expected type, empty when not applicable.
    pub expected: String,
    /// Rendered actual type, empty when not applicable.
    pub actual: String,
}

impl ContractError {
    pub fn new(kind: ContractErrorKind, message: impl Into<String>) -> Self {
        ContractError {
            kind,
            message: message.into(),
            path: String::new(),
            expected: String::new(),
            actual: String::new(),
        }
    }

    pub fn missing_annotation(function: &str, name: &str) -> Self {
        ContractError::new(
            ContractErrorKind::MissingAnnotation {
                name: name.to_owned(),
            },
            format!("in function {function}: parameter '{name}' has no type annotation"),
        )
    }

    pub fn missing_return_annotation(function: &str) -> Self {
        ContractError::new(
            ContractErrorKind::MissingAnnotation {
                name: "return".to_owned(),
            },
            format!("in function {function}: the return type has no annotation"),
        )
    }

    pub fn positional_rejected(function: &str, count: usize) -> Self {
        ContractError::new(
            ContractErrorKind::PositionalArgumentRejected { count },
            format!(
                "in function {function}: pass all {count} argument(s) by name, \
                 positional arguments are rejected"
            ),
        )
    }

    pub fn type_mismatch(
        function: &str,
        path: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
        reason: &str,
    ) -> Self {
        let path = path.into();
        let expected = expected.into();
        let actual = actual.into();
        ContractError {
            kind: ContractErrorKind::TypeMismatch,
            message: format!("in function {function}: {reason}"),
            path,
            expected,
            actual,
        }
    }

    pub fn unresolved_forward_reference(function: &str, name: &str, reason: &str) -> Self {
        ContractError::new(
            ContractErrorKind::UnresolvedForwardReference {
                name: name.to_owned(),
            },
            format!("in function {function}: {reason}"),
        )
    }

    pub fn forward_reference_cycle(function: &str, name: &str, reason: &str) -> Self {
        ContractError::new(
            ContractErrorKind::ForwardReferenceCycle {
                name: name.to_owned(),
            },
            format!("in function {function}: {reason}"),
        )
    }

    pub fn docstring_drift(
        function: &str,
        subject: &str,
        declared: impl Into<String>,
        documented: impl Into<String>,
    ) -> Self {
        let declared = declared.into();
        let documented = documented.into();
        ContractError::new(
            ContractErrorKind::DocstringDrift {
                subject: subject.to_owned(),
                declared: declared.clone(),
                documented: documented.clone(),
            },
            format!(
                "in function {function}: documentation for {subject} is out of sync: \
                 signature declares '{declared}' but documentation says '{documented}'"
            ),
        )
    }

    pub fn ambiguous_self(function: &str) -> Self {
        ContractError::new(
            ContractErrorKind::AmbiguousSelf {
                function: function.to_owned(),
            },
            format!("method {function} cannot be checked before its instance is bound"),
        )
    }

    pub fn argument_binding(function: &str, detail: impl Into<String>) -> Self {
        let detail = detail.into();
        ContractError::new(
            ContractErrorKind::ArgumentBinding {
                detail: detail.clone(),
            },
            format!("in function {function}: {detail}"),
        )
    }

    pub fn strict_declaration(function: &str, name: &str, annotation: &str) -> Self {
        ContractError::new(
            ContractErrorKind::StrictDeclaration {
                name: name.to_owned(),
                annotation: annotation.to_owned(),
            },
            format!(
                "in function {function}: annotation '{annotation}' for '{name}' \
                 is missing its type arguments"
            ),
        )
    }

    pub fn code(&self) -> ErrorCode {
        self.kind.code()
    }
}

/// Compact kind name, mostly for logs and assertions.
impl fmt::Display for ContractErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ContractErrorKind::MissingAnnotation { .. } => "MissingAnnotation",
            ContractErrorKind::PositionalArgumentRejected { .. } => "PositionalArgumentRejected",
            ContractErrorKind::TypeMismatch => "TypeMismatch",
            ContractErrorKind::UnresolvedForwardReference { .. } => "UnresolvedForwardReference",
            ContractErrorKind::ForwardReferenceCycle { .. } => "ForwardReferenceCycle",
            ContractErrorKind::DocstringDrift { .. } => "DocstringDrift",
            ContractErrorKind::AmbiguousSelf { .. } => "AmbiguousSelf",
            ContractErrorKind::ArgumentBinding { .. } => "ArgumentBinding",
            ContractErrorKind::StrictDeclaration { .. } => "StrictDeclaration",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn type_mismatch_carries_structure() {
        let err = ContractError::type_mismatch(
            "f",
            "values[1]",
            "int | float",
            "str",
            "argument values[1] of type str does not match int | float",
        );
        assert_eq!(err.kind, ContractErrorKind::TypeMismatch);
        assert_eq!(err.path, "values[1]");
        assert_eq!(err.expected, "int | float");
        assert_eq!(err.actual, "str");
        assert_eq!(err.code(), ErrorCode::P0003);
    }

    #[test]
    fn display_includes_code_and_message() {
        let err = ContractError::positional_rejected("f", 3);
        let rendered = err.to_string();
        assert!(rendered.starts_with("[P0002]"), "got: {rendered}");
        assert!(rendered.contains("by name"));
    }

    #[test]
    fn each_kind_maps_to_a_distinct_code() {
        let errors = [
            ContractError::missing_annotation("f", "a"),
            ContractError::positional_rejected("f", 1),
            ContractError::type_mismatch("f", "a", "int", "str", "no"),
            ContractError::unresolved_forward_reference("f", "Node", "no"),
            ContractError::forward_reference_cycle("f", "A", "cycle"),
            ContractError::docstring_drift("f", "parameter 'a'", "int", "str"),
            ContractError::ambiguous_self("f"),
            ContractError::argument_binding("f", "unexpected argument 'z'"),
            ContractError::strict_declaration("f", "a", "list"),
        ];
        let mut codes: Vec<&str> = errors.iter().map(|e| e.code().as_str()).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }
}
