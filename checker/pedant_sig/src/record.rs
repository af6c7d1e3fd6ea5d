//! Structured signature records.

use pedant_diagnostic::{ContractError, ContractResult};
use pedant_types::TypeExpr;
use pedant_value::{FunctionKind, FunctionValue};
use std::sync::Arc;

/// One declared parameter, as the checker consumes it.
#[derive(Clone, Debug, PartialEq)]
pub struct ParamRecord {
    pub name: Arc<str>,
    pub ty: TypeExpr,
    pub has_default: bool,
}

/// Cached description of a callable's declared types.
///
/// Built once per callable; a callable's signature must not change after
/// first inspection (callers must not mutate annotations post-decoration;
/// if they do, behavior is undefined by contract).
#[derive(Clone, Debug, PartialEq)]
pub struct SignatureRecord {
    pub params: Vec<ParamRecord>,
    pub ret: TypeExpr,
}

impl SignatureRecord {
    pub fn param(&self, name: &str) -> Option<&ParamRecord> {
        self.params.iter().find(|p| &*p.name == name)
    }
}

/// Extract a [`SignatureRecord`] from a callable.
///
/// Every parameter and the return position must carry an annotation; there
/// is no "untyped acceptable" sentinel: a missing annotation is always
/// [`MissingAnnotation`](pedant_diagnostic::ContractErrorKind::MissingAnnotation),
/// even when the parameter has a default. An unbound method cannot be
/// introspected: its `self` slot has no known instance yet.
pub fn introspect(function: &FunctionValue) -> ContractResult<SignatureRecord> {
    let params = match function.kind() {
        FunctionKind::Method { bound: false } => {
            return Err(ContractError::ambiguous_self(function.name()));
        }
        FunctionKind::Method { bound: true } => {
            // The leading self slot is implicit once bound.
            function.params().get(1..).unwrap_or(&[])
        }
        FunctionKind::Free => function.params(),
    };

    let mut records = Vec::with_capacity(params.len());
    for param in params {
        let ty = param
            .annotation
            .clone()
            .ok_or_else(|| ContractError::missing_annotation(function.name(), &param.name))?;
        records.push(ParamRecord {
            name: param.name.clone(),
            ty,
            has_default: param.default.is_some(),
        });
    }

    let ret = function
        .ret()
        .cloned()
        .ok_or_else(|| ContractError::missing_return_annotation(function.name()))?;

    Ok(SignatureRecord {
        params: records,
        ret,
    })
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
mod tests {
    use super::*;
    use pedant_diagnostic::ContractErrorKind;
    use pedant_value::{CallBody, Param, Value};
    use pretty_assertions::assert_eq;

    fn noop() -> CallBody {
        Arc::new(|_| Ok(Value::None))
    }

    #[test]
    fn fully_annotated_function_introspects() {
        let f = FunctionValue::new(
            "add",
            vec![
                Param::new("a", TypeExpr::int()),
                Param::new("b", TypeExpr::int()).with_default(Value::int(0)),
            ],
            Some(TypeExpr::int()),
            noop(),
        );
        let record = introspect(&f).unwrap();
        assert_eq!(record.params.len(), 2);
        assert_eq!(&*record.params[0].name, "a");
        assert!(!record.params[0].has_default);
        assert!(record.params[1].has_default);
        assert_eq!(record.ret, TypeExpr::int());
        assert_eq!(record.param("b").unwrap().ty, TypeExpr::int());
    }

    #[test]
    fn missing_parameter_annotation_is_rejected() {
        let f = FunctionValue::new(
            "f",
            vec![Param::new("a", TypeExpr::int()), Param::untyped("b")],
            Some(TypeExpr::int()),
            noop(),
        );
        let err = introspect(&f).unwrap_err();
        assert_eq!(
            err.kind,
            ContractErrorKind::MissingAnnotation {
                name: "b".to_owned()
            }
        );
    }

    #[test]
    fn missing_return_annotation_is_rejected() {
        let f = FunctionValue::new("f", vec![], None, noop());
        let err = introspect(&f).unwrap_err();
        assert_eq!(
            err.kind,
            ContractErrorKind::MissingAnnotation {
                name: "return".to_owned()
            }
        );
    }

    #[test]
    fn default_does_not_excuse_a_missing_annotation() {
        let f = FunctionValue::new(
            "f",
            vec![Param::untyped("a").with_default(Value::int(1))],
            Some(TypeExpr::None),
            noop(),
        );
        assert!(introspect(&f).is_err());
    }

    #[test]
    fn unbound_method_is_ambiguous() {
        let f = FunctionValue::new(
            "method",
            vec![Param::untyped("self"), Param::new("x", TypeExpr::int())],
            Some(TypeExpr::int()),
            noop(),
        )
        .with_kind(FunctionKind::Method { bound: false });
        let err = introspect(&f).unwrap_err();
        assert!(matches!(err.kind, ContractErrorKind::AmbiguousSelf { .. }));
    }

    #[test]
    fn bound_method_skips_self() {
        let f = FunctionValue::new(
            "method",
            vec![Param::untyped("self"), Param::new("x", TypeExpr::int())],
            Some(TypeExpr::int()),
            noop(),
        )
        .with_kind(FunctionKind::Method { bound: true });
        let record = introspect(&f).unwrap();
        assert_eq!(record.params.len(), 1);
        assert_eq!(&*record.params[0].name, "x");
    }
}
