//! Documentation drift detection.
//!
//! A [`DocstringRecord`] is the already-parsed type content of a
//! docstring: one type string per documented parameter plus the documented
//! return type. Drift checking compares those strings against the rendered
//! signature, character for character. `"list[int]"` and `"List[int]"` do
//! not match; normalization is the documenter's job.

use pedant_diagnostic::{ContractError, ContractResult};
use pedant_sig::SignatureRecord;
use pedant_types::TypeExpr;
use std::sync::Arc;

/// Parsed type claims of a docstring.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DocstringRecord {
    params: Vec<(Arc<str>, String)>,
    ret: Option<String>,
}

impl DocstringRecord {
    pub fn new() -> Self {
        DocstringRecord::default()
    }

    /// Document a parameter's type.
    #[must_use]
    pub fn param(mut self, name: impl Into<Arc<str>>, ty: impl Into<String>) -> Self {
        self.params.push((name.into(), ty.into()));
        self
    }

    /// Document the return type.
    #[must_use]
    pub fn returns(mut self, ty: impl Into<String>) -> Self {
        self.ret = Some(ty.into());
        self
    }

    pub fn documented(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(n, _)| &**n == name)
            .map(|(_, ty)| ty.as_str())
    }
}

/// Compare a docstring's type claims against the signature.
///
/// Every declared parameter must be documented with its exact rendered
/// type, nothing undeclared may be documented, and the return type must
/// agree. An undocumented return is tolerated only when the signature
/// declares `None`.
pub fn check_docstring(
    function: &str,
    record: &SignatureRecord,
    doc: &DocstringRecord,
) -> ContractResult<()> {
    for param in &record.params {
        let declared = param.ty.to_string();
        match doc.documented(&param.name) {
            Some(documented) if documented == declared => {}
            Some(documented) => {
                return Err(ContractError::docstring_drift(
                    function,
                    &format!("parameter '{}'", param.name),
                    declared,
                    documented,
                ));
            }
            None => {
                return Err(ContractError::docstring_drift(
                    function,
                    &format!("parameter '{}'", param.name),
                    declared,
                    "(not documented)",
                ));
            }
        }
    }

    for (name, documented) in &doc.params {
        if record.param(name).is_none() {
            return Err(ContractError::docstring_drift(
                function,
                &format!("parameter '{name}'"),
                "(not in signature)",
                documented.as_str(),
            ));
        }
    }

    let declared = record.ret.to_string();
    match &doc.ret {
        Some(documented) if *documented == declared => Ok(()),
        Some(documented) => Err(ContractError::docstring_drift(
            function,
            "return",
            declared,
            documented.as_str(),
        )),
        None if record.ret == TypeExpr::None => Ok(()),
        None => Err(ContractError::docstring_drift(
            function,
            "return",
            declared,
            "(not documented)",
        )),
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
mod tests {
    use super::*;
    use pedant_diagnostic::ContractErrorKind;
    use pedant_sig::ParamRecord;
    use pretty_assertions::assert_eq;

    fn sig() -> SignatureRecord {
        SignatureRecord {
            params: vec![ParamRecord {
                name: "values".into(),
                ty: TypeExpr::list_of(TypeExpr::union(vec![TypeExpr::int(), TypeExpr::float()])),
                has_default: false,
            }],
            ret: TypeExpr::int(),
        }
    }

    #[test]
    fn matching_docstring_passes() {
        let doc = DocstringRecord::new()
            .param("values", "list[int | float]")
            .returns("int");
        assert!(check_docstring("total", &sig(), &doc).is_ok());
    }

    #[test]
    fn wrong_parameter_type_is_drift() {
        let doc = DocstringRecord::new()
            .param("values", "list[int]")
            .returns("int");
        let err = check_docstring("total", &sig(), &doc).unwrap_err();
        assert_eq!(
            err.kind,
            ContractErrorKind::DocstringDrift {
                subject: "parameter 'values'".to_owned(),
                declared: "list[int | float]".to_owned(),
                documented: "list[int]".to_owned(),
            }
        );
    }

    #[test]
    fn undocumented_parameter_is_drift() {
        let doc = DocstringRecord::new().returns("int");
        assert!(check_docstring("total", &sig(), &doc).is_err());
    }

    #[test]
    fn documented_ghost_parameter_is_drift() {
        let doc = DocstringRecord::new()
            .param("values", "list[int | float]")
            .param("extra", "str")
            .returns("int");
        let err = check_docstring("total", &sig(), &doc).unwrap_err();
        assert!(err.message.contains("'extra'"));
    }

    #[test]
    fn undocumented_return_is_drift_unless_none() {
        let doc = DocstringRecord::new().param("values", "list[int | float]");
        assert!(check_docstring("total", &sig(), &doc).is_err());

        let mut void = sig();
        void.ret = TypeExpr::None;
        assert!(check_docstring("total", &void, &doc).is_ok());
    }

    #[test]
    fn spelling_is_not_normalized() {
        let doc = DocstringRecord::new()
            .param("values", "List[int | float]")
            .returns("int");
        assert!(check_docstring("total", &sig(), &doc).is_err());
    }
}
