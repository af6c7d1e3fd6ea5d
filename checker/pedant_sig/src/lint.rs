//! Declaration-time lints.
//!
//! Run once per signature, not per call. Bare container annotations
//! (`list` instead of `list[int]`) check as all-`Any` at call time; strict
//! mode turns them into usage errors here instead.

use crate::record::SignatureRecord;
use bitflags::bitflags;
use pedant_diagnostic::ContractError;
use pedant_types::TypeExpr;

bitflags! {
    /// Per-contract behavior switches.
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
    pub struct ContractFlags: u8 {
        /// Reject container annotations written without type arguments.
        const STRICT_TYPE_ARGS = 1 << 0;
        /// Require an attached docstring record at decoration time.
        const REQUIRE_DOCSTRING = 1 << 1;
    }
}

/// Check a signature's declarations against the requested strictness.
///
/// Returns every finding rather than the first: a signature with three
/// bare annotations should surface all three at decoration time.
pub fn declaration_lints(
    function: &str,
    record: &SignatureRecord,
    flags: ContractFlags,
) -> Vec<ContractError> {
    let mut findings = Vec::new();
    if !flags.contains(ContractFlags::STRICT_TYPE_ARGS) {
        return findings;
    }

    for param in &record.params {
        collect_bare(function, &param.name, &param.ty, &mut findings);
    }
    collect_bare(function, "return", &record.ret, &mut findings);
    findings
}

/// Walk an annotation tree and report every bare container in it.
fn collect_bare(function: &str, name: &str, ty: &TypeExpr, findings: &mut Vec<ContractError>) {
    if ty.is_bare_container() {
        findings.push(ContractError::strict_declaration(
            function,
            name,
            &ty.to_string(),
        ));
    }
    match ty {
        TypeExpr::Union(members) => {
            for member in members.iter() {
                collect_bare(function, name, member, findings);
            }
        }
        TypeExpr::Generic { args, .. } => {
            for arg in args.iter() {
                collect_bare(function, name, arg, findings);
            }
        }
        TypeExpr::Callable { params, ret } => {
            if let Some(params) = params {
                for param in params.iter() {
                    collect_bare(function, name, param, findings);
                }
            }
            collect_bare(function, name, ret, findings);
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::ParamRecord;
    use pedant_types::ContainerKind;
    use pretty_assertions::assert_eq;

    fn record_with(ty: TypeExpr) -> SignatureRecord {
        SignatureRecord {
            params: vec![ParamRecord {
                name: "a".into(),
                ty,
                has_default: false,
            }],
            ret: TypeExpr::None,
        }
    }

    #[test]
    fn lenient_mode_reports_nothing() {
        let record = record_with(TypeExpr::bare(ContainerKind::List));
        assert!(declaration_lints("f", &record, ContractFlags::empty()).is_empty());
    }

    #[test]
    fn strict_mode_flags_bare_containers() {
        let record = record_with(TypeExpr::bare(ContainerKind::List));
        let findings = declaration_lints("f", &record, ContractFlags::STRICT_TYPE_ARGS);
        assert_eq!(findings.len(), 1);
        assert!(findings[0].message.contains("'list'"));
    }

    #[test]
    fn strict_mode_finds_nested_bare_containers() {
        let record = record_with(TypeExpr::list_of(TypeExpr::bare(ContainerKind::Mapping)));
        let findings = declaration_lints("f", &record, ContractFlags::STRICT_TYPE_ARGS);
        assert_eq!(findings.len(), 1);
        assert!(findings[0].message.contains("'dict'"));
    }

    #[test]
    fn fully_parameterized_signature_is_clean() {
        let record = record_with(TypeExpr::mapping_of(
            TypeExpr::string(),
            TypeExpr::list_of(TypeExpr::int()),
        ));
        assert!(declaration_lints("f", &record, ContractFlags::STRICT_TYPE_ARGS).is_empty());
    }
}
