//! The recursive conformance check.

use crate::assign::assignable;
use pedant_resolve::{resolve_forward_ref, resolve_type_var, BindingEnv, ResolveError, Scope};
use pedant_types::{ClassRef, ContainerKind, LiteralValue, TypeExpr, ValuePath, Verdict};
use pedant_value::{FunctionKind, FunctionValue, Param, Value};
use std::sync::Arc;
use tracing::{trace, warn};

static ANY: TypeExpr = TypeExpr::Any;

/// Resolution context for one check: the enclosing namespace for forward
/// references and the externally supplied type-variable bindings.
#[derive(Clone, Copy, Debug)]
pub struct CheckContext<'a> {
    pub scope: &'a Scope,
    pub env: &'a BindingEnv,
}

impl<'a> CheckContext<'a> {
    pub fn new(scope: &'a Scope, env: &'a BindingEnv) -> Self {
        CheckContext { scope, env }
    }
}

/// Decide whether `value` conforms to `ty`.
///
/// Pure function of its inputs. Conformance is binary per branch: there is
/// no coercion and no closest-match guessing. Union evaluation is the only
/// place multiple attempts are made, all within this one call.
pub fn check(value: &Value, ty: &TypeExpr, ctx: &CheckContext<'_>, path: &ValuePath) -> Verdict {
    let mut seen = Vec::new();
    check_inner(value, ty, ctx, path, &mut seen)
}

/// `seen` guards forward-reference chains against resolution cycles. It is
/// scoped to one top-level `check` call.
fn check_inner(
    value: &Value,
    ty: &TypeExpr,
    ctx: &CheckContext<'_>,
    path: &ValuePath,
    seen: &mut Vec<Arc<str>>,
) -> Verdict {
    match ty {
        TypeExpr::Any => Verdict::Pass,

        TypeExpr::None => match value {
            Value::None => Verdict::Pass,
            _ => mismatch(value, ty, path),
        },

        TypeExpr::Exact(class) => check_exact(value, class, ty, path),

        TypeExpr::Literal(members) => check_literal(value, members, ty, path),

        TypeExpr::Union(members) => check_union(value, members, ty, ctx, path, seen),

        TypeExpr::Generic { origin, args } => {
            check_container(value, *origin, args, ty, ctx, path, seen)
        }

        TypeExpr::Callable { params, ret } => {
            check_callable(value, params.as_deref(), ret, ty, path)
        }

        TypeExpr::Var(var) => {
            let resolved = resolve_type_var(var, ctx.env);
            trace!(var = %var.name, resolved = %resolved, "resolved type variable");
            check_inner(value, &resolved, ctx, path, seen)
        }

        TypeExpr::ForwardRef(name) => {
            if seen.iter().any(|n| n == name) {
                return Verdict::ref_cycle(path.clone(), name);
            }
            match resolve_forward_ref(name, ctx.scope) {
                Ok(resolved) => {
                    trace!(%name, resolved = %resolved, "resolved forward reference");
                    seen.push(name.clone());
                    let verdict = check_inner(value, &resolved, ctx, path, seen);
                    seen.pop();
                    verdict
                }
                Err(ResolveError::Unresolved { name, scopes }) => {
                    Verdict::unresolved(path.clone(), &name, &scopes)
                }
            }
        }
    }
}

/// Nominal instance check.
///
/// Booleans never satisfy a numeric annotation unless the declared type is
/// exactly `bool`; `int` does not satisfy `float`. Instances match a named
/// class through their base-class chain.
fn check_exact(value: &Value, class: &ClassRef, ty: &TypeExpr, path: &ValuePath) -> Verdict {
    let ok = match (class, value) {
        (ClassRef::Bool, Value::Bool(_)) => true,
        (ClassRef::Int, Value::Int(_)) => true,
        (ClassRef::Float, Value::Float(_)) => true,
        (ClassRef::Str, Value::Str(_)) => true,
        (ClassRef::Named(name), Value::Instance(instance)) => {
            instance.class().is_subclass_of(name)
        }
        _ => false,
    };
    if ok {
        Verdict::Pass
    } else {
        mismatch(value, ty, path)
    }
}

/// Literal membership: equality plus exact runtime type of the member.
fn check_literal(
    value: &Value,
    members: &[LiteralValue],
    ty: &TypeExpr,
    path: &ValuePath,
) -> Verdict {
    let matched = members.iter().any(|member| match (member, value) {
        (LiteralValue::Int(a), Value::Int(b)) => a == b,
        (LiteralValue::Bool(a), Value::Bool(b)) => a == b,
        (LiteralValue::Str(a), Value::Str(b)) => &**a == b.as_str(),
        _ => false,
    });
    if matched {
        Verdict::Pass
    } else {
        mismatch(value, ty, path)
    }
}

/// Left-to-right disjunction; first pass wins. A total failure aggregates
/// every attempted member so the caller sees the full picture.
///
/// Resolution failures (unresolved name, cycle) inside a member abort the
/// union immediately: they are declaration defects, not value mismatches,
/// and a later member passing would mask them.
fn check_union(
    value: &Value,
    members: &[TypeExpr],
    ty: &TypeExpr,
    ctx: &CheckContext<'_>,
    path: &ValuePath,
    seen: &mut Vec<Arc<str>>,
) -> Verdict {
    let mut attempts = Vec::with_capacity(members.len());
    for member in members {
        match check_inner(value, member, ctx, path, seen) {
            Verdict::Pass => return Verdict::Pass,
            Verdict::Fail(info) if info.kind != pedant_types::FailKind::Mismatch => {
                return Verdict::Fail(info);
            }
            Verdict::Fail(_) => attempts.push(member.to_string()),
        }
    }
    let reason = format!(
        "{path} = {} of type {} does not match expected type {ty} (attempted members: {})",
        value.repr(),
        value.type_name(),
        attempts.join(", "),
    );
    Verdict::mismatch(path.clone(), ty.to_string(), value.type_name(), reason)
}

fn check_container(
    value: &Value,
    origin: ContainerKind,
    args: &[TypeExpr],
    ty: &TypeExpr,
    ctx: &CheckContext<'_>,
    path: &ValuePath,
    seen: &mut Vec<Arc<str>>,
) -> Verdict {
    // A bare annotation (no type arguments) checks as all-Any; the
    // declaration lint reports it separately in strict mode.
    let elem_ty = args.first().unwrap_or(&ANY);

    match origin {
        ContainerKind::List => match value {
            Value::List(items) => check_elements(items, elem_ty, ctx, path, seen),
            _ => mismatch(value, ty, path),
        },
        ContainerKind::Set | ContainerKind::FrozenSet => match value {
            Value::Set(items) => check_elements(items, elem_ty, ctx, path, seen),
            _ => mismatch(value, ty, path),
        },
        ContainerKind::Sequence => match value {
            Value::List(items) | Value::Tuple(items) => {
                check_elements(items, elem_ty, ctx, path, seen)
            }
            _ => mismatch(value, ty, path),
        },
        ContainerKind::Mapping => {
            let key_ty = args.first().unwrap_or(&ANY);
            let value_ty = args.get(1).unwrap_or(&ANY);
            match value {
                Value::Map(entries) => {
                    for (key, val) in entries.iter() {
                        let verdict =
                            check_inner(key, key_ty, ctx, &path.map_key(key.repr()), seen);
                        if verdict.is_fail() {
                            return verdict;
                        }
                        let verdict = check_inner(val, value_ty, ctx, &path.key(key.repr()), seen);
                        if verdict.is_fail() {
                            return verdict;
                        }
                    }
                    Verdict::Pass
                }
                _ => mismatch(value, ty, path),
            }
        }
        ContainerKind::Tuple => match value {
            Value::Tuple(items) => {
                if args.is_empty() {
                    // Bare `tuple`: elements unconstrained.
                    return Verdict::Pass;
                }
                if items.len() != args.len() {
                    let reason = format!(
                        "{path} = {} has {} element(s) but {ty} expects {}",
                        value.repr(),
                        items.len(),
                        args.len(),
                    );
                    return Verdict::mismatch(
                        path.clone(),
                        ty.to_string(),
                        value.type_name(),
                        reason,
                    );
                }
                for (i, (item, slot_ty)) in items.iter().zip(args.iter()).enumerate() {
                    let verdict = check_inner(item, slot_ty, ctx, &path.index(i), seen);
                    if verdict.is_fail() {
                        return verdict;
                    }
                }
                Verdict::Pass
            }
            _ => mismatch(value, ty, path),
        },
        ContainerKind::TupleVariadic => match value {
            Value::Tuple(items) => check_elements(items, elem_ty, ctx, path, seen),
            _ => mismatch(value, ty, path),
        },
    }
}

/// Homogeneous element check: first failing element short-circuits and
/// reports its index. Empty containers pass vacuously.
fn check_elements(
    items: &[Value],
    elem_ty: &TypeExpr,
    ctx: &CheckContext<'_>,
    path: &ValuePath,
    seen: &mut Vec<Arc<str>>,
) -> Verdict {
    for (i, item) in items.iter().enumerate() {
        let verdict = check_inner(item, elem_ty, ctx, &path.index(i), seen);
        if verdict.is_fail() {
            return verdict;
        }
    }
    Verdict::Pass
}

/// Callable conformance.
///
/// Parameters are checked **contravariantly**: each expected parameter type
/// must be assignable *to* the value's declared parameter type, so the
/// callable accepts at least everything the annotation promises. The return
/// is covariant. This direction is fixed policy, documented here, not
/// decided per call.
///
/// A callable whose own signature is not fully annotated cannot be judged:
/// that is a best-effort giveup, treated as Pass with a warning (a
/// documented soundness gap, not a silent one).
fn check_callable(
    value: &Value,
    expected_params: Option<&[TypeExpr]>,
    expected_ret: &TypeExpr,
    ty: &TypeExpr,
    path: &ValuePath,
) -> Verdict {
    let function = match value {
        Value::Function(f) => f,
        _ => return mismatch(value, ty, path),
    };

    let declared = effective_params(function);
    let uncheckable =
        declared.iter().any(|p| p.annotation.is_none()) || function.ret().is_none();
    if uncheckable {
        warn!(
            function = function.name(),
            "callable signature is not fully annotated; accepting without checking"
        );
        return Verdict::Pass;
    }

    if let Some(expected_params) = expected_params {
        if expected_params.len() != declared.len() {
            let reason = format!(
                "{path} = {} takes {} parameter(s) but {ty} expects {}",
                value.repr(),
                declared.len(),
                expected_params.len(),
            );
            return Verdict::mismatch(path.clone(), ty.to_string(), value.type_name(), reason);
        }
        for (i, (expected, param)) in expected_params.iter().zip(declared.iter()).enumerate() {
            let declared_ty = match &param.annotation {
                Some(t) => t,
                Option::None => continue,
            };
            if !assignable(expected, declared_ty) {
                let reason = format!(
                    "{path} = {}: parameter {i} is declared as {declared_ty}, \
                     which does not accept {expected}",
                    value.repr(),
                );
                return Verdict::mismatch(path.clone(), ty.to_string(), value.type_name(), reason);
            }
        }
    }

    if let Some(declared_ret) = function.ret() {
        if !assignable(declared_ret, expected_ret) {
            let reason = format!(
                "{path} = {} returns {declared_ret}, which is not assignable to {expected_ret}",
                value.repr(),
            );
            return Verdict::mismatch(path.clone(), ty.to_string(), value.type_name(), reason);
        }
    }

    Verdict::Pass
}

/// The caller-visible parameter list: a bound method's `self` slot is not
/// part of its callable signature.
fn effective_params(function: &FunctionValue) -> &[Param] {
    let params = function.params();
    match function.kind() {
        FunctionKind::Method { bound: true } if !params.is_empty() => &params[1..],
        _ => params,
    }
}

fn mismatch(value: &Value, ty: &TypeExpr, path: &ValuePath) -> Verdict {
    let reason = format!(
        "{path} = {} of type {} does not match expected type {ty}",
        value.repr(),
        value.type_name(),
    );
    Verdict::mismatch(path.clone(), ty.to_string(), value.type_name(), reason)
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
mod tests {
    use super::*;
    use pedant_types::{FailKind, TypeVarRef};
    use pedant_value::{ClassDef, InstanceValue};
    use pretty_assertions::assert_eq;

    fn ctx_parts() -> (Scope, BindingEnv) {
        (Scope::module("m"), BindingEnv::new())
    }

    fn run(value: &Value, ty: &TypeExpr) -> Verdict {
        let (scope, env) = ctx_parts();
        check(value, ty, &CheckContext::new(&scope, &env), &ValuePath::root())
    }

    #[test]
    fn any_matches_everything() {
        assert!(run(&Value::int(5), &TypeExpr::Any).is_pass());
        assert!(run(&Value::None, &TypeExpr::Any).is_pass());
        assert!(run(&Value::list(vec![]), &TypeExpr::Any).is_pass());
    }

    #[test]
    fn none_only_matches_none() {
        assert!(run(&Value::None, &TypeExpr::None).is_pass());
        assert!(run(&Value::int(0), &TypeExpr::None).is_fail());
        // None does not satisfy a plain scalar annotation.
        assert!(run(&Value::None, &TypeExpr::string()).is_fail());
    }

    #[test]
    fn exact_scalar_checks() {
        assert!(run(&Value::int(5), &TypeExpr::int()).is_pass());
        assert!(run(&Value::int(5), &TypeExpr::float()).is_fail());
        assert!(run(&Value::float(3.14), &TypeExpr::float()).is_pass());
        assert!(run(&Value::string("hi"), &TypeExpr::string()).is_pass());
    }

    #[test]
    fn bool_never_satisfies_numeric_annotations() {
        assert!(run(&Value::bool(true), &TypeExpr::int()).is_fail());
        assert!(run(&Value::bool(true), &TypeExpr::float()).is_fail());
        assert!(run(&Value::bool(true), &TypeExpr::boolean()).is_pass());
        // ...but bool is fine inside a union that names it.
        let ty = TypeExpr::union(vec![TypeExpr::int(), TypeExpr::float(), TypeExpr::boolean()]);
        assert!(run(&Value::bool(false), &ty).is_pass());
    }

    #[test]
    fn instance_checks_walk_base_chain() {
        let parent = ClassDef::new("Parent");
        let child = ClassDef::with_bases("Child", vec![parent]);
        let value = Value::instance(InstanceValue::new(child));
        assert!(run(&value, &TypeExpr::class("Child")).is_pass());
        assert!(run(&value, &TypeExpr::class("Parent")).is_pass());
        assert!(run(&value, &TypeExpr::class("Other")).is_fail());
        assert!(run(&Value::int(1), &TypeExpr::class("Parent")).is_fail());
    }

    #[test]
    fn literal_matches_by_equality_and_exact_type() {
        let ty = TypeExpr::literal(vec![
            LiteralValue::Int(1),
            LiteralValue::Str(Arc::from("on")),
        ]);
        assert!(run(&Value::int(1), &ty).is_pass());
        assert!(run(&Value::string("on"), &ty).is_pass());
        assert!(run(&Value::int(2), &ty).is_fail());
        // true == 1 in boolean-as-integer ecosystems, but the runtime type
        // must match the member's type exactly.
        assert!(run(&Value::bool(true), &ty).is_fail());
    }

    #[test]
    fn union_first_match_wins() {
        let ty = TypeExpr::union(vec![TypeExpr::int(), TypeExpr::float()]);
        assert!(run(&Value::int(5), &ty).is_pass());
        assert!(run(&Value::float(2.5), &ty).is_pass());
        assert!(run(&Value::string("5"), &ty).is_fail());
    }

    #[test]
    fn union_failure_aggregates_all_members() {
        let ty = TypeExpr::union(vec![TypeExpr::int(), TypeExpr::float()]);
        let verdict = run(&Value::string("x"), &ty);
        let info = verdict.fail_info().unwrap();
        assert_eq!(info.expected, "int | float");
        assert_eq!(info.actual, "str");
        assert!(info.reason.contains("attempted members: int, float"));
    }

    #[test]
    fn optional_accepts_none_only_when_declared() {
        let optional = TypeExpr::optional(TypeExpr::int());
        assert!(run(&Value::None, &optional).is_pass());
        assert!(run(&Value::int(3), &optional).is_pass());
        assert!(run(&Value::None, &TypeExpr::int()).is_fail());
    }

    #[test]
    fn empty_containers_pass_vacuously() {
        assert!(run(&Value::list(vec![]), &TypeExpr::list_of(TypeExpr::int())).is_pass());
        assert!(run(&Value::set(vec![]), &TypeExpr::set_of(TypeExpr::string())).is_pass());
        assert!(run(
            &Value::map(vec![]),
            &TypeExpr::mapping_of(TypeExpr::string(), TypeExpr::float())
        )
        .is_pass());
    }

    #[test]
    fn list_element_failure_reports_index() {
        let ty = TypeExpr::list_of(TypeExpr::union(vec![TypeExpr::int(), TypeExpr::float()]));
        let value = Value::list(vec![Value::int(1), Value::string("x")]);
        let verdict = check(
            &value,
            &ty,
            &CheckContext::new(&Scope::module("m"), &BindingEnv::new()),
            &ValuePath::arg("values"),
        );
        let info = verdict.fail_info().unwrap();
        assert_eq!(info.path.to_string(), "values[1]");
        assert_eq!(info.expected, "int | float");
        assert_eq!(info.actual, "str");
    }

    #[test]
    fn nested_containers_recurse() {
        let ty = TypeExpr::list_of(TypeExpr::list_of(TypeExpr::boolean()));
        let good = Value::list(vec![
            Value::list(vec![Value::bool(true), Value::bool(false)]),
            Value::list(vec![]),
        ]);
        let bad = Value::list(vec![Value::list(vec![Value::bool(true), Value::int(1)])]);
        assert!(run(&good, &ty).is_pass());
        let info = run(&bad, &ty).fail_info().unwrap().clone();
        assert_eq!(info.path.to_string(), "[0][1]");
    }

    #[test]
    fn container_kind_is_never_coerced() {
        let seq_ty = TypeExpr::list_of(TypeExpr::int());
        assert!(run(&Value::set(vec![Value::int(1)]), &seq_ty).is_fail());
        assert!(run(&Value::tuple(vec![Value::int(1)]), &seq_ty).is_fail());
        // The abstract Sequence accepts both lists and tuples.
        let abstract_seq = TypeExpr::sequence_of(TypeExpr::int());
        assert!(run(&Value::list(vec![Value::int(1)]), &abstract_seq).is_pass());
        assert!(run(&Value::tuple(vec![Value::int(1)]), &abstract_seq).is_pass());
        assert!(run(&Value::set(vec![Value::int(1)]), &abstract_seq).is_fail());
    }

    #[test]
    fn mapping_checks_keys_and_values() {
        let ty = TypeExpr::mapping_of(TypeExpr::string(), TypeExpr::float());
        let good = Value::map(vec![
            (Value::string("a"), Value::float(1.2)),
            (Value::string("b"), Value::float(3.4)),
        ]);
        assert!(run(&good, &ty).is_pass());

        let bad_value = Value::map(vec![(Value::string("a"), Value::int(3))]);
        let info = run(&bad_value, &ty).fail_info().unwrap().clone();
        assert_eq!(info.path.to_string(), "['a']");

        let bad_key = Value::map(vec![(Value::int(7), Value::float(1.0))]);
        let info = run(&bad_key, &ty).fail_info().unwrap().clone();
        assert_eq!(info.path.to_string(), " (key 7)");
    }

    #[test]
    fn fixed_tuple_checks_arity_and_slots() {
        let ty = TypeExpr::tuple_of(vec![TypeExpr::float(), TypeExpr::int(), TypeExpr::string()]);
        let good = Value::tuple(vec![Value::float(42.0), Value::int(43), Value::string("hi")]);
        assert!(run(&good, &ty).is_pass());

        let short = Value::tuple(vec![Value::float(42.0)]);
        assert!(run(&short, &ty).is_fail());

        let wrong_slot = Value::tuple(vec![Value::float(1.0), Value::float(2.0), Value::string("x")]);
        let info = run(&wrong_slot, &ty).fail_info().unwrap().clone();
        assert_eq!(info.path.to_string(), "[1]");
    }

    #[test]
    fn variadic_tuple_checks_every_element() {
        let ty = TypeExpr::tuple_variadic(TypeExpr::int());
        assert!(run(&Value::tuple(vec![Value::int(1), Value::int(2)]), &ty).is_pass());
        assert!(run(&Value::tuple(vec![]), &ty).is_pass());
        assert!(run(&Value::tuple(vec![Value::int(1), Value::string("x")]), &ty).is_fail());
    }

    #[test]
    fn bare_container_checks_as_any() {
        let ty = TypeExpr::bare(ContainerKind::List);
        let value = Value::list(vec![Value::int(1), Value::string("x"), Value::None]);
        assert!(run(&value, &ty).is_pass());
        // Kind still has to match.
        assert!(run(&Value::int(1), &ty).is_fail());
    }

    #[test]
    fn type_var_resolves_through_binding_env() {
        let var = TypeExpr::var(TypeVarRef::new("T"));
        let scope = Scope::module("m");
        let mut env = BindingEnv::new();
        env.bind("T", TypeExpr::int());
        let ctx = CheckContext::new(&scope, &env);
        assert!(check(&Value::int(3), &var, &ctx, &ValuePath::root()).is_pass());
        assert!(check(&Value::string("x"), &var, &ctx, &ValuePath::root()).is_fail());
    }

    #[test]
    fn unbound_type_var_falls_back_to_bound_then_any() {
        let scope = Scope::module("m");
        let env = BindingEnv::new();
        let ctx = CheckContext::new(&scope, &env);

        let bounded = TypeExpr::var(TypeVarRef::new("N").with_bound(TypeExpr::float()));
        assert!(check(&Value::float(1.0), &bounded, &ctx, &ValuePath::root()).is_pass());
        assert!(check(&Value::string("x"), &bounded, &ctx, &ValuePath::root()).is_fail());

        let free = TypeExpr::var(TypeVarRef::new("T"));
        assert!(check(&Value::string("x"), &free, &ctx, &ValuePath::root()).is_pass());
    }

    #[test]
    fn forward_ref_resolves_lazily() {
        let mut scope = Scope::module("m");
        scope.bind("Node", TypeExpr::class("Node"));
        let env = BindingEnv::new();
        let ctx = CheckContext::new(&scope, &env);

        let node_class = ClassDef::new("Node");
        let value = Value::instance(InstanceValue::new(node_class));
        let ty = TypeExpr::forward_ref("Node");
        assert!(check(&value, &ty, &ctx, &ValuePath::root()).is_pass());
    }

    #[test]
    fn unresolved_forward_ref_is_a_hard_fail() {
        let scope = Scope::module("m");
        let env = BindingEnv::new();
        let ctx = CheckContext::new(&scope, &env);
        let verdict = check(
            &Value::int(1),
            &TypeExpr::forward_ref("Ghost"),
            &ctx,
            &ValuePath::arg("x"),
        );
        let info = verdict.fail_info().unwrap();
        assert_eq!(info.kind, FailKind::UnresolvedForwardRef);
        assert!(info.reason.contains("Ghost"));
        assert!(info.reason.contains("module 'm'"));
    }

    #[test]
    fn forward_ref_cycle_is_detected() {
        let mut scope = Scope::module("m");
        scope.bind("A", TypeExpr::forward_ref("B"));
        scope.bind("B", TypeExpr::forward_ref("A"));
        let env = BindingEnv::new();
        let ctx = CheckContext::new(&scope, &env);
        let verdict = check(
            &Value::int(1),
            &TypeExpr::forward_ref("A"),
            &ctx,
            &ValuePath::root(),
        );
        let info = verdict.fail_info().unwrap();
        assert_eq!(info.kind, FailKind::ForwardRefCycle);
    }

    #[test]
    fn unresolved_ref_inside_union_is_not_masked() {
        let scope = Scope::module("m");
        let env = BindingEnv::new();
        let ctx = CheckContext::new(&scope, &env);
        // "Ghost" comes first; a later member would match the value, but a
        // declaration defect must not be masked by union evaluation order.
        let ty = TypeExpr::union(vec![TypeExpr::forward_ref("Ghost"), TypeExpr::int()]);
        let verdict = check(&Value::int(1), &ty, &ctx, &ValuePath::root());
        assert_eq!(verdict.fail_info().unwrap().kind, FailKind::UnresolvedForwardRef);
    }

    mod callables {
        use super::*;
        use pedant_value::CallBody;

        fn typed_fn(params: Vec<(&str, TypeExpr)>, ret: TypeExpr) -> Value {
            let body: CallBody = Arc::new(|_| Ok(Value::None));
            let params = params
                .into_iter()
                .map(|(name, ty)| Param::new(name, ty))
                .collect();
            Value::function(FunctionValue::new("f", params, Some(ret), body))
        }

        #[test]
        fn matching_signature_passes() {
            let value = typed_fn(
                vec![("x", TypeExpr::int()), ("y", TypeExpr::float())],
                TypeExpr::string(),
            );
            let ty = TypeExpr::callable(
                vec![TypeExpr::int(), TypeExpr::float()],
                TypeExpr::string(),
            );
            assert!(run(&value, &ty).is_pass());
        }

        #[test]
        fn arity_mismatch_fails() {
            let value = typed_fn(vec![("x", TypeExpr::int())], TypeExpr::string());
            let ty = TypeExpr::callable(
                vec![TypeExpr::int(), TypeExpr::int()],
                TypeExpr::string(),
            );
            assert!(run(&value, &ty).is_fail());
        }

        #[test]
        fn params_are_contravariant() {
            // Declared param accepts int | float; expectation only ever
            // supplies int. Safe: expected must be assignable TO declared.
            let wide = typed_fn(
                vec![("x", TypeExpr::union(vec![TypeExpr::int(), TypeExpr::float()]))],
                TypeExpr::int(),
            );
            let narrow_expectation =
                TypeExpr::callable(vec![TypeExpr::int()], TypeExpr::int());
            assert!(run(&wide, &narrow_expectation).is_pass());

            // The unsafe direction fails: declared only takes int, but the
            // expectation promises callers may pass floats too.
            let narrow = typed_fn(vec![("x", TypeExpr::int())], TypeExpr::int());
            let wide_expectation = TypeExpr::callable(
                vec![TypeExpr::union(vec![TypeExpr::int(), TypeExpr::float()])],
                TypeExpr::int(),
            );
            assert!(run(&narrow, &wide_expectation).is_fail());
        }

        #[test]
        fn return_is_covariant() {
            let value = typed_fn(vec![("x", TypeExpr::int())], TypeExpr::int());
            let expects_union = TypeExpr::callable(
                vec![TypeExpr::int()],
                TypeExpr::union(vec![TypeExpr::int(), TypeExpr::float()]),
            );
            assert!(run(&value, &expects_union).is_pass());

            let expects_str =
                TypeExpr::callable(vec![TypeExpr::int()], TypeExpr::string());
            assert!(run(&value, &expects_str).is_fail());
        }

        #[test]
        fn ellipsis_params_only_check_return() {
            let value = typed_fn(
                vec![("x", TypeExpr::int()), ("y", TypeExpr::float())],
                TypeExpr::string(),
            );
            assert!(run(&value, &TypeExpr::callable_any(TypeExpr::string())).is_pass());
            assert!(run(&value, &TypeExpr::callable_any(TypeExpr::int())).is_fail());
        }

        #[test]
        fn unannotated_callable_is_uncheckable_and_passes() {
            let body: CallBody = Arc::new(|_| Ok(Value::None));
            let value = Value::function(FunctionValue::new(
                "lambda",
                vec![Param::untyped("x")],
                None,
                body,
            ));
            let ty = TypeExpr::callable(vec![TypeExpr::int()], TypeExpr::int());
            assert!(run(&value, &ty).is_pass());
        }

        #[test]
        fn non_callable_value_fails() {
            let ty = TypeExpr::callable_any(TypeExpr::Any);
            assert!(run(&Value::int(3), &ty).is_fail());
        }
    }

    #[test]
    fn verdicts_are_idempotent() {
        let ty = TypeExpr::list_of(TypeExpr::union(vec![TypeExpr::int(), TypeExpr::float()]));
        let value = Value::list(vec![Value::int(1), Value::float(2.5), Value::string("x")]);
        let first = run(&value, &ty);
        let second = run(&value, &ty);
        assert_eq!(first, second);
    }
}
