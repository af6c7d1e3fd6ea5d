//! Static assignability between type expressions.
//!
//! Used when matching a callable value against a `Callable[...]`
//! annotation: the value's *declared* types are compared to the expected
//! ones without any runtime value in hand. The relation is deliberately
//! conservative: unresolvable operands (type variables, forward
//! references) are assignable only when syntactically identical.

use pedant_types::{ClassRef, ContainerKind, LiteralValue, TypeExpr};

static ANY: TypeExpr = TypeExpr::Any;

/// True iff a value of type `sub` can be used where `sup` is expected.
pub fn assignable(sub: &TypeExpr, sup: &TypeExpr) -> bool {
    if sub == sup {
        return true;
    }
    match (sub, sup) {
        // Everything is assignable to Any; Any is assignable only to Any
        // (handled by the equality fast path above).
        (_, TypeExpr::Any) => true,
        (TypeExpr::Any, _) => false,

        // A union source must be wholly accepted; a union target needs one
        // accepting member. Source-union first: `int | float -> int` must
        // not pass via the member rule.
        (TypeExpr::Union(members), _) => members.iter().all(|m| assignable(m, sup)),
        (_, TypeExpr::Union(members)) => members.iter().any(|m| assignable(sub, m)),

        (TypeExpr::None, TypeExpr::None) => true,

        (TypeExpr::Exact(a), TypeExpr::Exact(b)) => a == b,

        // Literal values are assignable to their runtime class, and to a
        // wider literal set that contains all of them.
        (TypeExpr::Literal(values), TypeExpr::Exact(class)) => {
            values.iter().all(|v| literal_class(v) == *class)
        }
        (TypeExpr::Literal(sub_values), TypeExpr::Literal(sup_values)) => {
            sub_values.iter().all(|v| sup_values.contains(v))
        }

        (
            TypeExpr::Generic {
                origin: sub_origin,
                args: sub_args,
            },
            TypeExpr::Generic {
                origin: sup_origin,
                args: sup_args,
            },
        ) => container_assignable(*sub_origin, sub_args, *sup_origin, sup_args),

        (
            TypeExpr::Callable {
                params: sub_params,
                ret: sub_ret,
            },
            TypeExpr::Callable {
                params: sup_params,
                ret: sup_ret,
            },
        ) => {
            let params_ok = match (sub_params, sup_params) {
                // A concrete signature satisfies an ellipsis expectation,
                // not the other way around.
                (_, Option::None) => true,
                (Option::None, Some(_)) => false,
                (Some(sub_p), Some(sup_p)) => {
                    sub_p.len() == sup_p.len()
                        // Contravariant: the target's params flow into ours.
                        && sup_p.iter().zip(sub_p.iter()).all(|(s, b)| assignable(s, b))
                }
            };
            params_ok && assignable(sub_ret, sup_ret)
        }

        _ => false,
    }
}

/// Container origins and (covariant) argument assignability.
///
/// Concrete sequence kinds are assignable to the abstract `Sequence`;
/// fixed tuples are assignable to a variadic tuple whose element type
/// accepts every slot.
fn container_assignable(
    sub_origin: ContainerKind,
    sub_args: &[TypeExpr],
    sup_origin: ContainerKind,
    sup_args: &[TypeExpr],
) -> bool {
    let sub_elem = sub_args.first().unwrap_or(&ANY);
    let sup_elem = sup_args.first().unwrap_or(&ANY);

    match (sub_origin, sup_origin) {
        (ContainerKind::Tuple, ContainerKind::Tuple) => {
            sub_args.len() == sup_args.len()
                && sub_args
                    .iter()
                    .zip(sup_args.iter())
                    .all(|(a, b)| assignable(a, b))
        }
        (ContainerKind::Tuple, ContainerKind::TupleVariadic) => {
            sub_args.iter().all(|a| assignable(a, sup_elem))
        }
        (ContainerKind::TupleVariadic, ContainerKind::Tuple) => false,
        (ContainerKind::TupleVariadic, ContainerKind::TupleVariadic) => {
            assignable(sub_elem, sup_elem)
        }
        (ContainerKind::Mapping, ContainerKind::Mapping) => {
            let sub_val = sub_args.get(1).unwrap_or(&ANY);
            let sup_val = sup_args.get(1).unwrap_or(&ANY);
            assignable(sub_elem, sup_elem) && assignable(sub_val, sup_val)
        }
        (a, b) if a == b => assignable(sub_elem, sup_elem),
        // list/tuple are sequences; sets and mappings are not.
        (
            ContainerKind::List | ContainerKind::Tuple | ContainerKind::TupleVariadic,
            ContainerKind::Sequence,
        ) => {
            if sub_origin == ContainerKind::Tuple {
                sub_args.iter().all(|a| assignable(a, sup_elem))
            } else {
                assignable(sub_elem, sup_elem)
            }
        }
        (ContainerKind::FrozenSet, ContainerKind::Set)
        | (ContainerKind::Set, ContainerKind::FrozenSet) => false,
        _ => false,
    }
}

fn literal_class(value: &LiteralValue) -> ClassRef {
    match value {
        LiteralValue::Int(_) => ClassRef::Int,
        LiteralValue::Bool(_) => ClassRef::Bool,
        LiteralValue::Str(_) => ClassRef::Str,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reflexive_and_any() {
        assert!(assignable(&TypeExpr::float(), &TypeExpr::float()));
        assert!(assignable(&TypeExpr::int(), &TypeExpr::Any));
        assert!(assignable(&TypeExpr::Any, &TypeExpr::Any));
        assert!(!assignable(&TypeExpr::Any, &TypeExpr::int()));
        // Neither numeric direction holds: nominal classes, no widening.
        assert!(!assignable(&TypeExpr::int(), &TypeExpr::float()));
        assert!(!assignable(&TypeExpr::float(), &TypeExpr::int()));
    }

    #[test]
    fn unions() {
        let num = TypeExpr::union(vec![TypeExpr::int(), TypeExpr::float()]);
        assert!(assignable(&TypeExpr::int(), &num));
        assert!(!assignable(&num, &TypeExpr::int()));
        assert!(assignable(&num, &num));
        let wider = TypeExpr::union(vec![TypeExpr::int(), TypeExpr::float(), TypeExpr::None]);
        assert!(assignable(&num, &wider));
        assert!(!assignable(&wider, &num));
    }

    #[test]
    fn containers_are_covariant_in_their_args() {
        let list_int = TypeExpr::list_of(TypeExpr::int());
        let list_num = TypeExpr::list_of(TypeExpr::union(vec![TypeExpr::int(), TypeExpr::float()]));
        assert!(assignable(&list_int, &list_num));
        assert!(!assignable(&list_num, &list_int));
        // Kind mismatch never holds.
        assert!(!assignable(&list_int, &TypeExpr::set_of(TypeExpr::int())));
    }

    #[test]
    fn sequences_accept_lists_and_tuples() {
        let seq_int = TypeExpr::sequence_of(TypeExpr::int());
        assert!(assignable(&TypeExpr::list_of(TypeExpr::int()), &seq_int));
        assert!(assignable(
            &TypeExpr::tuple_of(vec![TypeExpr::int(), TypeExpr::int()]),
            &seq_int
        ));
        assert!(!assignable(&seq_int, &TypeExpr::list_of(TypeExpr::int())));
        assert!(!assignable(&TypeExpr::set_of(TypeExpr::int()), &seq_int));
    }

    #[test]
    fn tuple_arity_and_variadic() {
        let fixed = TypeExpr::tuple_of(vec![TypeExpr::float(), TypeExpr::string()]);
        assert!(assignable(&fixed, &fixed));
        assert!(!assignable(
            &fixed,
            &TypeExpr::tuple_of(vec![TypeExpr::float()])
        ));
        let variadic_any = TypeExpr::tuple_variadic(TypeExpr::Any);
        assert!(assignable(&fixed, &variadic_any));
        assert!(!assignable(&variadic_any, &fixed));
        let variadic_int = TypeExpr::tuple_variadic(TypeExpr::int());
        assert!(!assignable(&fixed, &variadic_int));
        assert!(assignable(
            &TypeExpr::tuple_of(vec![TypeExpr::int(), TypeExpr::int()]),
            &variadic_int
        ));
    }

    #[test]
    fn callables_contravariant_params_covariant_return() {
        let num = TypeExpr::union(vec![TypeExpr::int(), TypeExpr::float()]);
        let takes_num = TypeExpr::callable(vec![num.clone()], TypeExpr::int());
        let takes_int = TypeExpr::callable(vec![TypeExpr::int()], TypeExpr::int());
        assert!(assignable(&takes_num, &takes_int));
        assert!(!assignable(&takes_int, &takes_num));

        let rets_int = TypeExpr::callable(vec![TypeExpr::int()], TypeExpr::int());
        let rets_num = TypeExpr::callable(vec![TypeExpr::int()], num);
        assert!(assignable(&rets_int, &rets_num));
        assert!(!assignable(&rets_num, &rets_int));

        let ellipsis = TypeExpr::callable_any(TypeExpr::int());
        assert!(assignable(&takes_int, &ellipsis));
        assert!(!assignable(&ellipsis, &takes_int));
    }

    #[test]
    fn literals() {
        use std::sync::Arc;
        let lit = TypeExpr::literal(vec![LiteralValue::Int(1), LiteralValue::Int(2)]);
        assert!(assignable(&lit, &TypeExpr::int()));
        assert!(!assignable(&lit, &TypeExpr::string()));
        let wider = TypeExpr::literal(vec![
            LiteralValue::Int(1),
            LiteralValue::Int(2),
            LiteralValue::Int(3),
        ]);
        assert!(assignable(&lit, &wider));
        assert!(!assignable(&wider, &lit));
        let mixed = TypeExpr::literal(vec![LiteralValue::Int(1), LiteralValue::Str(Arc::from("a"))]);
        assert!(!assignable(&mixed, &TypeExpr::int()));
    }

    #[test]
    fn unresolved_operands_only_match_syntactically() {
        let fr = TypeExpr::forward_ref("Node");
        assert!(assignable(&fr, &TypeExpr::forward_ref("Node")));
        assert!(!assignable(&fr, &TypeExpr::forward_ref("Leaf")));
        assert!(!assignable(&fr, &TypeExpr::class("Node")));
    }
}
