//! Property tests for the conformance checker.

use crate::{check, CheckContext};
use pedant_resolve::{BindingEnv, Scope};
use pedant_types::{TypeExpr, ValuePath};
use pedant_value::Value;
use proptest::prelude::*;

fn scalar_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<i64>().prop_map(Value::int),
        any::<f64>().prop_map(Value::float),
        any::<bool>().prop_map(Value::bool),
        "[a-z]{0,8}".prop_map(Value::string),
        Just(Value::None),
    ]
}

fn scalar_type() -> impl Strategy<Value = TypeExpr> {
    prop_oneof![
        Just(TypeExpr::int()),
        Just(TypeExpr::float()),
        Just(TypeExpr::boolean()),
        Just(TypeExpr::string()),
        Just(TypeExpr::None),
        Just(TypeExpr::Any),
    ]
}

fn run(value: &Value, ty: &TypeExpr) -> bool {
    let scope = Scope::module("prop");
    let env = BindingEnv::new();
    check(value, ty, &CheckContext::new(&scope, &env), &ValuePath::root()).is_pass()
}

proptest! {
    /// `Union[A, B]` is exactly the disjunction of its members.
    #[test]
    fn union_is_disjunction(value in scalar_value(), a in scalar_type(), b in scalar_type()) {
        let union = TypeExpr::union(vec![a.clone(), b.clone()]);
        let expected = run(&value, &a) || run(&value, &b);
        prop_assert_eq!(run(&value, &union), expected);
    }

    /// Re-running the same check yields the same verdict.
    #[test]
    fn checking_is_idempotent(value in scalar_value(), ty in scalar_type()) {
        let scope = Scope::module("prop");
        let env = BindingEnv::new();
        let ctx = CheckContext::new(&scope, &env);
        let first = check(&value, &ty, &ctx, &ValuePath::root());
        let second = check(&value, &ty, &ctx, &ValuePath::root());
        prop_assert_eq!(first, second);
    }

    /// An empty container conforms to any element type.
    #[test]
    fn empty_container_is_vacuously_true(ty in scalar_type()) {
        prop_assert!(run(&Value::list(vec![]), &TypeExpr::list_of(ty.clone())));
        prop_assert!(run(&Value::set(vec![]), &TypeExpr::set_of(ty.clone())));
        prop_assert!(run(&Value::tuple(vec![]), &TypeExpr::tuple_variadic(ty)));
    }

    /// A homogeneous list conforms iff every element does.
    #[test]
    fn list_conformance_is_elementwise(values in prop::collection::vec(scalar_value(), 0..8), ty in scalar_type()) {
        let all_conform = values.iter().all(|v| run(v, &ty));
        let list = Value::list(values);
        prop_assert_eq!(run(&list, &TypeExpr::list_of(ty)), all_conform);
    }

    /// `Any` matches every scalar.
    #[test]
    fn any_matches_all(value in scalar_value()) {
        prop_assert!(run(&value, &TypeExpr::Any));
    }

    /// `Optional[T]` accepts exactly `None` plus whatever `T` accepts.
    #[test]
    fn optional_accepts_none_and_inner(value in scalar_value(), ty in scalar_type()) {
        let optional = TypeExpr::optional(ty.clone());
        let expected = matches!(value, Value::None) || run(&value, &ty);
        prop_assert_eq!(run(&value, &optional), expected);
    }
}
