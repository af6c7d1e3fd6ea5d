//! Forward-reference and type-variable resolution.
//!
//! Forward references are names resolved *lazily* against an enclosing
//! [`Scope`], at check time and never at declaration time. That is what makes
//! self-referential class hints work: the class binds its own name into the
//! scope after its body exists, and the first call resolves it then.
//!
//! Type variables resolve against an externally supplied [`BindingEnv`]
//! (the generic-binding collaborator). An unbound variable falls back to
//! its constraint set, then its bound, then `Any`.

mod binding;
mod scope;

pub use binding::BindingEnv;
pub use scope::Scope;

use pedant_types::{TypeExpr, TypeVarRef};
use thiserror::Error;

/// Resolution failure. Unresolved names are hard errors, never a silent
/// pass.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("forward reference '{name}' could not be resolved (searched {scopes})")]
    Unresolved { name: String, scopes: String },
}

/// Look up a forward-referenced name in `scope` and its parents
/// (innermost first: enclosing class bodies, then module globals).
pub fn resolve_forward_ref(name: &str, scope: &Scope) -> Result<TypeExpr, ResolveError> {
    scope.lookup(name).ok_or_else(|| ResolveError::Unresolved {
        name: name.to_owned(),
        scopes: scope.searched(),
    })
}

/// Resolve a type-variable occurrence against the binding environment.
///
/// Fallback order for unbound variables: constraint set (as a union),
/// declared bound, `Any`. This never fails: an unconstrained, unbound
/// variable simply accepts everything.
pub fn resolve_type_var(var: &TypeVarRef, env: &BindingEnv) -> TypeExpr {
    if let Some(bound_ty) = env.get(&var.name) {
        return bound_ty.clone();
    }
    if !var.constraints.is_empty() {
        return TypeExpr::union(var.constraints.to_vec());
    }
    if let Some(bound) = &var.bound {
        return (**bound).clone();
    }
    TypeExpr::Any
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
    fn forward_ref_found_in_module_scope() {
        let mut scope = Scope::module("m");
        scope.bind("Node", TypeExpr::class("Node"));
        assert_eq!(
            resolve_forward_ref("Node", &scope),
            Ok(TypeExpr::class("Node"))
        );
    }

    #[test]
    fn forward_ref_prefers_inner_scope() {
        let mut module = Scope::module("m");
        module.bind("T", TypeExpr::int());
        let mut class_scope = module.class_scope("C");
        class_scope.bind("T", TypeExpr::string());
        assert_eq!(resolve_forward_ref("T", &class_scope), Ok(TypeExpr::string()));
        // The module scope is untouched.
        assert_eq!(resolve_forward_ref("T", &module), Ok(TypeExpr::int()));
    }

    #[test]
    fn unresolved_name_reports_searched_scopes() {
        let module = Scope::module("m");
        let class_scope = module.class_scope("C");
        let err = resolve_forward_ref("Missing", &class_scope).unwrap_err();
        match err {
            ResolveError::Unresolved { name, scopes } => {
                assert_eq!(name, "Missing");
                assert_eq!(scopes, "class 'C', module 'm'");
            }
        }
    }

    #[test]
    fn type_var_uses_binding_env_first() {
        let var = TypeVarRef::new("T").with_bound(TypeExpr::float());
        let mut env = BindingEnv::new();
        env.bind("T", TypeExpr::int());
        assert_eq!(resolve_type_var(&var, &env), TypeExpr::int());
    }

    #[test]
    fn unbound_var_falls_back_to_constraints_then_bound_then_any() {
        let env = BindingEnv::new();

        let constrained = TypeVarRef::new("S")
            .with_constraints(vec![TypeExpr::int(), TypeExpr::string()]);
        assert_eq!(
            resolve_type_var(&constrained, &env),
            TypeExpr::union(vec![TypeExpr::int(), TypeExpr::string()])
        );

        let bounded = TypeVarRef::new("N").with_bound(TypeExpr::float());
        assert_eq!(resolve_type_var(&bounded, &env), TypeExpr::float());

        let free = TypeVarRef::new("T");
        assert_eq!(resolve_type_var(&free, &env), TypeExpr::Any);
    }
}
