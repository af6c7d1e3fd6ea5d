//! Type-variable binding environments.

use pedant_types::TypeExpr;
use rustc_hash::FxHashMap;
use std::sync::Arc;

/// Mapping from type-variable name to the concrete type supplied at
/// instantiation or call time.
///
/// Populated by the generic-binding collaborator (e.g. whatever tracks
/// `Stack[int]` instantiations); the checker only reads it.
#[derive(Clone, Debug, Default)]
pub struct BindingEnv {
    bindings: FxHashMap<Arc<str>, TypeExpr>,
}

impl BindingEnv {
    pub fn new() -> Self {
        BindingEnv::default()
    }

    pub fn bind(&mut self, var: impl Into<Arc<str>>, ty: TypeExpr) {
        self.bindings.insert(var.into(), ty);
    }

    pub fn get(&self, var: &str) -> Option<&TypeExpr> {
        self.bindings.get(var)
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }
}

impl FromIterator<(Arc<str>, TypeExpr)> for BindingEnv {
    fn from_iter<I: IntoIterator<Item = (Arc<str>, TypeExpr)>>(iter: I) -> Self {
        BindingEnv {
            bindings: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn bind_and_get() {
        let mut env = BindingEnv::new();
        assert!(env.is_empty());
        env.bind("T", TypeExpr::int());
        assert_eq!(env.get("T"), Some(&TypeExpr::int()));
        assert_eq!(env.get("S"), None);
        assert_eq!(env.len(), 1);
    }

    #[test]
    fn rebinding_replaces() {
        let mut env = BindingEnv::new();
        env.bind("T", TypeExpr::int());
        env.bind("T", TypeExpr::string());
        assert_eq!(env.get("T"), Some(&TypeExpr::string()));
    }
}
