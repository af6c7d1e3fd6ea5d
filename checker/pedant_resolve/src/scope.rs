//! Namespace scopes for forward-reference lookup.

use pedant_types::TypeExpr;
use rustc_hash::FxHashMap;
use std::sync::Arc;

/// Kind of namespace a scope represents, used in error messages.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum ScopeKind {
    Module,
    Class,
}

#[derive(Clone, Debug)]
struct ScopeInner {
    kind: ScopeKind,
    name: Arc<str>,
    bindings: FxHashMap<Arc<str>, TypeExpr>,
    /// Parent scope; cheap Arc clone when creating child scopes.
    parent: Option<Scope>,
}

/// A name → type-expression namespace with parent chaining.
///
/// Lookup searches the current scope first, then parents: an enclosing
/// class body shadows module globals. Creating a child scope is O(1);
/// binding into a shared scope copies-on-write via `Arc::make_mut`.
#[derive(Clone, Debug)]
pub struct Scope(Arc<ScopeInner>);

impl Scope {
    /// A module-level scope.
    pub fn module(name: impl Into<Arc<str>>) -> Self {
        Scope(Arc::new(ScopeInner {
            kind: ScopeKind::Module,
            name: name.into(),
            bindings: FxHashMap::default(),
            parent: None,
        }))
    }

    /// A class-body scope nested inside this one.
    #[must_use]
    pub fn class_scope(&self, name: impl Into<Arc<str>>) -> Self {
        Scope(Arc::new(ScopeInner {
            kind: ScopeKind::Class,
            name: name.into(),
            bindings: FxHashMap::default(),
            parent: Some(self.clone()),
        }))
    }

    /// Bind a name in this scope. Later bindings shadow earlier ones,
    /// which is what deferred class-name registration relies on.
    pub fn bind(&mut self, name: impl Into<Arc<str>>, ty: TypeExpr) {
        let inner = Arc::make_mut(&mut self.0);
        inner.bindings.insert(name.into(), ty);
    }

    /// Look up a name, searching parent scopes.
    pub fn lookup(&self, name: &str) -> Option<TypeExpr> {
        if let Some(ty) = self.0.bindings.get(name) {
            return Some(ty.clone());
        }
        self.0.parent.as_ref().and_then(|p| p.lookup(name))
    }

    /// Human-readable list of the scopes a failed lookup searched,
    /// innermost first: `class 'C', module 'm'`.
    pub fn searched(&self) -> String {
        let mut parts = Vec::new();
        let mut current = Some(self);
        while let Some(scope) = current {
            let label = match scope.0.kind {
                ScopeKind::Module => "module",
                ScopeKind::Class => "class",
            };
            parts.push(format!("{label} '{}'", scope.0.name));
            current = scope.0.parent.as_ref();
        }
        parts.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn lookup_walks_parent_chain() {
        let mut module = Scope::module("m");
        module.bind("Node", TypeExpr::class("Node"));
        let class_scope = module.class_scope("Tree");
        assert_eq!(class_scope.lookup("Node"), Some(TypeExpr::class("Node")));
        assert_eq!(class_scope.lookup("Leaf"), None);
    }

    #[test]
    fn binding_after_child_creation_is_invisible_to_child() {
        // Child scopes snapshot their parent: late module bindings do not
        // appear, which callers handle by binding before first check.
        let module = Scope::module("m");
        let child = module.class_scope("C");
        let mut module = module;
        module.bind("Late", TypeExpr::int());
        assert_eq!(child.lookup("Late"), None);
    }

    #[test]
    fn self_referential_binding() {
        let mut module = Scope::module("m");
        module.bind("LinkedList", TypeExpr::class("LinkedList"));
        assert_eq!(
            module.lookup("LinkedList"),
            Some(TypeExpr::class("LinkedList"))
        );
    }
}
