//! Callable values and their declared signatures.

use crate::value::Value;
use pedant_types::TypeExpr;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Process-unique callable identity.
///
/// Assigned monotonically at construction; the signature cache is keyed by
/// it, which is what makes "a callable's signature never changes after
/// first inspection" enforceable.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct FunctionId(u64);

impl FunctionId {
    fn next() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        FunctionId(COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    pub fn as_u64(self) -> u64 {
        self.0
    }
}

/// One declared parameter.
#[derive(Clone, Debug)]
pub struct Param {
    pub name: Arc<str>,
    /// Declared type, if any. Missing annotations are an introspection
    /// error, not a checking error.
    pub annotation: Option<TypeExpr>,
    /// Default value, checked against the annotation when the caller
    /// omits the argument.
    pub default: Option<Value>,
}

impl Param {
    pub fn new(name: impl Into<Arc<str>>, annotation: TypeExpr) -> Self {
        Param {
            name: name.into(),
            annotation: Some(annotation),
            default: None,
        }
    }

    /// A parameter declared without a type annotation.
    pub fn untyped(name: impl Into<Arc<str>>) -> Self {
        Param {
            name: name.into(),
            annotation: None,
            default: None,
        }
    }

    #[must_use]
    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }
}

/// How a callable relates to an owning instance.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FunctionKind {
    /// Free function: every declared parameter is caller-supplied.
    Free,
    /// Method. While unbound, the leading `self` slot has no known
    /// instance and introspection must refuse to guess.
    Method { bound: bool },
}

/// Body invoked after argument checking: receives `(name, value)` pairs in
/// declaration order.
pub type CallBody = Arc<dyn Fn(&[(Arc<str>, Value)]) -> Result<Value, String> + Send + Sync>;

/// A callable runtime value with its declared annotations attached.
#[derive(Clone)]
pub struct FunctionValue {
    id: FunctionId,
    name: Arc<str>,
    params: Arc<[Param]>,
    ret: Option<TypeExpr>,
    kind: FunctionKind,
    body: CallBody,
}

impl FunctionValue {
    pub fn new(
        name: impl Into<Arc<str>>,
        params: Vec<Param>,
        ret: Option<TypeExpr>,
        body: CallBody,
    ) -> Self {
        FunctionValue {
            id: FunctionId::next(),
            name: name.into(),
            params: params.into(),
            ret,
            kind: FunctionKind::Free,
            body,
        }
    }

    #[must_use]
    pub fn with_kind(mut self, kind: FunctionKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn id(&self) -> FunctionId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn params(&self) -> &[Param] {
        &self.params
    }

    pub fn ret(&self) -> Option<&TypeExpr> {
        self.ret.as_ref()
    }

    pub fn kind(&self) -> FunctionKind {
        self.kind
    }

    /// Invoke the body with already-bound arguments.
    pub fn invoke(&self, args: &[(Arc<str>, Value)]) -> Result<Value, String> {
        (self.body)(args)
    }
}

impl PartialEq for FunctionValue {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl fmt::Debug for FunctionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionValue")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("params", &self.params)
            .field("ret", &self.ret)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop_body() -> CallBody {
        Arc::new(|_args| Ok(Value::None))
    }

    #[test]
    fn ids_are_unique() {
        let f = FunctionValue::new("f", vec![], Some(TypeExpr::None), noop_body());
        let g = FunctionValue::new("g", vec![], Some(TypeExpr::None), noop_body());
        assert_ne!(f.id(), g.id());
        assert_ne!(f, g);
    }

    #[test]
    fn clone_preserves_identity() {
        let f = FunctionValue::new("f", vec![], Some(TypeExpr::None), noop_body());
        let f2 = f.clone();
        assert_eq!(f, f2);
    }

    #[test]
    fn invoke_passes_bound_args() {
        let body: CallBody = Arc::new(|args| {
            let (name, value) = &args[0];
            assert_eq!(&**name, "n");
            Ok(value.clone())
        });
        let f = FunctionValue::new(
            "identity",
            vec![Param::new("n", TypeExpr::int())],
            Some(TypeExpr::int()),
            body,
        );
        let out = f.invoke(&[(Arc::from("n"), Value::int(7))]);
        assert_eq!(out, Ok(Value::int(7)));
    }
}
