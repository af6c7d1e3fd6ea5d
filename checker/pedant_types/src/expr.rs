//! The `TypeExpr` tagged union and its building blocks.

use std::fmt;
use std::sync::Arc;

/// Nominal class reference used by exact-instance checks.
///
/// Built-in scalar classes get dedicated variants so the checker can apply
/// the boolean-as-integer special case without string comparisons.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ClassRef {
    /// Built-in integer class.
    Int,
    /// Built-in float class.
    Float,
    /// Built-in boolean class.
    Bool,
    /// Built-in string class.
    Str,
    /// A user-defined class, referenced by qualified name.
    Named(Arc<str>),
}

impl ClassRef {
    /// Class name as written in annotations.
    pub fn name(&self) -> &str {
        match self {
            ClassRef::Int => "int",
            ClassRef::Float => "float",
            ClassRef::Bool => "bool",
            ClassRef::Str => "str",
            ClassRef::Named(name) => name,
        }
    }
}

impl fmt::Display for ClassRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A concrete value admitted by a `Literal[...]` annotation.
///
/// Matching is by equality *and* exact runtime type: `Literal[1]` is never
/// satisfied by `true`, even where booleans coerce to integers elsewhere.
#[derive(Clone, Debug, PartialEq)]
pub enum LiteralValue {
    Int(i64),
    Bool(bool),
    Str(Arc<str>),
}

impl fmt::Display for LiteralValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LiteralValue::Int(n) => write!(f, "{n}"),
            LiteralValue::Bool(b) => write!(f, "{b}"),
            LiteralValue::Str(s) => write!(f, "'{s}'"),
        }
    }
}

/// Container origin for parameterized generics.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ContainerKind {
    /// Homogeneous list: `list[T]`.
    List,
    /// Mutable set: `set[T]`.
    Set,
    /// Immutable set: `frozenset[T]`.
    FrozenSet,
    /// Abstract sequence: accepts lists and tuples.
    Sequence,
    /// Mapping: `dict[K, V]`.
    Mapping,
    /// Fixed-arity tuple: `tuple[T0, T1, ...Tn]`.
    Tuple,
    /// Homogeneous variadic tuple: `tuple[T, ...]`.
    TupleVariadic,
}

impl ContainerKind {
    /// Name used when rendering annotations.
    pub fn name(self) -> &'static str {
        match self {
            ContainerKind::List => "list",
            ContainerKind::Set => "set",
            ContainerKind::FrozenSet => "frozenset",
            ContainerKind::Sequence => "Sequence",
            ContainerKind::Mapping => "dict",
            ContainerKind::Tuple | ContainerKind::TupleVariadic => "tuple",
        }
    }

    /// Number of type arguments a fully parameterized annotation carries.
    /// `None` means any positive arity (fixed tuples).
    pub fn expected_args(self) -> Option<usize> {
        match self {
            ContainerKind::Mapping => Some(2),
            ContainerKind::Tuple => None,
            _ => Some(1),
        }
    }
}

/// A type variable occurrence: resolved against an externally supplied
/// binding environment, falling back to its constraints or bound.
#[derive(Clone, Debug, PartialEq)]
pub struct TypeVarRef {
    /// The variable's declared name (`T`, `K`, ...). Identity key.
    pub name: Arc<str>,
    /// Upper bound, if declared.
    pub bound: Option<Box<TypeExpr>>,
    /// Constraint set, if declared. Mutually exclusive with `bound` in
    /// well-formed declarations; if both are present, constraints win.
    pub constraints: Box<[TypeExpr]>,
}

impl TypeVarRef {
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        TypeVarRef {
            name: name.into(),
            bound: None,
            constraints: Box::new([]),
        }
    }

    #[must_use]
    pub fn with_bound(mut self, bound: TypeExpr) -> Self {
        self.bound = Some(Box::new(bound));
        self
    }

    #[must_use]
    pub fn with_constraints(mut self, constraints: Vec<TypeExpr>) -> Self {
        self.constraints = constraints.into_boxed_slice();
        self
    }
}

/// Normalized type annotation.
///
/// Immutable, value-owned, recursively nested to arbitrary depth. Depth is
/// bounded only by stack size at check time; cycles can only occur through
/// `ForwardRef` chains and are detected by the checker, not here.
#[derive(Clone, Debug, PartialEq)]
pub enum TypeExpr {
    /// Matches every value.
    Any,
    /// Matches exactly the absence sentinel (`None`).
    None,
    /// Nominal instance-of check.
    Exact(ClassRef),
    /// Equality against a fixed set of concrete values.
    Literal(Box<[LiteralValue]>),
    /// Existential disjunction, evaluated left to right.
    Union(Box<[TypeExpr]>),
    /// Parameterized container. Empty `args` means the annotation was
    /// written bare (`list` instead of `list[int]`): checked as all-`Any`,
    /// flagged by the declaration lint in strict mode.
    Generic {
        origin: ContainerKind,
        args: Box<[TypeExpr]>,
    },
    /// Callable signature. `params: None` encodes `Callable[..., R]`.
    Callable {
        params: Option<Box<[TypeExpr]>>,
        ret: Box<TypeExpr>,
    },
    /// Type variable occurrence.
    Var(TypeVarRef),
    /// Deferred name, resolved lazily against an enclosing scope.
    ForwardRef(Arc<str>),
}

impl TypeExpr {
    pub fn int() -> Self {
        TypeExpr::Exact(ClassRef::Int)
    }

    pub fn float() -> Self {
        TypeExpr::Exact(ClassRef::Float)
    }

    pub fn boolean() -> Self {
        TypeExpr::Exact(ClassRef::Bool)
    }

    pub fn string() -> Self {
        TypeExpr::Exact(ClassRef::Str)
    }

    pub fn class(name: impl Into<Arc<str>>) -> Self {
        TypeExpr::Exact(ClassRef::Named(name.into()))
    }

    pub fn union(members: Vec<TypeExpr>) -> Self {
        TypeExpr::Union(members.into_boxed_slice())
    }

    /// `Optional[T]`, modeled as `Union[T, None]`.
    pub fn optional(inner: TypeExpr) -> Self {
        TypeExpr::union(vec![inner, TypeExpr::None])
    }

    pub fn list_of(elem: TypeExpr) -> Self {
        TypeExpr::Generic {
            origin: ContainerKind::List,
            args: Box::new([elem]),
        }
    }

    pub fn set_of(elem: TypeExpr) -> Self {
        TypeExpr::Generic {
            origin: ContainerKind::Set,
            args: Box::new([elem]),
        }
    }

    pub fn sequence_of(elem: TypeExpr) -> Self {
        TypeExpr::Generic {
            origin: ContainerKind::Sequence,
            args: Box::new([elem]),
        }
    }

    pub fn mapping_of(key: TypeExpr, value: TypeExpr) -> Self {
        TypeExpr::Generic {
            origin: ContainerKind::Mapping,
            args: Box::new([key, value]),
        }
    }

    pub fn tuple_of(slots: Vec<TypeExpr>) -> Self {
        TypeExpr::Generic {
            origin: ContainerKind::Tuple,
            args: slots.into_boxed_slice(),
        }
    }

    /// `tuple[T, ...]`
    pub fn tuple_variadic(elem: TypeExpr) -> Self {
        TypeExpr::Generic {
            origin: ContainerKind::TupleVariadic,
            args: Box::new([elem]),
        }
    }

    /// A container annotation written without type arguments.
    pub fn bare(origin: ContainerKind) -> Self {
        TypeExpr::Generic {
            origin,
            args: Box::new([]),
        }
    }

    pub fn callable(params: Vec<TypeExpr>, ret: TypeExpr) -> Self {
        TypeExpr::Callable {
            params: Some(params.into_boxed_slice()),
            ret: Box::new(ret),
        }
    }

    /// `Callable[..., R]`
    pub fn callable_any(ret: TypeExpr) -> Self {
        TypeExpr::Callable {
            params: None,
            ret: Box::new(ret),
        }
    }

    pub fn var(var: TypeVarRef) -> Self {
        TypeExpr::Var(var)
    }

    pub fn forward_ref(name: impl Into<Arc<str>>) -> Self {
        TypeExpr::ForwardRef(name.into())
    }

    pub fn literal(values: Vec<LiteralValue>) -> Self {
        TypeExpr::Literal(values.into_boxed_slice())
    }

    /// True for annotations written without their type arguments.
    pub fn is_bare_container(&self) -> bool {
        match self {
            TypeExpr::Generic { origin, args } => match origin.expected_args() {
                Some(n) => args.len() != n,
                Option::None => args.is_empty(),
            },
            _ => false,
        }
    }
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeExpr::Any => f.write_str("Any"),
            TypeExpr::None => f.write_str("None"),
            TypeExpr::Exact(class) => write!(f, "{class}"),
            TypeExpr::Literal(values) => {
                f.write_str("Literal[")?;
                for (i, v) in values.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{v}")?;
                }
                f.write_str("]")
            }
            TypeExpr::Union(members) => {
                for (i, m) in members.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" | ")?;
                    }
                    write!(f, "{m}")?;
                }
                Ok(())
            }
            TypeExpr::Generic { origin, args } => {
                f.write_str(origin.name())?;
                if args.is_empty() {
                    return Ok(());
                }
                f.write_str("[")?;
                for (i, a) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{a}")?;
                }
                if *origin == ContainerKind::TupleVariadic {
                    f.write_str(", ...")?;
                }
                f.write_str("]")
            }
            TypeExpr::Callable { params, ret } => {
                f.write_str("Callable[")?;
                match params {
                    Some(params) => {
                        f.write_str("[")?;
                        for (i, p) in params.iter().enumerate() {
                            if i > 0 {
                                f.write_str(", ")?;
                            }
                            write!(f, "{p}")?;
                        }
                        f.write_str("]")?;
                    }
                    Option::None => f.write_str("...")?,
                }
                write!(f, ", {ret}]")
            }
            TypeExpr::Var(var) => write!(f, "~{}", var.name),
            TypeExpr::ForwardRef(name) => write!(f, "'{name}'"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn display_scalars() {
        assert_eq!(TypeExpr::int().to_string(), "int");
        assert_eq!(TypeExpr::None.to_string(), "None");
        assert_eq!(TypeExpr::Any.to_string(), "Any");
        assert_eq!(TypeExpr::class("Node").to_string(), "Node");
    }

    #[test]
    fn display_nested() {
        let ty = TypeExpr::list_of(TypeExpr::union(vec![TypeExpr::int(), TypeExpr::float()]));
        assert_eq!(ty.to_string(), "list[int | float]");

        let ty = TypeExpr::mapping_of(TypeExpr::string(), TypeExpr::optional(TypeExpr::int()));
        assert_eq!(ty.to_string(), "dict[str, int | None]");

        let ty = TypeExpr::tuple_variadic(TypeExpr::int());
        assert_eq!(ty.to_string(), "tuple[int, ...]");
    }

    #[test]
    fn display_callable() {
        let ty = TypeExpr::callable(vec![TypeExpr::int(), TypeExpr::float()], TypeExpr::string());
        assert_eq!(ty.to_string(), "Callable[[int, float], str]");
        assert_eq!(
            TypeExpr::callable_any(TypeExpr::Any).to_string(),
            "Callable[..., Any]"
        );
    }

    #[test]
    fn optional_is_a_union_with_none() {
        let ty = TypeExpr::optional(TypeExpr::string());
        match ty {
            TypeExpr::Union(members) => {
                assert_eq!(members.len(), 2);
                assert_eq!(members[1], TypeExpr::None);
            }
            other => panic!("expected union, got {other:?}"),
        }
    }

    #[test]
    fn bare_container_detection() {
        assert!(TypeExpr::bare(ContainerKind::List).is_bare_container());
        assert!(TypeExpr::bare(ContainerKind::Mapping).is_bare_container());
        assert!(!TypeExpr::list_of(TypeExpr::int()).is_bare_container());
        // A fixed tuple with any slots is fully parameterized.
        assert!(!TypeExpr::tuple_of(vec![TypeExpr::int()]).is_bare_container());
        assert!(TypeExpr::bare(ContainerKind::Tuple).is_bare_container());
    }

    #[test]
    fn equality_is_structural() {
        assert_eq!(
            TypeExpr::list_of(TypeExpr::int()),
            TypeExpr::list_of(TypeExpr::int())
        );
        assert_ne!(
            TypeExpr::list_of(TypeExpr::int()),
            TypeExpr::sequence_of(TypeExpr::int())
        );
    }
}
