//! The `Value` enum.

use crate::class::InstanceValue;
use crate::function::FunctionValue;
use crate::heap::Heap;
use std::fmt;

/// A dynamically-typed runtime value.
///
/// Scalars are inline; containers and strings live behind `Heap` (see the
/// crate docs). `Bool` is deliberately distinct from `Int`: whether a
/// boolean satisfies a numeric annotation is checker policy, not a property
/// of the value model.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    // Scalars (inline)
    Int(i64),
    Float(f64),
    Bool(bool),
    /// The absence sentinel.
    None,

    // Heap-backed
    Str(Heap<String>),
    List(Heap<Vec<Value>>),
    /// Fixed-shape heterogeneous sequence.
    Tuple(Heap<Vec<Value>>),
    /// Set in iteration order. Membership is by structural equality.
    Set(Heap<Vec<Value>>),
    /// Insertion-ordered mapping. Keys may be any value.
    Map(Heap<Vec<(Value, Value)>>),

    // Composite
    Function(FunctionValue),
    Instance(InstanceValue),
}

// Factory methods (the only way to construct heap variants)

impl Value {
    #[inline]
    pub fn int(n: i64) -> Self {
        Value::Int(n)
    }

    #[inline]
    pub fn float(x: f64) -> Self {
        Value::Float(x)
    }

    #[inline]
    pub fn bool(b: bool) -> Self {
        Value::Bool(b)
    }

    pub fn string(s: impl Into<String>) -> Self {
        Value::Str(Heap::new(s.into()))
    }

    pub fn list(items: Vec<Value>) -> Self {
        Value::List(Heap::new(items))
    }

    pub fn tuple(items: Vec<Value>) -> Self {
        Value::Tuple(Heap::new(items))
    }

    pub fn set(items: Vec<Value>) -> Self {
        Value::Set(Heap::new(items))
    }

    pub fn map(entries: Vec<(Value, Value)>) -> Self {
        Value::Map(Heap::new(entries))
    }

    pub fn function(f: FunctionValue) -> Self {
        Value::Function(f)
    }

    pub fn instance(i: InstanceValue) -> Self {
        Value::Instance(i)
    }
}

impl Value {
    /// Runtime type name, as used in error messages.
    pub fn type_name(&self) -> &str {
        match self {
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Bool(_) => "bool",
            Value::None => "NoneType",
            Value::Str(_) => "str",
            Value::List(_) => "list",
            Value::Tuple(_) => "tuple",
            Value::Set(_) => "set",
            Value::Map(_) => "dict",
            Value::Function(_) => "function",
            Value::Instance(i) => i.class().name(),
        }
    }

    /// Short rendering for error messages. Strings are quoted; containers
    /// are elided past a few elements to keep messages readable.
    pub fn repr(&self) -> String {
        match self {
            Value::Int(n) => n.to_string(),
            Value::Float(x) => format!("{x:?}"),
            Value::Bool(b) => b.to_string(),
            Value::None => "None".to_owned(),
            Value::Str(s) => format!("'{s}'"),
            Value::List(items) => render_seq("[", &items[..], "]"),
            Value::Tuple(items) => render_seq("(", &items[..], ")"),
            Value::Set(items) => render_seq("{", &items[..], "}"),
            Value::Map(entries) => {
                let mut out = String::from("{");
                for (i, (k, v)) in entries.iter().take(4).enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    out.push_str(&k.repr());
                    out.push_str(": ");
                    out.push_str(&v.repr());
                }
                if entries.len() > 4 {
                    out.push_str(", ...");
                }
                out.push('}');
                out
            }
            Value::Function(f) => format!("<function {}>", f.name()),
            Value::Instance(i) => format!("<{} instance>", i.class().name()),
        }
    }
}

fn render_seq(open: &str, items: &[Value], close: &str) -> String {
    let mut out = String::from(open);
    for (i, item) in items.iter().take(4).enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        out.push_str(&item.repr());
    }
    if items.len() > 4 {
        out.push_str(", ...");
    }
    out.push_str(close);
    out
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.repr())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn type_names() {
        assert_eq!(Value::int(1).type_name(), "int");
        assert_eq!(Value::bool(true).type_name(), "bool");
        assert_eq!(Value::None.type_name(), "NoneType");
        assert_eq!(Value::list(vec![]).type_name(), "list");
        assert_eq!(Value::map(vec![]).type_name(), "dict");
    }

    #[test]
    fn bool_is_not_int() {
        assert_ne!(Value::bool(true), Value::int(1));
        assert_ne!(Value::bool(false), Value::int(0));
    }

    #[test]
    fn repr_quotes_strings_and_elides_long_containers() {
        assert_eq!(Value::string("x").repr(), "'x'");
        let long = Value::list((0..6).map(Value::int).collect());
        assert_eq!(long.repr(), "[0, 1, 2, 3, ...]");
    }

    #[test]
    fn structural_equality_for_containers() {
        let a = Value::list(vec![Value::int(1), Value::string("a")]);
        let b = Value::list(vec![Value::int(1), Value::string("a")]);
        assert_eq!(a, b);
        let m1 = Value::map(vec![(Value::string("k"), Value::int(1))]);
        let m2 = Value::map(vec![(Value::string("k"), Value::int(1))]);
        assert_eq!(m1, m2);
    }
}
