//! Structural paths for error reporting.
//!
//! A `ValuePath` records how the checker descended into a value:
//! `values[1]`, `cfg['port']`, `return[0]`. Paths are cheap to extend;
//! most are a handful of segments, so they live in a `SmallVec`.

use smallvec::SmallVec;
use std::fmt;
use std::sync::Arc;

/// One step of descent into a checked value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PathSegment {
    /// Named argument at the call boundary.
    Arg(Arc<str>),
    /// The return position.
    Return,
    /// Element index in a list, tuple, or set (iteration order).
    Index(usize),
    /// The value stored under a mapping key. Carries the key's rendering.
    Key(String),
    /// A mapping key itself (when the key fails its own check).
    MapKey(String),
}

/// The structural path taken by one conformance check.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ValuePath {
    segments: SmallVec<[PathSegment; 4]>,
}

impl ValuePath {
    /// Empty path (top-level check with no call context).
    pub fn root() -> Self {
        ValuePath::default()
    }

    /// Path rooted at a named argument.
    pub fn arg(name: impl Into<Arc<str>>) -> Self {
        let mut path = ValuePath::default();
        path.segments.push(PathSegment::Arg(name.into()));
        path
    }

    /// Path rooted at the return position.
    pub fn ret() -> Self {
        let mut path = ValuePath::default();
        path.segments.push(PathSegment::Return);
        path
    }

    /// Extend by one segment, returning the child path.
    #[must_use]
    pub fn child(&self, segment: PathSegment) -> Self {
        let mut path = self.clone();
        path.segments.push(segment);
        path
    }

    #[must_use]
    pub fn index(&self, i: usize) -> Self {
        self.child(PathSegment::Index(i))
    }

    #[must_use]
    pub fn key(&self, key: impl Into<String>) -> Self {
        self.child(PathSegment::Key(key.into()))
    }

    #[must_use]
    pub fn map_key(&self, key: impl Into<String>) -> Self {
        self.child(PathSegment::MapKey(key.into()))
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }
}

impl fmt::Display for ValuePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return f.write_str("value");
        }
        for segment in &self.segments {
            match segment {
                PathSegment::Arg(name) => write!(f, "{name}")?,
                PathSegment::Return => write!(f, "return")?,
                PathSegment::Index(i) => write!(f, "[{i}]")?,
                PathSegment::Key(k) => write!(f, "[{k}]")?,
                PathSegment::MapKey(k) => write!(f, " (key {k})")?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn renders_argument_with_index() {
        let path = ValuePath::arg("values").index(1);
        assert_eq!(path.to_string(), "values[1]");
    }

    #[test]
    fn renders_nested_containers() {
        let path = ValuePath::arg("cfg").key("'port'").index(0);
        assert_eq!(path.to_string(), "cfg['port'][0]");
    }

    #[test]
    fn renders_failing_map_key() {
        let path = ValuePath::arg("cfg").map_key("3.5");
        assert_eq!(path.to_string(), "cfg (key 3.5)");
    }

    #[test]
    fn renders_return_position() {
        assert_eq!(ValuePath::ret().to_string(), "return");
        assert_eq!(ValuePath::ret().index(2).to_string(), "return[2]");
    }

    #[test]
    fn root_renders_placeholder() {
        assert_eq!(ValuePath::root().to_string(), "value");
    }

    #[test]
    fn child_does_not_mutate_parent() {
        let parent = ValuePath::arg("xs");
        let _child = parent.index(3);
        assert_eq!(parent.to_string(), "xs");
    }
}
