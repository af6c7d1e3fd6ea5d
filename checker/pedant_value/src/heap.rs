//! Arc-backed heap wrapper with a crate-private constructor.

use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

/// Shared, immutable heap allocation.
///
/// The constructor is crate-private: external code must go through the
/// factory methods on `Value`, which keeps every heap variant behind `Arc`
/// and makes cloning a `Value` O(1).
#[derive(Clone)]
pub struct Heap<T: ?Sized>(pub(crate) Arc<T>);

impl<T> Heap<T> {
    pub(crate) fn new(value: T) -> Self {
        Heap(Arc::new(value))
    }

    /// Pointer identity, used where structural equality is undefined.
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Arc::ptr_eq(&a.0, &b.0)
    }
}

impl<T: ?Sized> Deref for Heap<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T: PartialEq + ?Sized> PartialEq for Heap<T> {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0) || *self.0 == *other.0
    }
}

impl<T: fmt::Debug + ?Sized> fmt::Debug for Heap<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl<T: fmt::Display + ?Sized> fmt::Display for Heap<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deref_reaches_inner() {
        let h = Heap::new(42i64);
        assert_eq!(*h, 42);
    }

    #[test]
    fn clone_shares_allocation() {
        let h1 = Heap::new(vec![1, 2, 3]);
        let h2 = h1.clone();
        assert_eq!(*h1, *h2);
        assert!(Heap::ptr_eq(&h1, &h2));
    }

    #[test]
    fn equality_is_structural() {
        let h1 = Heap::new("hello".to_string());
        let h2 = Heap::new("hello".to_string());
        let h3 = Heap::new("world".to_string());
        assert_eq!(h1, h2);
        assert_ne!(h1, h3);
    }
}
