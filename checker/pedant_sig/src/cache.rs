//! Process-wide signature cache.

use crate::record::{introspect, SignatureRecord};
use parking_lot::RwLock;
use pedant_diagnostic::ContractResult;
use pedant_value::{FunctionId, FunctionValue};
use rustc_hash::FxHashMap;
use std::sync::Arc;

/// Read-mostly cache of introspected signatures, keyed by callable
/// identity.
///
/// Concurrent readers take the shared lock; a miss introspects outside any
/// lock (introspection is pure and idempotent, so two threads racing on
/// the same key compute identical records, the first insert wins and the
/// loser's work is discarded). The write lock is held only for the map
/// insert, so the structure itself cannot be corrupted.
#[derive(Default)]
pub struct SignatureCache {
    inner: RwLock<FxHashMap<FunctionId, Arc<SignatureRecord>>>,
}

impl SignatureCache {
    pub fn new() -> Self {
        SignatureCache::default()
    }

    /// Fetch the cached record, introspecting on first use.
    pub fn get_or_introspect(
        &self,
        function: &FunctionValue,
    ) -> ContractResult<Arc<SignatureRecord>> {
        if let Some(record) = self.inner.read().get(&function.id()) {
            return Ok(record.clone());
        }

        let record = Arc::new(introspect(function)?);
        let mut map = self.inner.write();
        let entry = map.entry(function.id()).or_insert(record);
        Ok(entry.clone())
    }

    /// Number of cached signatures.
    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    /// Drop every cached entry. Intended for test teardown; in-flight
    /// calls holding an `Arc` to a record are unaffected.
    pub fn reset(&self) {
        self.inner.write().clear();
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
mod tests {
    use super::*;
    use pedant_types::TypeExpr;
    use pedant_value::{CallBody, Param, Value};

    fn sample_fn() -> FunctionValue {
        let body: CallBody = Arc::new(|_| Ok(Value::None));
        FunctionValue::new(
            "f",
            vec![Param::new("a", TypeExpr::int())],
            Some(TypeExpr::None),
            body,
        )
    }

    #[test]
    fn second_lookup_hits_the_cache() {
        let cache = SignatureCache::new();
        let f = sample_fn();
        let first = cache.get_or_introspect(&f).unwrap();
        let second = cache.get_or_introspect(&f).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn distinct_functions_get_distinct_entries() {
        let cache = SignatureCache::new();
        let f = sample_fn();
        let g = sample_fn();
        cache.get_or_introspect(&f).unwrap();
        cache.get_or_introspect(&g).unwrap();
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn failed_introspection_is_not_cached() {
        let cache = SignatureCache::new();
        let body: CallBody = Arc::new(|_| Ok(Value::None));
        let bad = FunctionValue::new("bad", vec![Param::untyped("a")], None, body);
        assert!(cache.get_or_introspect(&bad).is_err());
        assert!(cache.is_empty());
    }

    #[test]
    fn reset_clears_entries() {
        let cache = SignatureCache::new();
        let f = sample_fn();
        cache.get_or_introspect(&f).unwrap();
        cache.reset();
        assert!(cache.is_empty());
    }

    #[test]
    fn concurrent_population_is_safe() {
        let cache = Arc::new(SignatureCache::new());
        let f = Arc::new(sample_fn());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = cache.clone();
                let f = f.clone();
                std::thread::spawn(move || cache.get_or_introspect(&f).map(|_| ()))
            })
            .collect();
        for handle in handles {
            handle.join().unwrap().unwrap();
        }
        assert_eq!(cache.len(), 1);
    }
}
