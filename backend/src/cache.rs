use std::{
    num::NonZeroUsize,
    sync::{Mutex, PoisonError},
};

use lru::LruCache;
use shared::{DirectionsResult, RouteQuery};

use crate::{directions::DirectionsProvider, error::RouteError};

/// Keeps the most recent successful directions results in memory so that
/// repeated identical queries do not spend upstream quota.
///
/// Only successes are cached; errors always go back to the inner provider.
pub struct CachedDirections<P> {
    inner: P,
    cache: Option<Mutex<LruCache<RouteQuery, DirectionsResult>>>,
}

impl<P> CachedDirections<P> {
    /// `capacity == 0` disables caching.
    pub fn new(inner: P, capacity: usize) -> Self {
        let cache = NonZeroUsize::new(capacity).map(|cap| Mutex::new(LruCache::new(cap)));
        Self { inner, cache }
    }

    pub fn inner(&self) -> &P {
        &self.inner
    }

    fn lookup(&self, query: &RouteQuery) -> Option<DirectionsResult> {
        let cache = self.cache.as_ref()?;
        let mut guard = cache.lock().unwrap_or_else(PoisonError::into_inner);
        guard.get(query).cloned()
    }

    fn store(&self, query: RouteQuery, result: DirectionsResult) {
        if let Some(cache) = &self.cache {
            let mut guard = cache.lock().unwrap_or_else(PoisonError::into_inner);
            guard.put(query, result);
        }
    }
}

impl<P: DirectionsProvider> DirectionsProvider for CachedDirections<P> {
    async fn compute_route(&self, query: &RouteQuery) -> Result<DirectionsResult, RouteError> {
        if let Some(hit) = self.lookup(query) {
            tracing::debug!(origin = %query.origin, destination = %query.destination, "directions cache hit");
            return Ok(hit);
        }

        let result = self.inner.compute_route(query).await?;
        self.store(query.clone(), result.clone());
        Ok(result)
    }
}
