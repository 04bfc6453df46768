//! Time-boxed cache for computed statistics
//!
//! [`TtlCache`] holds one value together with the instant it was computed.
//! Readers get the cached value until `ttl` has elapsed; the first reader
//! after that recomputes it. The lock is held while computing, so
//! concurrent readers of an expired entry wait for a single refresh.

use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

use docmend_core::Timestamp;

use crate::clock::{Clock, SystemClock};

/// A cached value and when it was computed
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry<T> {
    /// Instant the value was computed
    pub computed_at: Timestamp,
    /// The value
    pub value: T,
}

/// Single-value cache with a fixed expiry
pub struct TtlCache<T> {
    ttl: Duration,
    clock: Arc<dyn Clock>,
    entry: Mutex<Option<CacheEntry<T>>>,
}

impl<T: std::fmt::Debug> std::fmt::Debug for TtlCache<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TtlCache")
            .field("ttl", &self.ttl)
            .field("entry", &*self.entry.lock())
            .finish()
    }
}

impl<T: Clone> TtlCache<T> {
    /// Create an empty cache on the wall clock
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, Arc::new(SystemClock))
    }

    /// Create an empty cache on the given clock
    pub fn with_clock(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        TtlCache {
            ttl,
            clock,
            entry: Mutex::new(None),
        }
    }

    /// Configured lifetime
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// The cached entry, if present and not expired
    pub fn get(&self) -> Option<CacheEntry<T>> {
        let now = self.clock.now();
        self.entry
            .lock()
            .as_ref()
            .filter(|entry| self.is_fresh(entry, now))
            .cloned()
    }

    /// The cached entry, recomputing it first when missing or expired
    ///
    /// A failed computation leaves the previous entry in place.
    pub fn get_or_refresh<E, F>(&self, compute: F) -> std::result::Result<CacheEntry<T>, E>
    where
        F: FnOnce() -> std::result::Result<T, E>,
    {
        let mut guard = self.entry.lock();
        let now = self.clock.now();
        if let Some(entry) = guard.as_ref().filter(|entry| self.is_fresh(entry, now)) {
            return Ok(entry.clone());
        }

        let value = compute()?;
        let entry = CacheEntry {
            computed_at: self.clock.now(),
            value,
        };
        *guard = Some(entry.clone());
        Ok(entry)
    }

    /// Drop the cached entry
    pub fn invalidate(&self) {
        *self.entry.lock() = None;
    }

    fn is_fresh(&self, entry: &CacheEntry<T>, now: Timestamp) -> bool {
        match now.duration_since(entry.computed_at) {
            Some(age) => age < self.ttl,
            // Clock moved backwards
            None => true,
        }
    }
}
