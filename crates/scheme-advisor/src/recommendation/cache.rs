use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::time::Instant;

use super::domain::RecommendedScheme;
use super::fingerprint::Fingerprint;
use crate::config::CacheConfig;

/// Scored recommendations remembered for one fingerprint.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub fingerprint: Fingerprint,
    pub schemes: Arc<Vec<RecommendedScheme>>,
    pub created_at: Instant,
}

#[derive(Debug, Default)]
struct CacheState {
    entries: HashMap<Fingerprint, CacheEntry>,
    insertion_order: VecDeque<Fingerprint>,
}

impl CacheState {
    fn remove(&mut self, fingerprint: &Fingerprint) -> Option<CacheEntry> {
        let removed = self.entries.remove(fingerprint)?;
        self.insertion_order.retain(|queued| queued != fingerprint);
        Some(removed)
    }
}

/// Bounded TTL cache with FIFO eviction.
///
/// The entry map and the insertion queue live behind one mutex so an insert and the
/// eviction it triggers are observed as a single step. The lock is only ever held for
/// map/queue bookkeeping, never across an await point.
#[derive(Debug)]
pub struct RecommendationCache {
    state: Mutex<CacheState>,
    ttl: Duration,
    capacity: usize,
}

impl RecommendationCache {
    pub fn new(config: CacheConfig) -> Self {
        Self {
            state: Mutex::new(CacheState::default()),
            ttl: config.ttl,
            capacity: config.capacity.max(1),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the entry while it is younger than the TTL. Stale entries are dropped.
    pub fn get(&self, fingerprint: &Fingerprint) -> Option<CacheEntry> {
        let now = Instant::now();
        let mut state = self.state.lock();
        let entry = state.entries.get(fingerprint)?;
        if now.saturating_duration_since(entry.created_at) < self.ttl {
            return Some(entry.clone());
        }
        state.remove(fingerprint);
        None
    }

    /// Inserts or overwrites, then evicts the oldest insertion when over capacity.
    /// Returns the evicted fingerprint, if any.
    pub fn put(
        &self,
        fingerprint: Fingerprint,
        schemes: Vec<RecommendedScheme>,
    ) -> Option<Fingerprint> {
        let mut state = self.state.lock();
        let entry = CacheEntry {
            fingerprint: fingerprint.clone(),
            schemes: Arc::new(schemes),
            created_at: Instant::now(),
        };

        if state.entries.insert(fingerprint.clone(), entry).is_some() {
            state.insertion_order.retain(|queued| queued != &fingerprint);
        }
        state.insertion_order.push_back(fingerprint);

        if state.entries.len() <= self.capacity {
            return None;
        }
        let oldest = state.insertion_order.pop_front()?;
        state.entries.remove(&oldest);
        Some(oldest)
    }

    /// Drops every expired entry, returning how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut state = self.state.lock();
        let ttl = self.ttl;
        let before = state.entries.len();
        state
            .entries
            .retain(|_, entry| now.saturating_duration_since(entry.created_at) < ttl);
        let CacheState {
            entries,
            insertion_order,
        } = &mut *state;
        insertion_order.retain(|fingerprint| entries.contains_key(fingerprint));
        before - entries.len()
    }

    pub fn len(&self) -> usize {
        self.state.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().entries.is_empty()
    }

    pub fn contains(&self, fingerprint: &Fingerprint) -> bool {
        self.state.lock().entries.contains_key(fingerprint)
    }
}
