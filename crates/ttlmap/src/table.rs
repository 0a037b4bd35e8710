//! The guarded entry table shared by the map and its sweeper.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Instant;

use ttlmap_core::{prune_expired, Entry, TtlMapConfig};

/// Entry table behind a single reader/writer lock, plus sweep counters.
pub(crate) struct Table<K, V> {
    entries: RwLock<HashMap<K, Entry<V>>>,
    config: TtlMapConfig,
    sweeps: AtomicU64,
    swept_entries: AtomicU64,
}

impl<K, V> Table<K, V> {
    pub(crate) fn new(config: TtlMapConfig) -> Self {
        Self {
            entries: RwLock::new(HashMap::with_capacity(config.capacity_hint)),
            config,
            sweeps: AtomicU64::new(0),
            swept_entries: AtomicU64::new(0),
        }
    }

    pub(crate) fn config(&self) -> &TtlMapConfig {
        &self.config
    }

    // No operation leaves the map half-updated, so a poisoned lock still
    // guards a valid table.
    pub(crate) fn read(&self) -> RwLockReadGuard<'_, HashMap<K, Entry<V>>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn write(&self) -> RwLockWriteGuard<'_, HashMap<K, Entry<V>>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn sweeps(&self) -> u64 {
        self.sweeps.load(Ordering::Relaxed)
    }

    pub(crate) fn swept_entries(&self) -> u64 {
        self.swept_entries.load(Ordering::Relaxed)
    }
}

impl<K, V> Table<K, V>
where
    K: Eq + Hash,
{
    /// Removes every entry expired at `now` under the write lock.
    pub(crate) fn sweep(&self, now: Instant) -> usize {
        let (removed, remaining) = {
            let mut entries = self.write();
            let removed = prune_expired(&mut *entries, now);
            (removed, entries.len())
        };

        self.sweeps.fetch_add(1, Ordering::Relaxed);
        self.swept_entries.fetch_add(removed as u64, Ordering::Relaxed);

        if removed > 0 {
            tracing::debug!(removed, remaining, "Swept expired entries");
        }
        removed
    }
}
