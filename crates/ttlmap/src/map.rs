//! The concurrent TTL map.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLockReadGuard, RwLockWriteGuard};
use std::time::{Duration, Instant};

use serde::Serialize;
use ttlmap_core::{count_visible, Entry, ReadPolicy, TtlMapConfig};

use crate::error::{Result, TtlMapError};
use crate::sweeper::Sweeper;
use crate::table::Table;

/// Thread-safe in-memory map whose entries expire a fixed TTL after they
/// were last written.
///
/// Every entry gets `expires_at = now + ttl` when it is written. Reads never
/// refresh that deadline; only another write (or [`TtlMap::touch`]) does.
/// A background sweeper removes expired entries every `sweep_interval`.
///
/// Between the deadline and the next sweep, an entry is *logically expired*.
/// With the default [`ReadPolicy::Sweep`] such entries are still returned by
/// lookups and counted by [`TtlMap::len`]; with [`ReadPolicy::Strict`] they
/// are hidden from every read.
///
/// All operations are synchronous. Readers share one lock, writers (including
/// the sweeper) take it exclusively.
///
/// After [`TtlMap::shutdown`] every data operation is a no-op: writes are
/// dropped and reads see an empty map.
pub struct TtlMap<K, V> {
    table: Arc<Table<K, V>>,
    sweeper: Mutex<Sweeper>,
    closed: AtomicBool,
}

impl<K, V> TtlMap<K, V>
where
    K: Eq + Hash + Send + Sync + 'static,
    V: Send + Sync + 'static,
{
    /// Creates a map and starts its sweeper.
    ///
    /// # Arguments
    ///
    /// * `capacity_hint` - Initial table size. Not a bound.
    /// * `ttl` - Lifetime of every entry. Zero makes entries expire immediately.
    /// * `sweep_interval` - Period of the background sweep. Must be positive.
    ///
    /// # Errors
    ///
    /// Returns `TtlMapError::Core(InvalidSweepInterval)` for a zero interval
    /// and `TtlMapError::SweeperSpawn` if the sweeper thread cannot start.
    pub fn new(capacity_hint: usize, ttl: Duration, sweep_interval: Duration) -> Result<Self> {
        Self::with_config(TtlMapConfig::new(capacity_hint, ttl, sweep_interval)?)
    }

    /// Creates a map from a config and starts its sweeper.
    pub fn with_config(config: TtlMapConfig) -> Result<Self> {
        config.validate()?;

        tracing::debug!(
            capacity_hint = config.capacity_hint,
            ttl_ms = config.ttl.as_millis() as u64,
            sweep_interval_ms = config.sweep_interval.as_millis() as u64,
            read_policy = %config.read_policy,
            "Creating TTL map"
        );

        let table = Arc::new(Table::new(config));
        let sweeper = Sweeper::spawn(Arc::clone(&table))?;

        Ok(Self {
            table,
            sweeper: Mutex::new(sweeper),
            closed: AtomicBool::new(false),
        })
    }
}

impl<K, V> TtlMap<K, V>
where
    K: Eq + Hash,
{
    /// Inserts or replaces `key`, restarting its lifetime.
    pub fn put(&self, key: K, value: V) {
        let Some(mut entries) = self.write_entries("put") else {
            return;
        };
        let entry = Entry::new(value, Instant::now(), self.table.config().ttl);
        entries.insert(key, entry);
    }

    /// Inserts `key` only if no visible entry exists for it.
    ///
    /// Returns true if the value was inserted. Under [`ReadPolicy::Strict`]
    /// an expired-but-unswept entry is replaced.
    pub fn put_if_absent(&self, key: K, value: V) -> bool {
        let Some(mut entries) = self.write_entries("put_if_absent") else {
            return false;
        };
        let now = Instant::now();
        let policy = self.read_policy();

        if entries
            .get(&key)
            .is_some_and(|entry| policy.is_visible(entry, now))
        {
            return false;
        }

        entries.insert(key, Entry::new(value, now, self.table.config().ttl));
        true
    }

    /// Restarts the lifetime of an existing, visible entry.
    ///
    /// Returns false if the key is absent (or hidden by the read policy).
    pub fn touch<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let Some(mut entries) = self.write_entries("touch") else {
            return false;
        };
        let now = Instant::now();
        let policy = self.read_policy();

        match entries.get_mut(key) {
            Some(entry) if policy.is_visible(entry, now) => {
                entry.refresh(now, self.table.config().ttl);
                true
            }
            _ => false,
        }
    }

    /// Returns a copy of the value stored under `key`.
    ///
    /// Does not refresh the TTL.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        V: Clone,
    {
        let entries = self.read_entries()?;
        let now = Instant::now();
        entries
            .get(key)
            .filter(|entry| self.read_policy().is_visible(entry, now))
            .map(|entry| entry.value().clone())
    }

    /// Like [`TtlMap::get`], returning `V::default()` when absent.
    pub fn get_or_default<Q>(&self, key: &Q) -> V
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        V: Clone + Default,
    {
        self.get(key).unwrap_or_default()
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let Some(entries) = self.read_entries() else {
            return false;
        };
        let now = Instant::now();
        entries
            .get(key)
            .is_some_and(|entry| self.read_policy().is_visible(entry, now))
    }

    /// Time left before `key` expires. Zero for a visible entry that is
    /// already past its deadline.
    pub fn remaining_ttl<Q>(&self, key: &Q) -> Option<Duration>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let entries = self.read_entries()?;
        let now = Instant::now();
        entries
            .get(key)
            .filter(|entry| self.read_policy().is_visible(entry, now))
            .map(|entry| entry.remaining_at(now))
    }

    /// Removes `key`. Returns whether an entry was stored under it.
    pub fn delete<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.write_entries("delete")
            .is_some_and(|mut entries| entries.remove(key).is_some())
    }

    /// Removes every entry at once.
    pub fn clear(&self) {
        if let Some(mut entries) = self.write_entries("clear") {
            entries.clear();
        }
    }

    /// Number of entries readers can see.
    ///
    /// With [`ReadPolicy::Sweep`] this is the physical occupancy, including
    /// expired entries not swept yet.
    pub fn len(&self) -> usize {
        self.read_entries().map_or(0, |entries| {
            count_visible(&*entries, self.read_policy(), Instant::now())
        })
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns an independent copy of every visible entry.
    pub fn snapshot(&self) -> HashMap<K, Entry<V>>
    where
        K: Clone,
        V: Clone,
    {
        let Some(entries) = self.read_entries() else {
            return HashMap::new();
        };
        let now = Instant::now();
        let policy = self.read_policy();

        entries
            .iter()
            .filter(|(_, entry)| policy.is_visible(entry, now))
            .map(|(key, entry)| (key.clone(), entry.clone()))
            .collect()
    }

    /// Runs one prune pass right now, returning the number of entries removed.
    pub fn sweep_now(&self) -> usize {
        if self.is_closed() {
            return 0;
        }
        self.table.sweep(Instant::now())
    }

    pub fn ttl(&self) -> Duration {
        self.table.config().ttl
    }

    pub fn read_policy(&self) -> ReadPolicy {
        self.table.config().read_policy
    }

    pub fn config(&self) -> &TtlMapConfig {
        self.table.config()
    }

    /// Get map statistics (passive - no sweeping).
    pub fn stats(&self) -> TtlMapStats {
        // Never hold the table lock while waiting on the sweeper handle:
        // `shutdown` holds the handle while the sweeper may want the table.
        let entries = self.table.read().len();
        let sweeper_running = self
            .sweeper
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_running();

        TtlMapStats {
            entries,
            sweeps: self.table.sweeps(),
            swept_entries: self.table.swept_entries(),
            sweeper_running,
            closed: self.is_closed(),
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Stops the sweeper, waits for its thread, then clears the map.
    ///
    /// # Errors
    ///
    /// Returns `TtlMapError::Closed` if the map was already shut down; the
    /// second call has no other effect.
    pub fn shutdown(&self) -> Result<()> {
        if self.closed.swap(true, Ordering::SeqCst) {
            return Err(TtlMapError::Closed);
        }

        self.sweeper
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .stop();
        self.table.write().clear();

        tracing::info!("TTL map shut down");
        Ok(())
    }

    // The closed flag is checked after taking the lock, so nothing written
    // concurrently with `shutdown` survives its final clear.
    fn read_entries(&self) -> Option<RwLockReadGuard<'_, HashMap<K, Entry<V>>>> {
        let entries = self.table.read();
        (!self.is_closed()).then_some(entries)
    }

    fn write_entries(
        &self,
        operation: &'static str,
    ) -> Option<RwLockWriteGuard<'_, HashMap<K, Entry<V>>>> {
        let entries = self.table.write();
        if self.is_closed() {
            tracing::warn!(operation, "TTL map used after shutdown, ignoring");
            return None;
        }
        Some(entries)
    }
}

impl<K, V> Drop for TtlMap<K, V> {
    fn drop(&mut self) {
        if !self.closed.swap(true, Ordering::SeqCst) {
            self.sweeper
                .get_mut()
                .unwrap_or_else(PoisonError::into_inner)
                .stop();
        }
    }
}

impl<K, V> fmt::Debug for TtlMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TtlMap")
            .field("config", self.table.config())
            .field("closed", &self.closed.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

/// Map statistics (passive data).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TtlMapStats {
    /// Physical entry count, including expired entries not swept yet.
    pub entries: usize,
    /// Prune passes run so far, background and manual.
    pub sweeps: u64,
    /// Entries removed by those passes.
    pub swept_entries: u64,
    pub sweeper_running: bool,
    pub closed: bool,
}
