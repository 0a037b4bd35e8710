//! The prune pass over an entry table.
//!
//! Shared by the background sweeper and by manual sweeps; the caller is
//! responsible for holding whatever lock protects the table.

use std::collections::HashMap;
use std::hash::Hash;
use std::time::Instant;

use crate::entry::Entry;
use crate::policy::ReadPolicy;

/// Removes every entry whose deadline is at or before `now`.
///
/// Returns the number of entries removed. Full linear scan.
pub fn prune_expired<K, V>(table: &mut HashMap<K, Entry<V>>, now: Instant) -> usize
where
    K: Eq + Hash,
{
    let before = table.len();
    table.retain(|_, entry| !entry.is_expired_at(now));
    before - table.len()
}

/// Counts the entries visible to readers under `policy`.
pub fn count_visible<K, V>(table: &HashMap<K, Entry<V>>, policy: ReadPolicy, now: Instant) -> usize {
    match policy {
        ReadPolicy::Sweep => table.len(),
        ReadPolicy::Strict => table
            .values()
            .filter(|entry| policy.is_visible(entry, now))
            .count(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn table_at(now: Instant) -> HashMap<&'static str, Entry<u32>> {
        let mut table = HashMap::new();
        table.insert("short", Entry::new(1, now, Duration::from_secs(1)));
        table.insert("medium", Entry::new(2, now, Duration::from_secs(5)));
        table.insert("long", Entry::new(3, now, Duration::from_secs(60)));
        table
    }

    #[test]
    fn test_prune_nothing_before_deadlines() {
        let now = Instant::now();
        let mut table = table_at(now);

        assert_eq!(prune_expired(&mut table, now), 0);
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_prune_removes_only_expired() {
        let now = Instant::now();
        let mut table = table_at(now);

        let removed = prune_expired(&mut table, now + Duration::from_secs(5));

        assert_eq!(removed, 2);
        assert!(table.contains_key("long"));
        assert!(!table.contains_key("short"));
        assert!(!table.contains_key("medium"));
    }

    #[test]
    fn test_prune_keeps_fresh_rewrite() {
        let now = Instant::now();
        let mut table = table_at(now);

        // A write that lands just before the sweep checks keeps its new deadline
        let rewrite_at = now + Duration::from_millis(999);
        table.insert("short", Entry::new(10, rewrite_at, Duration::from_secs(1)));

        assert_eq!(prune_expired(&mut table, now + Duration::from_secs(1)), 0);
        assert_eq!(table["short"].value(), &10);
    }

    #[test]
    fn test_prune_empty_table() {
        let mut table: HashMap<u8, Entry<()>> = HashMap::new();
        assert_eq!(prune_expired(&mut table, Instant::now()), 0);
    }

    #[test]
    fn test_count_visible_sweep_counts_physical() {
        let now = Instant::now();
        let table = table_at(now);
        let later = now + Duration::from_secs(10);

        assert_eq!(count_visible(&table, ReadPolicy::Sweep, later), 3);
    }

    #[test]
    fn test_count_visible_strict_counts_live() {
        let now = Instant::now();
        let table = table_at(now);
        let later = now + Duration::from_secs(10);

        assert_eq!(count_visible(&table, ReadPolicy::Strict, now), 3);
        assert_eq!(count_visible(&table, ReadPolicy::Strict, later), 1);
    }
}
