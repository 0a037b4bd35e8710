//! Pure TTL map logic - no threads, no clocks, no side effects.
//!
//! This crate provides:
//! - The [`Entry`] type and deadline arithmetic
//! - The prune pass shared by the background sweeper and manual sweeps
//! - Read policies deciding whether an expired entry is still visible
//! - Configuration types with validation
//! - Error types for validation failures
//!
//! Every function that needs "now" takes it as an argument, so the
//! behaviour here is fully deterministic.
//!
//! # Example
//!
//! ```
//! use std::collections::HashMap;
//! use std::time::{Duration, Instant};
//!
//! use ttlmap_core::{prune_expired, Entry, ReadPolicy, TtlMapConfig};
//!
//! // Create validated config
//! let config = TtlMapConfig::new(16, Duration::from_secs(4), Duration::from_secs(1)).unwrap();
//! assert_eq!(config.read_policy, ReadPolicy::Sweep);
//!
//! // Entries carry an absolute deadline computed at write time
//! let now = Instant::now();
//! let mut table = HashMap::new();
//! table.insert("session", Entry::new("alice", now, config.ttl));
//!
//! // Nothing is removed before the deadline...
//! assert_eq!(prune_expired(&mut table, now), 0);
//! // ...and everything past it is
//! assert_eq!(prune_expired(&mut table, now + Duration::from_secs(5)), 1);
//! assert!(table.is_empty());
//! ```

mod config;
mod entry;
mod error;
mod policy;
mod prune;
mod serde;

pub use config::{
    TtlMapConfig, DEFAULT_CAPACITY_HINT, DEFAULT_SWEEP_INTERVAL_MS, DEFAULT_TTL_MS,
    ENV_CAPACITY_HINT, ENV_READ_POLICY, ENV_SWEEP_INTERVAL_MS, ENV_TTL_MS,
};
pub use entry::{deadline, Entry, MAX_TTL};
pub use error::{Result, TtlMapCoreError};
pub use policy::ReadPolicy;
pub use prune::{count_visible, prune_expired};
