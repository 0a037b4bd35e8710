//! Concurrent TTL map - imperative shell.
//!
//! This crate wires the pure pieces from `ttlmap_core` to threads and
//! locks. It provides a generic in-memory map whose entries expire a fixed
//! TTL after being written, with a background sweeper that reclaims them.
//!
//! # Architecture
//!
//! - **Functional Core** (`ttlmap_core`): Entries, deadlines, prune pass, config
//! - **Imperative Shell** (this crate): Locking, sweeper thread, lifecycle
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//!
//! use ttlmap::{TtlMap, TtlMapError};
//!
//! // Create map (spawns the sweeper thread)
//! let sessions = TtlMap::new(16, Duration::from_secs(30), Duration::from_secs(1)).unwrap();
//!
//! sessions.put("alice".to_string(), 42u32);
//! assert_eq!(sessions.get("alice"), Some(42));
//! assert_eq!(sessions.get_or_default("bob"), 0);
//! assert!(!sessions.delete("bob"));
//!
//! // Stop the sweeper and drop every entry; only the first call succeeds
//! sessions.shutdown().unwrap();
//! assert_eq!(sessions.shutdown(), Err(TtlMapError::Closed));
//! ```

mod error;
mod map;
mod sweeper;
mod table;

// Re-export core types for convenience
pub use ttlmap_core::{Entry, ReadPolicy, TtlMapConfig, TtlMapCoreError};

// Export shell types
pub use error::{Result, TtlMapError};
pub use map::{TtlMap, TtlMapStats};
