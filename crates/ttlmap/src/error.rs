//! TTL map errors including thread and lifecycle failures.

use thiserror::Error;
use ttlmap_core::TtlMapCoreError;

/// TTL map errors including thread and lifecycle failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TtlMapError {
    #[error("Core error: {0}")]
    Core(#[from] TtlMapCoreError),

    #[error("TTL map is already shut down")]
    Closed,

    #[error("Failed to start sweeper: {0}")]
    SweeperSpawn(String),
}

pub type Result<T> = std::result::Result<T, TtlMapError>;
