//! Configuration types for TTL maps with validation.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TtlMapCoreError};
use crate::policy::ReadPolicy;

pub const ENV_CAPACITY_HINT: &str = "TTLMAP_CAPACITY_HINT";
pub const ENV_TTL_MS: &str = "TTLMAP_TTL_MS";
pub const ENV_SWEEP_INTERVAL_MS: &str = "TTLMAP_SWEEP_INTERVAL_MS";
pub const ENV_READ_POLICY: &str = "TTLMAP_READ_POLICY";

pub const DEFAULT_CAPACITY_HINT: usize = 0;
pub const DEFAULT_TTL_MS: u64 = 300_000;
pub const DEFAULT_SWEEP_INTERVAL_MS: u64 = 60_000;

/// Configuration for a TTL map (validated).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TtlMapConfig {
    /// Initial table capacity. Advisory only, never enforced as a bound.
    #[serde(default)]
    pub capacity_hint: usize,
    /// Lifetime applied to every write.
    #[serde(
        rename = "ttl_ms",
        serialize_with = "crate::serde::serialize_duration_ms",
        deserialize_with = "crate::serde::deserialize_duration_ms"
    )]
    pub ttl: Duration,
    /// Period of the background sweep.
    #[serde(
        rename = "sweep_interval_ms",
        serialize_with = "crate::serde::serialize_duration_ms",
        deserialize_with = "crate::serde::deserialize_duration_ms"
    )]
    pub sweep_interval: Duration,
    /// Whether reads filter out expired-but-unswept entries.
    #[serde(default)]
    pub read_policy: ReadPolicy,
}

impl TtlMapConfig {
    /// Create and validate a config.
    ///
    /// A zero `ttl` is accepted and makes every entry expire immediately.
    /// A zero `sweep_interval` is rejected.
    pub fn new(capacity_hint: usize, ttl: Duration, sweep_interval: Duration) -> Result<Self> {
        let config = Self {
            capacity_hint,
            ttl,
            sweep_interval,
            read_policy: ReadPolicy::default(),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn with_read_policy(mut self, read_policy: ReadPolicy) -> Self {
        self.read_policy = read_policy;
        self
    }

    /// Re-check invariants, e.g. after deserializing.
    pub fn validate(&self) -> Result<()> {
        if self.sweep_interval.is_zero() {
            return Err(TtlMapCoreError::InvalidSweepInterval);
        }
        Ok(())
    }

    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `TTLMAP_CAPACITY_HINT` - Initial capacity (default: 0)
    /// - `TTLMAP_TTL_MS` - Entry lifetime in milliseconds (default: 300000)
    /// - `TTLMAP_SWEEP_INTERVAL_MS` - Sweep period in milliseconds (default: 60000)
    /// - `TTLMAP_READ_POLICY` - `sweep` or `strict` (default: sweep)
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Same as [`TtlMapConfig::from_env`] but reads values through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let capacity_hint = parse_var(&lookup, ENV_CAPACITY_HINT, DEFAULT_CAPACITY_HINT)?;
        let ttl_ms = parse_var(&lookup, ENV_TTL_MS, DEFAULT_TTL_MS)?;
        let sweep_interval_ms = parse_var(&lookup, ENV_SWEEP_INTERVAL_MS, DEFAULT_SWEEP_INTERVAL_MS)?;
        let read_policy = match lookup(ENV_READ_POLICY) {
            Some(raw) => raw.parse()?,
            None => ReadPolicy::default(),
        };

        Ok(Self::new(
            capacity_hint,
            Duration::from_millis(ttl_ms),
            Duration::from_millis(sweep_interval_ms),
        )?
        .with_read_policy(read_policy))
    }
}

impl Default for TtlMapConfig {
    /// 5 minute TTL swept every minute.
    fn default() -> Self {
        Self {
            capacity_hint: DEFAULT_CAPACITY_HINT,
            ttl: Duration::from_millis(DEFAULT_TTL_MS),
            sweep_interval: Duration::from_millis(DEFAULT_SWEEP_INTERVAL_MS),
            read_policy: ReadPolicy::default(),
        }
    }
}

fn parse_var<F, T>(lookup: &F, var: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(var) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| TtlMapCoreError::InvalidEnvValue {
                var: var.to_string(),
                value: raw,
            }),
        None => Ok(default),
    }
}
