//! Serde helper functions for duration fields.
//!
//! Durations are written as whole milliseconds so configs stay readable
//! in JSON/TOML files and environment variables alike.

use std::time::Duration;

use serde::{Deserialize, Deserializer, Serializer};

/// Serialize a Duration as an integer number of milliseconds.
pub fn serialize_duration_ms<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let millis = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
    serializer.serialize_u64(millis)
}

/// Deserialize a Duration from an integer number of milliseconds.
pub fn deserialize_duration_ms<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let millis = u64::deserialize(deserializer)?;
    Ok(Duration::from_millis(millis))
}
